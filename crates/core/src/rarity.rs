//! Rarity bands for enchantment selection.

use serde::{Deserialize, Serialize};

/// A named rarity tier bundling a roulette weight with the enchanting-cost
/// window in which the enchantment can appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Everyday enchantments, heavily weighted in selection.
    Common,
    /// Moderately weighted tier.
    Uncommon,
    /// Strong enchantments that need a powered-up table.
    Rare,
    /// Top tier, rarely offered and only at high cost.
    VeryRare,
}

impl Rarity {
    /// Selection weight used by the cumulative-weight roulette.
    pub fn weight(self) -> u32 {
        match self {
            Rarity::Common => 10,
            Rarity::Uncommon => 5,
            Rarity::Rare => 2,
            Rarity::VeryRare => 1,
        }
    }

    /// Lowest effective level at which this tier can appear.
    pub fn min_cost(self) -> u32 {
        match self {
            Rarity::Common => 1,
            Rarity::Uncommon => 5,
            Rarity::Rare => 10,
            Rarity::VeryRare => 20,
        }
    }

    /// Level at which this tier reaches its maximum enchantment level.
    /// Offers stay available up to twice this value.
    pub fn max_cost(self) -> u32 {
        match self {
            Rarity::Common => 20,
            Rarity::Uncommon => 30,
            Rarity::Rare => 40,
            Rarity::VeryRare => 50,
        }
    }

    /// Display name of the tier.
    pub fn name(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::VeryRare => "very_rare",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_descend_with_rarity() {
        assert!(Rarity::Common.weight() > Rarity::Uncommon.weight());
        assert!(Rarity::Uncommon.weight() > Rarity::Rare.weight());
        assert!(Rarity::Rare.weight() > Rarity::VeryRare.weight());
    }

    #[test]
    fn test_cost_windows_are_ordered() {
        for rarity in [
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::VeryRare,
        ] {
            assert!(rarity.min_cost() < rarity.max_cost());
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Rarity::VeryRare).unwrap();
        assert_eq!(json, "\"very_rare\"");
    }
}
