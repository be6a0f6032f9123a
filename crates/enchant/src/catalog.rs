//! Enchantment catalog.
//!
//! Definitions are immutable and registered once at process start into an
//! [`EnchantmentCatalog`] that is passed by reference into the engine.
//! Iteration order is registration order, which keeps weighted selection
//! deterministic for a given seed.

use crate::effects::EffectBundle;
use crate::eligibility::TargetFlags;
use arcforge_core::{ItemClass, Rarity};
use std::collections::HashMap;
use thiserror::Error;

/// Per-level effect contribution of one enchantment.
pub type EffectFn = fn(level: u32, class: ItemClass) -> EffectBundle;

/// Immutable description of one enchantment.
pub struct EnchantmentDefinition {
    /// Unique catalog id.
    pub id: &'static str,
    /// Human-readable name used in lore lines.
    pub display_name: &'static str,
    /// Highest level obtainable.
    pub max_level: u32,
    /// Item-class tags this enchantment can target.
    pub targets: TargetFlags,
    /// Rarity band driving selection weight and cost window.
    pub rarity: Rarity,
    /// Ids this enchantment is mutually exclusive with. Conflict checks
    /// are symmetric even when only one side declares the other.
    pub conflicts: &'static [&'static str],
    /// Pure function producing the per-level effect contribution.
    pub effect: EffectFn,
}

/// Error raised while building a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two definitions share an id.
    #[error("duplicate enchantment id: {0}")]
    DuplicateId(&'static str),
    /// A definition declared max level zero.
    #[error("enchantment {0} has max_level 0")]
    ZeroMaxLevel(&'static str),
}

/// Registry of enchantment definitions, built once at startup.
#[derive(Default)]
pub struct EnchantmentCatalog {
    defs: Vec<EnchantmentDefinition>,
    index: HashMap<&'static str, usize>,
}

impl EnchantmentCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. Ids must be unique and levels start at 1.
    pub fn register(&mut self, def: EnchantmentDefinition) -> Result<(), CatalogError> {
        if def.max_level == 0 {
            return Err(CatalogError::ZeroMaxLevel(def.id));
        }
        if self.index.contains_key(def.id) {
            return Err(CatalogError::DuplicateId(def.id));
        }
        self.index.insert(def.id, self.defs.len());
        self.defs.push(def);
        Ok(())
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &str) -> Option<&EnchantmentDefinition> {
        self.index.get(id).map(|&i| &self.defs[i])
    }

    /// Iterate definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &EnchantmentDefinition> {
        self.defs.iter()
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Build the stock catalog shipped with the server.
///
/// The only panic path is a duplicate id in the static table below, which
/// is a programming error caught by the tests.
pub fn default_catalog() -> EnchantmentCatalog {
    let mut catalog = EnchantmentCatalog::new();
    for def in stock_definitions() {
        catalog
            .register(def)
            .unwrap_or_else(|err| panic!("stock catalog: {err}"));
    }
    catalog
}

fn stock_definitions() -> Vec<EnchantmentDefinition> {
    const WEAPON: TargetFlags = TargetFlags::SWORD.union(TargetFlags::AXE);
    vec![
        // Weapon line. The damage family is mutually exclusive; sharpness
        // declares both counterparts, smite only one, and bane none - the
        // symmetric conflict check covers all pairs either way.
        EnchantmentDefinition {
            id: "sharpness",
            display_name: "Sharpness",
            max_level: 5,
            targets: WEAPON,
            rarity: Rarity::Common,
            conflicts: &["smite", "bane_of_arthropods"],
            effect: |level, _| EffectBundle {
                damage_bonus: 0.5 + 0.5 * level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "smite",
            display_name: "Smite",
            max_level: 5,
            targets: WEAPON,
            rarity: Rarity::Uncommon,
            conflicts: &["bane_of_arthropods"],
            effect: |level, _| EffectBundle {
                damage_bonus: 1.25 * level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "bane_of_arthropods",
            display_name: "Bane of Arthropods",
            max_level: 5,
            targets: WEAPON,
            rarity: Rarity::Uncommon,
            conflicts: &[],
            effect: |level, _| EffectBundle {
                damage_bonus: 1.25 * level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "knockback",
            display_name: "Knockback",
            max_level: 2,
            targets: TargetFlags::SWORD,
            rarity: Rarity::Common,
            conflicts: &[],
            effect: |level, _| EffectBundle {
                knockback_bonus: level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "fire_aspect",
            display_name: "Fire Aspect",
            max_level: 2,
            targets: TargetFlags::SWORD,
            rarity: Rarity::Rare,
            conflicts: &[],
            effect: |level, _| EffectBundle {
                fire_seconds: 4.0 * level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "looting",
            display_name: "Looting",
            max_level: 3,
            targets: TargetFlags::SWORD,
            rarity: Rarity::Rare,
            conflicts: &[],
            effect: |level, _| EffectBundle {
                loot_bonus: level,
                xp_bonus: 0.1 * level as f32,
                ..Default::default()
            },
        },
        // Tool line.
        EnchantmentDefinition {
            id: "efficiency",
            display_name: "Efficiency",
            max_level: 5,
            targets: TargetFlags::TOOL,
            rarity: Rarity::Common,
            conflicts: &[],
            effect: |level, _| EffectBundle {
                mining_speed_mult: 1.0 + 0.3 * level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "silk_touch",
            display_name: "Silk Touch",
            max_level: 1,
            targets: TargetFlags::TOOL,
            rarity: Rarity::VeryRare,
            conflicts: &["fortune"],
            effect: |_, _| EffectBundle {
                silk_touch: true,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "fortune",
            display_name: "Fortune",
            max_level: 3,
            targets: TargetFlags::TOOL,
            rarity: Rarity::Rare,
            conflicts: &[],
            effect: |level, _| EffectBundle {
                fortune_level: level,
                ..Default::default()
            },
        },
        // Universal durability line.
        EnchantmentDefinition {
            id: "unbreaking",
            display_name: "Unbreaking",
            max_level: 3,
            targets: TargetFlags::BREAKABLE,
            rarity: Rarity::Common,
            conflicts: &[],
            effect: |level, class| {
                // Armor wears from many small hits, so the save chance is
                // weaker there than on tools.
                let chance = level as f32 / (level + 1) as f32;
                EffectBundle {
                    durability_save_chance: if class.is_armor() {
                        0.3 * chance
                    } else {
                        chance
                    },
                    ..Default::default()
                }
            },
        },
        EnchantmentDefinition {
            id: "mending",
            display_name: "Mending",
            max_level: 1,
            targets: TargetFlags::BREAKABLE,
            rarity: Rarity::Rare,
            conflicts: &["infinity"],
            effect: |_, _| EffectBundle {
                mending_repair: 2,
                ..Default::default()
            },
        },
        // Bow line.
        EnchantmentDefinition {
            id: "power",
            display_name: "Power",
            max_level: 5,
            targets: TargetFlags::BOW,
            rarity: Rarity::Common,
            conflicts: &[],
            effect: |level, _| EffectBundle {
                bow_damage_bonus: 0.5 + 0.5 * level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "punch",
            display_name: "Punch",
            max_level: 2,
            targets: TargetFlags::BOW,
            rarity: Rarity::Uncommon,
            conflicts: &[],
            effect: |level, _| EffectBundle {
                bow_knockback_bonus: level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "flame",
            display_name: "Flame",
            max_level: 1,
            targets: TargetFlags::BOW,
            rarity: Rarity::Rare,
            conflicts: &[],
            effect: |_, _| EffectBundle {
                bow_fire_seconds: 5.0,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "infinity",
            display_name: "Infinity",
            max_level: 1,
            targets: TargetFlags::BOW,
            rarity: Rarity::VeryRare,
            conflicts: &[],
            effect: |_, _| EffectBundle {
                infinite_arrows: true,
                ..Default::default()
            },
        },
        // Armor line. Protections exclude each other through chained
        // one-way declarations.
        EnchantmentDefinition {
            id: "protection",
            display_name: "Protection",
            max_level: 4,
            targets: TargetFlags::ARMOR,
            rarity: Rarity::Common,
            conflicts: &["fire_protection", "blast_protection", "projectile_protection"],
            effect: |level, _| EffectBundle {
                damage_reduction: 0.04 * level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "fire_protection",
            display_name: "Fire Protection",
            max_level: 4,
            targets: TargetFlags::ARMOR,
            rarity: Rarity::Uncommon,
            conflicts: &["blast_protection", "projectile_protection"],
            effect: |level, _| EffectBundle {
                fire_reduction: 0.08 * level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "blast_protection",
            display_name: "Blast Protection",
            max_level: 4,
            targets: TargetFlags::ARMOR,
            rarity: Rarity::Rare,
            conflicts: &["projectile_protection"],
            effect: |level, _| EffectBundle {
                blast_reduction: 0.08 * level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "projectile_protection",
            display_name: "Projectile Protection",
            max_level: 4,
            targets: TargetFlags::ARMOR,
            rarity: Rarity::Uncommon,
            conflicts: &[],
            effect: |level, _| EffectBundle {
                projectile_reduction: 0.08 * level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "feather_falling",
            display_name: "Feather Falling",
            max_level: 4,
            targets: TargetFlags::BOOTS,
            rarity: Rarity::Uncommon,
            conflicts: &[],
            effect: |level, _| EffectBundle {
                fall_reduction: 0.12 * level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "thorns",
            display_name: "Thorns",
            max_level: 3,
            targets: TargetFlags::ARMOR,
            rarity: Rarity::VeryRare,
            conflicts: &[],
            effect: |level, _| EffectBundle {
                thorns_chance: 0.15 * level as f32,
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "respiration",
            display_name: "Respiration",
            max_level: 3,
            targets: TargetFlags::HELMET,
            rarity: Rarity::Rare,
            conflicts: &[],
            effect: |_, _| EffectBundle {
                abilities: vec!["water_breathing".to_string()],
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "aqua_affinity",
            display_name: "Aqua Affinity",
            max_level: 1,
            targets: TargetFlags::HELMET,
            rarity: Rarity::Rare,
            conflicts: &[],
            effect: |_, _| EffectBundle {
                abilities: vec!["aqua_affinity".to_string()],
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "depth_strider",
            display_name: "Depth Strider",
            max_level: 3,
            targets: TargetFlags::BOOTS,
            rarity: Rarity::Rare,
            conflicts: &[],
            effect: |_, _| EffectBundle {
                abilities: vec!["depth_strider".to_string()],
                ..Default::default()
            },
        },
        EnchantmentDefinition {
            id: "frost_walker",
            display_name: "Frost Walker",
            max_level: 2,
            targets: TargetFlags::BOOTS,
            rarity: Rarity::Rare,
            conflicts: &["depth_strider"],
            effect: |_, _| EffectBundle {
                abilities: vec!["frost_walker".to_string()],
                ..Default::default()
            },
        },
    ]
}
