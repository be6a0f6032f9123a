//! Eligibility and conflict resolution.
//!
//! Whether an enchantment can go on an item is a bitset intersection
//! between the definition's target tags and the tags the item's class
//! expands to. Conflicts are symmetric even when only one definition
//! declares the other.

use crate::catalog::{EnchantmentCatalog, EnchantmentDefinition};
use arcforge_core::{Item, ItemClass};
use bitflags::bitflags;

bitflags! {
    /// Item-class target tags an enchantment definition can name.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TargetFlags: u32 {
        /// Melee swords.
        const SWORD = 1 << 0;
        /// Axes (both tool and weapon lines target these).
        const AXE = 1 << 1;
        /// Pickaxes.
        const PICKAXE = 1 << 2;
        /// Shovels.
        const SHOVEL = 1 << 3;
        /// Hoes.
        const HOE = 1 << 4;
        /// Generic mining/farming tool tag; every tool class expands to it.
        const TOOL = 1 << 5;
        /// Bows.
        const BOW = 1 << 6;
        /// Helmets.
        const HELMET = 1 << 7;
        /// Chestplates.
        const CHESTPLATE = 1 << 8;
        /// Leggings.
        const LEGGINGS = 1 << 9;
        /// Boots.
        const BOOTS = 1 << 10;
        /// Generic armor tag; every armor piece expands to it.
        const ARMOR = 1 << 11;
        /// Shields.
        const SHIELD = 1 << 12;
        /// Fishing rods.
        const FISHING_ROD = 1 << 13;
        /// Shears.
        const SHEARS = 1 << 14;
        /// Items that wear out (durability enchantments).
        const BREAKABLE = 1 << 15;
        /// Items worn on the body.
        const WEARABLE = 1 << 16;
        /// Items that can carry vanishing curses.
        const VANISHABLE = 1 << 17;
    }
}

/// Expand an item class into the full set of tags it matches.
///
/// Armor pieces pick up the generic `ARMOR` tag, tools the generic `TOOL`
/// tag, and the breakable/wearable/vanishable allowlists are encoded here.
pub fn target_flags(class: ItemClass) -> TargetFlags {
    let breakable = TargetFlags::BREAKABLE | TargetFlags::VANISHABLE;
    match class {
        ItemClass::Sword => TargetFlags::SWORD | breakable,
        ItemClass::Axe => TargetFlags::AXE | TargetFlags::TOOL | breakable,
        ItemClass::Pickaxe => TargetFlags::PICKAXE | TargetFlags::TOOL | breakable,
        ItemClass::Shovel => TargetFlags::SHOVEL | TargetFlags::TOOL | breakable,
        ItemClass::Hoe => TargetFlags::HOE | TargetFlags::TOOL | breakable,
        ItemClass::Bow => TargetFlags::BOW | breakable,
        ItemClass::Helmet => TargetFlags::HELMET | TargetFlags::ARMOR | TargetFlags::WEARABLE | breakable,
        ItemClass::Chestplate => {
            TargetFlags::CHESTPLATE | TargetFlags::ARMOR | TargetFlags::WEARABLE | breakable
        }
        ItemClass::Leggings => {
            TargetFlags::LEGGINGS | TargetFlags::ARMOR | TargetFlags::WEARABLE | breakable
        }
        ItemClass::Boots => TargetFlags::BOOTS | TargetFlags::ARMOR | TargetFlags::WEARABLE | breakable,
        ItemClass::Shield => TargetFlags::SHIELD | breakable,
        ItemClass::FishingRod => TargetFlags::FISHING_ROD | breakable,
        ItemClass::Shears => TargetFlags::SHEARS | breakable,
        // Books accept everything; handled in is_eligible.
        ItemClass::Book => TargetFlags::all(),
        ItemClass::Other => TargetFlags::empty(),
    }
}

/// Whether the enchantment may be applied to the item at all.
pub fn is_eligible(item: &Item, def: &EnchantmentDefinition) -> bool {
    def.targets.intersects(target_flags(item.class))
}

/// Whether two enchantments are mutually exclusive.
///
/// True when the ids are equal or either definition lists the other in its
/// conflict list, so a one-way declaration still excludes both ways.
pub fn conflicts(a: &EnchantmentDefinition, b: &EnchantmentDefinition) -> bool {
    a.id == b.id || a.conflicts.contains(&b.id) || b.conflicts.contains(&a.id)
}

/// Whether `def` conflicts with any enchantment already on `item`.
pub fn conflicts_with_item(
    item: &Item,
    catalog: &EnchantmentCatalog,
    def: &EnchantmentDefinition,
) -> bool {
    item.enchantments.iter().any(|entry| {
        entry.id != def.id
            && catalog
                .get(&entry.id)
                .is_some_and(|existing| conflicts(existing, def))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;

    #[test]
    fn test_armor_piece_matches_generic_armor_target() {
        let catalog = default_catalog();
        let protection = catalog.get("protection").unwrap();
        assert!(is_eligible(&Item::new("iron_helmet"), protection));
        assert!(is_eligible(&Item::new("leather_boots"), protection));
        assert!(!is_eligible(&Item::new("iron_sword"), protection));
    }

    #[test]
    fn test_tool_classes_match_generic_tool_target() {
        let catalog = default_catalog();
        let efficiency = catalog.get("efficiency").unwrap();
        assert!(is_eligible(&Item::new("stone_pickaxe"), efficiency));
        assert!(is_eligible(&Item::new("iron_shovel"), efficiency));
        assert!(!is_eligible(&Item::new("bow"), efficiency));
    }

    #[test]
    fn test_breakable_allowlist() {
        let catalog = default_catalog();
        let unbreaking = catalog.get("unbreaking").unwrap();
        assert!(is_eligible(&Item::new("fishing_rod"), unbreaking));
        assert!(is_eligible(&Item::new("shears"), unbreaking));
        assert!(!is_eligible(&Item::new("cobblestone"), unbreaking));
    }

    #[test]
    fn test_book_accepts_everything() {
        let catalog = default_catalog();
        let book = Item::new("book");
        for def in catalog.iter() {
            assert!(is_eligible(&book, def), "{} should fit a book", def.id);
        }
    }

    #[test]
    fn test_conflicts_symmetric_when_declared_one_way() {
        let catalog = default_catalog();
        // frost_walker declares depth_strider; depth_strider declares nothing back.
        let frost = catalog.get("frost_walker").unwrap();
        let depth = catalog.get("depth_strider").unwrap();
        assert!(frost.conflicts.contains(&"depth_strider"));
        assert!(!depth.conflicts.contains(&"frost_walker"));
        assert!(conflicts(frost, depth));
        assert!(conflicts(depth, frost));
    }

    #[test]
    fn test_same_id_conflicts_with_itself() {
        let catalog = default_catalog();
        let sharpness = catalog.get("sharpness").unwrap();
        assert!(conflicts(sharpness, sharpness));
    }

    #[test]
    fn test_conflicts_with_item() {
        let catalog = default_catalog();
        let mut item = Item::new("diamond_pickaxe");
        item.enchantments
            .push(arcforge_core::Enchantment::new("silk_touch", 1));
        assert!(conflicts_with_item(
            &item,
            &catalog,
            catalog.get("fortune").unwrap()
        ));
        assert!(!conflicts_with_item(
            &item,
            &catalog,
            catalog.get("efficiency").unwrap()
        ));
        // An enchantment never blocks raising its own level.
        assert!(!conflicts_with_item(
            &item,
            &catalog,
            catalog.get("silk_touch").unwrap()
        ));
    }
}
