//! Application and combination engine.
//!
//! Mutates an item's enchantment list: single applications from a table
//! offer, and anvil-style merging of two items. Display state (glint flag
//! and roman-numeral lore) is recomputed after every successful change.

use crate::catalog::EnchantmentCatalog;
use crate::eligibility::{conflicts_with_item, is_eligible};
use arcforge_core::{Enchantment, Item, ItemClass};
use thiserror::Error;
use tracing::warn;

/// Error produced by [`combine_items`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombineError {
    /// Item types differ and the sacrifice is not a book.
    #[error("Items cannot be combined")]
    IncompatibleItems,
    /// The sacrifice carries no enchantments to transfer.
    #[error("Sacrifice has no enchantments")]
    NothingToTransfer,
    /// Every transfer was blocked by conflicts or existing levels.
    #[error("No enchantments were transferred")]
    NoChanges,
    /// The player cannot pay the combination cost.
    #[error("Not enough experience levels (need {needed}, have {have})")]
    InsufficientLevel {
        /// Levels the combination costs.
        needed: u32,
        /// Levels the player has.
        have: u32,
    },
}

/// Apply one enchantment to an item.
///
/// Unforced calls validate existence, level bounds, eligibility, and
/// conflicts; any failure logs a warning and returns `None` (the item is
/// untouched). An entry already present is only ever raised, never
/// lowered. `force` clamps the level into range, skips the eligibility and
/// conflict checks, and overwrites an existing entry outright.
///
/// Returns the level now present on the item.
pub fn apply_enchantment(
    item: &mut Item,
    catalog: &EnchantmentCatalog,
    id: &str,
    level: u32,
    force: bool,
) -> Option<u32> {
    let Some(def) = catalog.get(id) else {
        warn!(id, "apply rejected: unknown enchantment");
        return None;
    };

    let level = if force {
        level.clamp(1, def.max_level)
    } else {
        if level < 1 || level > def.max_level {
            warn!(id, level, max = def.max_level, "apply rejected: level out of bounds");
            return None;
        }
        level
    };

    if !force {
        if !is_eligible(item, def) {
            warn!(id, item = %item.type_name, "apply rejected: item not eligible");
            return None;
        }
        if conflicts_with_item(item, catalog, def) {
            warn!(id, item = %item.type_name, "apply rejected: conflicting enchantment present");
            return None;
        }
    }

    let applied = match item.enchantments.iter_mut().find(|e| e.id == id) {
        Some(existing) => {
            if force {
                existing.level = level;
            } else if level > existing.level {
                existing.level = level;
            }
            existing.level
        }
        None => {
            item.enchantments.push(Enchantment::new(id, level));
            level
        }
    };

    update_display(item, catalog);
    Some(applied)
}

/// Merge the sacrifice's enchantments into the target (anvil combination).
///
/// The items must share a type, or the sacrifice must be a book. For each
/// sacrifice enchantment: a strictly higher level upgrades the target, an
/// equal level below the maximum bumps it by one, and an absent,
/// non-conflicting enchantment is added. Each change costs
/// `applied_level * 2` player levels.
///
/// On success returns the merged item and the total cost; the inputs are
/// not mutated.
pub fn combine_items(
    target: &Item,
    sacrifice: &Item,
    player_level: u32,
    catalog: &EnchantmentCatalog,
) -> Result<(Item, u32), CombineError> {
    if target.type_name != sacrifice.type_name && sacrifice.class != ItemClass::Book {
        return Err(CombineError::IncompatibleItems);
    }
    if sacrifice.enchantments.is_empty() {
        return Err(CombineError::NothingToTransfer);
    }

    let mut merged = target.clone();
    let mut level_cost = 0u32;
    let mut changes = 0u32;

    for entry in &sacrifice.enchantments {
        let Some(def) = catalog.get(&entry.id) else {
            warn!(id = %entry.id, "combine: skipping unknown enchantment on sacrifice");
            continue;
        };
        let incoming = entry.level.min(def.max_level);

        let applied = match merged.enchantments.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => {
                if incoming > existing.level {
                    existing.level = incoming;
                    Some(incoming)
                } else if incoming == existing.level && existing.level < def.max_level {
                    existing.level += 1;
                    Some(existing.level)
                } else {
                    None
                }
            }
            None => {
                if conflicts_with_item(&merged, catalog, def) {
                    None
                } else {
                    merged.enchantments.push(Enchantment::new(def.id, incoming));
                    Some(incoming)
                }
            }
        };

        if let Some(applied_level) = applied {
            level_cost += applied_level * 2;
            changes += 1;
        }
    }

    if changes == 0 {
        return Err(CombineError::NoChanges);
    }
    if player_level < level_cost {
        return Err(CombineError::InsufficientLevel {
            needed: level_cost,
            have: player_level,
        });
    }

    update_display(&mut merged, catalog);
    Ok((merged, level_cost))
}

/// Recompute the derived display state from the enchantment list.
///
/// Idempotent: calling it twice on an unchanged list yields identical
/// `lore` and `glowing` output.
pub fn update_display(item: &mut Item, catalog: &EnchantmentCatalog) {
    item.glowing = !item.enchantments.is_empty();
    item.lore = item
        .enchantments
        .iter()
        .map(|entry| {
            let name = catalog
                .get(&entry.id)
                .map(|def| def.display_name)
                .unwrap_or(entry.id.as_str());
            format!("{} {}", name, roman_numeral(entry.level))
        })
        .collect();
}

/// Roman numeral for lore lines. Levels past X never occur in the stock
/// catalog; render them as digits if they do.
fn roman_numeral(level: u32) -> String {
    const NUMERALS: [&str; 10] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];
    match level {
        1..=10 => NUMERALS[(level - 1) as usize].to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;

    #[test]
    fn test_apply_adds_single_entry() {
        let catalog = default_catalog();
        let mut item = Item::new("diamond_sword");
        assert_eq!(
            apply_enchantment(&mut item, &catalog, "sharpness", 3, false),
            Some(3)
        );
        assert_eq!(item.enchantments.len(), 1);
        assert_eq!(item.enchantment_level("sharpness"), Some(3));
        assert!(item.glowing);
    }

    #[test]
    fn test_apply_never_downgrades_without_force() {
        let catalog = default_catalog();
        let mut item = Item::new("diamond_sword");
        apply_enchantment(&mut item, &catalog, "sharpness", 4, false);
        // A lower level succeeds but keeps the higher existing level.
        assert_eq!(
            apply_enchantment(&mut item, &catalog, "sharpness", 2, false),
            Some(4)
        );
        assert_eq!(item.enchantment_level("sharpness"), Some(4));
        assert_eq!(item.enchantments.len(), 1);
    }

    #[test]
    fn test_force_overwrites_and_clamps() {
        let catalog = default_catalog();
        let mut item = Item::new("diamond_sword");
        apply_enchantment(&mut item, &catalog, "sharpness", 4, false);
        assert_eq!(
            apply_enchantment(&mut item, &catalog, "sharpness", 2, true),
            Some(2)
        );
        assert_eq!(item.enchantment_level("sharpness"), Some(2));
        // Out-of-range forced level clamps to the maximum.
        assert_eq!(
            apply_enchantment(&mut item, &catalog, "sharpness", 99, true),
            Some(5)
        );
    }

    #[test]
    fn test_apply_rejects_out_of_bounds_level() {
        let catalog = default_catalog();
        let mut item = Item::new("diamond_sword");
        assert_eq!(apply_enchantment(&mut item, &catalog, "sharpness", 6, false), None);
        assert_eq!(apply_enchantment(&mut item, &catalog, "sharpness", 0, false), None);
        assert!(item.enchantments.is_empty());
    }

    #[test]
    fn test_apply_rejects_ineligible_item() {
        let catalog = default_catalog();
        let mut item = Item::new("diamond_sword");
        assert_eq!(apply_enchantment(&mut item, &catalog, "fortune", 1, false), None);
        assert!(item.enchantments.is_empty());
    }

    #[test]
    fn test_conflicting_apply_leaves_original() {
        let catalog = default_catalog();
        let mut item = Item::new("diamond_sword");
        apply_enchantment(&mut item, &catalog, "sharpness", 3, false);
        assert_eq!(apply_enchantment(&mut item, &catalog, "smite", 2, false), None);
        assert_eq!(item.enchantments.len(), 1);
        assert_eq!(item.enchantment_level("sharpness"), Some(3));
        assert!(!item.has_enchantment("smite"));
    }

    #[test]
    fn test_force_bypasses_conflicts() {
        let catalog = default_catalog();
        let mut item = Item::new("diamond_sword");
        apply_enchantment(&mut item, &catalog, "sharpness", 3, false);
        assert_eq!(apply_enchantment(&mut item, &catalog, "smite", 2, true), Some(2));
        assert_eq!(item.enchantments.len(), 2);
    }

    #[test]
    fn test_apply_unknown_id_fails() {
        let catalog = default_catalog();
        let mut item = Item::new("diamond_sword");
        assert_eq!(apply_enchantment(&mut item, &catalog, "shininess", 1, false), None);
    }

    #[test]
    fn test_display_roman_numerals() {
        let catalog = default_catalog();
        let mut item = Item::new("diamond_sword");
        apply_enchantment(&mut item, &catalog, "sharpness", 4, false);
        apply_enchantment(&mut item, &catalog, "knockback", 2, false);
        assert_eq!(item.lore, vec!["Sharpness IV", "Knockback II"]);
    }

    #[test]
    fn test_display_update_is_idempotent() {
        let catalog = default_catalog();
        let mut item = Item::new("diamond_sword");
        apply_enchantment(&mut item, &catalog, "sharpness", 3, false);
        let lore = item.lore.clone();
        let glowing = item.glowing;
        update_display(&mut item, &catalog);
        update_display(&mut item, &catalog);
        assert_eq!(item.lore, lore);
        assert_eq!(item.glowing, glowing);
    }

    #[test]
    fn test_combine_rejects_different_types() {
        let catalog = default_catalog();
        let target = Item::new("diamond_sword");
        let mut sacrifice = Item::new("iron_pickaxe");
        apply_enchantment(&mut sacrifice, &catalog, "efficiency", 1, false);
        let err = combine_items(&target, &sacrifice, 100, &catalog).unwrap_err();
        assert_eq!(err, CombineError::IncompatibleItems);
        assert_eq!(err.to_string(), "Items cannot be combined");
    }

    #[test]
    fn test_combine_requires_enchanted_sacrifice() {
        let catalog = default_catalog();
        let target = Item::new("diamond_sword");
        let sacrifice = Item::new("diamond_sword");
        assert_eq!(
            combine_items(&target, &sacrifice, 100, &catalog).unwrap_err(),
            CombineError::NothingToTransfer
        );
    }

    #[test]
    fn test_combine_book_onto_any_item() {
        let catalog = default_catalog();
        let target = Item::new("diamond_sword");
        let mut book = Item::new("book");
        apply_enchantment(&mut book, &catalog, "sharpness", 3, false);
        let (merged, cost) = combine_items(&target, &book, 100, &catalog).unwrap();
        assert_eq!(merged.enchantment_level("sharpness"), Some(3));
        assert_eq!(cost, 6); // level 3 * 2
    }

    #[test]
    fn test_combine_upgrade_equal_and_add() {
        let catalog = default_catalog();
        let mut target = Item::new("diamond_sword");
        apply_enchantment(&mut target, &catalog, "sharpness", 2, false);
        apply_enchantment(&mut target, &catalog, "knockback", 2, false);

        let mut sacrifice = Item::new("diamond_sword");
        apply_enchantment(&mut sacrifice, &catalog, "sharpness", 2, false); // equal -> bump to 3
        apply_enchantment(&mut sacrifice, &catalog, "knockback", 1, false); // lower -> no change
        apply_enchantment(&mut sacrifice, &catalog, "fire_aspect", 2, false); // absent -> add

        let (merged, cost) = combine_items(&target, &sacrifice, 100, &catalog).unwrap();
        assert_eq!(merged.enchantment_level("sharpness"), Some(3));
        assert_eq!(merged.enchantment_level("knockback"), Some(2));
        assert_eq!(merged.enchantment_level("fire_aspect"), Some(2));
        // sharpness 3*2 + fire_aspect 2*2
        assert_eq!(cost, 10);
    }

    #[test]
    fn test_combine_equal_at_max_is_not_a_change() {
        let catalog = default_catalog();
        let mut target = Item::new("diamond_sword");
        apply_enchantment(&mut target, &catalog, "knockback", 2, false);
        let mut sacrifice = Item::new("diamond_sword");
        apply_enchantment(&mut sacrifice, &catalog, "knockback", 2, false);
        assert_eq!(
            combine_items(&target, &sacrifice, 100, &catalog).unwrap_err(),
            CombineError::NoChanges
        );
    }

    #[test]
    fn test_combine_skips_conflicting_additions() {
        let catalog = default_catalog();
        let mut target = Item::new("diamond_sword");
        apply_enchantment(&mut target, &catalog, "sharpness", 3, false);
        let mut book = Item::new("book");
        apply_enchantment(&mut book, &catalog, "smite", 2, false);
        assert_eq!(
            combine_items(&target, &book, 100, &catalog).unwrap_err(),
            CombineError::NoChanges
        );
    }

    #[test]
    fn test_combine_insufficient_level() {
        let catalog = default_catalog();
        let target = Item::new("diamond_sword");
        let mut book = Item::new("book");
        apply_enchantment(&mut book, &catalog, "sharpness", 5, false);
        assert_eq!(
            combine_items(&target, &book, 5, &catalog).unwrap_err(),
            CombineError::InsufficientLevel { needed: 10, have: 5 }
        );
    }

    #[test]
    fn test_combine_does_not_mutate_inputs() {
        let catalog = default_catalog();
        let target = Item::new("diamond_sword");
        let mut book = Item::new("book");
        apply_enchantment(&mut book, &catalog, "sharpness", 1, false);
        let before = (target.clone(), book.clone());
        let _ = combine_items(&target, &book, 100, &catalog).unwrap();
        assert_eq!(before.0, target);
        assert_eq!(before.1, book);
    }
}
