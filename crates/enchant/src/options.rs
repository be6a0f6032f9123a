//! Weighted option generation for the enchanting table.
//!
//! Given table power, bookshelf bonus, and the player's level, produces the
//! three enchantment offers shown in the table UI. The whole pipeline runs
//! on the deterministic [`Lcg`] so identical inputs always reproduce the
//! same offers; only cache eviction uses ambient randomness.

use crate::catalog::{EnchantmentCatalog, EnchantmentDefinition};
use crate::eligibility::{conflicts, is_eligible};
use arcforge_core::{Enchantment, Item, Lcg};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Default capacity of the offer cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Bonus enchantments are only attempted above this effective power.
const BONUS_POWER_THRESHOLD: u32 = 10;

/// Maximum number of bonus enchantments per offer.
const MAX_BONUS_ATTEMPTS: u32 = 3;

/// One of the three offers shown at an enchanting table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnchantmentOption {
    /// Player level required to take this offer.
    pub level_cost: u32,
    /// Enchantments applied when the offer is taken. Empty when no
    /// enchantment was eligible (a level-only offer).
    pub enchantments: Vec<Enchantment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OptionsKey {
    item_type: String,
    table_level: u32,
    bookshelves: u32,
    player_level: u32,
    seed: u64,
}

/// Generator with a bounded memo of recent offers.
///
/// The cache is keyed on everything that feeds the RNG, so a hit is always
/// bit-identical to regeneration. When full, a random fifth of the entries
/// is dropped rather than tracking recency.
pub struct OptionGenerator {
    cache: HashMap<OptionsKey, [EnchantmentOption; 3]>,
    capacity: usize,
}

impl Default for OptionGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl OptionGenerator {
    /// Create a generator with the given cache capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Number of cached offer sets.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Produce the three offers for an item on a table.
    ///
    /// `table_seed` is the per-table random seed; everything else comes
    /// from the request. Identical inputs return identical offers.
    pub fn generate(
        &mut self,
        catalog: &EnchantmentCatalog,
        item: &Item,
        table_level: u32,
        bookshelves: u32,
        player_level: u32,
        table_seed: u64,
    ) -> [EnchantmentOption; 3] {
        let key = OptionsKey {
            item_type: item.type_name.clone(),
            table_level,
            bookshelves,
            player_level,
            seed: table_seed,
        };
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }

        let options =
            generate_options(catalog, item, table_level, bookshelves, player_level, table_seed);

        if self.cache.len() >= self.capacity {
            self.evict();
        }
        self.cache.insert(key, options.clone());
        options
    }

    /// Drop a random 20% of cache entries.
    fn evict(&mut self) {
        let drop_count = (self.capacity / 5).max(1);
        let keys: Vec<OptionsKey> = self.cache.keys().cloned().collect();
        let mut rng = rand::thread_rng();
        for key in keys.choose_multiple(&mut rng, drop_count) {
            self.cache.remove(key);
        }
        debug!(dropped = drop_count, remaining = self.cache.len(), "evicted offer cache entries");
    }
}

/// Uncached offer generation. Exposed for tests that verify determinism
/// without a generator instance.
pub fn generate_options(
    catalog: &EnchantmentCatalog,
    item: &Item,
    table_level: u32,
    bookshelves: u32,
    player_level: u32,
    table_seed: u64,
) -> [EnchantmentOption; 3] {
    let enchantability = item.enchantability();
    let seed = table_seed
        .wrapping_add(player_level as u64)
        .wrapping_add(enchantability as u64);
    let mut rng = Lcg::new(seed);

    let shelf_bonus = rng.next_f64() * bookshelves as f64 / 2.0
        + rng.next_f64() * bookshelves as f64 / 2.0;
    let effective_level = ((table_level as f64 + shelf_bonus).round() as u32).max(1);

    std::array::from_fn(|slot| {
        let slot_level = ((effective_level as f64 * (slot as f64 + 1.0) / 3.0).round() as u32).max(1);
        single_option(catalog, item, slot_level, &mut rng)
    })
}

/// Generate one offer at the given raw level.
fn single_option(
    catalog: &EnchantmentCatalog,
    item: &Item,
    slot_level: u32,
    rng: &mut Lcg,
) -> EnchantmentOption {
    let enchantability = item.enchantability() as f64;
    let power = ((slot_level as f64 + (enchantability / 4.0) * (1.0 + rng.next_f64())).round()
        as u32)
        .max(1);

    let eligible: Vec<&EnchantmentDefinition> = catalog
        .iter()
        .filter(|def| is_eligible(item, def) && in_cost_window(def, power))
        .collect();

    let Some(main) = roulette(&eligible, rng) else {
        // Nothing fits this item: a level-only offer.
        return EnchantmentOption {
            level_cost: slot_level,
            enchantments: Vec::new(),
        };
    };

    let mut chosen = vec![Enchantment::new(main.id, level_for(main, power, rng))];
    let mut picked: Vec<&EnchantmentDefinition> = vec![main];

    if power > BONUS_POWER_THRESHOLD {
        let mut remaining = power / 2;
        for _ in 0..MAX_BONUS_ATTEMPTS {
            let candidates: Vec<&EnchantmentDefinition> = catalog
                .iter()
                .filter(|def| {
                    is_eligible(item, def)
                        && in_cost_window(def, remaining)
                        && !picked.iter().any(|p| conflicts(p, def))
                })
                .collect();
            if candidates.is_empty() {
                break;
            }
            let bonus = candidates[rng.pick_index(candidates.len())];
            chosen.push(Enchantment::new(bonus.id, level_for(bonus, remaining, rng)));
            picked.push(bonus);
            remaining /= 2;
            if remaining == 0 {
                break;
            }
        }
    }

    EnchantmentOption {
        level_cost: slot_level,
        enchantments: chosen,
    }
}

/// Whether the rarity cost window `[min_cost, max_cost*2]` contains `power`.
fn in_cost_window(def: &EnchantmentDefinition, power: u32) -> bool {
    power >= def.rarity.min_cost() && power <= def.rarity.max_cost() * 2
}

/// Cumulative-weight roulette over rarity weights.
fn roulette<'a>(
    eligible: &[&'a EnchantmentDefinition],
    rng: &mut Lcg,
) -> Option<&'a EnchantmentDefinition> {
    if eligible.is_empty() {
        return None;
    }
    let total: u32 = eligible.iter().map(|def| def.rarity.weight()).sum();
    let mut roll = rng.next_f64() * total as f64;
    for def in eligible {
        roll -= def.rarity.weight() as f64;
        if roll < 0.0 {
            return Some(def);
        }
    }
    eligible.last().copied()
}

/// Level of a selected enchantment: normalized position of `power` inside
/// the rarity's cost window, biased by `0.8 + rng*0.4`, floored, clamped
/// to `[1, max_level]`.
fn level_for(def: &EnchantmentDefinition, power: u32, rng: &mut Lcg) -> u32 {
    let min = def.rarity.min_cost() as f64;
    let max = def.rarity.max_cost() as f64;
    let t = ((power as f64 - min) / (max - min)).clamp(0.0, 1.0);
    let biased = t * rng.next_range(0.8, 1.2);
    let level = 1 + (biased * (def.max_level - 1) as f64).floor() as u32;
    level.min(def.max_level)
}
