//! Effect aggregation - folding active enchantments into gameplay modifiers.
//!
//! Every enchantment definition contributes an [`EffectBundle`]; bundles
//! merge with fixed per-field rules (numbers take the maximum, booleans OR,
//! lists concatenate). At action time the merged bundle is applied against
//! one action context, and each action only reads the fields relevant to it.

use crate::catalog::EnchantmentCatalog;
use arcforge_core::{Item, Lcg};
use serde::{Deserialize, Serialize};

/// Flat, strongly-typed map of gameplay modifiers contributed by
/// enchantments. A default bundle is the identity for every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectBundle {
    /// Bonus melee damage.
    pub damage_bonus: f32,
    /// Bonus melee knockback.
    pub knockback_bonus: f32,
    /// Seconds of fire applied to melee targets.
    pub fire_seconds: f32,
    /// Extra loot rolls on kills.
    pub loot_bonus: u32,
    /// Bonus arrow damage.
    pub bow_damage_bonus: f32,
    /// Bonus arrow knockback.
    pub bow_knockback_bonus: f32,
    /// Seconds of fire applied by arrows.
    pub bow_fire_seconds: f32,
    /// Arrows are not consumed when firing.
    pub infinite_arrows: bool,
    /// Fractional reduction of all incoming damage.
    pub damage_reduction: f32,
    /// Additional reduction against fire damage.
    pub fire_reduction: f32,
    /// Additional reduction against explosion damage.
    pub blast_reduction: f32,
    /// Additional reduction against projectile damage.
    pub projectile_reduction: f32,
    /// Additional reduction against fall damage.
    pub fall_reduction: f32,
    /// Chance to reflect damage back at an attacker.
    pub thorns_chance: f32,
    /// Mining speed multiplier (1.0 = unchanged).
    pub mining_speed_mult: f32,
    /// Blocks drop themselves instead of their usual loot.
    pub silk_touch: bool,
    /// Fortune level multiplying block drops.
    pub fortune_level: u32,
    /// Chance that a durability hit is suppressed.
    pub durability_save_chance: f32,
    /// Durability restored per experience orb collected.
    pub mending_repair: u32,
    /// Fractional bonus to experience gained.
    pub xp_bonus: f32,
    /// Passive abilities granted while the item is worn/held.
    pub abilities: Vec<String>,
}

impl Default for EffectBundle {
    fn default() -> Self {
        Self {
            damage_bonus: 0.0,
            knockback_bonus: 0.0,
            fire_seconds: 0.0,
            loot_bonus: 0,
            bow_damage_bonus: 0.0,
            bow_knockback_bonus: 0.0,
            bow_fire_seconds: 0.0,
            infinite_arrows: false,
            damage_reduction: 0.0,
            fire_reduction: 0.0,
            blast_reduction: 0.0,
            projectile_reduction: 0.0,
            fall_reduction: 0.0,
            thorns_chance: 0.0,
            mining_speed_mult: 1.0,
            silk_touch: false,
            fortune_level: 0,
            durability_save_chance: 0.0,
            mending_repair: 0,
            xp_bonus: 0.0,
            abilities: Vec::new(),
        }
    }
}

impl EffectBundle {
    /// Merge another bundle into this one.
    ///
    /// Numeric fields keep the maximum seen, boolean fields OR together,
    /// and list fields concatenate.
    pub fn merge(&mut self, other: &EffectBundle) {
        self.damage_bonus = self.damage_bonus.max(other.damage_bonus);
        self.knockback_bonus = self.knockback_bonus.max(other.knockback_bonus);
        self.fire_seconds = self.fire_seconds.max(other.fire_seconds);
        self.loot_bonus = self.loot_bonus.max(other.loot_bonus);
        self.bow_damage_bonus = self.bow_damage_bonus.max(other.bow_damage_bonus);
        self.bow_knockback_bonus = self.bow_knockback_bonus.max(other.bow_knockback_bonus);
        self.bow_fire_seconds = self.bow_fire_seconds.max(other.bow_fire_seconds);
        self.infinite_arrows |= other.infinite_arrows;
        self.damage_reduction = self.damage_reduction.max(other.damage_reduction);
        self.fire_reduction = self.fire_reduction.max(other.fire_reduction);
        self.blast_reduction = self.blast_reduction.max(other.blast_reduction);
        self.projectile_reduction = self.projectile_reduction.max(other.projectile_reduction);
        self.fall_reduction = self.fall_reduction.max(other.fall_reduction);
        self.thorns_chance = self.thorns_chance.max(other.thorns_chance);
        self.mining_speed_mult = self.mining_speed_mult.max(other.mining_speed_mult);
        self.silk_touch |= other.silk_touch;
        self.fortune_level = self.fortune_level.max(other.fortune_level);
        self.durability_save_chance = self
            .durability_save_chance
            .max(other.durability_save_chance);
        self.mending_repair = self.mending_repair.max(other.mending_repair);
        self.xp_bonus = self.xp_bonus.max(other.xp_bonus);
        self.abilities.extend(other.abilities.iter().cloned());
    }
}

/// Kind of incoming damage, used to pick the applicable reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageSource {
    /// Melee, magic, and everything without a dedicated reduction.
    Generic,
    /// Fire and lava.
    Fire,
    /// Explosions.
    Blast,
    /// Arrows and other projectiles.
    Projectile,
    /// Fall damage.
    Fall,
}

/// One gameplay action about to resolve, with the fields enchantments can
/// modify. `apply_effects` folds the item's merged bundle into a context
/// and returns the adjusted copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionContext {
    /// A melee hit being dealt.
    Attack {
        /// Outgoing damage.
        damage: f32,
        /// Knockback strength.
        knockback: f32,
        /// Seconds of fire applied to the target.
        fire_seconds: f32,
        /// Extra loot rolls if the target dies.
        loot_bonus: u32,
    },
    /// An arrow hit being dealt.
    BowAttack {
        /// Outgoing damage.
        damage: f32,
        /// Knockback strength.
        knockback: f32,
        /// Seconds of fire applied to the target.
        fire_seconds: f32,
    },
    /// Incoming damage being absorbed.
    Defense {
        /// Incoming damage.
        damage: f32,
        /// What dealt the damage.
        source: DamageSource,
    },
    /// A block being broken.
    Mining {
        /// Mining speed multiplier.
        mining_speed: f32,
        /// Whether the block drops itself.
        silk_touch: bool,
        /// Fortune level applied to drops.
        fortune_level: u32,
    },
    /// Durability being deducted from the item.
    Durability {
        /// Durability points about to be removed.
        reduction: u32,
        /// Durability restored by repair effects.
        repaired: u32,
    },
    /// Experience being collected.
    Experience {
        /// Experience points gained.
        amount: f32,
    },
}

/// Total damage reduction is capped so armor never fully nullifies a hit.
pub const MAX_DAMAGE_REDUCTION: f32 = 0.8;

/// Fold every enchantment on `item` through its definition's effect
/// function and merge the contributions into a single bundle.
///
/// Unknown ids are skipped; the application engine prevents them from
/// appearing in the first place.
pub fn calculate_effects(item: &Item, catalog: &EnchantmentCatalog) -> EffectBundle {
    let mut bundle = EffectBundle::default();
    for entry in &item.enchantments {
        if let Some(def) = catalog.get(&entry.id) {
            bundle.merge(&(def.effect)(entry.level, item.class));
        }
    }
    bundle
}

/// Apply an aggregated bundle to one action context.
///
/// Each action reads only the fields relevant to it; absent contributions
/// are no-ops. The durability action rolls its suppression chance on the
/// provided generator.
pub fn apply_effects(bundle: &EffectBundle, action: ActionContext, rng: &mut Lcg) -> ActionContext {
    match action {
        ActionContext::Attack {
            damage,
            knockback,
            fire_seconds,
            loot_bonus,
        } => ActionContext::Attack {
            damage: damage + bundle.damage_bonus,
            knockback: knockback + bundle.knockback_bonus,
            fire_seconds: fire_seconds.max(bundle.fire_seconds),
            loot_bonus: loot_bonus + bundle.loot_bonus,
        },
        ActionContext::BowAttack {
            damage,
            knockback,
            fire_seconds,
        } => ActionContext::BowAttack {
            damage: damage + bundle.bow_damage_bonus,
            knockback: knockback + bundle.bow_knockback_bonus,
            fire_seconds: fire_seconds.max(bundle.bow_fire_seconds),
        },
        ActionContext::Defense { damage, source } => {
            let specific = match source {
                DamageSource::Generic => 0.0,
                DamageSource::Fire => bundle.fire_reduction,
                DamageSource::Blast => bundle.blast_reduction,
                DamageSource::Projectile => bundle.projectile_reduction,
                DamageSource::Fall => bundle.fall_reduction,
            };
            let reduction = (bundle.damage_reduction + specific).min(MAX_DAMAGE_REDUCTION);
            ActionContext::Defense {
                damage: damage * (1.0 - reduction),
                source,
            }
        }
        ActionContext::Mining {
            mining_speed,
            silk_touch,
            fortune_level,
        } => ActionContext::Mining {
            mining_speed: mining_speed * bundle.mining_speed_mult,
            silk_touch: silk_touch || bundle.silk_touch,
            fortune_level: fortune_level.max(bundle.fortune_level),
        },
        ActionContext::Durability {
            reduction,
            repaired,
        } => {
            let saved = bundle.durability_save_chance > 0.0
                && (rng.next_f64() as f32) < bundle.durability_save_chance;
            ActionContext::Durability {
                reduction: if saved { 0 } else { reduction },
                repaired: repaired + bundle.mending_repair,
            }
        }
        ActionContext::Experience { amount } => ActionContext::Experience {
            amount: amount * (1.0 + bundle.xp_bonus),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::apply_enchantment;
    use crate::catalog::default_catalog;

    #[test]
    fn test_default_bundle_is_identity_for_attack() {
        let bundle = EffectBundle::default();
        let mut rng = Lcg::new(1);
        let action = ActionContext::Attack {
            damage: 6.0,
            knockback: 0.5,
            fire_seconds: 0.0,
            loot_bonus: 0,
        };
        assert_eq!(apply_effects(&bundle, action.clone(), &mut rng), action);
    }

    #[test]
    fn test_merge_numeric_takes_max() {
        let mut a = EffectBundle {
            damage_bonus: 2.0,
            fortune_level: 1,
            ..Default::default()
        };
        let b = EffectBundle {
            damage_bonus: 1.0,
            fortune_level: 3,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.damage_bonus, 2.0);
        assert_eq!(a.fortune_level, 3);
    }

    #[test]
    fn test_merge_bool_ors_and_lists_concat() {
        let mut a = EffectBundle {
            silk_touch: true,
            abilities: vec!["water_breathing".into()],
            ..Default::default()
        };
        let b = EffectBundle {
            infinite_arrows: true,
            abilities: vec!["depth_strider".into()],
            ..Default::default()
        };
        a.merge(&b);
        assert!(a.silk_touch);
        assert!(a.infinite_arrows);
        assert_eq!(a.abilities, vec!["water_breathing", "depth_strider"]);
    }

    #[test]
    fn test_fortune_flows_into_mining_context() {
        let catalog = default_catalog();
        let mut item = Item::new("diamond_pickaxe");
        apply_enchantment(&mut item, &catalog, "fortune", 3, false).unwrap();

        let bundle = calculate_effects(&item, &catalog);
        let mut rng = Lcg::new(1);
        let result = apply_effects(
            &bundle,
            ActionContext::Mining {
                mining_speed: 1.0,
                silk_touch: false,
                fortune_level: 0,
            },
            &mut rng,
        );
        match result {
            ActionContext::Mining { fortune_level, .. } => assert_eq!(fortune_level, 3),
            other => panic!("unexpected context: {other:?}"),
        }
    }

    #[test]
    fn test_defense_reduction_capped() {
        let bundle = EffectBundle {
            damage_reduction: 0.6,
            blast_reduction: 0.5,
            ..Default::default()
        };
        let mut rng = Lcg::new(1);
        let result = apply_effects(
            &bundle,
            ActionContext::Defense {
                damage: 10.0,
                source: DamageSource::Blast,
            },
            &mut rng,
        );
        match result {
            ActionContext::Defense { damage, .. } => {
                assert!((damage - 2.0).abs() < 1e-5, "cap at 80%: {damage}")
            }
            other => panic!("unexpected context: {other:?}"),
        }
    }

    #[test]
    fn test_defense_specific_reduction_only_for_matching_source() {
        let bundle = EffectBundle {
            fire_reduction: 0.4,
            ..Default::default()
        };
        let mut rng = Lcg::new(1);
        let generic = apply_effects(
            &bundle,
            ActionContext::Defense {
                damage: 10.0,
                source: DamageSource::Generic,
            },
            &mut rng,
        );
        match generic {
            ActionContext::Defense { damage, .. } => assert_eq!(damage, 10.0),
            other => panic!("unexpected context: {other:?}"),
        }
    }

    #[test]
    fn test_durability_always_saved_at_full_chance() {
        let bundle = EffectBundle {
            durability_save_chance: 1.0,
            mending_repair: 2,
            ..Default::default()
        };
        let mut rng = Lcg::new(9);
        for _ in 0..20 {
            let result = apply_effects(
                &bundle,
                ActionContext::Durability {
                    reduction: 1,
                    repaired: 0,
                },
                &mut rng,
            );
            assert_eq!(
                result,
                ActionContext::Durability {
                    reduction: 0,
                    repaired: 2,
                }
            );
        }
    }

    #[test]
    fn test_experience_multiplier() {
        let bundle = EffectBundle {
            xp_bonus: 0.5,
            ..Default::default()
        };
        let mut rng = Lcg::new(1);
        let result = apply_effects(&bundle, ActionContext::Experience { amount: 10.0 }, &mut rng);
        assert_eq!(result, ActionContext::Experience { amount: 15.0 });
    }

    #[test]
    fn test_calculate_effects_skips_unknown_ids() {
        let catalog = default_catalog();
        let mut item = Item::new("iron_sword");
        item.enchantments
            .push(arcforge_core::Enchantment::new("no_such_enchant", 1));
        assert_eq!(calculate_effects(&item, &catalog), EffectBundle::default());
    }
}
