//! Spell catalog.
//!
//! Immutable spell definitions registered once at startup, mirroring the
//! enchantment catalog: an explicit registry object passed by reference,
//! never shared mutable module state.

use crate::world::{EffectShape, SpellEffects, WorldEffect};
use arcforge_core::{PlayerId, Rarity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Elemental school of a spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Fire and heat.
    Fire,
    /// Ice and frost.
    Ice,
    /// Lightning and storms.
    Storm,
    /// Poison and growth.
    Nature,
    /// Raw magic.
    Arcane,
    /// Healing and warding.
    Holy,
}

/// How a spell manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellCategory {
    /// Launched at a target.
    Projectile,
    /// Placed on an area.
    Area,
    /// Applied to the caster.
    SelfTarget,
}

/// Per-level multipliers. Level `n` scales a base value by
/// `multiplier^(n-1)`, so level 1 always equals the base exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelScaling {
    /// Mana cost multiplier per level.
    pub mana_cost: f64,
    /// Effect power multiplier per level.
    pub power: f64,
    /// Duration multiplier per level.
    pub duration: f64,
}

/// Context handed to cast handlers.
#[derive(Debug, Clone, Copy)]
pub struct CastContext {
    /// Casting player.
    pub caster: PlayerId,
    /// Caster position at cast time.
    pub position: [f64; 3],
}

/// Custom cast handler; spells without one use [`default_cast`].
pub type CastFn = fn(&SpellDefinition, u32, &CastContext, &mut dyn SpellEffects);

/// Immutable description of one spell.
pub struct SpellDefinition {
    /// Unique catalog id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Mana cost at level 1.
    pub mana_cost: u32,
    /// Cooldown in seconds.
    pub cooldown: f64,
    /// Lingering duration in seconds at level 1 (0 = instantaneous).
    pub duration: f64,
    /// Area radius in blocks at level 1 (projectiles: impact radius).
    pub area: f32,
    /// Base effect power at level 1.
    pub base_power: f32,
    /// Elemental school.
    pub element: Element,
    /// Manifestation category.
    pub category: SpellCategory,
    /// Rarity tier (drives how spells are taught/found).
    pub rarity: Rarity,
    /// Per-level multipliers.
    pub scaling: LevelScaling,
    /// Custom cast handler, if the default one does not fit.
    pub on_cast: Option<CastFn>,
}

impl SpellDefinition {
    /// Mana cost at the given level: `round(base * scaling^(level-1))`.
    pub fn mana_cost_at(&self, level: u32) -> u32 {
        let scaled = self.mana_cost as f64 * self.scaling.mana_cost.powi(level as i32 - 1);
        scaled.round() as u32
    }

    /// Effect power at the given level.
    pub fn power_at(&self, level: u32) -> f32 {
        (self.base_power as f64 * self.scaling.power.powi(level as i32 - 1)) as f32
    }

    /// Lingering duration at the given level.
    pub fn duration_at(&self, level: u32) -> f64 {
        self.duration * self.scaling.duration.powi(level as i32 - 1)
    }
}

/// Default cast handler: spawn one world effect shaped by the spell's
/// category and sized by its level.
pub fn default_cast(
    def: &SpellDefinition,
    level: u32,
    ctx: &CastContext,
    effects: &mut dyn SpellEffects,
) {
    let shape = match def.category {
        SpellCategory::Projectile => EffectShape::Projectile {
            speed: 20.0 + 2.0 * (level - 1) as f32,
        },
        SpellCategory::Area => EffectShape::Area {
            radius: def.area * (1.0 + 0.25 * (level - 1) as f32),
        },
        SpellCategory::SelfTarget => EffectShape::Aura,
    };
    effects.spawn(WorldEffect {
        spell_id: def.id.to_string(),
        caster: ctx.caster,
        position: ctx.position,
        shape,
        power: def.power_at(level),
        duration: def.duration_at(level),
    });
}

/// Error raised while building a spell registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpellRegistryError {
    /// Two definitions share an id.
    #[error("duplicate spell id: {0}")]
    DuplicateId(&'static str),
}

/// Registry of spell definitions, built once at startup.
#[derive(Default)]
pub struct SpellRegistry {
    defs: Vec<SpellDefinition>,
    index: HashMap<&'static str, usize>,
}

impl SpellRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition; ids must be unique.
    pub fn register(&mut self, def: SpellDefinition) -> Result<(), SpellRegistryError> {
        if self.index.contains_key(def.id) {
            return Err(SpellRegistryError::DuplicateId(def.id));
        }
        self.index.insert(def.id, self.defs.len());
        self.defs.push(def);
        Ok(())
    }

    /// Look up a spell by id.
    pub fn get(&self, id: &str) -> Option<&SpellDefinition> {
        self.index.get(id).map(|&i| &self.defs[i])
    }

    /// Iterate definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SpellDefinition> {
        self.defs.iter()
    }

    /// Number of registered spells.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Teleport a short distance in front of the caster. Blink has no
/// lingering entity, so it bypasses the default handler.
fn blink_cast(def: &SpellDefinition, level: u32, ctx: &CastContext, effects: &mut dyn SpellEffects) {
    let distance = 4.0 + 2.0 * (level - 1) as f64;
    effects.spawn(WorldEffect {
        spell_id: def.id.to_string(),
        caster: ctx.caster,
        position: [ctx.position[0] + distance, ctx.position[1], ctx.position[2]],
        shape: EffectShape::Aura,
        power: 0.0,
        duration: 0.0,
    });
}

/// Build the stock spell registry shipped with the server.
pub fn default_spells() -> SpellRegistry {
    let mut registry = SpellRegistry::new();
    let defs = vec![
        SpellDefinition {
            id: "fireball",
            name: "Fireball",
            mana_cost: 20,
            cooldown: 3.0,
            duration: 0.0,
            area: 1.5,
            base_power: 6.0,
            element: Element::Fire,
            category: SpellCategory::Projectile,
            rarity: Rarity::Common,
            scaling: LevelScaling { mana_cost: 1.3, power: 1.4, duration: 1.0 },
            on_cast: None,
        },
        SpellDefinition {
            id: "ice_shard",
            name: "Ice Shard",
            mana_cost: 15,
            cooldown: 2.0,
            duration: 0.0,
            area: 1.0,
            base_power: 4.0,
            element: Element::Ice,
            category: SpellCategory::Projectile,
            rarity: Rarity::Common,
            scaling: LevelScaling { mana_cost: 1.25, power: 1.3, duration: 1.0 },
            on_cast: None,
        },
        SpellDefinition {
            id: "lightning_strike",
            name: "Lightning Strike",
            mana_cost: 35,
            cooldown: 8.0,
            duration: 0.0,
            area: 3.0,
            base_power: 10.0,
            element: Element::Storm,
            category: SpellCategory::Area,
            rarity: Rarity::Rare,
            scaling: LevelScaling { mana_cost: 1.4, power: 1.5, duration: 1.0 },
            on_cast: None,
        },
        SpellDefinition {
            id: "heal",
            name: "Heal",
            mana_cost: 25,
            cooldown: 10.0,
            duration: 0.0,
            area: 0.0,
            base_power: 4.0,
            element: Element::Holy,
            category: SpellCategory::SelfTarget,
            rarity: Rarity::Uncommon,
            scaling: LevelScaling { mana_cost: 1.35, power: 1.3, duration: 1.0 },
            on_cast: None,
        },
        SpellDefinition {
            id: "arcane_shield",
            name: "Arcane Shield",
            mana_cost: 30,
            cooldown: 15.0,
            duration: 10.0,
            area: 0.0,
            base_power: 5.0,
            element: Element::Arcane,
            category: SpellCategory::SelfTarget,
            rarity: Rarity::Uncommon,
            scaling: LevelScaling { mana_cost: 1.35, power: 1.25, duration: 1.2 },
            on_cast: None,
        },
        SpellDefinition {
            id: "poison_cloud",
            name: "Poison Cloud",
            mana_cost: 30,
            cooldown: 12.0,
            duration: 8.0,
            area: 4.0,
            base_power: 2.0,
            element: Element::Nature,
            category: SpellCategory::Area,
            rarity: Rarity::Rare,
            scaling: LevelScaling { mana_cost: 1.4, power: 1.3, duration: 1.25 },
            on_cast: None,
        },
        SpellDefinition {
            id: "blink",
            name: "Blink",
            mana_cost: 10,
            cooldown: 5.0,
            duration: 0.0,
            area: 0.0,
            base_power: 0.0,
            element: Element::Arcane,
            category: SpellCategory::SelfTarget,
            rarity: Rarity::Common,
            scaling: LevelScaling { mana_cost: 1.2, power: 1.0, duration: 1.0 },
            on_cast: Some(blink_cast),
        },
        SpellDefinition {
            id: "meteor",
            name: "Meteor",
            mana_cost: 60,
            cooldown: 30.0,
            duration: 0.0,
            area: 6.0,
            base_power: 20.0,
            element: Element::Fire,
            category: SpellCategory::Area,
            rarity: Rarity::VeryRare,
            scaling: LevelScaling { mana_cost: 1.5, power: 1.6, duration: 1.0 },
            on_cast: None,
        },
    ];
    for def in defs {
        registry
            .register(def)
            .unwrap_or_else(|err| panic!("stock spells: {err}"));
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::RecordingEffects;

    #[test]
    fn test_default_registry_builds() {
        let registry = default_spells();
        assert_eq!(registry.len(), 8);
        assert!(registry.get("fireball").is_some());
        assert!(registry.get("polymorph").is_none());
    }

    #[test]
    fn test_mana_cost_level_one_is_base_exactly() {
        let registry = default_spells();
        for def in registry.iter() {
            assert_eq!(def.mana_cost_at(1), def.mana_cost, "{}", def.id);
        }
    }

    #[test]
    fn test_mana_cost_monotone_in_level() {
        let registry = default_spells();
        for def in registry.iter() {
            let mut prev = def.mana_cost_at(1);
            for level in 2..=5 {
                let cost = def.mana_cost_at(level);
                assert!(cost >= prev, "{} level {level}", def.id);
                prev = cost;
            }
        }
    }

    #[test]
    fn test_default_cast_shapes_follow_category() {
        let registry = default_spells();
        let ctx = CastContext {
            caster: PlayerId(1),
            position: [0.0, 64.0, 0.0],
        };

        let mut effects = RecordingEffects::default();
        default_cast(registry.get("fireball").unwrap(), 1, &ctx, &mut effects);
        assert!(matches!(effects.spawned[0].shape, EffectShape::Projectile { .. }));

        let mut effects = RecordingEffects::default();
        default_cast(registry.get("meteor").unwrap(), 1, &ctx, &mut effects);
        assert!(matches!(effects.spawned[0].shape, EffectShape::Area { .. }));

        let mut effects = RecordingEffects::default();
        default_cast(registry.get("heal").unwrap(), 1, &ctx, &mut effects);
        assert!(matches!(effects.spawned[0].shape, EffectShape::Aura));
    }

    #[test]
    fn test_area_grows_with_level() {
        let registry = default_spells();
        let meteor = registry.get("meteor").unwrap();
        let ctx = CastContext {
            caster: PlayerId(1),
            position: [0.0; 3],
        };
        let mut low = RecordingEffects::default();
        default_cast(meteor, 1, &ctx, &mut low);
        let mut high = RecordingEffects::default();
        default_cast(meteor, 3, &ctx, &mut high);
        let radius = |e: &RecordingEffects| match e.spawned[0].shape {
            EffectShape::Area { radius } => radius,
            _ => panic!("expected area"),
        };
        assert!(radius(&high) > radius(&low));
    }

    #[test]
    fn test_blink_custom_handler_offsets_position() {
        let registry = default_spells();
        let blink = registry.get("blink").unwrap();
        let ctx = CastContext {
            caster: PlayerId(2),
            position: [10.0, 64.0, -3.0],
        };
        let mut effects = RecordingEffects::default();
        (blink.on_cast.unwrap())(blink, 2, &ctx, &mut effects);
        assert_eq!(effects.spawned[0].position, [16.0, 64.0, -3.0]);
    }

    #[test]
    fn test_register_rejects_duplicate_ids() {
        let mut registry = default_spells();
        let dup = SpellDefinition {
            id: "fireball",
            name: "Fireball",
            mana_cost: 1,
            cooldown: 1.0,
            duration: 0.0,
            area: 0.0,
            base_power: 1.0,
            element: Element::Fire,
            category: SpellCategory::Projectile,
            rarity: Rarity::Common,
            scaling: LevelScaling { mana_cost: 1.0, power: 1.0, duration: 1.0 },
            on_cast: None,
        };
        assert_eq!(
            registry.register(dup),
            Err(SpellRegistryError::DuplicateId("fireball"))
        );
    }
}
