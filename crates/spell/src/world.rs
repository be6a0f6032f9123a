//! Collaborator interface to the entity/particle systems.
//!
//! Casting a spell ends in a world effect - a projectile, an area, or an
//! aura on the caster. The engine only describes the effect; spawning the
//! actual entities and particles belongs to the world simulation behind
//! the [`SpellEffects`] trait.

use arcforge_core::PlayerId;
use serde::{Deserialize, Serialize};

/// Geometric shape of a spawned spell effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum EffectShape {
    /// A projectile launched from the caster.
    Projectile {
        /// Initial speed in blocks per second.
        speed: f32,
    },
    /// An area effect centered on a position.
    Area {
        /// Radius in blocks.
        radius: f32,
    },
    /// An effect attached to the caster.
    Aura,
}

/// A world effect produced by a successful cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEffect {
    /// Spell that produced the effect.
    pub spell_id: String,
    /// Casting player.
    pub caster: PlayerId,
    /// Spawn position.
    pub position: [f64; 3],
    /// Shape of the effect.
    pub shape: EffectShape,
    /// Level-scaled strength.
    pub power: f32,
    /// Seconds the effect lingers (0 = instantaneous).
    pub duration: f64,
}

/// Entity/particle collaborator that realizes spell effects in the world.
pub trait SpellEffects {
    /// Spawn a world effect.
    fn spawn(&mut self, effect: WorldEffect);
}

/// Test/demo implementation that records every spawned effect.
#[derive(Debug, Default)]
pub struct RecordingEffects {
    /// Effects spawned so far, in order.
    pub spawned: Vec<WorldEffect>,
}

impl SpellEffects for RecordingEffects {
    fn spawn(&mut self, effect: WorldEffect) {
        self.spawned.push(effect);
    }
}
