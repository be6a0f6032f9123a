#![warn(missing_docs)]
//! Spell system: registry, per-player mana/cooldown state, and cast
//! resolution.
//!
//! Runs the same shape of pipeline as the enchantment engine but over
//! teach/cast/cooldown/mana instead of apply/combine: a static catalog of
//! definitions, per-player mutable state, and a resolution routine that
//! ends in world effects spawned through a collaborator trait.

pub mod caster;
pub mod player;
pub mod registry;
pub mod world;

pub use caster::{ActiveSpellInstance, CastError, CastOutcome, CastOverrides, SpellManager};
pub use player::{Mana, PlayerSpellState};
pub use registry::{
    default_spells, CastContext, Element, LevelScaling, SpellCategory, SpellDefinition,
    SpellRegistry,
};
pub use world::{EffectShape, RecordingEffects, SpellEffects, WorldEffect};
