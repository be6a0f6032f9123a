//! In-process world adapters.
//!
//! The engine talks to the world through the [`BlockLookup`] and
//! [`SpellEffects`] traits. These adapters back them with plain memory so
//! the server can run standalone; a full world simulation plugs its own
//! implementations in instead.

use arcforge_enchant::BlockLookup;
use arcforge_spell::{SpellEffects, WorldEffect};
use std::collections::HashSet;
use tracing::debug;

/// Block lookup over an explicit set of bookshelf positions.
#[derive(Debug, Default)]
pub struct MemoryWorld {
    shelves: HashSet<(i32, i32, i32)>,
}

impl MemoryWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a bookshelf block.
    pub fn add_bookshelf(&mut self, x: i32, y: i32, z: i32) {
        self.shelves.insert((x, y, z));
    }

    /// Remove a bookshelf block.
    pub fn remove_bookshelf(&mut self, x: i32, y: i32, z: i32) {
        self.shelves.remove(&(x, y, z));
    }
}

impl BlockLookup for MemoryWorld {
    fn is_bookshelf(&self, x: i32, y: i32, z: i32) -> bool {
        self.shelves.contains(&(x, y, z))
    }
}

/// Effects sink that only logs spawns. Used when no entity system is
/// attached.
#[derive(Debug, Default)]
pub struct LoggingEffects;

impl SpellEffects for LoggingEffects {
    fn spawn(&mut self, effect: WorldEffect) {
        debug!(
            spell = %effect.spell_id,
            caster = effect.caster.0,
            power = effect.power,
            "spawned spell effect"
        );
    }
}
