//! Per-player spell state: mana pool, known spells, cooldowns.

use arcforge_core::GameTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A player's mana pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mana {
    /// Current mana.
    pub current: u32,
    /// Maximum mana.
    pub max: u32,
}

/// Spell state attached to one connected player.
///
/// Created on join and discarded on leave; nothing here is persisted to
/// durable storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSpellState {
    /// Mana pool.
    pub mana: Mana,
    /// Ids of spells the player has been taught, in teach order.
    pub known_spells: Vec<String>,
    /// Cooldown expiry time per spell id.
    pub cooldowns: HashMap<String, GameTime>,
}

impl PlayerSpellState {
    /// Create state with a full mana pool.
    pub fn new(max_mana: u32) -> Self {
        Self {
            mana: Mana {
                current: max_mana,
                max: max_mana,
            },
            known_spells: Vec::new(),
            cooldowns: HashMap::new(),
        }
    }

    /// Teach a spell. Returns false if it was already known.
    pub fn learn(&mut self, spell_id: &str) -> bool {
        if self.knows(spell_id) {
            return false;
        }
        self.known_spells.push(spell_id.to_string());
        true
    }

    /// Whether the player knows the spell.
    pub fn knows(&self, spell_id: &str) -> bool {
        self.known_spells.iter().any(|id| id == spell_id)
    }

    /// Seconds until the spell is castable again, if it is cooling down.
    pub fn cooldown_remaining(&self, spell_id: &str, now: GameTime) -> Option<f64> {
        self.cooldowns
            .get(spell_id)
            .map(|expiry| expiry - now)
            .filter(|remaining| *remaining > 0.0)
    }

    /// Spend mana. Returns false (and leaves the pool untouched) if there
    /// is not enough.
    pub fn spend_mana(&mut self, amount: u32) -> bool {
        if self.mana.current < amount {
            return false;
        }
        self.mana.current -= amount;
        true
    }

    /// Regenerate mana up to the maximum.
    pub fn regen_mana(&mut self, amount: u32) {
        self.mana.current = (self.mana.current + amount).min(self.mana.max);
    }

    /// Remove expired cooldown entries, returning the spell ids that just
    /// became ready (for player notification).
    pub fn sweep_cooldowns(&mut self, now: GameTime) -> Vec<String> {
        let expired: Vec<String> = self
            .cooldowns
            .iter()
            .filter(|(_, expiry)| **expiry <= now)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            self.cooldowns.remove(id);
        }
        expired
    }
}
