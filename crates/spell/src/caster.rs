//! Cast resolution and spell bookkeeping.
//!
//! Per player/spell pair the state machine is
//! `Unknown -> Known (teach) -> Castable -> OnCooldown -> Castable`.
//! The manager owns every player's spell state plus the list of lingering
//! casts, and is driven by the server's periodic sweeps.

use crate::player::PlayerSpellState;
use crate::registry::{default_cast, CastContext, SpellRegistry};
use crate::world::SpellEffects;
use arcforge_core::{GameTime, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

/// Why a cast was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum CastError {
    /// No spell state exists for the player.
    #[error("Player not found")]
    PlayerNotFound,
    /// The spell id is not in the registry.
    #[error("Unknown spell: {0}")]
    UnknownSpell(String),
    /// The player has not been taught the spell.
    #[error("Spell not learned")]
    NotLearned,
    /// The spell is still cooling down.
    #[error("Spell is on cooldown ({remaining:.1}s left)")]
    OnCooldown {
        /// Seconds until it can be cast again.
        remaining: f64,
    },
    /// The mana pool cannot cover the cost.
    #[error("Not enough mana (need {needed}, have {have})")]
    NotEnoughMana {
        /// Cost of the cast.
        needed: u32,
        /// Current mana.
        have: u32,
    },
}

/// Validation bypasses for privileged casts (scrolls, admin commands).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CastOverrides {
    /// Cast without having learned the spell.
    pub ignore_learning: bool,
    /// Cast while the spell is on cooldown.
    pub ignore_cooldown: bool,
    /// Cast without paying mana.
    pub ignore_mana: bool,
}

/// Result of a successful cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastOutcome {
    /// Spell that was cast.
    pub spell_id: String,
    /// Mana deducted (0 when mana was ignored).
    pub mana_spent: u32,
    /// Time at which the cooldown expires.
    pub cooldown_until: GameTime,
}

/// A lingering cast linked to its world effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSpellInstance {
    /// Spell id.
    pub spell_id: String,
    /// Casting player.
    pub caster: PlayerId,
    /// Cast time.
    pub started: GameTime,
    /// Seconds the instance lives.
    pub duration: f64,
}

/// Owns per-player spell state and resolves casts.
pub struct SpellManager {
    registry: SpellRegistry,
    players: HashMap<PlayerId, PlayerSpellState>,
    active: Vec<ActiveSpellInstance>,
    starting_mana: u32,
}

impl SpellManager {
    /// Create a manager over a registry. `starting_mana` sizes the pool
    /// new players join with.
    pub fn new(registry: SpellRegistry, starting_mana: u32) -> Self {
        Self {
            registry,
            players: HashMap::new(),
            active: Vec::new(),
            starting_mana,
        }
    }

    /// The spell registry.
    pub fn registry(&self) -> &SpellRegistry {
        &self.registry
    }

    /// Create spell state for a joining player.
    pub fn add_player(&mut self, player: PlayerId) {
        self.players
            .entry(player)
            .or_insert_with(|| PlayerSpellState::new(self.starting_mana));
    }

    /// Discard spell state for a leaving player. Known spells are not
    /// persisted; a rejoin starts fresh.
    pub fn remove_player(&mut self, player: PlayerId) {
        self.players.remove(&player);
        self.active.retain(|instance| instance.caster != player);
    }

    /// Spell state for a player, if they are connected.
    pub fn player(&self, player: PlayerId) -> Option<&PlayerSpellState> {
        self.players.get(&player)
    }

    /// Teach a spell to a player. `Ok(false)` means it was already known.
    pub fn teach(&mut self, player: PlayerId, spell_id: &str) -> Result<bool, CastError> {
        if self.registry.get(spell_id).is_none() {
            return Err(CastError::UnknownSpell(spell_id.to_string()));
        }
        let state = self
            .players
            .get_mut(&player)
            .ok_or(CastError::PlayerNotFound)?;
        let learned = state.learn(spell_id);
        if learned {
            info!(player = player.0, spell = spell_id, "spell learned");
        }
        Ok(learned)
    }

    /// Resolve a cast request.
    ///
    /// Validates knowledge, cooldown, and mana in that order (each check
    /// individually bypassable), then debits mana, starts the cooldown,
    /// and hands the spell's handler the effects collaborator.
    pub fn handle_cast(
        &mut self,
        player: PlayerId,
        spell_id: &str,
        level: u32,
        position: [f64; 3],
        now: GameTime,
        overrides: CastOverrides,
        effects: &mut dyn SpellEffects,
    ) -> Result<CastOutcome, CastError> {
        let level = level.max(1);
        let def = self
            .registry
            .get(spell_id)
            .ok_or_else(|| CastError::UnknownSpell(spell_id.to_string()))?;
        let state = self
            .players
            .get_mut(&player)
            .ok_or(CastError::PlayerNotFound)?;

        if !overrides.ignore_learning && !state.knows(spell_id) {
            return Err(CastError::NotLearned);
        }
        if !overrides.ignore_cooldown {
            if let Some(remaining) = state.cooldown_remaining(spell_id, now) {
                return Err(CastError::OnCooldown { remaining });
            }
        }

        let mana_spent = if overrides.ignore_mana {
            0
        } else {
            let cost = def.mana_cost_at(level);
            if !state.spend_mana(cost) {
                return Err(CastError::NotEnoughMana {
                    needed: cost,
                    have: state.mana.current,
                });
            }
            cost
        };

        let cooldown_until = now + def.cooldown;
        state
            .cooldowns
            .insert(spell_id.to_string(), cooldown_until);

        let ctx = CastContext {
            caster: player,
            position,
        };
        match def.on_cast {
            Some(handler) => handler(def, level, &ctx, effects),
            None => default_cast(def, level, &ctx, effects),
        }

        let duration = def.duration_at(level);
        if duration > 0.0 {
            self.active.push(ActiveSpellInstance {
                spell_id: spell_id.to_string(),
                caster: player,
                started: now,
                duration,
            });
        }

        debug!(player = player.0, spell = spell_id, level, mana_spent, "spell cast");
        Ok(CastOutcome {
            spell_id: spell_id.to_string(),
            mana_spent,
            cooldown_until,
        })
    }

    /// Lingering casts currently alive.
    pub fn active_instances(&self) -> &[ActiveSpellInstance] {
        &self.active
    }

    /// Remove lingering casts whose duration has elapsed, returning them
    /// so the server can tear down their world effects.
    pub fn sweep_active(&mut self, now: GameTime) -> Vec<ActiveSpellInstance> {
        let (expired, alive): (Vec<_>, Vec<_>) = self
            .active
            .drain(..)
            .partition(|instance| now - instance.started >= instance.duration);
        self.active = alive;
        expired
    }

    /// Remove expired cooldowns for every player, returning
    /// `(player, spell)` pairs that just became ready.
    pub fn sweep_cooldowns(&mut self, now: GameTime) -> Vec<(PlayerId, String)> {
        let mut ready = Vec::new();
        for (player, state) in &mut self.players {
            for spell_id in state.sweep_cooldowns(now) {
                ready.push((*player, spell_id));
            }
        }
        ready
    }

    /// Regenerate mana for every player (called on the 1 s tick).
    pub fn regen_tick(&mut self, amount: u32) {
        for state in self.players.values_mut() {
            state.regen_mana(amount);
        }
    }
}
