//! Server configuration.
//!
//! Loaded from `config/server.toml`; missing or unparseable files fall
//! back to defaults with a warning so a bare checkout still runs.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

const DEFAULT_CONFIG_PATH: &str = "config/server.toml";

/// Shortest accepted sweep interval. The tick accumulators subtract the
/// interval per iteration, so a zero value would loop forever.
const MIN_SWEEP_INTERVAL: f64 = 0.01;

/// Tunables for the enchantment/spell engine and its tick scheduling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Game loop frequency in ticks per second.
    pub tick_rate: u32,
    /// Base power level of every enchanting table.
    pub enchant_table_level: u32,
    /// Capacity of the enchantment offer cache.
    pub option_cache_capacity: usize,
    /// Mana pool new players start with.
    pub starting_mana: u32,
    /// Mana restored per regen tick.
    pub mana_regen: u32,
    /// Seconds between mana regen ticks.
    pub mana_regen_interval: f64,
    /// Seconds between cooldown sweeps.
    pub cooldown_sweep_interval: f64,
    /// Seconds between active-spell sweeps.
    pub spell_sweep_interval: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20,
            enchant_table_level: 30,
            option_cache_capacity: 100,
            starting_mana: 100,
            mana_regen: 1,
            mana_regen_interval: 1.0,
            cooldown_sweep_interval: 1.0,
            spell_sweep_interval: 0.1,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ServerConfig>(&contents) {
                Ok(cfg) => cfg.sanitized(),
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    ServerConfig::default()
                }
            },
            Err(_) => ServerConfig::default(),
        }
    }

    /// Clamp values that would stall the game loop. A zero interval would
    /// spin an accumulator forever; a zero tick rate has no valid period.
    fn sanitized(mut self) -> Self {
        if self.tick_rate == 0 {
            warn!("tick_rate 0 is invalid, using 1");
            self.tick_rate = 1;
        }
        for interval in [
            &mut self.mana_regen_interval,
            &mut self.cooldown_sweep_interval,
            &mut self.spell_sweep_interval,
        ] {
            if !interval.is_finite() || *interval < MIN_SWEEP_INTERVAL {
                warn!("sweep interval {} too small, using {MIN_SWEEP_INTERVAL}", *interval);
                *interval = MIN_SWEEP_INTERVAL;
            }
        }
        self
    }
}
