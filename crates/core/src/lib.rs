#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod item;
pub mod rarity;
pub mod rng;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use item::{Enchantment, Item, ItemClass, Material};
pub use rarity::Rarity;
pub use rng::Lcg;

/// Stable identifier for a connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

/// Game time in seconds since server start.
///
/// All cooldown, duration, and throttle bookkeeping compares these values;
/// the server owns the clock and threads it through calls so that timing
/// logic stays deterministic under test.
pub type GameTime = f64;
