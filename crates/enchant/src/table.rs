//! Enchanting table block state.
//!
//! One state record per table position a player has interacted with.
//! Bookshelf power is scanned from the surrounding blocks through the
//! [`BlockLookup`] collaborator, throttled to one scan per window, and
//! tables are dropped again once their last viewer closes them.

use arcforge_core::{GameTime, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Bookshelves beyond this count add no further power.
pub const MAX_BOOKSHELVES: u32 = 15;

/// Minimum seconds between two bookshelf scans of the same table.
pub const BOOKSHELF_SCAN_INTERVAL: f64 = 30.0;

/// World collaborator used for bookshelf scanning.
pub trait BlockLookup {
    /// Whether the block at the given coordinates is a bookshelf.
    fn is_bookshelf(&self, x: i32, y: i32, z: i32) -> bool;
}

/// State of one enchanting table in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnchantingTableState {
    /// Table instance id.
    pub id: u64,
    /// Block position of the table.
    pub position: [i32; 3],
    /// Bookshelves found by the most recent scan (0..=15).
    pub bookshelf_count: u32,
    /// Time of the most recent scan, if any.
    pub last_scan: Option<GameTime>,
    /// Per-table seed feeding the offer generator.
    pub seed: u64,
    /// Players currently viewing the table UI.
    viewers: HashSet<PlayerId>,
}

impl EnchantingTableState {
    /// Create a table record at a position with the given offer seed.
    pub fn new(id: u64, position: [i32; 3], seed: u64) -> Self {
        Self {
            id,
            position,
            bookshelf_count: 0,
            last_scan: None,
            seed,
            viewers: HashSet::new(),
        }
    }

    /// Rescan surrounding bookshelves if the throttle window has passed.
    ///
    /// The scan covers the two-block ring around the table at table height
    /// and one block above, capped at [`MAX_BOOKSHELVES`]. Within the
    /// throttle window the previous count is kept.
    pub fn refresh_bookshelves(&mut self, world: &dyn BlockLookup, now: GameTime) -> u32 {
        let due = match self.last_scan {
            None => true,
            Some(last) => now - last >= BOOKSHELF_SCAN_INTERVAL,
        };
        if due {
            self.bookshelf_count = scan_bookshelves(world, self.position);
            self.last_scan = Some(now);
            debug!(table = self.id, count = self.bookshelf_count, "bookshelf scan");
        }
        self.bookshelf_count
    }

    /// Add a viewing player. Returns false if they were already viewing.
    pub fn add_viewer(&mut self, player: PlayerId) -> bool {
        self.viewers.insert(player)
    }

    /// Remove a viewing player. Returns false if they were not viewing.
    pub fn remove_viewer(&mut self, player: PlayerId) -> bool {
        self.viewers.remove(&player)
    }

    /// Number of players with the table UI open.
    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }
}

/// Count bookshelves in the scan pattern around `position`.
fn scan_bookshelves(world: &dyn BlockLookup, position: [i32; 3]) -> u32 {
    let [tx, ty, tz] = position;
    let mut count = 0;
    for dx in -2i32..=2 {
        for dz in -2i32..=2 {
            if dx.abs().max(dz.abs()) != 2 {
                continue; // only the outer ring
            }
            for dy in 0..=1 {
                if world.is_bookshelf(tx + dx, ty + dy, tz + dz) {
                    count += 1;
                }
            }
        }
    }
    count.min(MAX_BOOKSHELVES)
}

/// Registry of tables players currently have open, keyed by table id.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: HashMap<u64, EnchantingTableState>,
}

impl TableRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a table for a player, creating the record on first interaction.
    /// The caller provides the seed used when a new record is created.
    pub fn open(
        &mut self,
        id: u64,
        position: [i32; 3],
        player: PlayerId,
        seed: u64,
    ) -> &mut EnchantingTableState {
        let table = self
            .tables
            .entry(id)
            .or_insert_with(|| EnchantingTableState::new(id, position, seed));
        table.add_viewer(player);
        table
    }

    /// Close a table for a player. The record is dropped once the last
    /// viewer leaves so the registry cannot grow without bound.
    ///
    /// Returns true if the player had the table open.
    pub fn close(&mut self, id: u64, player: PlayerId) -> bool {
        let Some(table) = self.tables.get_mut(&id) else {
            return false;
        };
        let removed = table.remove_viewer(player);
        if table.viewer_count() == 0 {
            self.tables.remove(&id);
            debug!(table = id, "pruned enchanting table record");
        }
        removed
    }

    /// Drop a player from every table they have open (disconnect path).
    pub fn drop_player(&mut self, player: PlayerId) {
        let ids: Vec<u64> = self.tables.keys().copied().collect();
        for id in ids {
            self.close(id, player);
        }
    }

    /// Look up a table by id.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut EnchantingTableState> {
        self.tables.get_mut(&id)
    }

    /// Number of live table records.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no tables are open.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
