#![warn(missing_docs)]
//! Game server layer: sessions, event dispatch, and the periodic tick.
//!
//! Owns the enchantment catalog, offer generator, table registry, and
//! spell manager, and exposes them to the transport as a single
//! [`GameServer::handle_event`] entry point plus a fixed-rate
//! [`GameServer::tick`]. The transport itself (sockets, packet framing)
//! lives outside this crate.

pub mod config;
pub mod events;
pub mod world;

pub use config::ServerConfig;
pub use events::{ClientEvent, Reply, ServerNotification};
pub use world::{LoggingEffects, MemoryWorld};

use arcforge_core::{GameTime, PlayerId};
use arcforge_enchant::{
    apply_enchantment, combine_items, default_catalog, BlockLookup, EnchantmentCatalog,
    OptionGenerator, TableRegistry,
};
use arcforge_spell::{
    default_spells, CastOverrides, RecordingEffects, SpellEffects, SpellManager,
};
use serde_json::json;
use std::collections::HashMap;
use tracing::info;

/// A connected player's session.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    /// Player id assigned by the transport.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Experience level, spent on enchanting.
    pub level: u32,
    /// World position, used as the spell cast origin.
    pub position: [f64; 3],
}

/// The enchantment/spell engine behind one server process.
pub struct GameServer {
    config: ServerConfig,
    catalog: EnchantmentCatalog,
    options: OptionGenerator,
    tables: TableRegistry,
    spells: SpellManager,
    sessions: HashMap<PlayerId, PlayerSession>,
    world: Box<dyn BlockLookup>,
    effects: Box<dyn SpellEffects>,
    now: GameTime,
    spell_sweep_acc: f64,
    cooldown_acc: f64,
    mana_acc: f64,
}

impl GameServer {
    /// Create a server over the given world and effects collaborators.
    pub fn new(
        config: ServerConfig,
        world: Box<dyn BlockLookup>,
        effects: Box<dyn SpellEffects>,
    ) -> Self {
        let options = OptionGenerator::new(config.option_cache_capacity);
        let spells = SpellManager::new(default_spells(), config.starting_mana);
        Self {
            config,
            catalog: default_catalog(),
            options,
            tables: TableRegistry::new(),
            spells,
            sessions: HashMap::new(),
            world,
            effects,
            now: 0.0,
            spell_sweep_acc: 0.0,
            cooldown_acc: 0.0,
            mana_acc: 0.0,
        }
    }

    /// Current game time in seconds.
    pub fn now(&self) -> GameTime {
        self.now
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Session for a connected player.
    pub fn session(&self, player: PlayerId) -> Option<&PlayerSession> {
        self.sessions.get(&player)
    }

    /// Spell state access, mainly for the transport's status queries.
    pub fn spells(&self) -> &SpellManager {
        &self.spells
    }

    /// Set a player's experience level (XP is earned outside this engine).
    pub fn set_player_level(&mut self, player: PlayerId, level: u32) -> bool {
        match self.sessions.get_mut(&player) {
            Some(session) => {
                session.level = level;
                true
            }
            None => false,
        }
    }

    /// Update a player's position (fed in by the movement system).
    pub fn set_player_position(&mut self, player: PlayerId, position: [f64; 3]) -> bool {
        match self.sessions.get_mut(&player) {
            Some(session) => {
                session.position = position;
                true
            }
            None => false,
        }
    }

    /// Override a table's offer seed. Admin/testing hook; normal tables
    /// roll their seed when first opened.
    pub fn set_table_seed(&mut self, table_id: u64, seed: u64) -> bool {
        match self.tables.get_mut(table_id) {
            Some(table) => {
                table.seed = seed;
                true
            }
            None => false,
        }
    }

    /// Dispatch one client event.
    pub fn handle_event(&mut self, player: PlayerId, event: ClientEvent) -> Reply {
        match event {
            ClientEvent::Join { name } => self.on_join(player, name),
            ClientEvent::Leave => self.on_leave(player),
            ClientEvent::OpenEnchantmentTable { table_id, position } => {
                self.on_open_table(player, table_id, position)
            }
            ClientEvent::CloseEnchantmentTable { table_id } => {
                self.on_close_table(player, table_id)
            }
            ClientEvent::GetEnchantmentOptions { table_id, item } => {
                self.on_get_options(player, table_id, &item)
            }
            ClientEvent::EnchantItem {
                table_id,
                item,
                option,
            } => self.on_enchant(player, table_id, item, option),
            ClientEvent::CombineItems { target, sacrifice } => {
                self.on_combine(player, &target, &sacrifice)
            }
            ClientEvent::TeachSpell { spell_id } => self.on_teach(player, &spell_id),
            ClientEvent::CastSpell { spell_id, level } => self.on_cast(player, &spell_id, level),
        }
    }

    /// Advance the clock and run the periodic sweeps.
    ///
    /// Active spells are swept every `spell_sweep_interval` (100 ms by
    /// default); cooldown expiry and mana regen run on their own 1 s
    /// accumulators. Returns the notifications the sweeps produced.
    pub fn tick(&mut self, dt: f64) -> Vec<ServerNotification> {
        self.now += dt;
        let mut notifications = Vec::new();

        self.spell_sweep_acc += dt;
        while self.spell_sweep_acc >= self.config.spell_sweep_interval {
            self.spell_sweep_acc -= self.config.spell_sweep_interval;
            for instance in self.spells.sweep_active(self.now) {
                notifications.push(ServerNotification::SpellExpired {
                    player: instance.caster.0,
                    spell_id: instance.spell_id,
                });
            }
        }

        self.cooldown_acc += dt;
        while self.cooldown_acc >= self.config.cooldown_sweep_interval {
            self.cooldown_acc -= self.config.cooldown_sweep_interval;
            for (player, spell_id) in self.spells.sweep_cooldowns(self.now) {
                notifications.push(ServerNotification::SpellReady {
                    player: player.0,
                    spell_id,
                });
            }
        }

        self.mana_acc += dt;
        while self.mana_acc >= self.config.mana_regen_interval {
            self.mana_acc -= self.config.mana_regen_interval;
            self.spells.regen_tick(self.config.mana_regen);
        }

        notifications
    }

    fn on_join(&mut self, player: PlayerId, name: String) -> Reply {
        if self.sessions.contains_key(&player) {
            return Reply::fail("Already joined");
        }
        info!(player = player.0, name = %name, "player joined");
        self.sessions.insert(
            player,
            PlayerSession {
                id: player,
                name,
                level: 0,
                position: [0.0; 3],
            },
        );
        self.spells.add_player(player);
        Reply::ok_with(json!({ "player": player.0 }))
    }

    fn on_leave(&mut self, player: PlayerId) -> Reply {
        if self.sessions.remove(&player).is_none() {
            return Reply::fail("Not joined");
        }
        info!(player = player.0, "player left");
        self.tables.drop_player(player);
        self.spells.remove_player(player);
        Reply::ok()
    }

    fn on_open_table(&mut self, player: PlayerId, table_id: u64, position: [i32; 3]) -> Reply {
        if !self.sessions.contains_key(&player) {
            return Reply::fail("Not joined");
        }
        let seed = rand::random::<u64>();
        let table = self.tables.open(table_id, position, player, seed);
        let bookshelves = table.refresh_bookshelves(self.world.as_ref(), self.now);
        Reply::ok_with(json!({
            "table_id": table_id,
            "bookshelves": bookshelves,
        }))
    }

    fn on_close_table(&mut self, player: PlayerId, table_id: u64) -> Reply {
        if self.tables.close(table_id, player) {
            Reply::ok()
        } else {
            Reply::fail("Table not open")
        }
    }

    fn on_get_options(
        &mut self,
        player: PlayerId,
        table_id: u64,
        item: &arcforge_core::Item,
    ) -> Reply {
        let Some(session) = self.sessions.get(&player) else {
            return Reply::fail("Not joined");
        };
        let player_level = session.level;
        let Some(table) = self.tables.get_mut(table_id) else {
            return Reply::fail("Table not open");
        };
        let bookshelves = table.refresh_bookshelves(self.world.as_ref(), self.now);
        let seed = table.seed;
        let options = self.options.generate(
            &self.catalog,
            item,
            self.config.enchant_table_level,
            bookshelves,
            player_level,
            seed,
        );
        Reply::ok_with(json!({ "options": options }))
    }

    fn on_enchant(
        &mut self,
        player: PlayerId,
        table_id: u64,
        mut item: arcforge_core::Item,
        option: usize,
    ) -> Reply {
        let Some(session) = self.sessions.get(&player) else {
            return Reply::fail("Not joined");
        };
        let player_level = session.level;
        let Some(table) = self.tables.get_mut(table_id) else {
            return Reply::fail("Table not open");
        };
        let bookshelves = table.refresh_bookshelves(self.world.as_ref(), self.now);
        let seed = table.seed;
        let options = self.options.generate(
            &self.catalog,
            &item,
            self.config.enchant_table_level,
            bookshelves,
            player_level,
            seed,
        );
        let Some(chosen) = options.get(option) else {
            return Reply::fail("Invalid option");
        };
        if chosen.enchantments.is_empty() {
            return Reply::fail("Item cannot be enchanted");
        }
        if player_level < chosen.level_cost {
            return Reply::fail(format!(
                "Not enough experience levels (need {}, have {})",
                chosen.level_cost, player_level
            ));
        }

        let mut applied = 0;
        for entry in &chosen.enchantments {
            if apply_enchantment(&mut item, &self.catalog, &entry.id, entry.level, false).is_some()
            {
                applied += 1;
            }
        }
        if applied == 0 {
            return Reply::fail("Item cannot be enchanted");
        }

        let cost = chosen.level_cost;
        if let Some(session) = self.sessions.get_mut(&player) {
            session.level -= cost;
        }
        // The table rolls a fresh seed after each enchant so the next
        // visit shows new offers.
        if let Some(table) = self.tables.get_mut(table_id) {
            table.seed = rand::random::<u64>();
        }
        info!(player = player.0, item = %item.type_name, cost, "item enchanted");
        Reply::ok_with(json!({ "item": item, "cost": cost }))
    }

    fn on_combine(
        &mut self,
        player: PlayerId,
        target: &arcforge_core::Item,
        sacrifice: &arcforge_core::Item,
    ) -> Reply {
        let Some(session) = self.sessions.get(&player) else {
            return Reply::fail("Not joined");
        };
        match combine_items(target, sacrifice, session.level, &self.catalog) {
            Ok((merged, cost)) => {
                if let Some(session) = self.sessions.get_mut(&player) {
                    session.level -= cost;
                }
                info!(player = player.0, item = %merged.type_name, cost, "items combined");
                Reply::ok_with(json!({ "item": merged, "cost": cost }))
            }
            Err(err) => Reply::fail(err.to_string()),
        }
    }

    fn on_teach(&mut self, player: PlayerId, spell_id: &str) -> Reply {
        match self.spells.teach(player, spell_id) {
            Ok(learned) => Reply::ok_with(json!({ "learned": learned })),
            Err(err) => Reply::fail(err.to_string()),
        }
    }

    fn on_cast(&mut self, player: PlayerId, spell_id: &str, level: u32) -> Reply {
        let Some(session) = self.sessions.get(&player) else {
            return Reply::fail("Not joined");
        };
        let position = session.position;
        let mut recorder = RecordingEffects::default();
        match self.spells.handle_cast(
            player,
            spell_id,
            level,
            position,
            self.now,
            CastOverrides::default(),
            &mut recorder,
        ) {
            Ok(outcome) => {
                for effect in &recorder.spawned {
                    self.effects.spawn(effect.clone());
                }
                Reply::ok_with(json!({
                    "outcome": outcome,
                    "effects": recorder.spawned,
                }))
            }
            Err(err) => Reply::fail(err.to_string()),
        }
    }
}
