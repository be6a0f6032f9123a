//! Standalone server binary.
//!
//! Hosts the engine behind an in-memory world so it can run without a
//! transport attached; a real deployment embeds [`arcforge_server`] and
//! feeds it events from the network layer.

use anyhow::Result;
use arcforge_core::{Item, PlayerId};
use arcforge_server::{ClientEvent, GameServer, LoggingEffects, MemoryWorld, ServerConfig};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("arcforge {} starting", env!("CARGO_PKG_VERSION"));
    let config = ServerConfig::load();
    let tick_interval = Duration::from_secs_f64(1.0 / config.tick_rate as f64);

    // Demo world: a fully shelved enchanting table at the origin.
    let mut world = MemoryWorld::new();
    for dx in -2i32..=2 {
        for dz in -2i32..=2 {
            if dx.abs().max(dz.abs()) == 2 {
                world.add_bookshelf(dx, 0, dz);
                world.add_bookshelf(dx, 1, dz);
            }
        }
    }

    let mut server = GameServer::new(config, Box::new(world), Box::new(LoggingEffects));
    run_demo(&mut server);

    info!("entering game loop ({}ms tick)", tick_interval.as_millis());
    loop {
        let started = Instant::now();
        for notification in server.tick(tick_interval.as_secs_f64()) {
            info!(?notification, "notification");
        }
        let elapsed = started.elapsed();
        if elapsed < tick_interval {
            std::thread::sleep(tick_interval - elapsed);
        }
    }
}

/// Walk one player through the enchant and cast flows so a bare run shows
/// the engine working.
fn run_demo(server: &mut GameServer) {
    let player = PlayerId(1);
    server.handle_event(
        player,
        ClientEvent::Join {
            name: "demo".to_string(),
        },
    );
    server.set_player_level(player, 30);
    let events = [
        ClientEvent::OpenEnchantmentTable {
            table_id: 1,
            position: [0, 0, 0],
        },
        ClientEvent::GetEnchantmentOptions {
            table_id: 1,
            item: Item::new("diamond_sword"),
        },
        ClientEvent::TeachSpell {
            spell_id: "fireball".to_string(),
        },
        ClientEvent::CastSpell {
            spell_id: "fireball".to_string(),
            level: 1,
        },
    ];
    for event in events {
        let reply = server.handle_event(player, event.clone());
        match serde_json::to_string(&reply) {
            Ok(json) => info!(?event, reply = %json, "demo"),
            Err(_) => info!(?event, success = reply.success, "demo"),
        }
    }
}
