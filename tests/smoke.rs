//! Smoke test: drive the server through JSON strings, the way a transport
//! would.

use arcforge_core::PlayerId;
use arcforge_server::{ClientEvent, GameServer, LoggingEffects, MemoryWorld, Reply, ServerConfig};

fn dispatch_json(server: &mut GameServer, player: PlayerId, json: &str) -> Reply {
    let event: ClientEvent = serde_json::from_str(json).expect("valid event json");
    server.handle_event(player, event)
}

#[test]
fn test_json_session_end_to_end() {
    let mut world = MemoryWorld::new();
    for dx in -2i32..=2 {
        for dz in -2i32..=2 {
            if dx.abs().max(dz.abs()) == 2 {
                world.add_bookshelf(dx, 0, dz);
            }
        }
    }
    let mut server = GameServer::new(
        ServerConfig::default(),
        Box::new(world),
        Box::new(LoggingEffects),
    );
    let player = PlayerId(7);

    let reply = dispatch_json(&mut server, player, r#"{"type":"join","name":"smoke"}"#);
    assert!(reply.success);
    server.set_player_level(player, 60);

    let reply = dispatch_json(
        &mut server,
        player,
        r#"{"type":"open_enchantment_table","table_id":1,"position":[0,0,0]}"#,
    );
    assert!(reply.success);

    let reply = dispatch_json(
        &mut server,
        player,
        r#"{"type":"get_enchantment_options","table_id":1,"item":{"type_name":"diamond_sword"}}"#,
    );
    assert!(reply.success, "{:?}", reply.message);
    let options = reply.data.unwrap()["options"].clone();
    assert_eq!(options.as_array().map(Vec::len), Some(3));

    let reply = dispatch_json(
        &mut server,
        player,
        r#"{"type":"teach_spell","spell_id":"fireball"}"#,
    );
    assert!(reply.success);

    let reply = dispatch_json(
        &mut server,
        player,
        r#"{"type":"cast_spell","spell_id":"fireball","level":1}"#,
    );
    assert!(reply.success);
    assert_eq!(reply.data.unwrap()["outcome"]["mana_spent"], 20);

    let reply = dispatch_json(&mut server, player, r#"{"type":"leave"}"#);
    assert!(reply.success);
}
