//! Typed client events and replies.
//!
//! The transport hands the server JSON; everything is deserialized into
//! [`ClientEvent`] before dispatch so malformed requests are rejected at
//! the boundary instead of deep inside the engine.

use arcforge_core::Item;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A request from a connected client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join the server.
    Join {
        /// Display name.
        name: String,
    },
    /// Leave the server, discarding session state.
    Leave,
    /// Open an enchanting table's UI.
    OpenEnchantmentTable {
        /// Table instance id.
        table_id: u64,
        /// Block position of the table.
        position: [i32; 3],
    },
    /// Close an enchanting table's UI.
    CloseEnchantmentTable {
        /// Table instance id.
        table_id: u64,
    },
    /// Request the three offers for an item on an open table.
    GetEnchantmentOptions {
        /// Table instance id.
        table_id: u64,
        /// Item placed on the table.
        item: Item,
    },
    /// Take one of the three offers.
    EnchantItem {
        /// Table instance id.
        table_id: u64,
        /// Item placed on the table.
        item: Item,
        /// Offer slot (0..3).
        option: usize,
    },
    /// Anvil-combine two items.
    CombineItems {
        /// Item that receives enchantments.
        target: Item,
        /// Item consumed by the combination.
        sacrifice: Item,
    },
    /// Teach the player a spell.
    TeachSpell {
        /// Spell id.
        spell_id: String,
    },
    /// Cast a spell.
    CastSpell {
        /// Spell id.
        spell_id: String,
        /// Cast level (clamped to at least 1).
        level: u32,
    },
}

/// Response to a [`ClientEvent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Event-specific payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Reply {
    /// A bare success.
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
            data: None,
        }
    }

    /// A success carrying a payload.
    pub fn ok_with(data: impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("failed to serialize reply payload: {err}");
                None
            }
        };
        Self {
            success: true,
            message: None,
            data,
        }
    }

    /// A failure with a reason.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// A server-initiated message pushed outside the request/reply cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerNotification {
    /// A spell's cooldown expired and it can be cast again.
    SpellReady {
        /// Player to notify.
        player: u64,
        /// Spell that became ready.
        spell_id: String,
    },
    /// A lingering spell effect ran out its duration.
    SpellExpired {
        /// Player who cast it.
        player: u64,
        /// Spell whose effect expired.
        spell_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_round_trips_through_json() {
        let json = r#"{"type":"cast_spell","spell_id":"fireball","level":2}"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        match &event {
            ClientEvent::CastSpell { spell_id, level } => {
                assert_eq!(spell_id, "fireball");
                assert_eq!(*level, 2);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event_type_rejected() {
        let json = r#"{"type":"grief_spawn"}"#;
        assert!(serde_json::from_str::<ClientEvent>(json).is_err());
    }

    #[test]
    fn test_failure_reply_omits_data() {
        let reply = Reply::fail("Items cannot be combined");
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(
            json,
            r#"{"success":false,"message":"Items cannot be combined"}"#
        );
    }
}
