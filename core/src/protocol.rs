use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::snapshot::Snapshot;
use crate::types::*;

/// A connection's role. The first two connections take the teams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    Red,
    Blue,
    Spectator,
}

impl Seat {
    pub fn team(self) -> Option<Team> {
        match self {
            Seat::Red => Some(Team::Red),
            Seat::Blue => Some(Team::Blue),
            Seat::Spectator => None,
        }
    }
}

impl From<Team> for Seat {
    fn from(team: Team) -> Self {
        match team {
            Team::Red => Seat::Red,
            Team::Blue => Seat::Blue,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub team: Seat,
}

// ── Client → Server ─────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Join,
    Input {
        action: InputAction,
        code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },
    Reset {
        /// Number or numeric string; anything else means "pick one".
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<Value>,
    },
}

impl ClientMessage {
    pub fn input(action: InputAction, key: Key) -> Self {
        ClientMessage::Input {
            action,
            code: key.code().to_string(),
            key: None,
        }
    }

    pub fn reset(seed: Option<Seed>) -> Self {
        ClientMessage::Reset {
            seed: seed.map(Value::from),
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Parse one client text frame.
pub fn parse_client_message(text: &str) -> Result<ClientMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?;
    match kind {
        "join" | "reset" => {}
        "input" => {
            if let Some(action) = value.get("action").and_then(Value::as_str) {
                if action != "keydown" && action != "keyup" {
                    return Err(ProtocolError::UnknownAction(action.to_string()));
                }
            }
        }
        other => return Err(ProtocolError::UnknownType(other.to_string())),
    }
    Ok(serde_json::from_value(value)?)
}

/// Seed requested by a `reset`: any finite number, floored and wrapped to
/// 32 bits. `None` when absent or unusable.
pub fn requested_seed(seed: Option<&Value>) -> Option<Seed> {
    let n = match seed? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.floor() as i64 as u32)
}

// ── Server → Client ─────────────────────────────────────────

/// Server messages, generic over the snapshot payload so clients can read
/// them into a lenient form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage<S = Snapshot> {
    Welcome {
        id: String,
        team: Seat,
        seed: Seed,
        state: S,
    },
    State {
        state: S,
    },
    Reset {
        state: S,
    },
    Crater {
        x: f64,
        y: f64,
        radius: f64,
    },
    Players {
        players: Vec<PlayerInfo>,
    },
}

impl<S: Serialize> ServerMessage<S> {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_join() {
        assert_eq!(parse_client_message(r#"{"type":"join"}"#).unwrap(), ClientMessage::Join);
    }

    #[test]
    fn parses_input_with_extra_key_field() {
        let msg = parse_client_message(
            r#"{"type":"input","action":"keydown","code":"ArrowLeft","key":"ArrowLeft"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::Input {
                action: InputAction::KeyDown,
                code: "ArrowLeft".into(),
                key: Some("ArrowLeft".into()),
            }
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_client_message("not json"),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            parse_client_message(r#"{"hello":1}"#),
            Err(ProtocolError::MissingType)
        ));
        assert!(matches!(
            parse_client_message(r#"{"type":"dance"}"#),
            Err(ProtocolError::UnknownType(t)) if t == "dance"
        ));
        assert!(matches!(
            parse_client_message(r#"{"type":"input","action":"press","code":"Space"}"#),
            Err(ProtocolError::UnknownAction(_))
        ));
        assert!(matches!(
            parse_client_message(r#"{"type":"input","action":"keyup"}"#),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn reset_seed_forms() {
        let seed_of = |text: &str| match parse_client_message(text).unwrap() {
            ClientMessage::Reset { seed } => requested_seed(seed.as_ref()),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(seed_of(r#"{"type":"reset","seed":42}"#), Some(42));
        assert_eq!(seed_of(r#"{"type":"reset","seed":42.9}"#), Some(42));
        assert_eq!(seed_of(r#"{"type":"reset","seed":"17"}"#), Some(17));
        assert_eq!(seed_of(r#"{"type":"reset","seed":-1}"#), Some(u32::MAX));
        assert_eq!(seed_of(r#"{"type":"reset","seed":"abc"}"#), None);
        assert_eq!(seed_of(r#"{"type":"reset","seed":null}"#), None);
        assert_eq!(seed_of(r#"{"type":"reset"}"#), None);
    }

    #[test]
    fn server_messages_are_type_tagged() {
        let msg: ServerMessage = ServerMessage::Crater {
            x: 1.0,
            y: 2.0,
            radius: 3.0,
        };
        let json: Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
        assert_eq!(json["type"], "crater");
        assert_eq!(json["radius"], 3.0);

        let players: ServerMessage = ServerMessage::Players {
            players: vec![PlayerInfo {
                id: "p1".into(),
                team: Seat::Spectator,
            }],
        };
        let json: Value = serde_json::from_str(&players.encode().unwrap()).unwrap();
        assert_eq!(json["players"][0]["team"], "Spectator");
    }

    #[test]
    fn client_input_encodes_dom_code() {
        let text = ClientMessage::input(InputAction::KeyUp, Key::Space).encode().unwrap();
        assert_eq!(text, r#"{"type":"input","action":"keyup","code":"Space"}"#);
    }
}
