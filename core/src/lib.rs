pub mod ai;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod hash;
pub mod init;
pub mod level;
pub mod local;
pub mod physics;
pub mod pilot;
pub mod prng;
pub mod projectiles;
pub mod protocol;
pub mod replay;
pub mod session;
pub mod snapshot;
pub mod step;
pub mod terrain;
pub mod turn;
pub mod types;
pub mod weapons;

pub use ai::{plan_move, plan_shot, simulate_shot, Aim, ShotOutcome};
pub use client::{ClientView, SnapshotBuffer, WorldView};
pub use config::{AiConfig, GameConfig};
pub use constants::*;
pub use error::{ProtocolError, ReplayError};
pub use game::Game;
pub use hash::*;
pub use init::*;
pub use level::{LevelData, BUILTIN_LEVELS};
pub use local::LocalGame;
pub use physics::{clamp, update_charge, update_worm, would_collide};
pub use pilot::{AiPilot, PilotPhase};
pub use prng::*;
pub use projectiles::{advance_projectile, explode, is_out_of_bounds, update_projectiles, Explosion, ProjectileFate};
pub use protocol::{parse_client_message, ClientMessage, PlayerInfo, Seat, ServerMessage};
pub use replay::{replay, verify, TimedInput, Transcript};
pub use session::{ClientId, Outbound, Session, Target};
pub use snapshot::Snapshot;
pub use step::step;
pub use terrain::{build_terrain, GeneratedTerrain, Hole, Terrain};
pub use turn::TurnPhase;
pub use types::*;
pub use weapons::*;
