use tracing::debug;

use crate::config::GameConfig;
use crate::game::Game;
use crate::prng::Rng;
use crate::protocol::*;
use crate::replay::Transcript;
use crate::snapshot::Snapshot;
use crate::types::*;

pub type ClientId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    All,
    One(ClientId),
}

/// A message the transport should deliver.
#[derive(Clone, Debug, PartialEq)]
pub struct Outbound {
    pub to: Target,
    pub message: ServerMessage,
}

impl Outbound {
    fn all(message: ServerMessage) -> Self {
        Self {
            to: Target::All,
            message,
        }
    }

    fn one(id: ClientId, message: ServerMessage) -> Self {
        Self {
            to: Target::One(id),
            message,
        }
    }
}

#[derive(Clone, Debug)]
struct Client {
    id: ClientId,
    seat: Seat,
}

impl Client {
    fn name(&self) -> String {
        format!("p{}", self.id)
    }
}

/// Authoritative server context, independent of any socket library.
///
/// The transport calls `connect`/`disconnect` on socket open/close, feeds
/// every text frame to `handle_text`, calls `tick` at the fixed rate, and
/// delivers whatever `Outbound` messages come back.
#[derive(Debug)]
pub struct Session {
    game: Game,
    clients: Vec<Client>,
    tick_rate: u32,
    transcript: Transcript,
    seed_rng: Rng,
}

impl Session {
    pub fn new(seed: Seed, config: GameConfig, tick_rate: u32) -> Self {
        let transcript = Transcript::new(seed, config.clone(), tick_rate);
        Self {
            game: Game::new(seed, config),
            clients: Vec::new(),
            tick_rate: tick_rate.max(1),
            transcript,
            seed_rng: Rng::new(seed.rotate_left(16) ^ 0x2545_f491),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Accepted inputs since the last reset.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn seat_of(&self, id: ClientId) -> Option<Seat> {
        self.clients.iter().find(|c| c.id == id).map(|c| c.seat)
    }

    pub fn players(&self) -> Vec<PlayerInfo> {
        self.clients
            .iter()
            .map(|c| PlayerInfo {
                id: c.name(),
                team: c.seat,
            })
            .collect()
    }

    /// First free team seat, else spectator.
    fn free_seat(&self) -> Seat {
        for team in Team::ALL {
            let seat = Seat::from(team);
            if !self.clients.iter().any(|c| c.seat == seat) {
                return seat;
            }
        }
        Seat::Spectator
    }

    pub fn connect(&mut self, id: ClientId) -> Seat {
        if let Some(seat) = self.seat_of(id) {
            return seat;
        }
        let seat = self.free_seat();
        self.clients.push(Client { id, seat });
        debug!(client = id, ?seat, "client connected");
        seat
    }

    pub fn disconnect(&mut self, id: ClientId) -> Vec<Outbound> {
        let before = self.clients.len();
        self.clients.retain(|c| c.id != id);
        if self.clients.len() == before {
            return Vec::new();
        }
        debug!(client = id, "client disconnected");
        vec![self.players_message()]
    }

    fn players_message(&self) -> Outbound {
        Outbound::all(ServerMessage::Players {
            players: self.players(),
        })
    }

    /// Handle one text frame. Malformed and unauthorized messages are
    /// dropped without a reply.
    pub fn handle_text(&mut self, id: ClientId, text: &str) -> Vec<Outbound> {
        let Some(client) = self.clients.iter().find(|c| c.id == id).cloned() else {
            debug!(client = id, "message from unknown client");
            return Vec::new();
        };
        let msg = match parse_client_message(text) {
            Ok(msg) => msg,
            Err(err) => {
                debug!(client = id, %err, "dropping client message");
                return Vec::new();
            }
        };

        match msg {
            ClientMessage::Join => {
                let state = self.game.state();
                vec![
                    Outbound::one(
                        id,
                        ServerMessage::Welcome {
                            id: client.name(),
                            team: client.seat,
                            seed: state.seed,
                            state: Snapshot::full(state),
                        },
                    ),
                    self.players_message(),
                ]
            }
            ClientMessage::Input { action, code, .. } => {
                self.handle_input(&client, action, &code);
                Vec::new()
            }
            ClientMessage::Reset { seed } => {
                let seed = requested_seed(seed.as_ref()).unwrap_or_else(|| self.fresh_seed());
                self.reset(seed);
                vec![Outbound::all(ServerMessage::Reset {
                    state: Snapshot::full(self.game.state()),
                })]
            }
        }
    }

    fn handle_input(&mut self, client: &Client, action: InputAction, code: &str) {
        let Some(team) = client.seat.team() else {
            return;
        };
        if self.game.active_team() != Some(team) {
            return;
        }
        let Some(key) = Key::from_code(code) else {
            return;
        };
        self.transcript.record(self.game.state().tick, action, key);
        self.game.apply_input(action, key);
    }

    fn fresh_seed(&mut self) -> Seed {
        (self.seed_rng.next_f64() * 1e9).floor() as Seed
    }

    /// Rebuild the world and start a new transcript.
    pub fn reset(&mut self, seed: Seed) {
        self.game.reset(seed);
        self.transcript = Transcript::new(seed, self.game.config().clone(), self.tick_rate);
    }

    /// Advance one fixed step and produce the broadcasts for it: one crater
    /// per detonation, then the partial state.
    pub fn tick(&mut self) -> Vec<Outbound> {
        let dt = 1.0 / self.tick_rate as f64;
        let events = self.game.step(dt);
        let mut out: Vec<Outbound> = events
            .iter()
            .filter_map(|e| match *e {
                GameEvent::Crater { x, y, radius } => {
                    Some(Outbound::all(ServerMessage::Crater { x, y, radius }))
                }
                _ => None,
            })
            .collect();
        out.push(Outbound::all(ServerMessage::State {
            state: Snapshot::partial(self.game.state()),
        }));
        out
    }
}
