use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::ReplayError;
use crate::game::Game;
use crate::hash::state_digest;
use crate::types::*;

/// One accepted input, stamped with the number of ticks completed before
/// it arrived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedInput {
    pub tick: Tick,
    pub action: InputAction,
    pub key: Key,
}

/// Everything needed to rebuild a game: seed, rules, clock and inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub seed: Seed,
    pub config: GameConfig,
    pub tick_rate: u32,
    pub inputs: Vec<TimedInput>,
}

impl Transcript {
    pub fn new(seed: Seed, config: GameConfig, tick_rate: u32) -> Self {
        Self {
            seed,
            config,
            tick_rate,
            inputs: Vec::new(),
        }
    }

    pub fn record(&mut self, tick: Tick, action: InputAction, key: Key) {
        self.inputs.push(TimedInput { tick, action, key });
    }

    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate.max(1) as f64
    }

    pub fn last_tick(&self) -> Option<Tick> {
        self.inputs.last().map(|i| i.tick)
    }
}

/// Re-run a transcript for `ticks` fixed steps.
///
/// Inputs stamped `t` are applied when `t` ticks have completed, before the
/// next step, in recorded order.
pub fn replay(transcript: &Transcript, ticks: Tick) -> Result<GameState, ReplayError> {
    let mut previous = 0;
    for input in &transcript.inputs {
        if input.tick < previous {
            return Err(ReplayError::OutOfOrder {
                tick: input.tick,
                previous,
            });
        }
        previous = input.tick;
    }
    if let Some(last) = transcript.last_tick() {
        if last > ticks {
            return Err(ReplayError::TooShort { last, ticks });
        }
    }

    let mut game = Game::new(transcript.seed, transcript.config.clone());
    let dt = transcript.dt();
    let mut pending = transcript.inputs.iter().peekable();

    for t in 0..=ticks {
        while let Some(input) = pending.next_if(|i| i.tick == t) {
            game.apply_input(input.action, input.key);
        }
        if t < ticks {
            game.step(dt);
        }
    }

    Ok(game.state().clone())
}

/// Replay and compare against an expected digest.
pub fn verify(transcript: &Transcript, ticks: Tick, expected: &[u8; 32]) -> Result<GameState, ReplayError> {
    let state = replay(transcript, ticks)?;
    if &state_digest(&state) != expected {
        return Err(ReplayError::DigestMismatch { ticks });
    }
    Ok(state)
}
