use crate::config::{AiConfig, GameConfig};
use crate::game::Game;
use crate::pilot::AiPilot;
use crate::replay::Transcript;
use crate::turn::TurnPhase;
use crate::types::*;

fn pilot_seed(seed: Seed) -> u32 {
    seed ^ 0x9e37_79b9
}

/// Single-player mode: the authoritative game runs locally and an optional
/// computer opponent plays one team through the same key path as the human.
#[derive(Clone, Debug)]
pub struct LocalGame {
    game: Game,
    pilot: Option<AiPilot>,
    transcript: Transcript,
    tick_rate: u32,
}

impl LocalGame {
    pub fn new(seed: Seed, config: GameConfig, tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            transcript: Transcript::new(seed, config.clone(), tick_rate),
            game: Game::new(seed, config),
            pilot: None,
            tick_rate,
        }
    }

    /// Hand `team` to the computer. The pilot's seed is derived from the
    /// game seed so a local match replays identically.
    pub fn with_ai(mut self, team: Team, ai: AiConfig) -> Self {
        self.set_ai(Some((team, ai)));
        self
    }

    pub fn set_ai(&mut self, ai: Option<(Team, AiConfig)>) {
        let seed = pilot_seed(self.game.state().seed);
        self.pilot = ai.map(|(team, ai)| AiPilot::new(team, ai, seed));
    }

    pub fn ai_team(&self) -> Option<Team> {
        self.pilot.as_ref().map(AiPilot::team)
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn state(&self) -> &GameState {
        self.game.state()
    }

    pub fn phase(&self) -> TurnPhase {
        self.game.phase()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn reset(&mut self, seed: Seed) {
        self.game.reset(seed);
        self.transcript = Transcript::new(seed, self.game.config().clone(), self.tick_rate);
        if let Some(pilot) = self.pilot.as_mut() {
            pilot.reseed(pilot_seed(seed));
        }
    }

    /// Human input. Keys for the computer's team are ignored while it plays.
    pub fn input(&mut self, action: InputAction, key: Key) -> Option<GameEvent> {
        if self.ai_team().is_some() && self.ai_team() == self.game.active_team() {
            return None;
        }
        self.apply(action, key)
    }

    fn apply(&mut self, action: InputAction, key: Key) -> Option<GameEvent> {
        self.transcript.record(self.game.state().tick, action, key);
        self.game.apply_input(action, key)
    }

    /// One fixed step: the pilot presses its keys, then the world advances.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let dt = 1.0 / self.tick_rate as f64;
        let mut events = Vec::new();
        let pilot_inputs = match self.pilot.as_mut() {
            Some(pilot) => pilot.update(&self.game, dt),
            None => Vec::new(),
        };
        for (action, key) in pilot_inputs {
            events.extend(self.apply(action, key));
        }
        events.extend(self.game.step(dt));
        events
    }
}
