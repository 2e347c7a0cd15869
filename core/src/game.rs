use tracing::debug;

use crate::config::GameConfig;
use crate::init::create_initial_state;
use crate::step::step;
use crate::turn::{self, TurnPhase};
use crate::types::*;

/// One self-contained simulation: world state, held keys and rules.
///
/// Everything the simulation touches lives here, so several games can run
/// side by side in one process.
#[derive(Clone, Debug)]
pub struct Game {
    state: GameState,
    held: HeldKeys,
    config: GameConfig,
}

impl Game {
    pub fn new(seed: Seed, config: GameConfig) -> Self {
        let state = create_initial_state(seed, &config);
        debug!(seed, map = %state.map_name, wind = state.wind, "game created");
        Self {
            state,
            held: HeldKeys::default(),
            config,
        }
    }

    /// Rebuild the world from a new seed, keeping the rules.
    pub fn reset(&mut self, seed: Seed) {
        self.state = create_initial_state(seed, &self.config);
        self.held.clear();
        debug!(seed, map = %self.state.map_name, wind = self.state.wind, "game reset");
    }

    pub fn key_down(&mut self, key: Key) {
        turn::key_down(&mut self.state, &mut self.held, key);
    }

    pub fn key_up(&mut self, key: Key) -> Option<GameEvent> {
        turn::key_up(&mut self.state, &mut self.held, key, &self.config)
    }

    pub fn apply_input(&mut self, action: InputAction, key: Key) -> Option<GameEvent> {
        match action {
            InputAction::KeyDown => {
                self.key_down(key);
                None
            }
            InputAction::KeyUp => self.key_up(key),
        }
    }

    pub fn step(&mut self, dt: f64) -> Vec<GameEvent> {
        step(&mut self.state, &mut self.held, &self.config, dt)
    }

    pub fn active_team(&self) -> Option<Team> {
        self.state.active_team()
    }

    pub fn phase(&self) -> TurnPhase {
        turn::phase(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn held(&self) -> HeldKeys {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_starts_with_red_aiming() {
        let game = Game::new(42, GameConfig::default());
        assert_eq!(game.active_team(), Some(Team::Red));
        assert_eq!(game.phase(), TurnPhase::Aiming);
        assert_eq!(game.state().seed, 42);
    }

    #[test]
    fn reset_rebuilds_world_and_clears_keys() {
        let mut game = Game::new(42, GameConfig::default());
        game.key_down(Key::ArrowLeft);
        for _ in 0..5 {
            game.step(0.033);
        }
        game.reset(7);
        assert_eq!(game.state().seed, 7);
        assert_eq!(game.state().tick, 0);
        assert_eq!(game.held(), HeldKeys::default());
        assert_eq!(game.state(), &create_initial_state(7, &GameConfig::default()));
    }

    #[test]
    fn apply_input_routes_actions() {
        let mut game = Game::new(3, GameConfig::default());
        game.apply_input(InputAction::KeyDown, Key::Space);
        assert_eq!(game.phase(), TurnPhase::Charging);
        game.step(0.033);
        let ev = game.apply_input(InputAction::KeyUp, Key::Space);
        assert!(matches!(ev, Some(GameEvent::Fired { .. })));
        assert_eq!(game.phase(), TurnPhase::InFlight);
    }

    #[test]
    fn two_games_are_independent() {
        let mut a = Game::new(1, GameConfig::default());
        let b = Game::new(1, GameConfig::default());
        a.key_down(Key::ArrowRight);
        a.step(0.033);
        assert_ne!(a.state().worms[0].x, b.state().worms[0].x);
    }
}
