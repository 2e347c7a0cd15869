use tracing::debug;

use crate::ai::{plan_move, plan_shot, Aim};
use crate::config::AiConfig;
use crate::constants::MAX_DT;
use crate::game::Game;
use crate::prng::Rng;
use crate::types::*;

/// Walking stops within this many pixels of the planned spot.
const ARRIVE_TOLERANCE: f64 = 5.0;
/// Spots closer than this are not worth walking to.
const MOVE_THRESHOLD: f64 = 10.0;
const START_DELAY: (f64, f64) = (0.2, 0.5);
const AIM_DELAY: (f64, f64) = (0.3, 0.6);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PilotPhase {
    Moving,
    Thinking,
    Aiming,
    Charging,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Plan {
    phase: PilotPhase,
    target_x: f64,
    move_time: f64,
    aim: Option<Aim>,
    last_x: f64,
    last_angle: f64,
}

/// Plays one team by pressing keys, exactly like a human at the keyboard.
///
/// Call [`AiPilot::update`] once per tick before stepping; it returns the
/// inputs to apply this tick. The pilot never touches state directly.
#[derive(Clone, Debug)]
pub struct AiPilot {
    team: Team,
    ai: AiConfig,
    rng: Rng,
    plan: Option<Plan>,
    timer: f64,
}

fn digit_for(weapon_index: usize) -> Key {
    match weapon_index {
        0 => Key::Digit1,
        1 => Key::Digit2,
        2 => Key::Digit3,
        3 => Key::Digit4,
        _ => Key::Digit5,
    }
}

impl AiPilot {
    pub fn new(team: Team, ai: AiConfig, seed: u32) -> Self {
        Self {
            team,
            ai,
            rng: Rng::new(seed),
            plan: None,
            timer: 0.0,
        }
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn phase(&self) -> Option<PilotPhase> {
        self.plan.map(|p| p.phase)
    }

    /// Forget any plan in progress and restart the delay stream from `seed`.
    pub fn reseed(&mut self, seed: u32) {
        self.rng = Rng::new(seed);
        self.plan = None;
        self.timer = 0.0;
    }

    fn delay(&mut self, (min, max): (f64, f64)) -> f64 {
        self.rng.range(min, max)
    }

    /// Inputs for this tick. Does nothing outside this team's aiming window.
    pub fn update(&mut self, game: &Game, dt: f64) -> Vec<(InputAction, Key)> {
        let state = game.state();
        let Some(worm) = state.active_worm().copied() else {
            return Vec::new();
        };
        let my_turn = worm.alive && worm.team == self.team && !state.game_over;
        if !my_turn || !state.projectiles.is_empty() {
            self.plan = None;
            return Vec::new();
        }
        let dt = dt.clamp(0.0, MAX_DT);

        let Some(mut plan) = self.plan else {
            let target_x = plan_move(state, game.config(), &self.ai).unwrap_or(worm.x);
            let phase = if (target_x - worm.x).abs() > MOVE_THRESHOLD {
                PilotPhase::Moving
            } else {
                PilotPhase::Thinking
            };
            debug!(team = %self.team, worm = %worm.id(), target_x, ?phase, "pilot planning");
            self.plan = Some(Plan {
                phase,
                target_x,
                move_time: 0.0,
                aim: None,
                last_x: f64::NAN,
                last_angle: f64::NAN,
            });
            self.timer = self.delay(START_DELAY);
            return Vec::new();
        };

        self.timer -= dt;
        if self.timer > 0.0 {
            return Vec::new();
        }

        let keys = game.held();
        let mut inputs = Vec::new();
        match plan.phase {
            PilotPhase::Moving => {
                let diff = plan.target_x - worm.x;
                plan.move_time += dt;
                let walking = keys.has(held::LEFT) || keys.has(held::RIGHT);
                let blocked = walking && worm.x == plan.last_x;
                if diff.abs() > ARRIVE_TOLERANCE && plan.move_time < self.ai.move_time_max && !blocked {
                    let (go, stop) = if diff > 0.0 {
                        (Key::ArrowRight, Key::ArrowLeft)
                    } else {
                        (Key::ArrowLeft, Key::ArrowRight)
                    };
                    if keys.has(stop.held_bit().unwrap_or(0)) {
                        inputs.push((InputAction::KeyUp, stop));
                    }
                    if !keys.has(go.held_bit().unwrap_or(0)) {
                        inputs.push((InputAction::KeyDown, go));
                    }
                    plan.last_x = worm.x;
                } else {
                    release_arrows(keys, &mut inputs);
                    plan.phase = PilotPhase::Thinking;
                    self.timer = self.delay((self.ai.think_delay_min, self.ai.think_delay_max));
                }
            }
            PilotPhase::Thinking => {
                plan.aim = plan_shot(state, game.config(), &self.ai);
                plan.phase = PilotPhase::Aiming;
                plan.last_angle = f64::NAN;
                self.timer = self.delay(AIM_DELAY);
            }
            PilotPhase::Aiming => {
                let aim = plan.aim.unwrap_or(Aim {
                    weapon_index: 0,
                    angle: worm.angle,
                    power: 0.6,
                });
                if state.weapon_index != aim.weapon_index {
                    let key = digit_for(aim.weapon_index);
                    inputs.push((InputAction::KeyDown, key));
                    inputs.push((InputAction::KeyUp, key));
                } else {
                    let diff = aim.angle - worm.angle;
                    let half_step = game.config().angle_speed * dt / 2.0;
                    let turning = keys.has(held::UP) || keys.has(held::DOWN);
                    let stuck = turning && worm.angle == plan.last_angle;
                    if diff.abs() > half_step && !stuck {
                        let (go, stop) = if diff > 0.0 {
                            (Key::ArrowUp, Key::ArrowDown)
                        } else {
                            (Key::ArrowDown, Key::ArrowUp)
                        };
                        if keys.has(stop.held_bit().unwrap_or(0)) {
                            inputs.push((InputAction::KeyUp, stop));
                        }
                        if !keys.has(go.held_bit().unwrap_or(0)) {
                            inputs.push((InputAction::KeyDown, go));
                        }
                        plan.last_angle = worm.angle;
                    } else {
                        release_arrows(keys, &mut inputs);
                        plan.phase = PilotPhase::Charging;
                    }
                }
            }
            PilotPhase::Charging => {
                let power = plan.aim.map_or(0.6, |a| a.power);
                if !state.charging {
                    inputs.push((InputAction::KeyDown, Key::Space));
                } else if state.charge >= power {
                    inputs.push((InputAction::KeyUp, Key::Space));
                    debug!(team = %self.team, power = state.charge, "pilot fired");
                    self.plan = None;
                    self.timer = 0.0;
                    return inputs;
                }
            }
        }
        self.plan = Some(plan);
        inputs
    }
}

fn release_arrows(keys: HeldKeys, inputs: &mut Vec<(InputAction, Key)>) {
    for key in [Key::ArrowLeft, Key::ArrowRight, Key::ArrowUp, Key::ArrowDown] {
        if key.held_bit().is_some_and(|bit| keys.has(bit)) {
            inputs.push((InputAction::KeyUp, key));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::turn::TurnPhase;

    const DT: f64 = 1.0 / 30.0;

    fn drive(game: &mut Game, pilot: &mut AiPilot, ticks: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            for (action, key) in pilot.update(game, DT) {
                events.extend(game.apply_input(action, key));
            }
            events.extend(game.step(DT));
        }
        events
    }

    #[test]
    fn idle_when_not_its_turn() {
        let game = Game::new(3, GameConfig::default());
        let mut pilot = AiPilot::new(Team::Blue, AiConfig::default(), 1);
        assert!(pilot.update(&game, DT).is_empty());
        assert_eq!(pilot.phase(), None);
    }

    #[test]
    fn first_update_only_plans() {
        let game = Game::new(3, GameConfig::default());
        let mut pilot = AiPilot::new(Team::Red, AiConfig::default(), 1);
        assert!(pilot.update(&game, DT).is_empty());
        assert!(matches!(
            pilot.phase(),
            Some(PilotPhase::Moving | PilotPhase::Thinking)
        ));
    }

    #[test]
    fn pilot_fires_within_the_turn() {
        let mut game = Game::new(3, GameConfig::default());
        let mut pilot = AiPilot::new(Team::Red, AiConfig::default(), 1);
        let events = drive(&mut game, &mut pilot, 300);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Fired { .. })));
        let fired_power = events.iter().find_map(|e| match e {
            GameEvent::Fired { power, .. } => Some(*power),
            _ => None,
        });
        assert!(fired_power.is_some_and(|p| p > 0.0));
    }

    #[test]
    fn pilot_stays_in_home_half() {
        let mut game = Game::new(11, GameConfig::default());
        let mut pilot = AiPilot::new(Team::Red, AiConfig::default(), 5);
        for _ in 0..300 {
            for (action, key) in pilot.update(&game, DT) {
                game.apply_input(action, key);
            }
            game.step(DT);
            if game.phase() == TurnPhase::InFlight {
                break;
            }
        }
        let (_, max) = Team::Red.home_bounds(game.config().width, game.config().worm_radius);
        assert!(game.state().worms[0].x <= max);
    }

    #[test]
    fn two_pilots_finish_a_match() {
        let config = GameConfig::default();
        let mut game = Game::new(2024, config);
        let mut red = AiPilot::new(Team::Red, AiConfig::default(), 1);
        let mut blue = AiPilot::new(Team::Blue, AiConfig::default(), 2);
        for _ in 0..30 * 60 * 5 {
            for pilot in [&mut red, &mut blue] {
                for (action, key) in pilot.update(&game, DT) {
                    game.apply_input(action, key);
                }
            }
            game.step(DT);
            if game.state().game_over {
                break;
            }
        }
        assert!(game.state().tick > 0);
        let fired = game.state().worms.iter().any(|w| w.health < 100 || !w.alive);
        assert!(fired || game.state().game_over);
    }
}
