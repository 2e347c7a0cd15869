use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GameConfig;
use crate::types::*;
use crate::weapons::{cycle_weapon, fire_burst, weapon_at};

/// Where the turn machine stands. Derived from state, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    Aiming,
    Charging,
    InFlight,
    GameOver,
}

pub fn phase(state: &GameState) -> TurnPhase {
    if state.game_over {
        TurnPhase::GameOver
    } else if !state.projectiles.is_empty() {
        TurnPhase::InFlight
    } else if state.charging {
        TurnPhase::Charging
    } else {
        TurnPhase::Aiming
    }
}

/// Weapon changes are refused mid-action and after the game ends.
pub fn weapon_locked(state: &GameState) -> bool {
    phase(state) != TurnPhase::Aiming
}

/// Winner if at most one team has living worms.
pub fn check_winner(state: &GameState) -> Option<Winner> {
    match state.living_teams().as_slice() {
        [] => Some(Winner::Nobody),
        [team] => Some(Winner::Team(*team)),
        _ => None,
    }
}

/// End the game if the win condition holds. Returns the event when it does.
pub fn settle_game_over(state: &mut GameState) -> Option<GameEvent> {
    if state.game_over {
        return None;
    }
    let winner = check_winner(state)?;
    state.game_over = true;
    state.winner = Some(winner);
    state.projectiles.clear();
    state.charging = false;
    debug!(tick = state.tick, %winner, "game over");
    Some(GameEvent::GameOver { winner })
}

/// Hand the turn to the next living worm, or finish the game.
pub fn next_turn(state: &mut GameState, held: &mut HeldKeys, config: &GameConfig) -> GameEvent {
    if let Some(event) = settle_game_over(state) {
        return event;
    }

    let len = state.worms.len();
    let mut idx = state.current_index;
    for _ in 0..len {
        idx = (idx + 1) % len;
        if state.worms[idx].alive {
            state.current_index = idx;
            break;
        }
    }

    let worm = &mut state.worms[state.current_index];
    worm.angle = worm.team.default_angle();
    state.charge = 0.0;
    state.charging = false;
    state.charge_dir = 1.0;
    state.turn_timer = config.turn_time;
    state.turn_timer_max = config.turn_time;
    held.clear();

    debug!(tick = state.tick, index = state.current_index, worm = %state.worms[state.current_index].id(), "turn changed");
    GameEvent::TurnChanged {
        index: state.current_index,
    }
}

/// Launch the active worm's selected weapon and reset the meter.
pub fn fire(state: &mut GameState, power: f64, config: &GameConfig) -> Option<GameEvent> {
    state.charging = false;
    state.charge = 0.0;
    state.charge_dir = 1.0;

    let worm = *state.worms.get(state.current_index)?;
    if !worm.alive {
        return None;
    }
    let weapon = weapon_at(state.weapon_index);
    let spawned = fire_burst(&worm, power, weapon, config, &mut state.rng_state);
    state.projectiles.extend(spawned);
    debug!(tick = state.tick, worm = %worm.id(), weapon = ?weapon.id, power, "fired");
    Some(GameEvent::Fired {
        weapon: weapon.id,
        power,
    })
}

pub fn key_down(state: &mut GameState, held: &mut HeldKeys, key: Key) {
    held.press(key);
    match key {
        Key::Space => {
            if !state.charging && state.projectiles.is_empty() && !state.game_over {
                state.charging = true;
                state.charge = 0.0;
                state.charge_dir = 1.0;
            }
        }
        Key::Digit1 | Key::Digit2 | Key::Digit3 | Key::Digit4 | Key::Digit5 => {
            if !weapon_locked(state) {
                state.weapon_index = match key {
                    Key::Digit1 => 0,
                    Key::Digit2 => 1,
                    Key::Digit3 => 2,
                    Key::Digit4 => 3,
                    _ => 4,
                };
            }
        }
        Key::KeyQ | Key::KeyE => {
            if !weapon_locked(state) {
                let delta = if key == Key::KeyQ { -1 } else { 1 };
                state.weapon_index = cycle_weapon(state.weapon_index, delta);
            }
        }
        _ => {}
    }
}

pub fn key_up(
    state: &mut GameState,
    held: &mut HeldKeys,
    key: Key,
    config: &GameConfig,
) -> Option<GameEvent> {
    held.release(key);
    if key != Key::Space {
        return None;
    }
    let event = if state.charging && state.projectiles.is_empty() && !state.game_over {
        let power = state.charge;
        fire(state, power, config)
    } else {
        None
    };
    state.charging = false;
    state.charge_dir = 1.0;
    state.charge = 0.0;
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::create_initial_state;

    fn state() -> (GameState, GameConfig) {
        let config = GameConfig::default();
        (create_initial_state(12345, &config), config)
    }

    #[test]
    fn turn_skips_dead_worms() {
        let (mut s, config) = state();
        s.worms[1].alive = false;
        let mut held = HeldKeys::default();
        let ev = next_turn(&mut s, &mut held, &config);
        assert_eq!(ev, GameEvent::TurnChanged { index: 2 });
        assert_eq!(s.current_index, 2);
    }

    #[test]
    fn turn_wraps_around() {
        let (mut s, config) = state();
        s.current_index = 3;
        next_turn(&mut s, &mut HeldKeys::default(), &config);
        assert_eq!(s.current_index, 0);
    }

    #[test]
    fn turn_resets_meter_timer_angle_and_keys() {
        let (mut s, config) = state();
        s.worms[2].angle = 90.0;
        s.charge = 0.7;
        s.charging = true;
        s.turn_timer = 3.0;
        let mut held = HeldKeys(held::LEFT | held::UP);
        next_turn(&mut s, &mut held, &config);
        assert_eq!(s.current_index, 1);
        next_turn(&mut s, &mut held, &config);
        assert_eq!(s.worms[2].angle, 135.0);
        assert_eq!(s.charge, 0.0);
        assert!(!s.charging);
        assert_eq!(s.turn_timer, 30.0);
        assert_eq!(held, HeldKeys::default());
    }

    #[test]
    fn wiping_a_team_ends_the_game() {
        let (mut s, config) = state();
        s.worms[2].alive = false;
        s.worms[3].alive = false;
        let ev = next_turn(&mut s, &mut HeldKeys::default(), &config);
        assert_eq!(ev, GameEvent::GameOver { winner: Winner::Team(Team::Red) });
        assert!(s.game_over);
        assert_eq!(s.winner, Some(Winner::Team(Team::Red)));
        assert_eq!(phase(&s), TurnPhase::GameOver);
    }

    #[test]
    fn everyone_dead_is_nobody() {
        let (mut s, _) = state();
        for w in &mut s.worms {
            w.alive = false;
        }
        assert_eq!(check_winner(&s), Some(Winner::Nobody));
    }

    #[test]
    fn space_charges_then_fires() {
        let (mut s, config) = state();
        let mut held = HeldKeys::default();
        key_down(&mut s, &mut held, Key::Space);
        assert_eq!(phase(&s), TurnPhase::Charging);
        s.charge = 0.6;
        let ev = key_up(&mut s, &mut held, Key::Space, &config);
        assert_eq!(
            ev,
            Some(GameEvent::Fired {
                weapon: WeaponId::Bazooka,
                power: 0.6
            })
        );
        assert_eq!(s.projectiles.len(), 1);
        assert_eq!(phase(&s), TurnPhase::InFlight);
        assert_eq!(s.charge, 0.0);
    }

    #[test]
    fn space_up_without_charging_does_nothing() {
        let (mut s, config) = state();
        let ev = key_up(&mut s, &mut HeldKeys::default(), Key::Space, &config);
        assert!(ev.is_none());
        assert!(s.projectiles.is_empty());
    }

    #[test]
    fn weapon_select_and_cycle() {
        let (mut s, _) = state();
        let mut held = HeldKeys::default();
        key_down(&mut s, &mut held, Key::Digit4);
        assert_eq!(s.weapon_index, 3);
        key_down(&mut s, &mut held, Key::KeyE);
        assert_eq!(s.weapon_index, 4);
        key_down(&mut s, &mut held, Key::KeyE);
        assert_eq!(s.weapon_index, 0);
        key_down(&mut s, &mut held, Key::KeyQ);
        assert_eq!(s.weapon_index, 4);
    }

    #[test]
    fn weapon_locked_while_charging_or_in_flight() {
        let (mut s, config) = state();
        let mut held = HeldKeys::default();
        key_down(&mut s, &mut held, Key::Space);
        key_down(&mut s, &mut held, Key::Digit3);
        assert_eq!(s.weapon_index, 0);
        key_up(&mut s, &mut held, Key::Space, &config);
        key_down(&mut s, &mut held, Key::Digit3);
        assert_eq!(s.weapon_index, 0);
    }

    #[test]
    fn pistol_fires_three() {
        let (mut s, config) = state();
        s.weapon_index = 4;
        fire(&mut s, 0.5, &config);
        assert_eq!(s.projectiles.len(), 3);
    }
}
