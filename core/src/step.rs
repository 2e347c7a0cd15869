use crate::config::GameConfig;
use crate::constants::*;
use crate::physics::{update_charge, update_worm};
use crate::projectiles::update_projectiles;
use crate::turn::{fire, next_turn, settle_game_over};
use crate::types::*;

/// Core deterministic transition function.
///
/// Sub-step order:
///  0. Early return if game over (the world freezes until reset)
///  1. Clamp dt, advance tick
///  2. Worms: input for the active worm while nothing flies, then physics
///  3. Projectiles: integrate, detonate, carve, damage
///  4. Win check after any kill
///  5. Turn hand-off once the last projectile is gone
///  6. Power meter
///  7. Turn timer, auto-fire on expiry
pub fn step(
    state: &mut GameState,
    held: &mut HeldKeys,
    config: &GameConfig,
    dt: f64,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // 0. Frozen after the game ends
    if state.game_over {
        return events;
    }

    // 1. Clock
    let dt = dt.clamp(0.0, MAX_DT);
    state.tick += 1;

    // 2. Worms, in order, each seeing the already-updated ones before it
    let controls_open = state.projectiles.is_empty();
    for i in 0..state.worms.len() {
        let controls = (controls_open && i == state.current_index).then_some(*held);
        let next = update_worm(&state.worms, i, controls, &state.terrain, config, dt);
        state.worms[i] = next;
    }

    // 3. Projectiles
    let was_empty = state.projectiles.is_empty();
    let explosions = update_projectiles(state, config, dt);
    let mut any_kill = false;
    for ex in &explosions {
        events.push(GameEvent::Crater {
            x: ex.x,
            y: ex.y,
            radius: ex.radius,
        });
        for index in ex.kills() {
            any_kill = true;
            events.push(GameEvent::WormKilled { index });
        }
    }

    // 4. Win check
    if any_kill {
        if let Some(over) = settle_game_over(state) {
            events.push(over);
            return events;
        }
    }

    // 5. Turn resolution
    if !was_empty && state.projectiles.is_empty() {
        events.push(next_turn(state, held, config));
        if state.game_over {
            return events;
        }
    }

    // 6. Meter
    update_charge(state, config, dt);

    // 7. Timer
    if state.projectiles.is_empty() {
        state.turn_timer -= dt;
        if state.turn_timer <= 0.0 {
            state.turn_timer = 0.0;
            let power = if state.charging {
                state.charge
            } else {
                TIMEOUT_POWER
            };
            events.extend(fire(state, power, config));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::create_initial_state;
    use crate::terrain::Terrain;
    use crate::turn::{key_down, key_up, phase, TurnPhase};

    const DT: f64 = 1.0 / TICK_RATE as f64;

    fn setup(seed: u32) -> (GameState, HeldKeys, GameConfig) {
        let config = GameConfig::default();
        (create_initial_state(seed, &config), HeldKeys::default(), config)
    }

    fn run_until_turn_change(s: &mut GameState, held: &mut HeldKeys, config: &GameConfig) -> Vec<GameEvent> {
        let mut all = Vec::new();
        for _ in 0..2000 {
            let evs = step(s, held, config, DT);
            let done = evs
                .iter()
                .any(|e| matches!(e, GameEvent::TurnChanged { .. } | GameEvent::GameOver { .. }));
            all.extend(evs);
            if done {
                break;
            }
        }
        all
    }

    #[test]
    fn tick_advances_and_dt_is_clamped() {
        let (mut s, mut held, config) = setup(1);
        step(&mut s, &mut held, &config, 5.0);
        assert_eq!(s.tick, 1);
        assert!((s.turn_timer - (30.0 - MAX_DT)).abs() < 1e-9);
    }

    #[test]
    fn game_over_freezes_world() {
        let (mut s, mut held, config) = setup(1);
        s.game_over = true;
        let before = s.clone();
        assert!(step(&mut s, &mut held, &config, DT).is_empty());
        assert_eq!(s, before);
    }

    #[test]
    fn active_worm_walks_while_held() {
        let (mut s, mut held, config) = setup(12345);
        let x0 = s.worms[0].x;
        key_down(&mut s, &mut held, Key::ArrowLeft);
        for _ in 0..10 {
            step(&mut s, &mut held, &config, DT);
        }
        assert!(s.worms[0].x < x0);
        // Other worms ignore the held keys.
        assert_eq!(s.worms[1].x, 1280.0 * 0.3);
    }

    #[test]
    fn shot_resolves_into_next_turn() {
        let (mut s, mut held, config) = setup(12345);
        key_down(&mut s, &mut held, Key::Space);
        step(&mut s, &mut held, &config, DT);
        key_up(&mut s, &mut held, Key::Space, &config);
        assert_eq!(phase(&s), TurnPhase::InFlight);
        let events = run_until_turn_change(&mut s, &mut held, &config);
        assert!(events.iter().any(|e| matches!(e, GameEvent::TurnChanged { index: 1 })));
        assert!(s.projectiles.is_empty());
        // The fresh timer already ran for the rest of the hand-off tick.
        assert!((s.turn_timer - (config.turn_time - MAX_DT)).abs() < 1e-9);
    }

    #[test]
    fn timeout_auto_fires_at_half_power() {
        let (mut s, mut held, config) = setup(12345);
        s.turn_timer = DT / 2.0;
        let events = step(&mut s, &mut held, &config, DT);
        assert!(events.contains(&GameEvent::Fired {
            weapon: WeaponId::Bazooka,
            power: TIMEOUT_POWER
        }));
        assert_eq!(s.projectiles.len(), 1);
        assert_eq!(s.turn_timer, 0.0);
    }

    #[test]
    fn timeout_while_charging_uses_meter() {
        let (mut s, mut held, config) = setup(12345);
        key_down(&mut s, &mut held, Key::Space);
        step(&mut s, &mut held, &config, DT);
        s.turn_timer = DT / 2.0;
        let events = step(&mut s, &mut held, &config, DT);
        let fired = events.iter().find_map(|e| match e {
            GameEvent::Fired { power, .. } => Some(*power),
            _ => None,
        });
        let power = fired.unwrap();
        assert!(power > 0.0 && power < TIMEOUT_POWER);
        assert!(!s.charging);
    }

    #[test]
    fn timer_pauses_while_in_flight() {
        let (mut s, mut held, config) = setup(12345);
        crate::turn::fire(&mut s, 1.0, &config);
        let t = s.turn_timer;
        step(&mut s, &mut held, &config, DT);
        assert_eq!(s.turn_timer, t);
    }

    #[test]
    fn controls_locked_while_in_flight() {
        let (mut s, mut held, config) = setup(12345);
        crate::turn::fire(&mut s, 1.0, &config);
        let x0 = s.worms[0].x;
        key_down(&mut s, &mut held, Key::ArrowRight);
        step(&mut s, &mut held, &config, DT);
        assert_eq!(s.worms[0].x, x0);
    }

    #[test]
    fn killing_last_enemy_ends_game() {
        let (mut s, mut held, config) = setup(12345);
        s.terrain = Terrain::flat(1280.0, 720.0, 500.0);
        for w in &mut s.worms {
            w.y = 488.0;
        }
        s.worms[2].alive = false;
        s.worms[3].health = 5;
        let target = s.worms[3];
        s.projectiles.push(Projectile {
            x: target.x,
            y: target.y - 30.0,
            vx: 0.0,
            vy: 300.0,
            radius: 4.0,
            weapon: WeaponId::Bazooka,
            explosion_radius: 55.0,
            max_damage: 60,
            bounciness: 0.0,
            fuse: 0.0,
            timer: 0.0,
            gravity: 810.0,
            bounces: 0,
        });
        let events = run_until_turn_change(&mut s, &mut held, &config);
        assert!(events.contains(&GameEvent::WormKilled { index: 3 }));
        assert!(s.game_over);
        assert_eq!(s.winner, Some(Winner::Team(Team::Red)));
    }
}
