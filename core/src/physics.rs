use crate::config::GameConfig;
use crate::constants::*;
use crate::terrain::Terrain;
use crate::types::*;

/// `value` limited to `[min, max]`. Unlike `f64::clamp` this never panics
/// when `min > max`; `min` wins.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// True if moving worm `index` to `new_x` would bring it closer than the
/// minimum separation to any other living worm.
pub fn would_collide(worms: &[Worm], index: usize, new_x: f64, min_distance: f64) -> bool {
    worms
        .iter()
        .enumerate()
        .any(|(i, w)| i != index && w.alive && (new_x - w.x).abs() < min_distance)
}

/// Advance one worm by `dt`.
///
/// `controls` is `Some` only for the active worm while nothing is in flight.
/// Order:
///  1. Walk (blocked by other worms) and aim (clamped to team bounds)
///  2. Residual horizontal velocity with air drag or ground friction
///  3. Leave the ground if the surface dropped away
///  4. Gravity while airborne
///  5. Snap onto the surface on contact
pub fn update_worm(
    worms: &[Worm],
    index: usize,
    controls: Option<HeldKeys>,
    terrain: &Terrain,
    config: &GameConfig,
    dt: f64,
) -> Worm {
    let w = worms[index];
    if !w.alive {
        return w;
    }
    let r = config.worm_radius;
    let width = terrain.width;

    let mut x = w.x;
    let mut y = w.y;
    let mut vx = w.vx;
    let mut vy = w.vy;
    let mut angle = w.angle;
    let mut on_ground = w.on_ground;

    // 1. Input
    if let Some(keys) = controls {
        let left = keys.has(held::LEFT);
        let right = keys.has(held::RIGHT);
        if left != right {
            let dir = if left { -1.0 } else { 1.0 };
            let next_x = clamp(x + dir * config.move_speed * dt, r, width - r);
            if !would_collide(worms, index, next_x, config.min_worm_distance) {
                x = next_x;
            }
        }

        let up = keys.has(held::UP);
        let down = keys.has(held::DOWN);
        if up != down {
            let dir = if up { 1.0 } else { -1.0 };
            let (min, max) = w.team.aim_bounds();
            angle = clamp(angle + dir * config.angle_speed * dt, min, max);
        }
    }

    // 2. Residual velocity
    if !on_ground || vx.abs() > REST_SPEED {
        x = clamp(x + vx * dt, r, width - r);
        vx *= if on_ground { GROUND_FRICTION } else { AIR_DRAG };
    }

    // 3. Ground test, probing just above the feet so caves open underneath
    if y < terrain.ground_at(x, y + r - 2.0) - r - 1.0 {
        on_ground = false;
    }

    // 4. Gravity
    if !on_ground {
        vy += config.gravity * dt;
        y += vy * dt;
    }

    // 5. Landing
    let ground = terrain.ground_at(x, y) - r;
    if y >= ground {
        y = ground;
        vy = 0.0;
        on_ground = true;
    }

    Worm {
        x,
        y,
        vx,
        vy,
        angle,
        on_ground,
        ..w
    }
}

/// Oscillate the power meter between 0 and 1 while charging.
pub fn update_charge(state: &mut GameState, config: &GameConfig, dt: f64) {
    if !state.charging {
        return;
    }
    state.charge += config.charge_rate * dt * state.charge_dir;
    if state.charge >= 1.0 {
        state.charge = 1.0;
        state.charge_dir = -1.0;
    }
    if state.charge <= 0.0 {
        state.charge = 0.0;
        state.charge_dir = 1.0;
    }
}
