use tracing::trace;

use crate::config::GameConfig;
use crate::constants::*;
use crate::terrain::Terrain;
use crate::types::*;

/// What became of a projectile after one integration step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileFate {
    Flying(Projectile),
    /// Detonates at the given point this tick.
    Detonate { x: f64, y: f64 },
    /// Left the extended field; removed without exploding.
    Culled,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub damage: i32,
    pub killed: bool,
}

/// Result of one detonation.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub hits: Vec<Hit>,
}

impl Explosion {
    pub fn kills(&self) -> impl Iterator<Item = usize> + '_ {
        self.hits.iter().filter(|h| h.killed).map(|h| h.index)
    }
}

/// True once a projectile is past the culling margin. Above the field is
/// never culled; gravity always brings it back.
pub fn is_out_of_bounds(p: &Projectile, width: f64, height: f64) -> bool {
    p.x < -OUT_OF_BOUNDS_MARGIN || p.x > width + OUT_OF_BOUNDS_MARGIN || p.y > height + OUT_OF_BOUNDS_MARGIN
}

/// Index of the first living worm the projectile is touching, if any.
pub fn direct_hit(p: &Projectile, worms: &[Worm], worm_radius: f64) -> Option<usize> {
    let reach = worm_radius + p.radius;
    worms
        .iter()
        .position(|w| w.alive && (w.x - p.x).hypot(w.y - p.y) <= reach)
}

/// Integrate one projectile by `dt`.
///
/// Order:
///  1. Wind and gravity into velocity, then position
///  2. Fuse countdown (airburst at zero)
///  3. Out-of-bounds culling
///  4. Direct hit on a living worm
///  5. Terrain impact: bounce while budget remains, else detonate
pub fn advance_projectile(
    p: &Projectile,
    wind_accel: f64,
    terrain: &Terrain,
    worms: &[Worm],
    config: &GameConfig,
    dt: f64,
) -> ProjectileFate {
    let vx = p.vx + wind_accel * dt;
    let vy = p.vy + p.gravity * dt;
    let mut next = Projectile {
        x: p.x + vx * dt,
        y: p.y + vy * dt,
        vx,
        vy,
        ..*p
    };

    if next.timer > 0.0 {
        next.timer -= dt;
        if next.timer <= 0.0 {
            return ProjectileFate::Detonate { x: next.x, y: next.y };
        }
    }

    if is_out_of_bounds(&next, terrain.width, terrain.height) {
        return ProjectileFate::Culled;
    }

    if direct_hit(&next, worms, config.worm_radius).is_some() {
        return ProjectileFate::Detonate { x: next.x, y: next.y };
    }

    let ground = terrain.height_at(next.x);
    if next.y >= ground {
        let can_bounce = next.bounciness > 0.0
            && next.bounces < config.max_bounces
            && next.timer > MIN_BOUNCE_FUSE;
        if !can_bounce {
            return ProjectileFate::Detonate { x: next.x, y: next.y };
        }
        next.y = ground - BOUNCE_LIFT;
        next.vy = -next.vy.abs() * next.bounciness;
        next.vx *= BOUNCE_FRICTION;
        next.bounces += 1;
    }

    ProjectileFate::Flying(next)
}

/// Linear falloff damage: `max_damage` at the epicenter, 0 at the rim.
pub fn explosion_damage(distance: f64, radius: f64, max_damage: i32) -> i32 {
    if radius <= 0.0 || distance > radius {
        return 0;
    }
    ((1.0 - distance / radius) * max_damage as f64).round() as i32
}

/// Carve the crater, damage every living worm in range and knock the
/// survivors away from the epicenter.
pub fn explode(
    state: &mut GameState,
    x: f64,
    y: f64,
    radius: f64,
    max_damage: i32,
    config: &GameConfig,
) -> Explosion {
    state.terrain.carve_crater(x, y, radius);

    let mut hits = Vec::new();
    for (index, worm) in state.worms.iter_mut().enumerate() {
        if !worm.alive {
            continue;
        }
        let dx = worm.x - x;
        let dy = worm.y - y;
        let dist = dx.hypot(dy);
        if dist > radius {
            continue;
        }

        let falloff = 1.0 - dist / radius;
        let damage = explosion_damage(dist, radius, max_damage);
        worm.health -= damage;
        if worm.health <= 0 {
            worm.health = 0;
            worm.alive = false;
            hits.push(Hit {
                index,
                damage,
                killed: true,
            });
            continue;
        }

        let knock = config.knockback_impulse * falloff;
        let dir = dy.atan2(dx);
        worm.vx += dir.cos() * knock;
        worm.vy += dir.sin() * knock - config.vertical_boost * falloff;
        worm.on_ground = false;
        hits.push(Hit {
            index,
            damage,
            killed: false,
        });
    }

    Explosion { x, y, radius, hits }
}

/// Advance every projectile and resolve detonations, in spawn order.
pub fn update_projectiles(state: &mut GameState, config: &GameConfig, dt: f64) -> Vec<Explosion> {
    if state.projectiles.is_empty() {
        return Vec::new();
    }
    let wind_accel = config.wind_accel(state.wind);
    let current = std::mem::take(&mut state.projectiles);
    let mut remaining = Vec::with_capacity(current.len());
    let mut explosions = Vec::new();

    for p in &current {
        match advance_projectile(p, wind_accel, &state.terrain, &state.worms, config, dt) {
            ProjectileFate::Flying(next) => remaining.push(next),
            ProjectileFate::Detonate { x, y } => {
                explosions.push(explode(state, x, y, p.explosion_radius, p.max_damage, config));
            }
            ProjectileFate::Culled => {
                trace!(x = p.x, y = p.y, weapon = ?p.weapon, "projectile culled");
            }
        }
    }

    state.projectiles = remaining;
    explosions
}
