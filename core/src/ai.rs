//! Computer opponent search: sandbox trajectories scored against the
//! opposing team, a shot grid and a movement grid.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{AiConfig, GameConfig};
use crate::physics::{clamp, would_collide};
use crate::projectiles::{advance_projectile, ProjectileFate};
use crate::types::*;
use crate::weapons::{weapon_at, WEAPONS};

/// Blast radius assumed for weapons that report none.
const FALLBACK_BLAST_RADIUS: f64 = 40.0;
const FALLBACK_MAX_DAMAGE: f64 = 50.0;
/// Margin kept from the home band edges when picking a spot.
const MOVE_EDGE_MARGIN: f64 = 20.0;
const MOVE_SAMPLES: usize = 5;
const MOVE_OFFSETS: [f64; 4] = [-40.0, -80.0, 40.0, 80.0];
/// Weight of the standing height in a movement score.
const HEIGHT_PENALTY: f64 = 5.0;

/// One point in the search grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aim {
    pub weapon_index: usize,
    pub angle: f64,
    pub power: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotOutcome {
    /// Lower is better: negative estimated damage inside the blast radius,
    /// otherwise the closest approach in pixels.
    pub score: f64,
    pub min_distance: f64,
    /// Where the sandbox shell stopped, `None` if it left the field.
    pub impact: Option<(f64, f64)>,
    pub estimated_damage: f64,
}

/// Living worms not on `team`.
pub fn targets_of(state: &GameState, team: Team) -> Vec<Worm> {
    state
        .worms
        .iter()
        .filter(|w| w.alive && w.team != team)
        .copied()
        .collect()
}

fn nearest_target(targets: &[Worm], x: f64) -> Option<&Worm> {
    targets.iter().fold(None, |best: Option<&Worm>, w| match best {
        Some(b) if (b.x - x).abs() <= (w.x - x).abs() => Some(b),
        _ => Some(w),
    })
}

/// Aim range toward a target: up-right when it is to the right, else up-left.
fn angle_range(shooter_x: f64, target_x: f64) -> (f64, f64) {
    if target_x >= shooter_x {
        (15.0, 80.0)
    } else {
        (100.0, 165.0)
    }
}

fn sandbox_projectile(shooter: &Worm, aim: &Aim, config: &GameConfig) -> Projectile {
    let weapon = weapon_at(aim.weapon_index);
    let rad = aim.angle.to_radians();
    let speed = weapon.launch_speed(aim.power);
    let muzzle = config.muzzle_offset();
    Projectile {
        x: shooter.x + rad.cos() * muzzle,
        y: shooter.y - rad.sin() * muzzle,
        vx: rad.cos() * speed,
        vy: -rad.sin() * speed,
        radius: weapon.projectile_radius,
        weapon: weapon.id,
        explosion_radius: weapon.explosion_radius,
        max_damage: weapon.max_damage,
        // first contact ends the sandbox flight
        bounciness: 0.0,
        fuse: 0.0,
        timer: 0.0,
        gravity: config.gravity * weapon.gravity_scale,
        bounces: 0,
    }
}

/// Fly one shot in a sandbox and score it against `shooter`'s opponents.
///
/// Uses the live projectile integrator with the current wind and terrain.
/// Bounces and fuses are ignored; the flight stops on the first contact,
/// once it passes within a muzzle length of a target, or after
/// `ai.sim_max_time`.
pub fn simulate_shot(
    state: &GameState,
    shooter: &Worm,
    aim: &Aim,
    config: &GameConfig,
    ai: &AiConfig,
) -> ShotOutcome {
    let targets = targets_of(state, shooter.team);
    let weapon = weapon_at(aim.weapon_index);
    let wind_accel = config.wind_accel(state.wind);
    let close_enough = config.muzzle_offset();
    let closest = |x: f64, y: f64| {
        targets
            .iter()
            .map(|t| (t.x - x).hypot(t.y - y))
            .fold(f64::INFINITY, f64::min)
    };

    let mut p = sandbox_projectile(shooter, aim, config);
    let mut min_distance = f64::INFINITY;
    let mut impact = None;
    let steps = if ai.sim_step > 0.0 {
        (ai.sim_max_time / ai.sim_step).ceil() as usize
    } else {
        0
    };

    for _ in 0..steps {
        match advance_projectile(&p, wind_accel, &state.terrain, &targets, config, ai.sim_step) {
            ProjectileFate::Flying(next) => {
                p = next;
                min_distance = min_distance.min(closest(p.x, p.y));
                if min_distance <= close_enough {
                    impact = Some((p.x, p.y));
                    break;
                }
            }
            ProjectileFate::Detonate { x, y } => {
                min_distance = min_distance.min(closest(x, y));
                impact = Some((x, y));
                break;
            }
            ProjectileFate::Culled => break,
        }
    }

    let blast = if weapon.explosion_radius > 0.0 {
        weapon.explosion_radius
    } else {
        FALLBACK_BLAST_RADIUS
    };
    let max_damage = if weapon.max_damage > 0 {
        weapon.max_damage as f64
    } else {
        FALLBACK_MAX_DAMAGE
    };
    let estimated_damage = if min_distance <= blast {
        (1.0 - min_distance / blast) * max_damage
    } else {
        0.0
    };
    let score = if min_distance <= blast {
        -estimated_damage
    } else {
        min_distance
    };

    ShotOutcome {
        score,
        min_distance,
        impact,
        estimated_damage,
    }
}

/// Evenly spaced values from `start` up to and including `end`.
fn grid(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = if step > 0.0 && end >= start {
        ((end - start) / step + 1e-9).floor() as usize + 1
    } else {
        1
    };
    (0..count).map(move |i| start + step * i as f64)
}

fn shot_grid(weapons: std::ops::Range<usize>, angles: (f64, f64), ai: &AiConfig, coarse: bool) -> Vec<Aim> {
    let scale = if coarse { 2.0 } else { 1.0 };
    let mut out = Vec::new();
    for weapon_index in weapons {
        for angle in grid(angles.0, angles.1, ai.angle_step * scale) {
            for power in grid(ai.power_min, ai.power_max, ai.power_step * scale) {
                out.push(Aim {
                    weapon_index,
                    angle,
                    power,
                });
            }
        }
    }
    out
}

/// Lowest score over the candidates. Ties go to the earliest candidate, so
/// the answer does not depend on how work was split across threads.
fn best_candidate<F>(candidates: &[Aim], eval: F) -> Option<(usize, f64)>
where
    F: Fn(&Aim) -> f64 + Sync + Send,
{
    let pick = |a: &(usize, f64), b: &(usize, f64)| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0));

    #[cfg(feature = "parallel")]
    let best = candidates
        .par_iter()
        .enumerate()
        .map(|(i, aim)| (i, eval(aim)))
        .min_by(pick);

    #[cfg(not(feature = "parallel"))]
    let best = candidates
        .iter()
        .enumerate()
        .map(|(i, aim)| (i, eval(aim)))
        .min_by(pick);

    best
}

/// Best aim for the active worm over every weapon, angle and power.
///
/// `None` when there is no living active worm.
pub fn plan_shot(state: &GameState, config: &GameConfig, ai: &AiConfig) -> Option<Aim> {
    let worm = state.active_worm().filter(|w| w.alive)?;
    let targets = targets_of(state, worm.team);
    let Some(target) = nearest_target(&targets, worm.x) else {
        let angle = match worm.team {
            Team::Red => 60.0,
            Team::Blue => 120.0,
        };
        return Some(Aim {
            weapon_index: 0,
            angle,
            power: 0.6,
        });
    };

    let candidates = shot_grid(0..WEAPONS.len(), angle_range(worm.x, target.x), ai, false);
    let best = best_candidate(&candidates, |aim| simulate_shot(state, worm, aim, config, ai).score);
    match best {
        Some((i, score)) if score.is_finite() => Some(candidates[i]),
        _ => Some(Aim {
            weapon_index: 0,
            angle: worm.angle,
            power: 0.6,
        }),
    }
}

/// Best coarse score from a standing spot, first weapon only.
fn coarse_score(state: &GameState, shooter: &Worm, config: &GameConfig, ai: &AiConfig) -> f64 {
    let targets = targets_of(state, shooter.team);
    let Some(target) = nearest_target(&targets, shooter.x) else {
        return f64::INFINITY;
    };
    let candidates = shot_grid(0..1, angle_range(shooter.x, target.x), ai, true);
    best_candidate(&candidates, |aim| simulate_shot(state, shooter, aim, config, ai).score)
        .map_or(f64::INFINITY, |(_, score)| score)
}

/// Candidate x positions for the active worm, in evaluation order.
fn move_candidates(worm: &Worm, config: &GameConfig, width: f64) -> Vec<f64> {
    let (min, max) = worm.team.home_bounds(width, config.worm_radius);
    let lo = min + MOVE_EDGE_MARGIN;
    let hi = max - MOVE_EDGE_MARGIN;
    let step = (hi - lo) / MOVE_SAMPLES as f64;

    let mut out = vec![worm.x];
    out.extend((0..=MOVE_SAMPLES).map(|i| lo + step * i as f64));
    out.extend(MOVE_OFFSETS.iter().map(|d| clamp(worm.x + d, lo, hi)));
    out
}

/// Where the active worm should stand before shooting. Each reachable spot
/// is scored by its best coarse shot plus a penalty for standing low.
pub fn plan_move(state: &GameState, config: &GameConfig, ai: &AiConfig) -> Option<f64> {
    let worm = *state.active_worm().filter(|w| w.alive)?;
    if targets_of(state, worm.team).is_empty() {
        return Some(worm.x);
    }

    let mut best_x = worm.x;
    let mut best_score = f64::INFINITY;
    for cx in move_candidates(&worm, config, state.width()) {
        if would_collide(&state.worms, state.current_index, cx, config.min_worm_distance) {
            continue;
        }
        let cy = state.terrain.height_at(cx) - config.worm_radius;
        let standing = Worm { x: cx, y: cy, ..worm };
        let total = coarse_score(state, &standing, config, ai) + cy / state.height() * HEIGHT_PENALTY;
        if total < best_score {
            best_score = total;
            best_x = cx;
        }
    }
    Some(best_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::create_initial_state;
    use crate::terrain::Terrain;

    fn flat_duel() -> (GameState, GameConfig) {
        let config = GameConfig {
            wind_enabled: false,
            ..GameConfig::default()
        };
        let mut state = create_initial_state(7, &config);
        state.terrain = Terrain::flat(config.width, config.height, 600.0);
        state.wind = 0;
        let ys = 600.0 - config.worm_radius;
        for (w, x) in state.worms.iter_mut().zip([300.0, 380.0, 900.0, 1000.0]) {
            w.x = x;
            w.y = ys;
            w.on_ground = true;
        }
        (state, config)
    }

    #[test]
    fn grid_includes_both_ends() {
        let v: Vec<f64> = grid(15.0, 80.0, 5.0).collect();
        assert_eq!(v.len(), 14);
        assert_eq!(v[0], 15.0);
        assert_eq!(*v.last().unwrap(), 80.0);
        let p: Vec<f64> = grid(0.35, 1.0, 0.07).collect();
        assert_eq!(p.len(), 10);
        assert!(*p.last().unwrap() <= 1.0);
    }

    #[test]
    fn simulate_is_pure() {
        let (state, config) = flat_duel();
        let before = state.clone();
        let ai = AiConfig::default();
        let aim = Aim {
            weapon_index: 0,
            angle: 45.0,
            power: 0.6,
        };
        let a = simulate_shot(&state, &state.worms[0], &aim, &config, &ai);
        let b = simulate_shot(&state, &state.worms[0], &aim, &config, &ai);
        assert_eq!(a, b);
        assert_eq!(state, before);
    }

    #[test]
    fn shot_away_from_targets_scores_worse() {
        let (state, config) = flat_duel();
        let ai = AiConfig::default();
        let toward = simulate_shot(
            &state,
            &state.worms[0],
            &Aim { weapon_index: 0, angle: 45.0, power: 0.5 },
            &config,
            &ai,
        );
        let away = simulate_shot(
            &state,
            &state.worms[0],
            &Aim { weapon_index: 0, angle: 135.0, power: 0.5 },
            &config,
            &ai,
        );
        assert!(toward.score < away.score);
        assert!(away.impact.is_some() || away.min_distance > 100.0);
    }

    #[test]
    fn planned_shot_lands_near_an_enemy() {
        let (state, config) = flat_duel();
        let ai = AiConfig::default();
        let aim = plan_shot(&state, &config, &ai).unwrap();
        assert!((15.0..=80.0).contains(&aim.angle));
        let outcome = simulate_shot(&state, &state.worms[0], &aim, &config, &ai);
        assert!(outcome.estimated_damage > 0.0, "{outcome:?}");
    }

    #[test]
    fn planning_is_deterministic() {
        let (state, config) = flat_duel();
        let ai = AiConfig::default();
        assert_eq!(plan_shot(&state, &config, &ai), plan_shot(&state, &config, &ai));
        assert_eq!(plan_move(&state, &config, &ai), plan_move(&state, &config, &ai));
    }

    #[test]
    fn blue_aims_left() {
        let (mut state, config) = flat_duel();
        state.current_index = 2;
        let aim = plan_shot(&state, &config, &AiConfig::default()).unwrap();
        assert!((100.0..=165.0).contains(&aim.angle));
    }

    #[test]
    fn no_targets_falls_back() {
        let (mut state, config) = flat_duel();
        state.worms[2].alive = false;
        state.worms[3].alive = false;
        let aim = plan_shot(&state, &config, &AiConfig::default()).unwrap();
        assert_eq!(aim, Aim { weapon_index: 0, angle: 60.0, power: 0.6 });
        assert_eq!(plan_move(&state, &config, &AiConfig::default()), Some(300.0));
    }

    #[test]
    fn move_stays_in_home_half_and_clear_of_teammate() {
        let (state, config) = flat_duel();
        let x = plan_move(&state, &config, &AiConfig::default()).unwrap();
        let (min, max) = Team::Red.home_bounds(config.width, config.worm_radius);
        assert!(x >= min && x <= max);
        assert!(x == 300.0 || (x - 380.0).abs() >= config.min_worm_distance);
    }

    #[test]
    fn dead_active_worm_has_no_plan() {
        let (mut state, config) = flat_duel();
        state.worms[0].alive = false;
        assert!(plan_shot(&state, &config, &AiConfig::default()).is_none());
        assert!(plan_move(&state, &config, &AiConfig::default()).is_none());
    }
}
