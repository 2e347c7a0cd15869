use crate::config::GameConfig;
use crate::constants::*;
use crate::prng::draw;
use crate::terrain::{build_terrain, Terrain};
use crate::types::*;

/// Spawn columns per team, as fractions of the field width.
pub const RED_SPAWNS: [f64; 2] = [0.2, 0.3];
pub const BLUE_SPAWNS: [f64; 2] = [0.7, 0.82];

/// Mixed into the seed so the world stream does not replay terrain draws.
const WORLD_STREAM_SALT: u32 = 0x5bd1_e995;

/// Place both teams at the default spawn fractions, Red first.
pub fn spawn_worms(terrain: &Terrain, config: &GameConfig) -> Vec<Worm> {
    let red: Vec<f64> = RED_SPAWNS.iter().map(|f| terrain.width * f).collect();
    let blue: Vec<f64> = BLUE_SPAWNS.iter().map(|f| terrain.width * f).collect();
    place_worms(terrain, config, &red, &blue)
}

/// One worm per column, standing on the ground seen from the sky.
pub fn place_worms(terrain: &Terrain, config: &GameConfig, red: &[f64], blue: &[f64]) -> Vec<Worm> {
    let mut worms = Vec::with_capacity(red.len() + blue.len());
    for (team, columns) in [(Team::Red, red), (Team::Blue, blue)] {
        for (slot, &x) in columns.iter().enumerate() {
            worms.push(Worm {
                team,
                slot: slot as u8,
                x,
                y: terrain.ground_at(x, 0.0) - config.worm_radius,
                vx: 0.0,
                vy: 0.0,
                angle: team.default_angle(),
                health: MAX_HEALTH,
                alive: true,
                on_ground: true,
            });
        }
    }
    worms
}

/// Random wind in `[-MAX_WIND, MAX_WIND]`.
pub fn roll_wind(rng_state: &mut u32) -> i32 {
    let span = (MAX_WIND * 2 + 1) as f64;
    (draw(rng_state) * span).floor() as i32 - MAX_WIND
}

/// Fresh world for a seed: terrain, worms, wind, Red to move.
pub fn create_initial_state(seed: Seed, config: &GameConfig) -> GameState {
    let (generated, worms) = match &config.level {
        Some(level) => {
            let generated = level.build_terrain(config.width, config.height);
            let worms = place_worms(
                &generated.terrain,
                config,
                &level.spawn_columns(Team::Red, config.width),
                &level.spawn_columns(Team::Blue, config.width),
            );
            (generated, worms)
        }
        None => {
            let generated = build_terrain(config.width, config.height, seed);
            let worms = spawn_worms(&generated.terrain, config);
            (generated, worms)
        }
    };
    let mut rng_state = seed ^ WORLD_STREAM_SALT;
    let wind = if config.wind_enabled {
        roll_wind(&mut rng_state)
    } else {
        0
    };

    GameState {
        tick: 0,
        seed,
        map_name: generated.map_name,
        terrain: generated.terrain,
        worms,
        current_index: 0,
        weapon_index: 0,
        projectiles: Vec::new(),
        charging: false,
        charge: 0.0,
        charge_dir: 1.0,
        game_over: false,
        winner: None,
        wind,
        turn_timer: config.turn_time,
        turn_timer_max: config.turn_time,
        rng_state,
    }
}
