use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::level::LevelData;

/// Tunable world parameters. Missing JSON fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub width: f64,
    pub height: f64,
    pub gravity: f64,
    pub move_speed: f64,
    /// Degrees per second.
    pub angle_speed: f64,
    pub worm_radius: f64,
    /// Power meter units per second.
    pub charge_rate: f64,
    pub min_worm_distance: f64,
    pub knockback_impulse: f64,
    pub vertical_boost: f64,
    pub wind_scale: f64,
    pub wind_enabled: bool,
    /// Seconds per turn.
    pub turn_time: f64,
    pub max_bounces: u32,
    /// Hand-authored map used instead of the seeded generator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LevelData>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: GAME_WIDTH,
            height: GAME_HEIGHT,
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            angle_speed: ANGLE_SPEED,
            worm_radius: WORM_RADIUS,
            charge_rate: CHARGE_RATE,
            min_worm_distance: MIN_WORM_DISTANCE,
            knockback_impulse: KNOCKBACK_IMPULSE,
            vertical_boost: VERTICAL_BOOST,
            wind_scale: WIND_SCALE,
            wind_enabled: true,
            turn_time: TURN_TIME,
            max_bounces: MAX_BOUNCES,
            level: None,
        }
    }
}

impl GameConfig {
    /// Wind acceleration in px/s² for a given wind strength.
    pub fn wind_accel(&self, wind: i32) -> f64 {
        if self.wind_enabled {
            wind as f64 * self.wind_scale
        } else {
            0.0
        }
    }

    /// Distance from a worm's center to where its projectiles spawn.
    pub fn muzzle_offset(&self) -> f64 {
        self.worm_radius + MUZZLE_GAP
    }
}

/// Parameters of the computer opponent's search and pacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiConfig {
    pub think_delay_min: f64,
    pub think_delay_max: f64,
    /// Degrees between aim candidates.
    pub angle_step: f64,
    pub power_min: f64,
    pub power_step: f64,
    pub power_max: f64,
    /// Integration step of the sandbox trajectory, in seconds.
    pub sim_step: f64,
    pub sim_max_time: f64,
    /// Give up walking toward the planned spot after this many seconds.
    pub move_time_max: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            think_delay_min: 0.5,
            think_delay_max: 1.2,
            angle_step: 5.0,
            power_min: 0.35,
            power_step: 0.07,
            power_max: 1.0,
            sim_step: 0.02,
            sim_max_time: 3.8,
            move_time_max: 2.5,
        }
    }
}
