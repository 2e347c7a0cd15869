use serde::{Deserialize, Serialize};

use crate::terrain::Hole;
use crate::types::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WormSnapshot {
    pub id: String,
    pub name: String,
    pub team: Team,
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub angle: f64,
    pub health: i32,
    pub alive: bool,
    pub on_ground: bool,
}

impl From<&Worm> for WormSnapshot {
    fn from(w: &Worm) -> Self {
        Self {
            id: w.id(),
            name: w.name(),
            team: w.team,
            color: w.team.color().to_string(),
            x: w.x,
            y: w.y,
            vx: w.vx,
            vy: w.vy,
            angle: w.angle,
            health: w.health,
            alive: w.alive,
            on_ground: w.on_ground,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub weapon_id: WeaponId,
    pub explosion_radius: f64,
    pub max_damage: i32,
    pub bounciness: f64,
    pub fuse: f64,
    pub timer: f64,
    pub gravity: f64,
    pub bounces: u32,
    pub alive: bool,
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            x: p.x,
            y: p.y,
            vx: p.vx,
            vy: p.vy,
            radius: p.radius,
            weapon_id: p.weapon,
            explosion_radius: p.explosion_radius,
            max_damage: p.max_damage,
            bounciness: p.bounciness,
            fuse: p.fuse,
            timer: p.timer,
            gravity: p.gravity,
            bounces: p.bounces,
            alive: true,
        }
    }
}

/// Serialized world for the wire. `terrain` is present only in full
/// snapshots (welcome and reset); per-tick snapshots leave it out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub width: f64,
    pub height: f64,
    pub seed: Seed,
    pub map_name: String,
    pub tick: Tick,
    pub worms: Vec<WormSnapshot>,
    pub current_index: usize,
    pub weapon_index: usize,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub charging: bool,
    pub charge: f64,
    pub game_over: bool,
    pub winner: Option<Winner>,
    pub wind: i32,
    pub turn_timer: f64,
    pub turn_timer_max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<Vec<f64>>,
    /// Sent with the heightmap when the map has caves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holes: Option<Vec<Hole>>,
}

impl Snapshot {
    pub fn capture(state: &GameState, full: bool) -> Self {
        Self {
            width: state.width(),
            height: state.height(),
            seed: state.seed,
            map_name: state.map_name.clone(),
            tick: state.tick,
            worms: state.worms.iter().map(WormSnapshot::from).collect(),
            current_index: state.current_index,
            weapon_index: state.weapon_index,
            projectiles: state.projectiles.iter().map(ProjectileSnapshot::from).collect(),
            charging: state.charging,
            charge: state.charge,
            game_over: state.game_over,
            winner: state.winner,
            wind: state.wind,
            turn_timer: state.turn_timer,
            turn_timer_max: state.turn_timer_max,
            terrain: full.then(|| state.terrain.heights.clone()),
            holes: (full && !state.terrain.holes.is_empty()).then(|| state.terrain.holes.clone()),
        }
    }

    pub fn full(state: &GameState) -> Self {
        Self::capture(state, true)
    }

    pub fn partial(state: &GameState) -> Self {
        Self::capture(state, false)
    }
}
