use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::{GAME_HEIGHT, GAME_WIDTH, MAX_WIND};
use crate::error::ProtocolError;
use crate::physics::clamp;
use crate::protocol::{PlayerInfo, Seat, ServerMessage};
use crate::snapshot::{ProjectileSnapshot, WormSnapshot};
use crate::terrain::{Hole, Terrain};
use crate::types::*;

// ── Lenient wire forms ──────────────────────────────────────
//
// Snapshots cross a trust boundary, so the client reads every field as
// optional and reduces it onto the last known value.

/// A field of the wrong type reads as absent instead of failing the frame.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Like [`lenient`], but a bad element becomes a default entry so indices
/// still line up.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .map(|item| T::deserialize(item).unwrap_or_default())
                .collect(),
        )),
        _ => Ok(None),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomingWorm {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub team: Option<Team>,
    #[serde(deserialize_with = "lenient")]
    pub color: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub x: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub y: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub vx: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub vy: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub angle: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub health: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub alive: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub on_ground: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomingProjectile {
    #[serde(deserialize_with = "lenient")]
    pub x: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub y: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub vx: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub vy: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub radius: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub weapon_id: Option<WeaponId>,
    #[serde(deserialize_with = "lenient")]
    pub explosion_radius: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub timer: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub bounces: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomingSnapshot {
    #[serde(deserialize_with = "lenient")]
    pub width: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub height: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub seed: Option<Seed>,
    #[serde(deserialize_with = "lenient")]
    pub map_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub tick: Option<Tick>,
    #[serde(deserialize_with = "lenient_seq")]
    pub worms: Option<Vec<IncomingWorm>>,
    #[serde(deserialize_with = "lenient")]
    pub current_index: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub weapon_index: Option<f64>,
    #[serde(deserialize_with = "lenient_seq")]
    pub projectiles: Option<Vec<IncomingProjectile>>,
    #[serde(deserialize_with = "lenient")]
    pub charging: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub charge: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub game_over: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub winner: Option<Winner>,
    #[serde(deserialize_with = "lenient")]
    pub wind: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub turn_timer: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub turn_timer_max: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub terrain: Option<Vec<f64>>,
    #[serde(deserialize_with = "lenient")]
    pub holes: Option<Vec<Hole>>,
}

fn finite_or(v: Option<f64>, fallback: f64) -> f64 {
    match v {
        Some(v) if v.is_finite() => v,
        _ => fallback,
    }
}

/// Worms arrive Red first, so an unlabeled worm in the first half is Red.
fn reduce_worm(incoming: &IncomingWorm, prev: Option<&WormSnapshot>, index: usize, count: usize) -> WormSnapshot {
    let team = incoming
        .team
        .or(prev.map(|p| p.team))
        .unwrap_or(if index * 2 < count { Team::Red } else { Team::Blue });
    let base = prev.cloned().unwrap_or_else(|| WormSnapshot {
        id: format!("{}{}", team.id_prefix(), index % 2 + 1),
        name: format!("{} {}", team.name(), index % 2 + 1),
        team,
        color: team.color().to_string(),
        x: 0.0,
        y: 0.0,
        vx: 0.0,
        vy: 0.0,
        angle: team.default_angle(),
        health: 100,
        alive: true,
        on_ground: true,
    });
    WormSnapshot {
        id: incoming.id.clone().unwrap_or(base.id),
        name: incoming.name.clone().unwrap_or(base.name),
        team,
        color: incoming.color.clone().unwrap_or(base.color),
        x: finite_or(incoming.x, base.x),
        y: finite_or(incoming.y, base.y),
        vx: finite_or(incoming.vx, base.vx),
        vy: finite_or(incoming.vy, base.vy),
        angle: finite_or(incoming.angle, base.angle),
        health: clamp(finite_or(incoming.health, base.health as f64), 0.0, 100.0).round() as i32,
        alive: incoming.alive.unwrap_or(base.alive),
        on_ground: incoming.on_ground.unwrap_or(base.on_ground),
    }
}

fn reduce_projectile(p: &IncomingProjectile) -> Option<ProjectileSnapshot> {
    let x = p.x.filter(|v| v.is_finite())?;
    let y = p.y.filter(|v| v.is_finite())?;
    Some(ProjectileSnapshot {
        x,
        y,
        vx: finite_or(p.vx, 0.0),
        vy: finite_or(p.vy, 0.0),
        radius: finite_or(p.radius, crate::constants::DEFAULT_PROJECTILE_RADIUS),
        weapon_id: p.weapon_id.unwrap_or(WeaponId::Bazooka),
        explosion_radius: finite_or(p.explosion_radius, 0.0),
        max_damage: 0,
        bounciness: 0.0,
        fuse: 0.0,
        timer: finite_or(p.timer, 0.0),
        gravity: 0.0,
        bounces: p.bounces.unwrap_or(0),
        alive: true,
    })
}

// ── World view ──────────────────────────────────────────────

/// The client's last known copy of the world. Never simulated locally.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldView {
    pub seed: Seed,
    pub map_name: String,
    pub tick: Tick,
    pub terrain: Terrain,
    pub worms: Vec<WormSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub current_index: usize,
    pub weapon_index: usize,
    pub charging: bool,
    pub charge: f64,
    pub game_over: bool,
    pub winner: Option<Winner>,
    pub wind: i32,
    pub turn_timer: f64,
    pub turn_timer_max: f64,
}

impl Default for WorldView {
    fn default() -> Self {
        Self {
            seed: 0,
            map_name: String::new(),
            tick: 0,
            terrain: Terrain {
                heights: Vec::new(),
                width: GAME_WIDTH,
                height: GAME_HEIGHT,
                holes: Vec::new(),
            },
            worms: Vec::new(),
            projectiles: Vec::new(),
            current_index: 0,
            weapon_index: 0,
            charging: false,
            charge: 0.0,
            game_over: false,
            winner: None,
            wind: 0,
            turn_timer: crate::constants::TURN_TIME,
            turn_timer_max: crate::constants::TURN_TIME,
        }
    }
}

impl WorldView {
    /// Reduce a snapshot onto this view. Missing fields keep their previous
    /// value except the per-turn ones, which fall back to neutral defaults.
    pub fn apply(&mut self, snap: &IncomingSnapshot) {
        let width = finite_or(snap.width, self.terrain.width).max(1.0);
        let height = finite_or(snap.height, self.terrain.height).max(1.0);
        self.terrain.width = width;
        self.terrain.height = height;
        if let Some(heights) = &snap.terrain {
            self.terrain.heights = heights
                .iter()
                .map(|y| if y.is_finite() { *y } else { height })
                .collect();
            self.terrain.holes = snap
                .holes
                .iter()
                .flatten()
                .filter(|h| h.x.is_finite() && h.y.is_finite() && h.r.is_finite())
                .copied()
                .collect();
        }

        if let Some(seed) = snap.seed {
            self.seed = seed;
        }
        if let Some(name) = &snap.map_name {
            self.map_name = name.clone();
        }
        if let Some(tick) = snap.tick {
            self.tick = tick;
        }

        if let Some(worms) = &snap.worms {
            self.worms = worms
                .iter()
                .enumerate()
                .map(|(i, w)| reduce_worm(w, self.worms.get(i), i, worms.len()))
                .collect();
        }
        self.projectiles = snap
            .projectiles
            .as_ref()
            .map(|ps| ps.iter().filter_map(reduce_projectile).collect())
            .unwrap_or_default();

        let max_index = self.worms.len().saturating_sub(1) as f64;
        self.current_index =
            clamp(finite_or(snap.current_index, self.current_index as f64), 0.0, max_index) as usize;
        let max_weapon = (crate::weapons::WEAPONS.len() - 1) as f64;
        self.weapon_index =
            clamp(finite_or(snap.weapon_index, self.weapon_index as f64), 0.0, max_weapon) as usize;

        self.charging = snap.charging.unwrap_or(false);
        self.charge = clamp(finite_or(snap.charge, 0.0), 0.0, 1.0);
        self.game_over = snap.game_over.unwrap_or(false);
        self.winner = snap.winner;
        self.wind = clamp(finite_or(snap.wind, 0.0).round(), -(MAX_WIND as f64), MAX_WIND as f64) as i32;
        self.turn_timer_max = finite_or(snap.turn_timer_max, self.turn_timer_max).max(0.0);
        self.turn_timer = clamp(finite_or(snap.turn_timer, self.turn_timer), 0.0, self.turn_timer_max);
    }

    pub fn active_team(&self) -> Option<Team> {
        self.worms.get(self.current_index).map(|w| w.team)
    }
}

// ── Interpolation ───────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WormPose {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub worms: Vec<WormPose>,
    pub projectiles: Vec<(f64, f64)>,
}

impl Frame {
    fn capture(view: &WorldView) -> Self {
        Self {
            worms: view
                .worms
                .iter()
                .map(|w| WormPose {
                    x: w.x,
                    y: w.y,
                    angle: w.angle,
                })
                .collect(),
            projectiles: view.projectiles.iter().map(|p| (p.x, p.y)).collect(),
        }
    }
}

/// Default gap between server snapshots before one has been measured.
pub const DEFAULT_INTERVAL_MS: f64 = 33.0;
/// Gaps at or below this are treated as bursts and not used as the interval.
const MIN_MEASURED_INTERVAL_MS: f64 = 5.0;

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Previous and current snapshot frames with their arrival times.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotBuffer {
    prev: Option<Frame>,
    curr: Option<Frame>,
    last_received_ms: f64,
    interval_ms: f64,
}

impl Default for SnapshotBuffer {
    fn default() -> Self {
        Self {
            prev: None,
            curr: None,
            last_received_ms: 0.0,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl SnapshotBuffer {
    pub fn clear(&mut self) {
        self.prev = None;
        self.curr = None;
    }

    pub fn push(&mut self, frame: Frame, now_ms: f64) {
        if let Some(curr) = self.curr.take() {
            let delta = now_ms - self.last_received_ms;
            if delta > MIN_MEASURED_INTERVAL_MS {
                self.interval_ms = delta;
            }
            self.prev = Some(curr);
        }
        self.curr = Some(frame);
        self.last_received_ms = now_ms;
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Blend factor between the previous and current frame.
    pub fn alpha(&self, now_ms: f64) -> f64 {
        let interval = if self.interval_ms > 0.0 {
            self.interval_ms
        } else {
            DEFAULT_INTERVAL_MS
        };
        clamp((now_ms - self.last_received_ms) / interval, 0.0, 1.0)
    }

    /// Interpolated positions, or `None` before the first snapshot.
    pub fn sample(&self, now_ms: f64) -> Option<Frame> {
        let curr = self.curr.as_ref()?;
        let prev = self.prev.as_ref().unwrap_or(curr);
        let t = self.alpha(now_ms);
        let worms = curr
            .worms
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let p = prev.worms.get(i).unwrap_or(w);
                WormPose {
                    x: lerp(p.x, w.x, t),
                    y: lerp(p.y, w.y, t),
                    angle: lerp(p.angle, w.angle, t),
                }
            })
            .collect();
        let projectiles = curr
            .projectiles
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let (px, py) = prev.projectiles.get(i).copied().unwrap_or((x, y));
                (lerp(px, x, t), lerp(py, y, t))
            })
            .collect();
        Some(Frame { worms, projectiles })
    }
}

// ── Client view ─────────────────────────────────────────────

/// Thin network client: reduces server messages into a [`WorldView`] and
/// keeps the interpolation buffer. Local input is never applied here; it is
/// sent to the server and shows up in a later snapshot.
#[derive(Clone, Debug, Default)]
pub struct ClientView {
    pub id: Option<String>,
    pub seat: Option<Seat>,
    pub players: Vec<PlayerInfo>,
    pub world: WorldView,
    pub buffer: SnapshotBuffer,
}

impl ClientView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and apply one server text frame.
    pub fn handle_text(&mut self, text: &str, now_ms: f64) -> Result<(), ProtocolError> {
        let msg: ServerMessage<IncomingSnapshot> = serde_json::from_str(text)?;
        self.apply(msg, now_ms);
        Ok(())
    }

    pub fn apply(&mut self, msg: ServerMessage<IncomingSnapshot>, now_ms: f64) {
        match msg {
            ServerMessage::Welcome { id, team, seed, state } => {
                self.id = Some(id);
                self.seat = Some(team);
                self.world.seed = seed;
                self.buffer.clear();
                self.apply_state(&state, now_ms);
            }
            ServerMessage::State { state } => self.apply_state(&state, now_ms),
            ServerMessage::Reset { state } => {
                self.buffer.clear();
                self.apply_state(&state, now_ms);
            }
            ServerMessage::Crater { x, y, radius } => {
                if x.is_finite() && y.is_finite() && radius.is_finite() {
                    self.world.terrain.carve_crater(x, y, radius);
                }
            }
            ServerMessage::Players { players } => self.players = players,
        }
    }

    fn apply_state(&mut self, snap: &IncomingSnapshot, now_ms: f64) {
        self.world.apply(snap);
        self.buffer.push(Frame::capture(&self.world), now_ms);
    }

    /// True when the server would accept this client's input right now.
    pub fn is_my_turn(&self) -> bool {
        match (self.seat.and_then(Seat::team), self.world.active_team()) {
            (Some(mine), Some(active)) => mine == active && !self.world.game_over,
            _ => false,
        }
    }

    pub fn interpolated(&self, now_ms: f64) -> Option<Frame> {
        self.buffer.sample(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::init::create_initial_state;
    use crate::snapshot::Snapshot;

    fn welcome_text(state: &GameState) -> String {
        let msg: ServerMessage = ServerMessage::Welcome {
            id: "p1".into(),
            team: Seat::Red,
            seed: state.seed,
            state: Snapshot::full(state),
        };
        msg.encode().unwrap()
    }

    #[test]
    fn welcome_installs_full_world() {
        let state = create_initial_state(5, &GameConfig::default());
        let mut c = ClientView::new();
        c.handle_text(&welcome_text(&state), 0.0).unwrap();
        assert_eq!(c.id.as_deref(), Some("p1"));
        assert_eq!(c.seat, Some(Seat::Red));
        assert_eq!(c.world.terrain.heights, state.terrain.heights);
        assert_eq!(c.world.worms.len(), 4);
        assert_eq!(c.world.wind, state.wind);
        assert!(c.is_my_turn());
    }

    #[test]
    fn welcome_carries_cave_holes() {
        let config = GameConfig {
            level: Some(crate::level::LevelData::tropical_island()),
            ..GameConfig::default()
        };
        let state = create_initial_state(5, &config);
        let mut c = ClientView::new();
        c.handle_text(&welcome_text(&state), 0.0).unwrap();
        assert_eq!(c.world.terrain.holes, state.terrain.holes);
        assert_eq!(c.world.worms.len(), 6);
        let tick: ServerMessage = ServerMessage::State {
            state: Snapshot::partial(&state),
        };
        c.handle_text(&tick.encode().unwrap(), 33.0).unwrap();
        assert_eq!(c.world.terrain.holes.len(), 6);
    }

    #[test]
    fn missing_fields_are_defaulted() {
        let mut c = ClientView::new();
        c.handle_text(r#"{"type":"state","state":{"worms":[{"x":10,"y":20}]}}"#, 0.0)
            .unwrap();
        assert_eq!(c.world.wind, 0);
        assert_eq!(c.world.charge, 0.0);
        assert!(!c.world.game_over);
        let w = &c.world.worms[0];
        assert_eq!((w.x, w.y), (10.0, 20.0));
        assert_eq!(w.team, Team::Red);
        assert_eq!(w.health, 100);
    }

    #[test]
    fn out_of_range_fields_are_clamped() {
        let mut c = ClientView::new();
        c.handle_text(
            r#"{"type":"state","state":{"worms":[{},{}],"currentIndex":9,"weaponIndex":-3,"charge":4,"wind":12.4}}"#,
            0.0,
        )
        .unwrap();
        assert_eq!(c.world.current_index, 1);
        assert_eq!(c.world.weapon_index, 0);
        assert_eq!(c.world.charge, 1.0);
        assert_eq!(c.world.wind, 5);
    }

    #[test]
    fn partial_state_keeps_terrain() {
        let state = create_initial_state(5, &GameConfig::default());
        let mut c = ClientView::new();
        c.handle_text(&welcome_text(&state), 0.0).unwrap();
        let tick: ServerMessage = ServerMessage::State {
            state: Snapshot::partial(&state),
        };
        c.handle_text(&tick.encode().unwrap(), 33.0).unwrap();
        assert_eq!(c.world.terrain.heights.len(), 1281);
    }

    #[test]
    fn crater_patches_local_terrain() {
        let state = create_initial_state(5, &GameConfig::default());
        let mut c = ClientView::new();
        c.handle_text(&welcome_text(&state), 0.0).unwrap();
        let before = c.world.terrain.height_at(640.0);
        c.handle_text(
            &format!(r#"{{"type":"crater","x":640,"y":{before},"radius":40}}"#),
            10.0,
        )
        .unwrap();
        assert_eq!(c.world.terrain.height_at(640.0), before + 40.0);
    }

    #[test]
    fn mistyped_field_does_not_drop_the_frame() {
        let mut c = ClientView::new();
        c.handle_text(r#"{"type":"state","state":{"tick":4}}"#, 0.0).unwrap();
        c.handle_text(r#"{"type":"state","state":{"tick":"6","wind":3.0}}"#, 33.0)
            .unwrap();
        assert_eq!(c.world.tick, 4);
        assert_eq!(c.world.wind, 3);
    }

    #[test]
    fn bad_worm_entry_keeps_indices() {
        let mut c = ClientView::new();
        c.handle_text(
            r#"{"type":"state","state":{"worms":["oops",{"x":"far","y":7,"team":"Green"},{"x":30}],"winner":42}}"#,
            0.0,
        )
        .unwrap();
        assert_eq!(c.world.worms.len(), 3);
        assert_eq!(c.world.worms[1].y, 7.0);
        assert_eq!(c.world.worms[1].x, 0.0);
        assert_eq!(c.world.worms[1].team, Team::Red);
        assert_eq!(c.world.worms[2].x, 30.0);
        assert_eq!(c.world.worms[2].team, Team::Blue);
        assert_eq!(c.world.winner, None);
    }

    #[test]
    fn reset_is_drawable_before_the_next_state() {
        let state = create_initial_state(5, &GameConfig::default());
        let mut c = ClientView::new();
        c.handle_text(&welcome_text(&state), 0.0).unwrap();
        let fresh = create_initial_state(6, &GameConfig::default());
        let reset: ServerMessage = ServerMessage::Reset {
            state: Snapshot::full(&fresh),
        };
        c.handle_text(&reset.encode().unwrap(), 50.0).unwrap();
        let frame = c.interpolated(50.0).unwrap();
        assert_eq!(frame.worms.len(), 4);
        assert!((frame.worms[0].x - fresh.worms[0].x).abs() < 1e-9);
    }

    #[test]
    fn garbage_is_an_error_not_a_panic() {
        let mut c = ClientView::new();
        assert!(c.handle_text("{]", 0.0).is_err());
        assert!(c.handle_text(r#"{"type":"warp"}"#, 0.0).is_err());
    }

    #[test]
    fn players_roster_is_stored() {
        let mut c = ClientView::new();
        c.handle_text(r#"{"type":"players","players":[{"id":"p1","team":"Red"},{"id":"p2","team":"Spectator"}]}"#, 0.0)
            .unwrap();
        assert_eq!(c.players.len(), 2);
        assert_eq!(c.players[1].team, Seat::Spectator);
    }

    #[test]
    fn interpolation_blends_between_snapshots() {
        let mut buf = SnapshotBuffer::default();
        let frame = |x: f64| Frame {
            worms: vec![WormPose { x, y: 0.0, angle: 0.0 }],
            projectiles: vec![(x, x)],
        };
        buf.push(frame(0.0), 1000.0);
        buf.push(frame(10.0), 1040.0);
        assert_eq!(buf.interval_ms(), 40.0);
        let mid = buf.sample(1060.0).unwrap();
        assert!((mid.worms[0].x - 5.0).abs() < 1e-9);
        assert!((mid.projectiles[0].0 - 5.0).abs() < 1e-9);
        let late = buf.sample(5000.0).unwrap();
        assert_eq!(late.worms[0].x, 10.0);
        let early = buf.sample(900.0).unwrap();
        assert_eq!(early.worms[0].x, 0.0);
    }

    #[test]
    fn burst_arrivals_keep_previous_interval() {
        let mut buf = SnapshotBuffer::default();
        buf.push(Frame::default(), 0.0);
        buf.push(Frame::default(), 2.0);
        assert_eq!(buf.interval_ms(), DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn new_entities_do_not_interpolate_from_nowhere() {
        let mut buf = SnapshotBuffer::default();
        buf.push(Frame::default(), 0.0);
        buf.push(
            Frame {
                worms: vec![],
                projectiles: vec![(50.0, 60.0)],
            },
            33.0,
        );
        let f = buf.sample(40.0).unwrap();
        assert_eq!(f.projectiles[0], (50.0, 60.0));
    }

    #[test]
    fn empty_buffer_has_no_sample() {
        assert!(SnapshotBuffer::default().sample(0.0).is_none());
    }
}
