use std::fmt;

use serde::{Deserialize, Serialize};

use crate::terrain::Terrain;

// ── Primitives ──────────────────────────────────────────────

pub type Tick = u32;
pub type Seed = u32;

// ── Teams ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    pub fn name(self) -> &'static str {
        match self {
            Team::Red => "Red",
            Team::Blue => "Blue",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Red" => Some(Team::Red),
            "Blue" => Some(Team::Blue),
            _ => None,
        }
    }

    /// Prefix of worm ids on this team (`R1`, `B2`).
    pub fn id_prefix(self) -> char {
        match self {
            Team::Red => 'R',
            Team::Blue => 'B',
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Team::Red => "#ef476f",
            Team::Blue => "#118ab2",
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Aim angle a worm gets at the start of its turn, in degrees.
    pub fn default_angle(self) -> f64 {
        match self {
            Team::Red => crate::constants::RED_DEFAULT_ANGLE,
            Team::Blue => crate::constants::BLUE_DEFAULT_ANGLE,
        }
    }

    /// Inclusive aim range in degrees. Blue's range is Red's mirrored, so
    /// neither team can aim fully behind itself.
    pub fn aim_bounds(self) -> (f64, f64) {
        match self {
            Team::Red => (-15.0, 165.0),
            Team::Blue => (15.0, 195.0),
        }
    }

    /// Horizontal band the team's home half covers.
    pub fn home_bounds(self, width: f64, worm_radius: f64) -> (f64, f64) {
        let half = width * 0.5;
        match self {
            Team::Red => (worm_radius, half),
            Team::Blue => (half, width - worm_radius),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a finished game. `Nobody` covers simultaneous wipe-outs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Winner {
    Team(Team),
    Nobody,
}

impl From<Winner> for String {
    fn from(w: Winner) -> String {
        w.to_string()
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Team(t) => f.write_str(t.name()),
            Winner::Nobody => f.write_str("Nobody"),
        }
    }
}

impl TryFrom<String> for Winner {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "Nobody" {
            return Ok(Winner::Nobody);
        }
        Team::from_name(&s)
            .map(Winner::Team)
            .ok_or_else(|| format!("unknown winner: {s}"))
    }
}

// ── Input ───────────────────────────────────────────────────

/// Abstract key codes accepted by the simulation. Names match DOM `code`s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    KeyQ,
    KeyE,
}

impl Key {
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Space" => Key::Space,
            "Digit1" => Key::Digit1,
            "Digit2" => Key::Digit2,
            "Digit3" => Key::Digit3,
            "Digit4" => Key::Digit4,
            "Digit5" => Key::Digit5,
            "KeyQ" => Key::KeyQ,
            "KeyE" => Key::KeyE,
            _ => return None,
        })
    }

    pub fn code(self) -> &'static str {
        match self {
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::Space => "Space",
            Key::Digit1 => "Digit1",
            Key::Digit2 => "Digit2",
            Key::Digit3 => "Digit3",
            Key::Digit4 => "Digit4",
            Key::Digit5 => "Digit5",
            Key::KeyQ => "KeyQ",
            Key::KeyE => "KeyE",
        }
    }

    /// Bit in [`HeldKeys`] for keys that act while held.
    pub fn held_bit(self) -> Option<u8> {
        match self {
            Key::ArrowLeft => Some(held::LEFT),
            Key::ArrowRight => Some(held::RIGHT),
            Key::ArrowUp => Some(held::UP),
            Key::ArrowDown => Some(held::DOWN),
            Key::Space => Some(held::FIRE),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputAction {
    KeyDown,
    KeyUp,
}

/// Held-key bitmask constants.
pub mod held {
    pub const LEFT: u8 = 1;
    pub const RIGHT: u8 = 2;
    pub const UP: u8 = 4;
    pub const DOWN: u8 = 8;
    pub const FIRE: u8 = 16;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys(pub u8);

impl HeldKeys {
    pub fn press(&mut self, key: Key) {
        if let Some(bit) = key.held_bit() {
            self.0 |= bit;
        }
    }

    pub fn release(&mut self, key: Key) {
        if let Some(bit) = key.held_bit() {
            self.0 &= !bit;
        }
    }

    pub fn has(self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

// ── Weapons ────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponId {
    Bazooka,
    Grenade,
    Mortar,
    Sniper,
    Pistol,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weapon {
    pub id: WeaponId,
    pub name: &'static str,
    pub min_speed: f64,
    pub max_speed: f64,
    pub explosion_radius: f64,
    pub max_damage: i32,
    pub bounciness: f64,
    /// Seconds until airburst; 0 detonates on impact.
    pub fuse: f64,
    pub gravity_scale: f64,
    pub projectile_radius: f64,
    pub burst: u32,
    /// Degrees between adjacent burst projectiles.
    pub burst_spread: f64,
    /// Fractional launch speed variation per burst projectile.
    pub burst_speed_jitter: f64,
}

// ── Worm ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Worm {
    pub team: Team,
    /// Zero-based position within the team.
    pub slot: u8,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Degrees, counter-clockwise from +x.
    pub angle: f64,
    pub health: i32,
    pub alive: bool,
    pub on_ground: bool,
}

impl Worm {
    pub fn id(&self) -> String {
        format!("{}{}", self.team.id_prefix(), self.slot + 1)
    }

    pub fn name(&self) -> String {
        format!("{} {}", self.team.name(), self.slot + 1)
    }
}

// ── Projectile ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub weapon: WeaponId,
    pub explosion_radius: f64,
    pub max_damage: i32,
    pub bounciness: f64,
    pub fuse: f64,
    /// Countdown from `fuse`; unused when `fuse == 0`.
    pub timer: f64,
    /// Effective gravity (base × weapon scale).
    pub gravity: f64,
    pub bounces: u32,
}

// ── Game State ──────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub tick: Tick,
    pub seed: Seed,
    pub map_name: String,
    pub terrain: Terrain,
    pub worms: Vec<Worm>,
    /// Index into `worms` of the worm whose turn it is.
    pub current_index: usize,
    pub weapon_index: usize,
    pub projectiles: Vec<Projectile>,
    pub charging: bool,
    pub charge: f64,
    /// +1 while the meter rises, -1 while it falls.
    pub charge_dir: f64,
    pub game_over: bool,
    pub winner: Option<Winner>,
    /// Signed wind strength in `[-MAX_WIND, MAX_WIND]`.
    pub wind: i32,
    pub turn_timer: f64,
    pub turn_timer_max: f64,
    /// World RNG stream (wind, burst jitter).
    pub rng_state: u32,
}

impl GameState {
    pub fn width(&self) -> f64 {
        self.terrain.width
    }

    pub fn height(&self) -> f64 {
        self.terrain.height
    }

    pub fn active_worm(&self) -> Option<&Worm> {
        self.worms.get(self.current_index)
    }

    pub fn active_team(&self) -> Option<Team> {
        self.active_worm().map(|w| w.team)
    }

    /// Distinct teams that still have a living worm, in `Team::ALL` order.
    pub fn living_teams(&self) -> Vec<Team> {
        Team::ALL
            .into_iter()
            .filter(|t| self.worms.iter().any(|w| w.alive && w.team == *t))
            .collect()
    }
}

// ── Events ──────────────────────────────────────────────────

/// Things that happened during a step that transports may relay.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Fired { weapon: WeaponId, power: f64 },
    Crater { x: f64, y: f64, radius: f64 },
    WormKilled { index: usize },
    TurnChanged { index: usize },
    GameOver { winner: Winner },
}
