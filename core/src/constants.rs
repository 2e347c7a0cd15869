// Units are pixels and seconds unless noted.

// Play field
pub const GAME_WIDTH: f64 = 1280.0;
pub const GAME_HEIGHT: f64 = 720.0;

// Physics
pub const GRAVITY: f64 = 900.0;
pub const MOVE_SPEED: f64 = 90.0;
pub const ANGLE_SPEED: f64 = 90.0;
pub const WORM_RADIUS: f64 = 12.0;
pub const MIN_WORM_DISTANCE: f64 = 30.0;
pub const KNOCKBACK_IMPULSE: f64 = 260.0;
pub const VERTICAL_BOOST: f64 = 200.0;

/// Largest dt a single step integrates; longer frames are truncated.
pub const MAX_DT: f64 = 0.033;

// Residual velocity decay per tick
pub const AIR_DRAG: f64 = 0.99;
pub const GROUND_FRICTION: f64 = 0.8;
/// Below this horizontal speed a grounded worm stops sliding.
pub const REST_SPEED: f64 = 1.0;

// Power meter
pub const CHARGE_RATE: f64 = 0.9;
/// Power used when the turn timer fires a worm that was not charging.
pub const TIMEOUT_POWER: f64 = 0.5;

// Projectiles
pub const WIND_SCALE: f64 = 20.0;
pub const MAX_WIND: i32 = 5;
pub const MAX_BOUNCES: u32 = 3;
pub const MIN_BOUNCE_FUSE: f64 = 0.05;
pub const BOUNCE_FRICTION: f64 = 0.8;
pub const BOUNCE_LIFT: f64 = 2.0;
pub const OUT_OF_BOUNDS_MARGIN: f64 = 200.0;
pub const MUZZLE_GAP: f64 = 6.0;
pub const DEFAULT_PROJECTILE_RADIUS: f64 = 4.0;

// Characters
pub const MAX_HEALTH: i32 = 100;
pub const RED_DEFAULT_ANGLE: f64 = 45.0;
pub const BLUE_DEFAULT_ANGLE: f64 = 135.0;

// Turns
pub const TURN_TIME: f64 = 30.0;

// Network
pub const TICK_RATE: u32 = 30;
pub const DEFAULT_PORT: u16 = 8080;
