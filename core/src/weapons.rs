use crate::config::GameConfig;
use crate::constants::DEFAULT_PROJECTILE_RADIUS;
use crate::prng::draw;
use crate::types::*;

/// Static weapon catalog, in selection order (`Digit1`..`Digit5`).
pub const WEAPONS: [Weapon; 5] = [
    Weapon {
        id: WeaponId::Bazooka,
        name: "Bazooka",
        min_speed: 400.0,
        max_speed: 1200.0,
        explosion_radius: 55.0,
        max_damage: 60,
        bounciness: 0.0,
        fuse: 0.0,
        gravity_scale: 0.9,
        projectile_radius: DEFAULT_PROJECTILE_RADIUS,
        burst: 1,
        burst_spread: 0.0,
        burst_speed_jitter: 0.0,
    },
    Weapon {
        id: WeaponId::Grenade,
        name: "Grenade",
        min_speed: 400.0,
        max_speed: 1200.0,
        explosion_radius: 70.0,
        max_damage: 75,
        bounciness: 0.2,
        fuse: 6.6,
        gravity_scale: 1.2,
        projectile_radius: DEFAULT_PROJECTILE_RADIUS,
        burst: 1,
        burst_spread: 0.0,
        burst_speed_jitter: 0.0,
    },
    Weapon {
        id: WeaponId::Mortar,
        name: "Mortar",
        min_speed: 400.0,
        max_speed: 1200.0,
        explosion_radius: 85.0,
        max_damage: 90,
        bounciness: 0.0,
        fuse: 0.0,
        gravity_scale: 0.9,
        projectile_radius: DEFAULT_PROJECTILE_RADIUS,
        burst: 1,
        burst_spread: 0.0,
        burst_speed_jitter: 0.0,
    },
    Weapon {
        id: WeaponId::Sniper,
        name: "Sniper",
        min_speed: 400.0,
        max_speed: 1200.0,
        explosion_radius: 26.0,
        max_damage: 85,
        bounciness: 0.0,
        fuse: 0.0,
        gravity_scale: 0.9,
        projectile_radius: 3.0,
        burst: 1,
        burst_spread: 0.0,
        burst_speed_jitter: 0.0,
    },
    Weapon {
        id: WeaponId::Pistol,
        name: "Pistol x3",
        min_speed: 400.0,
        max_speed: 1200.0,
        explosion_radius: 18.0,
        max_damage: 22,
        bounciness: 0.0,
        fuse: 0.0,
        gravity_scale: 0.9,
        projectile_radius: 3.0,
        burst: 3,
        burst_spread: 6.0,
        burst_speed_jitter: 0.04,
    },
];

/// Weapon at a catalog index, falling back to the first entry.
pub fn weapon_at(index: usize) -> &'static Weapon {
    WEAPONS.get(index).unwrap_or(&WEAPONS[0])
}

pub fn weapon_by_id(id: WeaponId) -> &'static Weapon {
    WEAPONS.iter().find(|w| w.id == id).unwrap_or(&WEAPONS[0])
}

impl Weapon {
    /// Launch speed for a power in `[0, 1]`, linear between min and max.
    pub fn launch_speed(&self, power: f64) -> f64 {
        self.min_speed + (self.max_speed - self.min_speed) * power
    }
}

/// Catalog index after a `KeyQ` (-1) or `KeyE` (+1) press.
pub fn cycle_weapon(index: usize, delta: i32) -> usize {
    let len = WEAPONS.len() as i32;
    ((index as i32 + delta).rem_euclid(len)) as usize
}

/// Spawn every projectile of one trigger pull.
///
/// Burst projectiles fan out symmetrically around the aim angle, each with
/// its own launch speed jitter drawn from `rng_state`.
pub fn fire_burst(
    worm: &Worm,
    power: f64,
    weapon: &Weapon,
    config: &GameConfig,
    rng_state: &mut u32,
) -> Vec<Projectile> {
    let burst = weapon.burst.max(1);
    let base_speed = weapon.launch_speed(power);
    let muzzle = config.muzzle_offset();
    let mut out = Vec::with_capacity(burst as usize);

    for i in 0..burst {
        let offset = if burst == 1 {
            0.0
        } else {
            (i as f64 - (burst - 1) as f64 / 2.0) * weapon.burst_spread
        };
        let rad = (worm.angle + offset).to_radians();
        let speed = if weapon.burst_speed_jitter > 0.0 {
            let r = draw(rng_state);
            base_speed * (1.0 + (r * 2.0 - 1.0) * weapon.burst_speed_jitter)
        } else {
            base_speed
        };

        out.push(Projectile {
            x: worm.x + rad.cos() * muzzle,
            y: worm.y - rad.sin() * muzzle,
            vx: rad.cos() * speed,
            vy: -rad.sin() * speed,
            radius: weapon.projectile_radius,
            weapon: weapon.id,
            explosion_radius: weapon.explosion_radius,
            max_damage: weapon.max_damage,
            bounciness: weapon.bounciness,
            fuse: weapon.fuse,
            timer: weapon.fuse,
            gravity: config.gravity * weapon.gravity_scale,
            bounces: 0,
        });
    }
    out
}
