use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::physics::clamp;
use crate::prng::Rng;
use crate::types::Seed;

/// Circular pocket of air below the surface (caves, overhangs).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Hole {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy < self.r * self.r
    }
}

/// 1-D heightmap: one surface y per integer column, y grows downward.
/// Everything below the surface is solid except inside `holes`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    pub heights: Vec<f64>,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<Hole>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedTerrain {
    pub terrain: Terrain,
    pub map_name: String,
}

/// Column band of the left spawn plateau, as fractions of width.
pub const LEFT_SPAWN_BAND: (f64, f64) = (0.18, 0.32);
/// Column band of the right spawn plateau, as fractions of width.
pub const RIGHT_SPAWN_BAND: (f64, f64) = (0.68, 0.84);

const MAP_NOUNS: [&str; 15] = [
    "Canyon", "Valley", "Desert", "Wasteland", "Abyss", "Badlands", "Field", "Hill", "Crag",
    "Ridge", "Gorge", "Crater", "Pass", "Plain", "Cliff",
];

const MAP_ADJECTIVES: [&str; 15] = [
    "Wild", "Arid", "Forgotten", "Chaotic", "Cursed", "Lost", "Fierce", "Dark", "Distant",
    "Frozen", "Deep", "Broken", "Dry", "Murky", "Savage",
];

impl Terrain {
    /// Flat terrain at a constant surface height.
    pub fn flat(width: f64, height: f64, surface: f64) -> Self {
        Self {
            heights: vec![surface; width.floor() as usize + 1],
            width,
            height,
            holes: Vec::new(),
        }
    }

    /// Surface y at `x`. Columns past the sample array read as `height`.
    pub fn height_at(&self, x: f64) -> f64 {
        let xi = clamp(x, 0.0, self.width - 1.0).floor() as usize;
        self.heights.get(xi).copied().unwrap_or(self.height)
    }

    /// True for points inside the field, at or below the surface and
    /// outside every hole.
    pub fn is_solid(&self, x: f64, y: f64) -> bool {
        if x < 0.0 || x >= self.width || y < 0.0 || y >= self.height {
            return false;
        }
        let surface = self.heights.get(x.floor() as usize).copied().unwrap_or(self.height);
        y >= surface && !self.holes.iter().any(|h| h.contains(x, y))
    }

    /// Ground y under a body at `(x, y)`. At or above the surface this is the
    /// surface. Below it, a body with air somewhere above it is inside a hole
    /// and lands on the first solid row beneath it.
    pub fn ground_at(&self, x: f64, y: f64) -> f64 {
        let surface = self.height_at(x);
        if y <= surface || self.holes.is_empty() {
            return surface;
        }

        let mut cy = y.floor().min(self.height - 1.0);
        let mut air_above = false;
        while cy >= surface {
            if !self.is_solid(x, cy) {
                air_above = true;
                break;
            }
            cy -= 1.0;
        }
        if !air_above {
            return surface;
        }

        let mut cy = y.floor();
        while cy < self.height {
            if self.is_solid(x, cy) {
                return cy;
            }
            cy += 1.0;
        }
        self.height
    }

    /// Column index range covered by `[x0, x1]`, clamped to the field.
    fn column_span(&self, x0: f64, x1: f64) -> std::ops::RangeInclusive<usize> {
        let start = clamp(x0, 0.0, self.width).floor() as usize;
        let end = clamp(x1, 0.0, self.width).floor() as usize;
        let last = self.heights.len().saturating_sub(1);
        start.min(last)..=end.min(last)
    }

    /// Set every column in `[x0, x1]` to `y`.
    pub fn flatten_range(&mut self, x0: f64, x1: f64, y: f64) {
        if self.heights.is_empty() {
            return;
        }
        for x in self.column_span(x0, x1) {
            self.heights[x] = y;
        }
    }

    /// Mean surface height over columns `x0..=x1`, or `0.6 * height` if empty.
    pub fn average_height(&self, x0: usize, x1: usize) -> f64 {
        let end = x1.min(self.heights.len().saturating_sub(1));
        if self.heights.is_empty() || x0 > end {
            return self.height * 0.6;
        }
        let band = &self.heights[x0..=end];
        band.iter().sum::<f64>() / band.len() as f64
    }

    /// 3-point moving average. Each pass reads from a snapshot of the
    /// previous one; the two edge columns are left alone.
    pub fn smooth(&mut self, passes: u32) {
        let len = self.heights.len();
        if len < 3 {
            return;
        }
        for _ in 0..passes {
            let copy = self.heights.clone();
            for x in 1..len - 1 {
                self.heights[x] = (copy[x - 1] + copy[x] + copy[x + 1]) / 3.0;
            }
        }
    }

    /// Push the surface down to the bottom arc of a circle. Never raises.
    pub fn carve_crater(&mut self, cx: f64, cy: f64, radius: f64) {
        if self.heights.is_empty() {
            return;
        }
        for x in self.column_span(cx - radius, cx + radius) {
            let dx = x as f64 - cx;
            let span = (radius * radius - dx * dx).max(0.0).sqrt();
            let crater_y = cy + span;
            if self.heights[x] < crater_y {
                self.heights[x] = crater_y;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Flat,
    Valley,
    Hill,
    SlopeRight,
    SlopeLeft,
}

impl Shape {
    fn from_index(i: usize) -> Self {
        match i {
            1 => Shape::Valley,
            2 => Shape::Hill,
            3 => Shape::SlopeRight,
            4 => Shape::SlopeLeft,
            _ => Shape::Flat,
        }
    }

    fn offset(self, nx: f64, amp: f64) -> f64 {
        let bowl = 1.0 - 4.0 * (nx - 0.5) * (nx - 0.5);
        match self {
            Shape::Flat => 0.0,
            Shape::Valley => bowl * amp,
            Shape::Hill => -bowl * amp,
            Shape::SlopeRight => (nx - 0.5) * amp,
            Shape::SlopeLeft => -(nx - 0.5) * amp,
        }
    }
}

struct Wave {
    freq: f64,
    amp: f64,
    phase: f64,
}

/// Generate a heightmap and map name from a seed.
///
/// Draw order from the single RNG stream:
///  1. Base height
///  2. Wave count, then freq/amp/phase per wave
///  3. Shape type and amplitude
///  4. Bump count, then center/width/height per bump
///  5. (clamp + 3 smoothing passes, no draws)
///  6. Platform count, then center/width/height per platform
///  7. (spawn plateaus, no draws)
///  8. Map name: noun, then adjective
pub fn build_terrain(width: f64, height: f64, seed: Seed) -> GeneratedTerrain {
    let w = width;
    let h = height;
    let mut rng = Rng::new(if seed == 0 { 1 } else { seed });
    let len = w.floor() as usize + 1;
    let mut heights = vec![0.0; len];

    let base = rng.range(h * 0.58, h * 0.75);

    let num_waves = rng.range(2.0, 6.0).floor() as usize;
    let waves: Vec<Wave> = (0..num_waves)
        .map(|_| Wave {
            freq: rng.range(0.004, 0.045),
            amp: rng.range(h * 0.015, h * 0.12),
            phase: rng.range(0.0, PI * 2.0),
        })
        .collect();

    let shape = Shape::from_index((rng.next_f64() * 5.0).floor() as usize);
    let shape_amp = rng.range(h * 0.06, h * 0.22);

    for (x, y) in heights.iter_mut().enumerate() {
        let xf = x as f64;
        let mut v = base + shape.offset(xf / w, shape_amp);
        for wave in &waves {
            v += (xf * wave.freq + wave.phase).sin() * wave.amp;
        }
        *y = v;
    }

    let num_bumps = rng.range(0.0, 5.0).floor() as usize;
    for _ in 0..num_bumps {
        let cx = rng.range(w * 0.05, w * 0.95);
        let bw = rng.range(30.0, 130.0);
        let bh = rng.range(-h * 0.14, h * 0.14);
        for (x, y) in heights.iter_mut().enumerate() {
            let dx = (x as f64 - cx) / bw;
            if dx.abs() < 3.0 {
                *y += (-dx * dx).exp() * bh;
            }
        }
    }

    for y in heights.iter_mut() {
        *y = clamp(*y, h * 0.4, h * 0.92);
    }

    let mut terrain = Terrain {
        heights,
        width: w,
        height: h,
        holes: Vec::new(),
    };
    terrain.smooth(3);

    let num_platforms = rng.range(0.0, 3.0).floor() as usize;
    for _ in 0..num_platforms {
        let px = rng.range(w * 0.35, w * 0.65);
        let pw = rng.range(w * 0.04, w * 0.1);
        let ph = rng.range(h * 0.45, h * 0.72);
        terrain.flatten_range(px - pw / 2.0, px + pw / 2.0, ph);
    }

    for (lo, hi) in [LEFT_SPAWN_BAND, RIGHT_SPAWN_BAND] {
        let avg = terrain.average_height((w * lo).floor() as usize, (w * hi).floor() as usize);
        terrain.flatten_range(w * lo, w * hi, clamp(avg, h * 0.43, h * 0.78));
    }

    let noun = MAP_NOUNS[rng.index(MAP_NOUNS.len())];
    let adjective = MAP_ADJECTIVES[rng.index(MAP_ADJECTIVES.len())];

    GeneratedTerrain {
        terrain,
        map_name: format!("{adjective} {noun}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_terrain() {
        let a = build_terrain(1000.0, 720.0, 12345);
        let b = build_terrain(1000.0, 720.0, 12345);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = build_terrain(1000.0, 720.0, 12345);
        let b = build_terrain(1000.0, 720.0, 54321);
        assert_ne!(a.terrain.heights, b.terrain.heights);
    }

    #[test]
    fn seed_zero_behaves_like_seed_one() {
        assert_eq!(build_terrain(800.0, 600.0, 0), build_terrain(800.0, 600.0, 1));
    }

    #[test]
    fn length_and_bounds() {
        let g = build_terrain(1280.0, 720.0, 777);
        assert_eq!(g.terrain.heights.len(), 1281);
        for &y in &g.terrain.heights {
            assert!(y >= 720.0 * 0.4 - 1e-9 && y <= 720.0 * 0.92 + 1e-9, "{y}");
        }
    }

    #[test]
    fn spawn_bands_are_level() {
        let w = 1280.0;
        let g = build_terrain(w, 720.0, 2024);
        for (lo, hi) in [LEFT_SPAWN_BAND, RIGHT_SPAWN_BAND] {
            let band = &g.terrain.heights[(w * lo).floor() as usize..=(w * hi).floor() as usize];
            assert!(band.iter().all(|&y| y == band[0]));
            assert!(band[0] >= 720.0 * 0.43 && band[0] <= 720.0 * 0.78);
        }
    }

    #[test]
    fn map_name_has_two_words() {
        let g = build_terrain(1280.0, 720.0, 5);
        let words: Vec<&str> = g.map_name.split(' ').collect();
        assert_eq!(words.len(), 2);
        assert!(MAP_ADJECTIVES.contains(&words[0]));
        assert!(MAP_NOUNS.contains(&words[1]));
    }

    #[test]
    fn height_at_clamps_and_defaults() {
        let t = Terrain::flat(100.0, 600.0, 400.0);
        assert_eq!(t.height_at(-50.0), 400.0);
        assert_eq!(t.height_at(1e6), 400.0);
        let empty = Terrain {
            heights: Vec::new(),
            width: 100.0,
            height: 600.0,
            holes: Vec::new(),
        };
        assert_eq!(empty.height_at(10.0), 600.0);
    }

    #[test]
    fn crater_only_lowers_surface() {
        let mut t = build_terrain(1280.0, 720.0, 99).terrain;
        let before = t.heights.clone();
        t.carve_crater(640.0, t.height_at(640.0), 55.0);
        for (a, b) in before.iter().zip(&t.heights) {
            assert!(b >= a);
        }
        assert!(t.height_at(640.0) > before[640]);
    }

    #[test]
    fn crater_depth_matches_circle() {
        let mut t = Terrain::flat(200.0, 600.0, 300.0);
        t.carve_crater(100.0, 300.0, 20.0);
        assert_eq!(t.heights[100], 320.0);
        assert!((t.heights[112] - (300.0 + (400.0f64 - 144.0).sqrt())).abs() < 1e-9);
        assert_eq!(t.heights[121], 300.0);
    }

    #[test]
    fn crater_above_surface_is_noop() {
        let mut t = Terrain::flat(200.0, 600.0, 300.0);
        t.carve_crater(100.0, 100.0, 30.0);
        assert!(t.heights.iter().all(|&y| y == 300.0));
    }

    #[test]
    fn flatten_clamps_to_field() {
        let mut t = Terrain::flat(50.0, 100.0, 10.0);
        t.flatten_range(-20.0, 5.5, 42.0);
        assert_eq!(&t.heights[0..=5], &[42.0; 6]);
        assert_eq!(t.heights[6], 10.0);
        t.flatten_range(45.0, 500.0, 7.0);
        assert_eq!(t.heights[50], 7.0);
    }

    #[test]
    fn smoothing_keeps_edges() {
        let mut t = Terrain {
            heights: vec![0.0, 3.0, 0.0, 3.0, 0.0],
            width: 4.0,
            height: 10.0,
            holes: Vec::new(),
        };
        t.smooth(1);
        assert_eq!(t.heights, vec![0.0, 1.0, 2.0, 1.0, 0.0]);
    }

    fn cave() -> Terrain {
        let mut t = Terrain::flat(200.0, 300.0, 100.0);
        t.holes.push(Hole {
            x: 100.0,
            y: 150.0,
            r: 20.0,
        });
        t
    }

    #[test]
    fn holes_are_not_solid() {
        let t = cave();
        assert!(t.is_solid(100.0, 120.0));
        assert!(!t.is_solid(100.0, 150.0));
        assert!(!t.is_solid(100.0, 99.0));
        assert!(t.is_solid(10.0, 150.0));
        assert!(!t.is_solid(-1.0, 150.0));
        assert!(!t.is_solid(100.0, 300.0));
    }

    #[test]
    fn ground_above_a_cave_is_the_surface() {
        let t = cave();
        assert_eq!(t.ground_at(100.0, 0.0), 100.0);
        assert_eq!(t.ground_at(100.0, 110.0), 100.0);
    }

    #[test]
    fn ground_inside_a_cave_is_its_floor() {
        let t = cave();
        assert_eq!(t.ground_at(100.0, 150.0), 170.0);
        assert_eq!(t.ground_at(10.0, 150.0), 100.0);
    }
}
