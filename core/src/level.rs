use serde::{Deserialize, Serialize};

use crate::terrain::{GeneratedTerrain, Hole, Terrain};
use crate::types::Team;

/// Names accepted by [`LevelData::builtin`].
pub const BUILTIN_LEVELS: [&str; 1] = ["tropical-island"];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HideoutKind {
    Cave,
    Overhang,
    Trench,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hideout {
    #[serde(rename = "type")]
    pub kind: HideoutKind,
    pub bounds: Rect,
}

impl Hideout {
    /// Caves and overhangs are hollow; trenches are only surface shape.
    pub fn is_hollow(&self) -> bool {
        matches!(self.kind, HideoutKind::Cave | HideoutKind::Overhang)
    }
}

/// One team's landmass: a surface polyline plus its hideouts and spawns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub terrain: Vec<Point>,
    #[serde(default)]
    pub hideouts: Vec<Hideout>,
    #[serde(default)]
    pub spawn_points: Vec<Point>,
}

/// Hand-authored map in its own coordinate space. Columns outside both
/// platforms sit at the water line. Red spawns on the left platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub name: String,
    pub water_level: f64,
    pub world_bounds: Bounds,
    pub platform_left: Platform,
    pub platform_right: Platform,
}

/// Surface y of a polyline at `x`, or `None` outside its x extent.
fn polyline_y(x: f64, points: &[Point]) -> Option<f64> {
    points.windows(2).find_map(|seg| {
        let (a, b) = (seg[0], seg[1]);
        if x < a.x.min(b.x) || x > a.x.max(b.x) {
            return None;
        }
        if (b.x - a.x).abs() < 0.001 {
            return Some(a.y);
        }
        let t = (x - a.x) / (b.x - a.x);
        Some(a.y + t * (b.y - a.y))
    })
}

fn points(raw: &[(f64, f64)]) -> Vec<Point> {
    raw.iter().map(|&(x, y)| Point { x, y }).collect()
}

fn hideout(kind: HideoutKind, x: f64, y: f64, width: f64, height: f64) -> Hideout {
    Hideout {
        kind,
        bounds: Rect { x, y, width, height },
    }
}

impl LevelData {
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "tropical-island" | "tropical_island" => Some(Self::tropical_island()),
            _ => None,
        }
    }

    /// Two islands over open water, each with caves to hide in.
    pub fn tropical_island() -> Self {
        use HideoutKind::*;
        Self {
            name: "Isla del Huevo Errante".into(),
            water_level: 580.0,
            world_bounds: Bounds {
                width: 2400.0,
                height: 600.0,
            },
            platform_left: Platform {
                terrain: points(&[
                    (0.0, 600.0),
                    (0.0, 420.0),
                    (50.0, 400.0),
                    (120.0, 350.0),
                    (200.0, 360.0),
                    (280.0, 310.0),
                    (350.0, 330.0),
                    (450.0, 260.0),
                    (550.0, 280.0),
                    (650.0, 340.0),
                    (750.0, 370.0),
                    (850.0, 410.0),
                    (900.0, 450.0),
                    (900.0, 600.0),
                ]),
                hideouts: vec![
                    hideout(Cave, 100.0, 360.0, 70.0, 40.0),
                    hideout(Overhang, 420.0, 270.0, 100.0, 35.0),
                    hideout(Trench, 280.0, 310.0, 60.0, 25.0),
                    hideout(Cave, 600.0, 350.0, 80.0, 50.0),
                ],
                spawn_points: points(&[(150.0, 340.0), (450.0, 250.0), (750.0, 360.0)]),
            },
            platform_right: Platform {
                terrain: points(&[
                    (1500.0, 600.0),
                    (1500.0, 440.0),
                    (1600.0, 390.0),
                    (1700.0, 350.0),
                    (1800.0, 280.0),
                    (1950.0, 250.0),
                    (2100.0, 290.0),
                    (2250.0, 360.0),
                    (2350.0, 390.0),
                    (2400.0, 410.0),
                    (2400.0, 600.0),
                ]),
                hideouts: vec![
                    hideout(Cave, 2150.0, 350.0, 70.0, 45.0),
                    hideout(Overhang, 1800.0, 280.0, 110.0, 40.0),
                    hideout(Trench, 1950.0, 255.0, 65.0, 30.0),
                    hideout(Cave, 1650.0, 380.0, 75.0, 50.0),
                ],
                spawn_points: points(&[(1550.0, 400.0), (1950.0, 240.0), (2250.0, 350.0)]),
            },
        }
    }

    /// Problems that would make the level unplayable, if any.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.world_bounds.width > 0.0 && self.world_bounds.height > 0.0) {
            return Err("level worldBounds must be positive".into());
        }
        for (side, platform) in [("left", &self.platform_left), ("right", &self.platform_right)] {
            if platform.terrain.len() < 2 {
                return Err(format!("{side} platform needs at least two terrain points"));
            }
            if platform.spawn_points.is_empty() || platform.spawn_points.len() > u8::MAX as usize {
                return Err(format!("{side} platform needs 1..=255 spawn points"));
            }
        }
        Ok(())
    }

    /// Rasterize the level onto a `width × height` field. Later platforms
    /// win where they overlap; hollow hideouts become circular holes.
    pub fn build_terrain(&self, width: f64, height: f64) -> GeneratedTerrain {
        let lw = self.world_bounds.width;
        let lh = self.world_bounds.height;
        let heights = (0..=width.floor() as usize)
            .map(|x| {
                let real_x = x as f64 / width * lw;
                let y = polyline_y(real_x, &self.platform_right.terrain)
                    .or_else(|| polyline_y(real_x, &self.platform_left.terrain))
                    .unwrap_or(self.water_level);
                y / lh * height
            })
            .collect();

        let holes = self
            .platform_left
            .hideouts
            .iter()
            .chain(&self.platform_right.hideouts)
            .filter(|h| h.is_hollow())
            .map(|h| {
                let b = h.bounds;
                Hole {
                    x: (b.x + b.width / 2.0) / lw * width,
                    y: (b.y + b.height / 2.0) / lh * height,
                    r: b.width.max(b.height) / 2.0 / lw * width,
                }
            })
            .collect();

        GeneratedTerrain {
            terrain: Terrain {
                heights,
                width,
                height,
                holes,
            },
            map_name: self.name.clone(),
        }
    }

    /// Spawn columns for `team`, scaled to a field `width` wide.
    pub fn spawn_columns(&self, team: Team, width: f64) -> Vec<f64> {
        let platform = match team {
            Team::Red => &self.platform_left,
            Team::Blue => &self.platform_right,
        };
        platform
            .spawn_points
            .iter()
            .map(|p| p.x / self.world_bounds.width * width)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polyline_interpolates_and_reports_extent() {
        let line = points(&[(0.0, 100.0), (10.0, 200.0), (10.0, 300.0)]);
        assert_eq!(polyline_y(5.0, &line), Some(150.0));
        assert_eq!(polyline_y(10.0, &line), Some(200.0));
        assert_eq!(polyline_y(11.0, &line), None);
    }

    #[test]
    fn island_rasterizes_to_the_field() {
        let g = LevelData::tropical_island().build_terrain(1280.0, 720.0);
        let t = &g.terrain;
        assert_eq!(g.map_name, "Isla del Huevo Errante");
        assert_eq!(t.heights.len(), 1281);
        // column 0 sits on the vertical cliff face, which reads its bottom
        assert_eq!(t.heights[0], 720.0);
        assert!((t.heights[1] - 419.25 * 1.2).abs() < 1e-9);
        // middle of the strait is open water
        assert!((t.heights[640] - 580.0 / 600.0 * 720.0).abs() < 1e-9);
        // right summit near (1950, 250)
        let summit = t.height_at(1950.0 / 2400.0 * 1280.0);
        assert!((summit - 300.0).abs() < 1.0);
    }

    #[test]
    fn only_hollow_hideouts_become_holes() {
        let level = LevelData::tropical_island();
        let t = level.build_terrain(1280.0, 720.0).terrain;
        assert_eq!(t.holes.len(), 6);
        let first = t.holes[0];
        assert!((first.x - 135.0 / 2400.0 * 1280.0).abs() < 1e-9);
        assert!((first.y - 380.0 / 600.0 * 720.0).abs() < 1e-9);
        assert!((first.r - 35.0 / 2400.0 * 1280.0).abs() < 1e-9);
    }

    #[test]
    fn spawns_scale_with_width() {
        let level = LevelData::tropical_island();
        assert_eq!(level.spawn_columns(Team::Red, 2400.0), vec![150.0, 450.0, 750.0]);
        let blue = level.spawn_columns(Team::Blue, 1280.0);
        assert_eq!(blue.len(), 3);
        assert!(blue.iter().all(|&x| x > 640.0));
    }

    #[test]
    fn level_json_round_trips_through_config_keys() {
        let json = r#"{
            "name": "Pond",
            "waterLevel": 90,
            "worldBounds": {"width": 200, "height": 100},
            "platformLeft": {
                "terrain": [{"x": 0, "y": 50}, {"x": 80, "y": 50}],
                "hideouts": [{"type": "trench", "bounds": {"x": 10, "y": 50, "width": 5, "height": 5}, "sealed": false}],
                "spawnPoints": [{"x": 40, "y": 40}]
            },
            "platformRight": {
                "terrain": [{"x": 120, "y": 60}, {"x": 200, "y": 60}],
                "spawnPoints": [{"x": 160, "y": 50}]
            },
            "decorations": [{"type": "rock", "x": 1, "y": 1}]
        }"#;
        let level: LevelData = serde_json::from_str(json).unwrap();
        assert!(level.validate().is_ok());
        assert_eq!(level.platform_left.hideouts[0].kind, HideoutKind::Trench);
        let t = level.build_terrain(200.0, 100.0).terrain;
        assert!(t.holes.is_empty());
        assert_eq!(t.heights[100], 90.0);
    }

    #[test]
    fn level_without_spawns_is_rejected() {
        let mut level = LevelData::tropical_island();
        level.platform_right.spawn_points.clear();
        assert!(level.validate().is_err());
        assert!(LevelData::builtin("moon").is_none());
        assert!(LevelData::builtin(BUILTIN_LEVELS[0]).is_some());
    }
}
