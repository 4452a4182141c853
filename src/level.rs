//! Level data
//!
//! Levels are authored and stored outside the simulation (editor, level packs)
//! and handed in as JSON. The simulation only reads them; `validate` is the
//! gate that keeps partial data from ever reaching `GameState`.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ROPE_SEGMENTS, MAX_ROPE_SEGMENTS};
use crate::error::{SimError, SimResult};

/// Levels that ship with the game
const BUILTIN_LEVELS_JSON: &str = include_str!("../assets/levels.json");

/// A point in playfield coordinates, stored as `{ "x": .., "y": .. }`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Point::new(v.x, v.y)
    }
}

/// Air pillow placement (top-left corner and size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillowSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

fn default_rope_segments() -> u32 {
    DEFAULT_ROPE_SEGMENTS
}

/// Static description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// One rope hangs from each anchor to the candy
    pub anchors: Vec<Point>,
    pub candy: Point,
    /// Where the candy has to end up
    #[serde(alias = "omNom")]
    pub goal: Point,
    #[serde(default)]
    pub stars: Vec<Point>,
    #[serde(default)]
    pub bubbles: Vec<Point>,
    #[serde(default)]
    pub air_pillows: Vec<PillowSpec>,
    #[serde(default = "default_rope_segments")]
    pub rope_segments: u32,
}

impl Level {
    /// Parse a level from JSON and validate it
    pub fn from_json(json: &str) -> SimResult<Self> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Load and validate a level file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject levels the simulation cannot run
    pub fn validate(&self) -> SimResult<()> {
        let fail = |reason: String| Err(SimError::invalid_level(self.name.as_deref(), reason));

        if self.anchors.is_empty() {
            return fail("level has no rope anchors".into());
        }
        if !(1..=MAX_ROPE_SEGMENTS).contains(&self.rope_segments) {
            return fail(format!(
                "ropeSegments must be between 1 and {}",
                MAX_ROPE_SEGMENTS
            ));
        }

        let named_points = [("candy", &self.candy), ("goal", &self.goal)];
        for (what, p) in named_points {
            if !p.is_finite() {
                return fail(format!("{} position is not finite", what));
            }
        }

        let lists = [
            ("anchor", &self.anchors),
            ("star", &self.stars),
            ("bubble", &self.bubbles),
        ];
        for (what, points) in lists {
            if let Some(i) = points.iter().position(|p| !p.is_finite()) {
                return fail(format!("{} {} position is not finite", what, i));
            }
        }

        for (i, pillow) in self.air_pillows.iter().enumerate() {
            let finite = [pillow.x, pillow.y, pillow.width, pillow.height]
                .iter()
                .all(|v| v.is_finite());
            if !finite || pillow.width <= 0.0 || pillow.height <= 0.0 {
                return fail(format!("air pillow {} has an invalid rectangle", i));
            }
        }

        Ok(())
    }

    /// Display name, falling back to the id
    pub fn title(&self) -> String {
        match (&self.name, self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("Level {}", id),
            (None, None) => "Custom level".to_owned(),
        }
    }
}

/// All levels that ship with the game, in play order
pub fn builtin_levels() -> SimResult<Vec<Level>> {
    let levels: Vec<Level> = serde_json::from_str(BUILTIN_LEVELS_JSON)?;
    for level in &levels {
        level.validate()?;
    }
    Ok(levels)
}

/// Built-in level by 1-based number
pub fn builtin(number: usize) -> SimResult<Level> {
    builtin_levels()?
        .into_iter()
        .nth(number.wrapping_sub(1))
        .ok_or(SimError::UnknownLevel(number))
}

/// Number of built-in levels
pub fn builtin_count() -> usize {
    builtin_levels().map(|levels| levels.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "anchors": [{ "x": 400, "y": 50 }],
        "candy": { "x": 400, "y": 150 },
        "goal": { "x": 400, "y": 500 }
    }"#;

    #[test]
    fn test_builtin_levels_parse() {
        let levels = builtin_levels().unwrap();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].title(), "First Steps");
        assert_eq!(levels[0].rope_segments, 8);
        assert_eq!(levels[2].air_pillows.len(), 1);
        assert_eq!(levels[2].bubbles.len(), 2);
        assert_eq!(builtin_count(), 3);
    }

    #[test]
    fn test_builtin_by_number() {
        assert_eq!(builtin(2).unwrap().anchors.len(), 3);
        assert!(matches!(builtin(0), Err(SimError::UnknownLevel(0))));
        assert!(matches!(builtin(4), Err(SimError::UnknownLevel(4))));
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let level = Level::from_json(MINIMAL).unwrap();
        assert!(level.stars.is_empty());
        assert!(level.bubbles.is_empty());
        assert!(level.air_pillows.is_empty());
        assert_eq!(level.rope_segments, DEFAULT_ROPE_SEGMENTS);
        assert_eq!(level.title(), "Custom level");
    }

    #[test]
    fn test_om_nom_alias() {
        let json = MINIMAL.replace("\"goal\"", "\"omNom\"");
        let level = Level::from_json(&json).unwrap();
        assert_eq!(level.goal, Point::new(400.0, 500.0));
    }

    #[test]
    fn test_missing_goal_is_parse_error() {
        let json = r#"{ "anchors": [], "candy": { "x": 1, "y": 2 } }"#;
        assert!(matches!(Level::from_json(json), Err(SimError::Parse(_))));
    }

    #[test]
    fn test_no_anchors_rejected() {
        let mut level = Level::from_json(MINIMAL).unwrap();
        level.anchors.clear();
        assert!(matches!(
            level.validate(),
            Err(SimError::InvalidLevel { .. })
        ));
    }

    #[test]
    fn test_bad_geometry_rejected() {
        let mut level = Level::from_json(MINIMAL).unwrap();
        level.stars.push(Point::new(f32::NAN, 1.0));
        assert!(level.validate().is_err());

        let mut level = Level::from_json(MINIMAL).unwrap();
        level.air_pillows.push(PillowSpec {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 30.0,
        });
        assert!(level.validate().is_err());

        let mut level = Level::from_json(MINIMAL).unwrap();
        level.rope_segments = 0;
        assert!(level.validate().is_err());
    }

    #[test]
    fn test_oversized_rope_rejected() {
        let json = MINIMAL.replace(
            "\"goal\"",
            "\"ropeSegments\": 4000000000, \"goal\"",
        );
        assert!(matches!(
            Level::from_json(&json),
            Err(SimError::InvalidLevel { .. })
        ));

        let mut level = Level::from_json(MINIMAL).unwrap();
        level.rope_segments = MAX_ROPE_SEGMENTS;
        assert!(level.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_keeps_camel_case() {
        let level = builtin(3).unwrap();
        let json = level.to_json().unwrap();
        assert!(json.contains("airPillows"));
        assert!(json.contains("ropeSegments"));
        assert_eq!(Level::from_json(&json).unwrap(), level);
    }
}
