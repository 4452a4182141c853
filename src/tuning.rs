//! Physics tuning
//!
//! Every field defaults to the matching constant in `crate::consts`. A tuning
//! file only needs the keys it wants to change:
//!
//! ```json
//! { "gravity": 0.4, "cut_tolerance": 14.0 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Runtime-tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub gravity: f32,
    pub canvas_height: f32,
    /// Candy is lost once it is this far below the playfield
    pub out_of_bounds_margin: f32,

    // === Rope ===
    pub rope_damping: f32,
    pub constraint_iterations: u32,
    pub cut_tolerance: f32,

    // === Candy ===
    pub free_drag: f32,

    // === Goal ===
    pub goal_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            canvas_height: CANVAS_HEIGHT,
            out_of_bounds_margin: OUT_OF_BOUNDS_MARGIN,

            rope_damping: ROPE_DAMPING,
            constraint_iterations: CONSTRAINT_ITERATIONS,
            cut_tolerance: CUT_TOLERANCE,

            free_drag: FREE_DRAG,

            goal_radius: GOAL_RADIUS,
        }
    }
}

impl Tuning {
    /// Parse from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> SimResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let tuning = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Y coordinate past which the candy counts as fallen
    pub fn fall_line(&self) -> f32 {
        self.canvas_height + self.out_of_bounds_margin
    }

    /// Reject values that make the solver blow up or stall
    pub fn validate(&self) -> SimResult<()> {
        check("gravity", self.gravity, "[-5.0, 5.0]", |v| {
            (-5.0..=5.0).contains(&v)
        })?;
        check("rope_damping", self.rope_damping, "(0.0, 1.0]", unit_interval)?;
        check("free_drag", self.free_drag, "(0.0, 1.0]", unit_interval)?;
        check(
            "constraint_iterations",
            self.constraint_iterations as f32,
            "[1, 100]",
            |v| (1.0..=100.0).contains(&v),
        )?;
        check("cut_tolerance", self.cut_tolerance, "(0.0, ∞)", positive)?;
        check("canvas_height", self.canvas_height, "(0.0, ∞)", positive)?;
        check(
            "out_of_bounds_margin",
            self.out_of_bounds_margin,
            "finite",
            f32::is_finite,
        )?;
        check("goal_radius", self.goal_radius, "(0.0, ∞)", positive)?;
        Ok(())
    }
}

fn unit_interval(v: f32) -> bool {
    v > 0.0 && v <= 1.0
}

fn positive(v: f32) -> bool {
    v > 0.0 && v.is_finite()
}

fn check(
    name: &'static str,
    value: f32,
    safe_range: &'static str,
    ok: impl Fn(f32) -> bool,
) -> SimResult<()> {
    if ok(value) {
        Ok(())
    } else {
        Err(SimError::UnsafeTuning {
            name,
            value,
            safe_range,
        })
    }
}
