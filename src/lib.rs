//! Slice the Rope - rope, candy and force-field simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ropes, candy, bubbles, air pillows, cut gestures)
//! - `level`: Level data supplied by the level/editor layer
//! - `tuning`: Data-driven physics parameters
//! - `error`: Error type for level loading and validation

pub mod error;
pub mod level;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use level::Level;
pub use tuning::Tuning;

use glam::Vec2;

/// Simulation configuration constants
///
/// All distances are in playfield pixels, all rates are per tick.
pub mod consts {
    /// Playfield height
    pub const CANVAS_HEIGHT: f32 = 600.0;
    /// How far below the playfield the candy may drop before the level is lost
    pub const OUT_OF_BOUNDS_MARGIN: f32 = 100.0;

    /// Downward acceleration applied to rope joints and free candy
    pub const GRAVITY: f32 = 0.5;

    /// Rope defaults
    pub const ROPE_DAMPING: f32 = 0.98;
    pub const CONSTRAINT_ITERATIONS: u32 = 5;
    pub const DEFAULT_ROPE_SEGMENTS: u32 = 10;
    pub const MAX_ROPE_SEGMENTS: u32 = 1000;
    /// Pairs closer than this are skipped by the constraint solver
    pub const MIN_CONSTRAINT_DISTANCE: f32 = 0.01;
    /// Max distance between a gesture segment and a rope segment that still cuts
    pub const CUT_TOLERANCE: f32 = 10.0;

    /// Candy defaults
    pub const CANDY_RADIUS: f32 = 20.0;
    pub const CANDY_MASS: f32 = 1.0;
    pub const FREE_DRAG: f32 = 0.98;

    /// Blending while tethered and pushed by an air pillow
    pub const AIR_ROPE_BLEND: f32 = 0.2;
    pub const AIR_VELOCITY_SCALE: f32 = 0.5;
    pub const AIR_TETHER_DRAG: f32 = 0.95;

    /// Blending while tethered and captured by a bubble
    pub const BUBBLE_ROPE_BLEND: f32 = 0.1;
    pub const BUBBLE_TETHERED_LIFT_SCALE: f32 = 0.3;

    /// Bubble defaults
    pub const BUBBLE_RADIUS: f32 = 30.0;
    pub const BUBBLE_LIFT_SPEED: f32 = 1.5;
    /// Ticks a bubble may carry the candy before popping (10 s at 60 Hz)
    pub const BUBBLE_MAX_FLOAT_TICKS: u32 = 600;
    /// Fraction of lift speed kept as upward velocity after a pop
    pub const BUBBLE_RELEASE_LIFT: f32 = 0.5;

    /// Air pillow defaults
    pub const AIR_PILLOW_STRENGTH: f32 = 8.0;
    pub const AIR_BODY_FALLOFF: f32 = 400.0;
    pub const AIR_BODY_FACTOR: f32 = 0.2;
    pub const AIR_BUBBLE_FALLOFF: f32 = 500.0;
    pub const AIR_BUBBLE_FACTOR: f32 = 0.3;
    /// Ticks between stream particles while a pillow is held
    pub const AIR_PARTICLE_INTERVAL: u32 = 5;

    /// Star and goal pickup
    pub const STAR_SIZE: f32 = 20.0;
    pub const GOAL_RADIUS: f32 = 30.0;

    /// Cut trail fade
    pub const TRACE_MAX_OPACITY: f32 = 0.6;
    pub const TRACE_FADE_SPEED: f32 = 0.05;
}

/// Average of a set of points, `None` when empty
pub fn centroid<I>(points: I) -> Option<Vec2>
where
    I: IntoIterator<Item = Vec2>,
{
    let (sum, count) = points
        .into_iter()
        .fold((Vec2::ZERO, 0u32), |(sum, n), p| (sum + p, n + 1));
    (count > 0).then(|| sum / count as f32)
}

/// Move `current` the fraction `toward` of the way to `target`
#[inline]
pub fn blend_toward(current: Vec2, target: Vec2, toward: f32) -> Vec2 {
    current * (1.0 - toward) + target * toward
}
