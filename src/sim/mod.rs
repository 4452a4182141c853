//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (level order)
//! - No rendering or platform dependencies

pub mod air_pillow;
pub mod body;
pub mod bubble;
pub mod collision;
pub mod geometry;
pub mod input;
pub mod particle;
pub mod replay;
pub mod rope;
pub mod state;
pub mod tick;
pub mod trace;

pub use air_pillow::{AirPillow, Falloff};
pub use body::{BodyId, Candy, DynamicBody};
pub use bubble::{Bubble, BubbleState, CaptureChange};
pub use collision::{candy_goal_collision, candy_out_of_bounds, candy_star_collision};
pub use geometry::{Rect, point_to_segment_distance, segments_within};
pub use input::{PointerEvent, PointerState};
pub use particle::{Fade, Particle};
pub use replay::{ReplayOutcome, ReplayScript};
pub use rope::{Joint, Rope};
pub use state::{GameEvent, GameState, LevelPhase, Star};
pub use tick::{TickInput, apply_pointer_event, tick};
pub use trace::Trace;
