//! Pickup and boundary checks for the candy
//!
//! All checks are plain circle-distance tests against the candy center.

use glam::Vec2;

use super::body::DynamicBody;
use super::state::Star;

/// Candy overlaps a star (distance below candy radius plus half the star size)
pub fn candy_star_collision<B: DynamicBody + ?Sized>(candy: &B, star: &Star) -> bool {
    candy.position().distance(star.pos) < candy.radius() + star.size / 2.0
}

/// Candy center is within `goal_radius` of the goal
pub fn candy_goal_collision<B: DynamicBody + ?Sized>(candy: &B, goal: Vec2, goal_radius: f32) -> bool {
    candy.position().distance(goal) < goal_radius
}

/// Candy has dropped below `fall_line`
pub fn candy_out_of_bounds<B: DynamicBody + ?Sized>(candy: &B, fall_line: f32) -> bool {
    candy.position().y > fall_line
}
