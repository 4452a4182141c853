//! Segment geometry for cut detection
//!
//! A cut gesture is a sequence of short segments between pointer-move samples.
//! Each one is tested against every rope segment with a distance tolerance,
//! so a stroke that passes just beside a rope still severs it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Shortest distance from `p` to the segment `a`-`b`
///
/// A zero-length segment degenerates to the distance to `a`.
pub fn point_to_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return distance(p, a);
    }

    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    distance(p, a + ab * t)
}

/// True if the two segments properly cross each other
fn segments_cross(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d1 = (a2 - a1).perp_dot(b1 - a1);
    let d2 = (a2 - a1).perp_dot(b2 - a1);
    let d3 = (b2 - b1).perp_dot(a1 - b1);
    let d4 = (b2 - b1).perp_dot(a2 - b1);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

/// Check whether segment `a1`-`a2` touches segment `b1`-`b2` within `tolerance`
///
/// Takes the minimum of the four endpoint-to-segment distances. Segments that
/// cross in their interiors also count, even when every endpoint is far from
/// the other segment.
pub fn segments_within(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2, tolerance: f32) -> bool {
    let nearest = point_to_segment_distance(b1, a1, a2)
        .min(point_to_segment_distance(b2, a1, a2))
        .min(point_to_segment_distance(a1, b1, b2))
        .min(point_to_segment_distance(a2, b1, b2));

    nearest < tolerance || segments_cross(a1, a2, b1, b2)
}

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Inclusive point test (edges count as inside)
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }

    /// Grow the rectangle: `before` toward -x/-y, `after` toward +x/+y
    pub fn expanded(&self, before: f32, after: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(before),
            size: self.size + Vec2::splat(before + after),
        }
    }

    /// Exclusive point test (edges are outside)
    pub fn strictly_contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x > self.min.x && p.x < max.x && p.y > self.min.y && p.y < max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_to_segment_projection() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        // Perpendicular foot inside the segment
        assert!((point_to_segment_distance(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-5);
        // Beyond the end clamps to the endpoint
        assert!((point_to_segment_distance(Vec2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-5);
        // Before the start clamps to the start
        assert!((point_to_segment_distance(Vec2::new(-3.0, -4.0), a, b) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_point_to_degenerate_segment() {
        let a = Vec2::new(1.0, 1.0);
        let d = point_to_segment_distance(Vec2::new(4.0, 5.0), a, a);
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_segments_within_near_endpoint() {
        // Horizontal rope segment, short vertical stroke ending 5px above it
        let hit = segments_within(
            Vec2::new(50.0, 80.0),
            Vec2::new(50.0, 95.0),
            Vec2::new(0.0, 100.0),
            Vec2::new(100.0, 100.0),
            10.0,
        );
        assert!(hit);
    }

    #[test]
    fn test_segments_within_far_apart() {
        let hit = segments_within(
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(0.0, 50.0),
            Vec2::new(100.0, 50.0),
            10.0,
        );
        assert!(!hit);
    }

    #[test]
    fn test_segments_crossing_in_middle() {
        // Long X: every endpoint is far from the other segment
        let hit = segments_within(
            Vec2::new(0.0, 0.0),
            Vec2::new(200.0, 200.0),
            Vec2::new(0.0, 200.0),
            Vec2::new(200.0, 0.0),
            10.0,
        );
        assert!(hit);
    }

    #[test]
    fn test_rect_contains_and_expand() {
        let r = Rect::new(100.0, 100.0, 50.0, 20.0);
        assert!(r.contains(Vec2::new(100.0, 100.0)));
        assert!(r.contains(Vec2::new(150.0, 120.0)));
        assert!(!r.contains(Vec2::new(151.0, 110.0)));
        assert_eq!(r.center(), Vec2::new(125.0, 110.0));

        let big = r.expanded(200.0, 300.0);
        assert_eq!(big.min, Vec2::new(-100.0, -100.0));
        assert_eq!(big.max(), Vec2::new(450.0, 420.0));
        assert!(!big.strictly_contains(Vec2::new(-100.0, 0.0)));
        assert!(big.strictly_contains(Vec2::new(-99.0, 0.0)));
    }
}
