//! Verlet rope
//!
//! A rope is a chain of point masses hanging from a fixed anchor. Joints carry
//! no explicit velocity; it is implied by the difference between the current
//! and previous position. Each step integrates the free joints and then relaxes
//! the distance constraints a fixed number of times.
//!
//! Cutting detaches a joint and every joint after it. Detachment is permanent,
//! so a rope is either fully attached or hanging as a shortened stub.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::segments_within;
use crate::consts::*;

/// A point mass in a rope's constraint chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Joint {
    pub pos: Vec2,
    /// Position at the previous step (implicit velocity)
    pub prev: Vec2,
    /// Distance constraint to the next joint
    pub rest_length: f32,
    /// False once the rope was cut at or before this joint
    pub attached: bool,
}

impl Joint {
    fn at(pos: Vec2, rest_length: f32) -> Self {
        Self {
            pos,
            prev: pos,
            rest_length,
            attached: true,
        }
    }
}

/// A rope from a fixed anchor to the candy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rope {
    pub id: u32,
    /// Fixed anchor location; joint 0 is pinned here every relaxation pass
    anchor: Vec2,
    joints: Vec<Joint>,
}

impl Rope {
    /// Build a straight rope of `segments` equal pieces from `anchor` to `endpoint`
    pub fn new(id: u32, anchor: Vec2, endpoint: Vec2, segments: u32) -> Self {
        let segments = segments.max(1);
        let rest_length = (endpoint - anchor).length() / segments as f32;

        let joints = (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                Joint::at(anchor.lerp(endpoint, t), rest_length)
            })
            .collect();

        Self { id, anchor, joints }
    }

    /// Advance the rope one tick under `gravity`
    pub fn step(&mut self, gravity: f32) {
        self.step_with(gravity, ROPE_DAMPING, CONSTRAINT_ITERATIONS);
    }

    /// Advance with explicit damping and solver iterations
    pub fn step_with(&mut self, gravity: f32, damping: f32, iterations: u32) {
        for joint in self.joints.iter_mut().skip(1) {
            if !joint.attached {
                continue;
            }
            let vel = (joint.pos - joint.prev) * damping;
            joint.prev = joint.pos;
            joint.pos += vel + Vec2::new(0.0, gravity);
        }

        // A single pass under-corrects long chains and the rope looks elastic
        for _ in 0..iterations {
            self.solve_constraints();
        }
    }

    /// One Gauss-Seidel relaxation pass over all attached pairs
    fn solve_constraints(&mut self) {
        self.joints[0].pos = self.anchor;

        for i in 0..self.joints.len() - 1 {
            let (head, tail) = self.joints.split_at_mut(i + 1);
            let a = &mut head[i];
            let b = &mut tail[0];
            if !a.attached || !b.attached {
                continue;
            }

            let delta = b.pos - a.pos;
            let dist = delta.length();
            if dist < MIN_CONSTRAINT_DISTANCE {
                continue;
            }

            let correction = delta * (a.rest_length - dist) / dist;
            // The anchor never moves, so its neighbour takes the full correction
            if i == 0 {
                b.pos += correction;
            } else {
                a.pos -= correction * 0.5;
                b.pos += correction * 0.5;
            }
        }
    }

    /// Test a gesture segment against the rope and sever it on the first hit
    ///
    /// Returns the index of the first detached joint. Joints at and beyond that
    /// index are detached; the anchor (index 0) is never detached. Once cut,
    /// the detached remainder is skipped, so a rope is severed at most once.
    pub fn cut(&mut self, start: Vec2, end: Vec2) -> Option<usize> {
        self.cut_with_tolerance(start, end, CUT_TOLERANCE)
    }

    pub fn cut_with_tolerance(&mut self, start: Vec2, end: Vec2, tolerance: f32) -> Option<usize> {
        let hit = (1..self.joints.len()).find(|&i| {
            let (prev, joint) = (&self.joints[i - 1], &self.joints[i]);
            joint.attached && segments_within(start, end, prev.pos, joint.pos, tolerance)
        })?;

        for joint in &mut self.joints[hit..] {
            joint.attached = false;
        }
        log::debug!("Rope {} cut at joint {}", self.id, hit);
        Some(hit)
    }

    /// True while the candy end is still connected to the anchor
    pub fn is_attached(&self) -> bool {
        self.joints.last().is_some_and(|j| j.attached)
    }

    /// Position of the candy end
    pub fn last_point(&self) -> Vec2 {
        self.joints[self.joints.len() - 1].pos
    }

    /// Pin the candy end to an authoritative position
    pub fn set_last_point(&mut self, pos: Vec2) {
        let last = self.joints.len() - 1;
        self.joints[last].pos = pos;
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn rest_length(&self) -> f32 {
        self.joints[0].rest_length
    }

    /// Index of the first detached joint, if the rope has been cut
    pub fn cut_index(&self) -> Option<usize> {
        self.joints.iter().position(|j| !j.attached)
    }

    /// The still-attached prefix (anchor first), for drawing
    pub fn attached_joints(&self) -> &[Joint] {
        let end = self.cut_index().unwrap_or(self.joints.len());
        &self.joints[..end]
    }
}
