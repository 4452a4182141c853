//! Cut trail left by the pointer while slicing
//!
//! Display only. Cut detection works on raw consecutive pointer-move samples
//! (see `sim::input`), so this list could be thinned without changing which
//! ropes get cut.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{TRACE_FADE_SPEED, TRACE_MAX_OPACITY};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    pub points: Vec<Vec2>,
    pub active: bool,
    pub opacity: f32,
}

impl Default for Trace {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            active: false,
            opacity: TRACE_MAX_OPACITY,
        }
    }
}

impl Trace {
    /// Begin a new stroke at `p`
    pub fn start(&mut self, p: Vec2) {
        self.points.clear();
        self.points.push(p);
        self.active = true;
        self.opacity = TRACE_MAX_OPACITY;
    }

    pub fn add_point(&mut self, p: Vec2) {
        if self.active {
            self.points.push(p);
        }
    }

    /// Stop recording; the trail stays until it fades
    pub fn end(&mut self) {
        self.active = false;
    }

    /// Fade a finished trail, clearing it once invisible
    pub fn update(&mut self) {
        if self.active || self.points.is_empty() {
            return;
        }
        self.opacity -= TRACE_FADE_SPEED;
        if self.opacity <= 0.0 {
            self.points.clear();
            self.opacity = TRACE_MAX_OPACITY;
        }
    }
}
