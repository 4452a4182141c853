//! Pointer input
//!
//! Pointer events are queued by the platform layer and applied at the start of
//! the next tick, so all gesture state lives in `PointerState` on the game
//! state instead of in event-handler closures. Replays feed the same events
//! back in and get the same result.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A raw pointer event in playfield coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    /// Pointer left the playfield
    Leave,
}

impl PointerEvent {
    pub fn down(p: Vec2) -> Self {
        PointerEvent::Down { x: p.x, y: p.y }
    }

    pub fn moved(p: Vec2) -> Self {
        PointerEvent::Move { x: p.x, y: p.y }
    }

    pub fn up(p: Vec2) -> Self {
        PointerEvent::Up { x: p.x, y: p.y }
    }
}

/// Gesture state carried between pointer events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointerState {
    /// A cut stroke is in progress
    pub cutting: bool,
    /// Last sampled pointer position of the stroke
    pub last: Vec2,
    /// Index of the air pillow being held down
    pub held_pillow: Option<usize>,
}

impl PointerState {
    /// Forget everything (pointer released or level restarted)
    pub fn release(&mut self) -> Option<usize> {
        self.cutting = false;
        self.held_pillow.take()
    }
}
