//! Dynamic bodies acted on by ropes and force fields

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Handle a force field holds while it owns a body's position updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// A point mass that force fields can push, pull or capture
///
/// Bodies do not integrate themselves. The orchestrator advances position
/// differently per regime (rope-driven, captured, free).
pub trait DynamicBody {
    fn id(&self) -> BodyId;
    fn position(&self) -> Vec2;
    fn set_position(&mut self, pos: Vec2);
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, vel: Vec2);
    fn radius(&self) -> f32;
    fn mass(&self) -> f32;

    /// Push the body: `v += force / mass`
    fn apply_directional_force(&mut self, force: Vec2);

    fn apply_gravity(&mut self, gravity: f32) {
        let vel = self.velocity();
        self.set_velocity(vel + Vec2::new(0.0, gravity));
    }
}

/// The candy the player is trying to feed to the goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candy {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
}

impl Candy {
    pub fn new(id: BodyId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: CANDY_RADIUS,
            mass: CANDY_MASS,
        }
    }

    /// Re-seat at `pos` and stop all motion (level start/restart)
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
    }
}

impl DynamicBody for Candy {
    fn id(&self) -> BodyId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn mass(&self) -> f32 {
        self.mass
    }

    fn apply_directional_force(&mut self, force: Vec2) {
        self.vel += force / self.mass;
    }
}
