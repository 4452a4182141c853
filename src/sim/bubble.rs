//! Bubbles: float the candy upward until popped
//!
//! A free bubble captures a body that comes within its capture radius and then
//! owns that body's position, carrying it upward at a fixed lift speed. The
//! bubble stores only a `BodyId` token; the orchestrator decides whether a
//! bubble may claim the body at all, so two bubbles never hold it at once.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{BodyId, DynamicBody};
use super::particle::{Fade, Particle};
use crate::consts::*;

/// Particles in a pop burst
const POP_PARTICLES: usize = 12;
/// Lifetime of pop burst particles in ticks
pub const POP_PARTICLE_LIFE: u32 = 30;

/// Whether the bubble is carrying something
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubbleState {
    /// Floating in place, waiting for a body
    Free,
    /// Carrying `body` upward for `float_ticks` so far
    Carrying { body: BodyId, float_ticks: u32 },
}

/// What `Bubble::apply_effect` did to the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureChange {
    None,
    Captured(BodyId),
    Released(BodyId),
}

/// A bubble force field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub lift_speed: f32,
    pub max_float_ticks: u32,
    /// False once popped; popped bubbles stay listed so ids remain stable
    pub active: bool,
    pub state: BubbleState,
    #[serde(skip)]
    pub particles: Vec<Particle>,
}

impl Bubble {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: BUBBLE_RADIUS,
            lift_speed: BUBBLE_LIFT_SPEED,
            max_float_ticks: BUBBLE_MAX_FLOAT_TICKS,
            active: true,
            state: BubbleState::Free,
            particles: Vec::new(),
        }
    }

    /// True if this bubble currently holds `body`
    pub fn contains(&self, body: BodyId) -> bool {
        self.active && matches!(self.state, BubbleState::Carrying { body: b, .. } if b == body)
    }

    pub fn carried_body(&self) -> Option<BodyId> {
        match self.state {
            BubbleState::Carrying { body, .. } if self.active => Some(body),
            _ => None,
        }
    }

    /// Click hit test
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.active && self.pos.distance(p) <= self.radius
    }

    /// Velocity a body keeps when this bubble lets go of it
    pub fn release_velocity(&self) -> Vec2 {
        Vec2::new(0.0, -self.lift_speed * BUBBLE_RELEASE_LIFT)
    }

    /// Advance timers and particles
    ///
    /// A carrying bubble rises by its lift speed. It pops by itself once the
    /// float duration runs out or it drifts above the top of the playfield;
    /// the released body is returned.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<BodyId> {
        super::particle::update_particles(&mut self.particles);

        if !self.active {
            return None;
        }

        if let BubbleState::Carrying {
            ref mut float_ticks,
            ..
        } = self.state
        {
            *float_ticks += 1;
            self.pos.y -= self.lift_speed;

            if *float_ticks >= self.max_float_ticks || self.pos.y < -self.radius {
                log::debug!("Bubble {} floated away", self.id);
                return self.pop(rng);
            }
        }

        None
    }

    /// Capture, carry or release `body`
    ///
    /// `may_capture` is the orchestrator's grant: false while another bubble
    /// already holds the body.
    pub fn apply_effect<B: DynamicBody + ?Sized>(
        &mut self,
        body: &mut B,
        may_capture: bool,
    ) -> CaptureChange {
        if !self.active {
            return CaptureChange::None;
        }

        let capture_radius = self.radius + body.radius();
        let dist = self.pos.distance(body.position());

        match self.state {
            BubbleState::Free => {
                if may_capture && dist < capture_radius {
                    self.state = BubbleState::Carrying {
                        body: body.id(),
                        float_ticks: 0,
                    };
                    self.carry(body);
                    return CaptureChange::Captured(body.id());
                }
                CaptureChange::None
            }
            BubbleState::Carrying { body: held, .. } if held == body.id() => {
                if dist > capture_radius {
                    // Dragged out of the bubble
                    self.state = BubbleState::Free;
                    return CaptureChange::Released(held);
                }
                self.carry(body);
                CaptureChange::None
            }
            BubbleState::Carrying { .. } => CaptureChange::None,
        }
    }

    fn carry<B: DynamicBody + ?Sized>(&self, body: &mut B) {
        body.set_position(self.pos);
        body.set_velocity(Vec2::new(0.0, -self.lift_speed));
    }

    /// Pop the bubble, returning whatever it was carrying
    pub fn pop<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<BodyId> {
        if !self.active {
            return None;
        }
        let released = self.carried_body();
        self.active = false;
        self.state = BubbleState::Free;

        for i in 0..POP_PARTICLES {
            let angle = i as f32 / POP_PARTICLES as f32 * std::f32::consts::TAU;
            let speed = rng.random_range(1.0..3.0);
            self.particles.push(Particle {
                pos: self.pos + Vec2::from_angle(angle) * self.radius,
                vel: Vec2::from_angle(angle) * speed,
                size: rng.random_range(2.0..5.0),
                fade: Fade::Life(POP_PARTICLE_LIFE),
            });
        }

        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Candy;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_captures_body_in_range() {
        let mut bubble = Bubble::new(1, Vec2::new(100.0, 300.0));
        let mut candy = Candy::new(BodyId(9), Vec2::new(120.0, 300.0));

        let change = bubble.apply_effect(&mut candy, true);
        assert_eq!(change, CaptureChange::Captured(BodyId(9)));
        assert!(bubble.contains(BodyId(9)));
        assert_eq!(candy.pos, bubble.pos);
        assert!(candy.vel.y < 0.0);
    }

    #[test]
    fn test_no_capture_without_grant_or_out_of_range() {
        let mut bubble = Bubble::new(1, Vec2::new(100.0, 300.0));
        let mut candy = Candy::new(BodyId(9), Vec2::new(110.0, 300.0));
        assert_eq!(bubble.apply_effect(&mut candy, false), CaptureChange::None);

        candy.pos = Vec2::new(200.0, 300.0);
        assert_eq!(bubble.apply_effect(&mut candy, true), CaptureChange::None);
        assert_eq!(bubble.state, BubbleState::Free);
    }

    #[test]
    fn test_carried_body_rises_with_bubble() {
        let mut rng = rng();
        let mut bubble = Bubble::new(1, Vec2::new(100.0, 300.0));
        let mut candy = Candy::new(BodyId(9), Vec2::new(100.0, 300.0));
        bubble.apply_effect(&mut candy, true);

        for _ in 0..10 {
            assert_eq!(bubble.update(&mut rng), None);
            bubble.apply_effect(&mut candy, true);
        }
        assert!((candy.pos.y - 285.0).abs() < 1e-3);
        assert!((candy.vel.y + BUBBLE_LIFT_SPEED).abs() < 1e-6);
    }

    #[test]
    fn test_pop_releases_body() {
        let mut rng = rng();
        let mut bubble = Bubble::new(1, Vec2::new(100.0, 300.0));
        let mut candy = Candy::new(BodyId(9), Vec2::new(100.0, 300.0));
        bubble.apply_effect(&mut candy, true);

        assert_eq!(bubble.pop(&mut rng), Some(BodyId(9)));
        assert!(!bubble.active);
        assert!(!bubble.contains(BodyId(9)));
        assert_eq!(bubble.particles.len(), POP_PARTICLES);
        // Popping twice does nothing
        assert_eq!(bubble.pop(&mut rng), None);
        // A popped bubble no longer captures
        assert_eq!(bubble.apply_effect(&mut candy, true), CaptureChange::None);
    }

    #[test]
    fn test_float_duration_expires() {
        let mut rng = rng();
        let mut bubble = Bubble::new(1, Vec2::new(100.0, 500.0));
        bubble.max_float_ticks = 5;
        let mut candy = Candy::new(BodyId(9), Vec2::new(100.0, 500.0));
        bubble.apply_effect(&mut candy, true);

        let released: Vec<_> = (0..5).filter_map(|_| bubble.update(&mut rng)).collect();
        assert_eq!(released, vec![BodyId(9)]);
        assert!(!bubble.active);
    }

    #[test]
    fn test_dragged_out_releases() {
        let mut bubble = Bubble::new(1, Vec2::new(100.0, 300.0));
        let mut candy = Candy::new(BodyId(9), Vec2::new(100.0, 300.0));
        bubble.apply_effect(&mut candy, true);

        candy.pos = Vec2::new(300.0, 300.0);
        assert_eq!(
            bubble.apply_effect(&mut candy, true),
            CaptureChange::Released(BodyId(9))
        );
        assert_eq!(bubble.state, BubbleState::Free);
    }

    #[test]
    fn test_click_hit_test() {
        let bubble = Bubble::new(1, Vec2::new(100.0, 100.0));
        assert!(bubble.contains_point(Vec2::new(120.0, 100.0)));
        assert!(!bubble.contains_point(Vec2::new(140.0, 100.0)));
    }
}
