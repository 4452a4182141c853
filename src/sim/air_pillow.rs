//! Air pillows: held-down fans that blow the candy and bubbles away
//!
//! A pillow is active only while the pointer is held on it. While active it
//! pushes any body inside its influence box away from its center, with a force
//! that falls off linearly to zero at the falloff radius. Bubbles are nudged
//! directly by position with their own, wider falloff.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::DynamicBody;
use super::bubble::Bubble;
use super::geometry::Rect;
use super::particle::{Fade, Particle, update_particles};
use crate::consts::*;

/// Cap on live particles per pillow
pub const MAX_PARTICLES_PER_PILLOW: usize = 256;
/// Particles emitted toward the body each tick it is being pushed
const PUSH_BURST: usize = 10;

/// Falloff parameters for one kind of target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Falloff {
    /// Distance at which the push reaches zero
    pub radius: f32,
    /// Multiplier on the pillow strength
    pub factor: f32,
    /// Influence box margin left of / above the pillow
    pub reach_before: f32,
    /// Influence box margin right of / below the pillow
    pub reach_after: f32,
}

impl Falloff {
    pub const BODY: Falloff = Falloff {
        radius: AIR_BODY_FALLOFF,
        factor: AIR_BODY_FACTOR,
        reach_before: 200.0,
        reach_after: 300.0,
    };

    pub const BUBBLE: Falloff = Falloff {
        radius: AIR_BUBBLE_FALLOFF,
        factor: AIR_BUBBLE_FACTOR,
        reach_before: 300.0,
        reach_after: 400.0,
    };
}

/// An air pillow force field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirPillow {
    pub id: u32,
    pub rect: Rect,
    pub strength: f32,
    pub body_falloff: Falloff,
    pub bubble_falloff: Falloff,
    pub active: bool,
    particle_timer: u32,
    #[serde(skip)]
    pub particles: Vec<Particle>,
}

impl AirPillow {
    pub fn new(id: u32, rect: Rect) -> Self {
        Self {
            id,
            rect,
            strength: AIR_PILLOW_STRENGTH,
            body_falloff: Falloff::BODY,
            bubble_falloff: Falloff::BUBBLE,
            active: false,
            particle_timer: 0,
            particles: Vec::new(),
        }
    }

    /// Pointer-down hit test
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.rect.contains(p)
    }

    pub fn activate(&mut self) {
        if !self.active {
            log::debug!("Air pillow {} on", self.id);
        }
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        if self.active {
            log::debug!("Air pillow {} off", self.id);
        }
        self.active = false;
    }

    /// Push on a target at `target`, or `None` outside the influence box
    ///
    /// Direction is center to target, magnitude
    /// `max(0, 1 - d / radius) * strength * factor`. A target exactly at the
    /// center has no direction and gets no push.
    pub fn push_at(&self, target: Vec2, falloff: &Falloff) -> Option<Vec2> {
        let reach = self
            .rect
            .expanded(falloff.reach_before, falloff.reach_after);
        if !reach.strictly_contains(target) {
            return None;
        }

        let offset = target - self.rect.center();
        let dist = offset.length();
        if dist <= 0.0 {
            return Some(Vec2::ZERO);
        }

        let magnitude = (1.0 - dist / falloff.radius).max(0.0) * self.strength * falloff.factor;
        Some(offset / dist * magnitude)
    }

    /// Age particles and keep the stream going while held
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.active {
            self.particle_timer += 1;
            if self.particle_timer >= AIR_PARTICLE_INTERVAL {
                self.particle_timer = 0;
                self.emit_stream_particle(rng);
            }
        }

        update_particles(&mut self.particles);
    }

    fn emit_stream_particle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let center = self.rect.center();
        let height = self.rect.size.y;
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

        self.push_particle(Particle {
            pos: Vec2::new(
                center.x,
                center.y + rng.random_range(-0.3..0.3) * height,
            ),
            vel: Vec2::new(
                self.strength * 1.5 * direction,
                rng.random_range(-0.25..0.25),
            ),
            size: rng.random_range(5.0..10.0),
            fade: Fade::Alpha(0.7),
        });
    }

    fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() < MAX_PARTICLES_PER_PILLOW {
            self.particles.push(particle);
        }
    }

    /// Blow on the body, whether or not it is still tied to ropes
    ///
    /// Returns the force applied.
    pub fn apply_effect<B, R>(&mut self, body: &mut B, rng: &mut R) -> Option<Vec2>
    where
        B: DynamicBody + ?Sized,
        R: Rng + ?Sized,
    {
        if !self.active {
            return None;
        }

        let target = body.position();
        let force = self.push_at(target, &self.body_falloff)?;
        body.apply_directional_force(force);

        let center = self.rect.center();
        let toward = (target - center) / 50.0;
        for _ in 0..PUSH_BURST {
            let jitter = Vec2::new(rng.random_range(-0.4..0.4), rng.random_range(-0.4..0.4));
            self.push_particle(Particle {
                pos: center + jitter * self.rect.size * 2.0,
                vel: Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0)) + toward,
                size: rng.random_range(3.0..8.0),
                fade: Fade::Alpha(1.0),
            });
        }

        Some(force)
    }

    /// Nudge every active bubble in reach by position
    pub fn affect_bubbles(&self, bubbles: &mut [Bubble]) {
        if !self.active {
            return;
        }

        for bubble in bubbles.iter_mut().filter(|b| b.active) {
            if let Some(nudge) = self.push_at(bubble.pos, &self.bubble_falloff) {
                bubble.pos += nudge;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{BodyId, Candy};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pillow() -> AirPillow {
        // Center at (200, 315)
        AirPillow::new(1, Rect::new(150.0, 300.0, 100.0, 30.0))
    }

    #[test]
    fn test_inactive_does_nothing() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = pillow();
        let mut candy = Candy::new(BodyId(1), Vec2::new(300.0, 315.0));
        assert_eq!(p.apply_effect(&mut candy, &mut rng), None);
        assert_eq!(candy.vel, Vec2::ZERO);
    }

    #[test]
    fn test_push_away_with_linear_falloff() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = pillow();
        p.activate();
        let mut candy = Candy::new(BodyId(1), Vec2::new(300.0, 315.0));

        let force = p.apply_effect(&mut candy, &mut rng).unwrap();
        // d = 100: (1 - 100/400) * 8 * 0.2 = 1.2, straight along +x
        assert!((force.x - 1.2).abs() < 1e-5);
        assert!(force.y.abs() < 1e-5);
        assert_eq!(candy.vel, force);
        assert_eq!(p.particles.len(), PUSH_BURST);
    }

    #[test]
    fn test_beyond_falloff_zero_force() {
        let p = {
            let mut p = pillow();
            p.activate();
            p
        };
        // Inside the influence box but past the falloff radius
        let force = p.push_at(Vec2::new(200.0, 640.0), &Falloff::BUBBLE);
        assert!(force.is_some());
        let force = p.push_at(Vec2::new(540.0, 620.0), &Falloff::BODY).unwrap();
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_outside_influence_box() {
        let p = pillow();
        assert_eq!(p.push_at(Vec2::new(-60.0, 315.0), &Falloff::BODY), None);
        assert_eq!(p.push_at(Vec2::new(200.0, 700.0), &Falloff::BODY), None);
    }

    #[test]
    fn test_center_has_no_direction() {
        let p = pillow();
        assert_eq!(p.push_at(Vec2::new(200.0, 315.0), &Falloff::BODY), Some(Vec2::ZERO));
    }

    #[test]
    fn test_affect_bubbles_nudges_positions() {
        let mut p = pillow();
        let mut bubbles = vec![
            Bubble::new(1, Vec2::new(200.0, 415.0)),
            Bubble::new(2, Vec2::new(200.0, 215.0)),
        ];
        bubbles[1].active = false;

        p.affect_bubbles(&mut bubbles);
        assert_eq!(bubbles[0].pos, Vec2::new(200.0, 415.0));

        p.activate();
        p.affect_bubbles(&mut bubbles);
        // d = 100: (1 - 100/500) * 8 * 0.3 = 1.92 downward
        assert!((bubbles[0].pos.y - 416.92).abs() < 1e-3);
        // Popped bubbles are left alone
        assert_eq!(bubbles[1].pos, Vec2::new(200.0, 215.0));
    }

    #[test]
    fn test_stream_particles_only_while_held() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = pillow();
        for _ in 0..20 {
            p.update(&mut rng);
        }
        assert!(p.particles.is_empty());

        p.activate();
        for _ in 0..AIR_PARTICLE_INTERVAL {
            p.update(&mut rng);
        }
        assert_eq!(p.particles.len(), 1);
    }
}
