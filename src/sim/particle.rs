//! Visual particles for air pillows and bubble pops
//!
//! Not gameplay-affecting. Kept in the simulation so a replay renders the same.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How a particle fades out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Fade {
    /// Counts down whole ticks
    Life(u32),
    /// Fades alpha by a fixed step per tick
    Alpha(f32),
}

/// Alpha lost per tick by `Fade::Alpha` particles
pub const ALPHA_FADE_STEP: f32 = 0.05;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub fade: Fade,
}

impl Particle {
    /// Move and age by one tick
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.fade = match self.fade {
            Fade::Life(ticks) => Fade::Life(ticks.saturating_sub(1)),
            Fade::Alpha(alpha) => Fade::Alpha(alpha - ALPHA_FADE_STEP),
        };
    }

    pub fn is_alive(&self) -> bool {
        match self.fade {
            Fade::Life(ticks) => ticks > 0,
            Fade::Alpha(alpha) => alpha > 0.0,
        }
    }

    /// Opacity in 0-1 for drawing; `Life` particles fade over `full_life` ticks
    pub fn opacity(&self, full_life: u32) -> f32 {
        match self.fade {
            Fade::Life(ticks) => (ticks as f32 / full_life.max(1) as f32).clamp(0.0, 1.0),
            Fade::Alpha(alpha) => alpha.clamp(0.0, 1.0),
        }
    }
}

/// Age every particle and drop the dead ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.update();
    }
    particles.retain(Particle::is_alive);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(fade: Fade) -> Particle {
        Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
            size: 4.0,
            fade,
        }
    }

    #[test]
    fn test_life_particle_expires() {
        let mut particles = vec![particle(Fade::Life(2))];
        update_particles(&mut particles);
        assert_eq!(particles.len(), 1);
        assert_eq!(particles[0].pos, Vec2::new(1.0, 0.0));
        update_particles(&mut particles);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_alpha_particle_expires() {
        let mut particles = vec![particle(Fade::Alpha(0.7))];
        for _ in 0..13 {
            update_particles(&mut particles);
        }
        assert_eq!(particles.len(), 1);
        for _ in 0..2 {
            update_particles(&mut particles);
        }
        assert!(particles.is_empty());
    }

    #[test]
    fn test_opacity() {
        assert_eq!(particle(Fade::Life(25)).opacity(50), 0.5);
        assert_eq!(particle(Fade::Alpha(1.5)).opacity(50), 1.0);
    }
}
