//! Game state and core simulation types
//!
//! Everything a running level needs lives here, so a state can be cloned,
//! serialized, or rebuilt from its level and seed.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::air_pillow::AirPillow;
use super::body::{BodyId, Candy};
use super::bubble::Bubble;
use super::geometry::Rect;
use super::input::PointerState;
use super::rope::Rope;
use super::trace::Trace;
use crate::consts::STAR_SIZE;
use crate::error::SimResult;
use crate::level::Level;

/// Current phase of the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Simulation running
    Playing,
    /// Candy reached the goal
    Complete,
    /// Candy fell out of the playfield
    Failed,
}

impl LevelPhase {
    pub fn is_over(&self) -> bool {
        !matches!(self, LevelPhase::Playing)
    }
}

/// Events emitted by `tick` for the UI/game-state layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    StarCollected { star_id: u32 },
    LevelComplete,
    LevelFailed,
    RopeCut { rope_id: u32, joint: usize },
    BubbleCaptured { bubble_id: u32 },
    BubblePopped { bubble_id: u32 },
}

/// A collectible star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
}

/// Complete state of one running level (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Level this state was built from (for restart)
    pub level: Level,
    /// Seed for particle randomness
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: LevelPhase,
    /// Ropes in level order (one per anchor)
    pub ropes: Vec<Rope>,
    pub candy: Candy,
    pub goal: Vec2,
    /// Stars not yet collected
    pub stars: Vec<Star>,
    pub stars_collected: u32,
    pub bubbles: Vec<Bubble>,
    pub air_pillows: Vec<AirPillow>,
    /// Id of the bubble holding the candy; only one may at a time
    pub capture: Option<u32>,
    pub pointer: PointerState,
    pub trace: Trace,
    /// Events since the last `drain_events`
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Build the initial state for `level`
    ///
    /// Construction only; nothing is simulated until the first `tick`.
    pub fn initialize_level(level: &Level, seed: u64) -> SimResult<Self> {
        level.validate()?;

        let candy_start: Vec2 = level.candy.into();
        let mut state = Self {
            level: level.clone(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: LevelPhase::Playing,
            ropes: Vec::with_capacity(level.anchors.len()),
            candy: Candy::new(BodyId(0), candy_start),
            goal: level.goal.into(),
            stars: Vec::with_capacity(level.stars.len()),
            stars_collected: 0,
            bubbles: Vec::with_capacity(level.bubbles.len()),
            air_pillows: Vec::with_capacity(level.air_pillows.len()),
            capture: None,
            pointer: PointerState::default(),
            trace: Trace::default(),
            events: Vec::new(),
            next_id: 1,
        };

        state.candy.id = BodyId(state.next_entity_id());

        for anchor in &level.anchors {
            let id = state.next_entity_id();
            state
                .ropes
                .push(Rope::new(id, (*anchor).into(), candy_start, level.rope_segments));
        }
        for star in &level.stars {
            let id = state.next_entity_id();
            state.stars.push(Star {
                id,
                pos: (*star).into(),
                size: STAR_SIZE,
            });
        }
        for bubble in &level.bubbles {
            let id = state.next_entity_id();
            state.bubbles.push(Bubble::new(id, (*bubble).into()));
        }
        for pillow in &level.air_pillows {
            let id = state.next_entity_id();
            let rect = Rect::new(pillow.x, pillow.y, pillow.width, pillow.height);
            state.air_pillows.push(AirPillow::new(id, rect));
        }

        log::info!(
            "Level '{}' initialized: {} ropes, {} stars, {} bubbles, {} air pillows",
            level.title(),
            state.ropes.len(),
            state.stars.len(),
            state.bubbles.len(),
            state.air_pillows.len()
        );

        Ok(state)
    }

    /// Start the same level over ("try again")
    pub fn restart(&mut self) {
        let level = self.level.clone();
        match Self::initialize_level(&level, self.seed) {
            Ok(fresh) => *self = fresh,
            // Unreachable in practice: the level was validated when this state was built
            Err(e) => log::error!("Restart failed: {}", e),
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ropes still tying the candy to an anchor
    pub fn attached_ropes(&self) -> impl Iterator<Item = &Rope> {
        self.ropes.iter().filter(|r| r.is_attached())
    }

    /// The bubble holding the candy, if any
    pub fn capturing_bubble(&self) -> Option<&Bubble> {
        let id = self.capture?;
        self.bubbles
            .iter()
            .find(|b| b.id == id && b.contains(self.candy.id))
    }

    pub fn is_captured(&self) -> bool {
        self.capturing_bubble().is_some()
    }

    pub fn any_pillow_active(&self) -> bool {
        self.air_pillows.iter().any(|p| p.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level;

    #[test]
    fn test_initialize_builtin_level() {
        let level = level::builtin(3).unwrap();
        let state = GameState::initialize_level(&level, 42).unwrap();

        assert_eq!(state.phase, LevelPhase::Playing);
        assert_eq!(state.ropes.len(), 2);
        assert_eq!(state.stars.len(), 3);
        assert_eq!(state.bubbles.len(), 2);
        assert_eq!(state.air_pillows.len(), 1);
        assert_eq!(state.candy.pos, Vec2::new(453.0, 252.0));
        assert_eq!(state.candy.vel, Vec2::ZERO);
        for rope in &state.ropes {
            assert_eq!(rope.joints().len(), 9);
            assert_eq!(rope.last_point(), state.candy.pos);
        }
        assert!(!state.is_captured());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let level = level::builtin(3).unwrap();
        let state = GameState::initialize_level(&level, 1).unwrap();

        let mut ids = vec![state.candy.id.0];
        ids.extend(state.ropes.iter().map(|r| r.id));
        ids.extend(state.stars.iter().map(|s| s.id));
        ids.extend(state.bubbles.iter().map(|b| b.id));
        ids.extend(state.air_pillows.iter().map(|p| p.id));
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_invalid_level_refused() {
        let mut level = level::builtin(1).unwrap();
        level.anchors.clear();
        assert!(GameState::initialize_level(&level, 1).is_err());
    }

    #[test]
    fn test_restart_restores_initial_state() {
        let level = level::builtin(1).unwrap();
        let mut state = GameState::initialize_level(&level, 5).unwrap();
        state.candy.pos = Vec2::new(0.0, 900.0);
        state.phase = LevelPhase::Failed;
        state.stars.clear();

        state.restart();
        assert_eq!(state.phase, LevelPhase::Playing);
        assert_eq!(state.candy.pos, Vec2::new(401.0, 191.0));
        assert_eq!(state.stars.len(), 3);
    }

    #[test]
    fn test_state_serializes() {
        let level = level::builtin(2).unwrap();
        let state = GameState::initialize_level(&level, 5).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ropes.len(), 3);
        assert_eq!(back.candy.pos, state.candy.pos);
    }
}
