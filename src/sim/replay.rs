//! Recorded input scripts
//!
//! A script is a level, a seed and the pointer events with the tick they
//! arrive on. Since the simulation is deterministic, running a script always
//! ends the same way, which makes scripts usable both as bug reports and as
//! regression tests.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::input::PointerEvent;
use super::state::{GameEvent, GameState, LevelPhase};
use super::tick::{TickInput, tick};
use crate::error::SimResult;
use crate::level::Level;
use crate::tuning::Tuning;

/// A level plus timed pointer events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    pub level: Level,
    #[serde(default)]
    pub seed: u64,
    /// `(tick, event)` pairs; events for tick `n` are fed into the `n`th call
    /// to `tick`, counting from zero
    #[serde(default)]
    pub events: Vec<(u64, PointerEvent)>,
}

/// How a replay ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub phase: LevelPhase,
    /// Simulated ticks
    pub ticks: u64,
    pub stars_collected: u32,
    /// Every event emitted along the way
    pub events: Vec<GameEvent>,
}

impl ReplayScript {
    pub fn new(level: Level, seed: u64) -> Self {
        Self {
            level,
            seed,
            events: Vec::new(),
        }
    }

    /// Queue `event` for tick `at`
    pub fn push(&mut self, at: u64, event: PointerEvent) -> &mut Self {
        self.events.push((at, event));
        self
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        let script: ReplayScript = serde_json::from_str(json)?;
        script.level.validate()?;
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Input for tick `at`, in script order
    fn input_at(&self, at: u64) -> TickInput {
        TickInput::with_events(
            self.events
                .iter()
                .filter(|(t, _)| *t == at)
                .map(|(_, e)| *e),
        )
    }
}

/// Run `script` until the level is decided or `max_ticks` have passed
pub fn run(script: &ReplayScript, tuning: &Tuning, max_ticks: u64) -> SimResult<ReplayOutcome> {
    let mut state = GameState::initialize_level(&script.level, script.seed)?;
    let mut events = Vec::new();

    for at in 0..max_ticks {
        tick(&mut state, &script.input_at(at), tuning);
        events.extend(state.drain_events());
        if state.phase.is_over() {
            break;
        }
    }

    log::info!(
        "Replay finished: {:?} after {} ticks, {} stars",
        state.phase,
        state.time_ticks,
        state.stars_collected
    );

    Ok(ReplayOutcome {
        phase: state.phase,
        ticks: state.time_ticks,
        stars_collected: state.stars_collected,
        events,
    })
}
