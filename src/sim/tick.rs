//! Per-frame simulation tick
//!
//! Core loop that advances a level deterministically. Order within a tick:
//! pointer events, ropes, force-field timers, air pillows (on candy, then on
//! bubbles), bubble capture, candy position by regime, pickups and bounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BodyId, Candy, DynamicBody};
use super::bubble::{Bubble, CaptureChange};
use super::collision::{candy_goal_collision, candy_out_of_bounds, candy_star_collision};
use super::input::PointerEvent;
use super::state::{GameEvent, GameState, LevelPhase};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{blend_toward, centroid};

/// Input for a single tick: pointer events received since the last one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub events: Vec<PointerEvent>,
}

impl TickInput {
    pub fn with_events(events: impl IntoIterator<Item = PointerEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

/// Advance the level by one frame
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    for event in &input.events {
        apply_pointer_event(state, event, tuning);
    }

    // Nothing moves once the level is decided
    if state.phase.is_over() {
        return;
    }

    state.time_ticks += 1;
    state.trace.update();

    // Ropes
    for rope in &mut state.ropes {
        rope.step_with(
            tuning.gravity,
            tuning.rope_damping,
            tuning.constraint_iterations,
        );
    }

    // Force-field timers and particles
    for bubble in &mut state.bubbles {
        let released = bubble.update(&mut state.rng);
        if released.is_some() {
            state.events.push(GameEvent::BubblePopped {
                bubble_id: bubble.id,
            });
        }
        release_candy(&mut state.candy, &mut state.capture, bubble, released);
    }
    for pillow in &mut state.air_pillows {
        pillow.update(&mut state.rng);
    }

    // Air pillows push the candy whether or not it is tied, then the bubbles
    let pillow_active = state.any_pillow_active();
    for pillow in &mut state.air_pillows {
        pillow.apply_effect(&mut state.candy, &mut state.rng);
    }
    for pillow in &state.air_pillows {
        pillow.affect_bubbles(&mut state.bubbles);
    }

    // Bubbles; the first one to claim the candy keeps it
    for bubble in &mut state.bubbles {
        let may_capture = state.capture.is_none();
        match bubble.apply_effect(&mut state.candy, may_capture) {
            CaptureChange::Captured(_) => {
                log::info!("Bubble {} captured the candy", bubble.id);
                state.capture = Some(bubble.id);
                state.events.push(GameEvent::BubbleCaptured {
                    bubble_id: bubble.id,
                });
            }
            CaptureChange::Released(body) => {
                log::debug!("Candy slipped out of bubble {}", bubble.id);
                release_candy(&mut state.candy, &mut state.capture, bubble, Some(body));
            }
            CaptureChange::None => {}
        }
    }

    resolve_candy(state, tuning, pillow_active);
    check_pickups(state, tuning);
}

/// Move the candy according to whichever regime owns it this tick
fn resolve_candy(state: &mut GameState, tuning: &Tuning, pillow_active: bool) {
    let candy_id = state.candy.id;
    let captured_by = state
        .capture
        .and_then(|id| state.bubbles.iter().position(|b| b.id == id))
        .filter(|&i| state.bubbles[i].contains(candy_id));

    let rope_end = centroid(state.attached_ropes().map(|r| r.last_point()));

    match (rope_end, captured_by) {
        (Some(rope_end), Some(i)) => {
            // Bubble keeps most of the control, the ropes tug on it
            let bubble = &mut state.bubbles[i];
            bubble.pos.x = blend_toward(bubble.pos, rope_end, BUBBLE_ROPE_BLEND).x;
            if bubble.pos.y > rope_end.y {
                bubble.pos.y -= bubble.lift_speed * BUBBLE_TETHERED_LIFT_SCALE;
            } else {
                bubble.pos.y = blend_toward(bubble.pos, rope_end, BUBBLE_ROPE_BLEND).y;
            }
            state.candy.pos = bubble.pos;
        }
        (Some(rope_end), None) if pillow_active => {
            // Ropes dominate but the air keeps some of its push
            let candy = &mut state.candy;
            candy.pos = blend_toward(candy.pos, rope_end, AIR_ROPE_BLEND);
            candy.pos += candy.vel * AIR_VELOCITY_SCALE;
            candy.vel *= AIR_TETHER_DRAG;
        }
        (Some(rope_end), None) => {
            state.candy.pos = rope_end;
            state.candy.vel = Vec2::ZERO;
        }
        (None, None) => {
            let candy = &mut state.candy;
            candy.apply_gravity(tuning.gravity);
            candy.pos += candy.vel;
            candy.vel *= tuning.free_drag;
        }
        // Captured and untied: the bubble already placed the candy
        (None, Some(_)) => {}
    }

    if rope_end.is_some() {
        let pos = state.candy.pos;
        for rope in state.ropes.iter_mut().filter(|r| r.is_attached()) {
            rope.set_last_point(pos);
        }
    }
}

/// Stars, goal and falling out of the playfield
fn check_pickups(state: &mut GameState, tuning: &Tuning) {
    let candy = &state.candy;
    let events = &mut state.events;
    let before = state.stars.len();
    state.stars.retain(|star| {
        if candy_star_collision(candy, star) {
            events.push(GameEvent::StarCollected { star_id: star.id });
            false
        } else {
            true
        }
    });
    let collected = (before - state.stars.len()) as u32;
    if collected > 0 {
        state.stars_collected += collected;
        log::info!("Star collected ({} so far)", state.stars_collected);
    }

    if candy_goal_collision(&state.candy, state.goal, tuning.goal_radius) {
        log::info!("Level complete at tick {}", state.time_ticks);
        state.phase = LevelPhase::Complete;
        state.events.push(GameEvent::LevelComplete);
    } else if candy_out_of_bounds(&state.candy, tuning.fall_line()) {
        log::info!("Level failed at tick {}", state.time_ticks);
        state.phase = LevelPhase::Failed;
        state.events.push(GameEvent::LevelFailed);
    }
}

/// Hand the candy back to normal physics after `bubble` let go of `released`
fn release_candy(
    candy: &mut Candy,
    capture: &mut Option<u32>,
    bubble: &Bubble,
    released: Option<BodyId>,
) {
    if released != Some(candy.id()) {
        return;
    }
    if *capture == Some(bubble.id) {
        *capture = None;
    }
    candy.set_velocity(bubble.release_velocity());
}

/// Apply one pointer event to the gesture and force-field state
pub fn apply_pointer_event(state: &mut GameState, event: &PointerEvent, tuning: &Tuning) {
    match *event {
        PointerEvent::Down { x, y } => {
            if !state.phase.is_over() {
                pointer_down(state, Vec2::new(x, y));
            }
        }
        PointerEvent::Move { x, y } => {
            if state.pointer.cutting && !state.phase.is_over() {
                pointer_move(state, Vec2::new(x, y), tuning);
            }
        }
        // Releasing always lets go, even mid-stroke
        PointerEvent::Up { .. } | PointerEvent::Leave => release_pointer(state),
    }
}

fn pointer_down(state: &mut GameState, p: Vec2) {
    // A press without a release in between still ends the previous gesture
    release_pointer(state);

    // Bubbles take priority over everything else
    if let Some(bubble) = state.bubbles.iter_mut().find(|b| b.contains_point(p)) {
        log::info!("Bubble {} popped", bubble.id);
        let released = bubble.pop(&mut state.rng);
        state.events.push(GameEvent::BubblePopped {
            bubble_id: bubble.id,
        });
        release_candy(&mut state.candy, &mut state.capture, bubble, released);
        return;
    }

    if let Some(i) = state.air_pillows.iter().position(|pl| pl.contains_point(p)) {
        state.air_pillows[i].activate();
        state.pointer.held_pillow = Some(i);
        return;
    }

    state.pointer.cutting = true;
    state.pointer.last = p;
    state.trace.start(p);
}

fn pointer_move(state: &mut GameState, p: Vec2, tuning: &Tuning) {
    state.trace.add_point(p);

    let last = state.pointer.last;
    for rope in &mut state.ropes {
        if let Some(joint) = rope.cut_with_tolerance(last, p, tuning.cut_tolerance) {
            log::info!("Rope {} cut at joint {}", rope.id, joint);
            state.events.push(GameEvent::RopeCut {
                rope_id: rope.id,
                joint,
            });
        }
    }

    state.pointer.last = p;
}

fn release_pointer(state: &mut GameState) {
    if let Some(i) = state.pointer.release() {
        if let Some(pillow) = state.air_pillows.get_mut(i) {
            pillow.deactivate();
        }
    }
    state.trace.end();
}
