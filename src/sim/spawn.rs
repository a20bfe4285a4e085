//! Target spawn and lifecycle scheduling
//!
//! Moving mode spawns drifting targets at random and culls them off the left
//! edge. Standard mode keeps a single target slot: a *fresh* fill consumes one
//! unit of the spawn cap, a *replacement* (after a hit or a relocation
//! timeout) never does. The two transitions are separate functions so the
//! counter cannot be bumped by accident.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameMode, GamePhase, GameState, MovingTarget, StandardTarget, Target};
use crate::consts::*;

/// Spawn the opening targets for a new session
pub fn populate_initial(state: &mut GameState, now_ms: f64) {
    match state.mode {
        GameMode::Moving => {
            for _ in 0..MOVING_INITIAL_COUNT {
                spawn_moving_target(state);
            }
        }
        GameMode::Standard => {
            fill_standard_slot(state, now_ms);
        }
    }
}

/// Random value in `[min, min + span)`, with negative spans treated as empty
fn random_in(rng: &mut impl Rng, min: f32, span: f32) -> f32 {
    min + rng.random::<f32>() * span.max(0.0)
}

/// Push a new moving target just beyond the right edge
pub fn spawn_moving_target(state: &mut GameState) {
    let size = random_in(&mut state.rng, MOVING_MIN_SIZE, MOVING_SIZE_RANGE);
    let y = random_in(&mut state.rng, TARGET_MIN_Y, state.height - TARGET_Y_RESERVED);
    let speed = random_in(&mut state.rng, MOVING_MIN_SPEED, MOVING_SPEED_RANGE);
    let x = state.width + random_in(&mut state.rng, MOVING_SPAWN_OFFSET, MOVING_SPAWN_JITTER);

    let id = state.next_entity_id();
    state.targets.push(Target::Moving(MovingTarget {
        id,
        pos: Vec2::new(x, y),
        size,
        speed,
    }));
    log::debug!("Moving target {} spawned (size {:.0}, speed {:.2})", id, size, speed);
}

/// Roll the per-tick chance of a new moving target
pub fn maybe_spawn_moving(state: &mut GameState) {
    if state.rng.random::<f32>() < MOVING_SPAWN_CHANCE {
        spawn_moving_target(state);
    }
}

/// Advance moving targets and drop those past the left margin
pub fn move_and_cull(state: &mut GameState, scale: f32) {
    for target in &mut state.targets {
        if let Target::Moving(t) = target {
            t.pos.x -= t.speed * scale;
        }
    }
    state
        .targets
        .retain(|t| !matches!(t, Target::Moving(m) if m.is_gone()));
}

/// Build a randomly placed standard target with an armed relocation deadline
fn random_standard_target(state: &mut GameState, now_ms: f64) -> StandardTarget {
    let x = random_in(&mut state.rng, STANDARD_MIN_X, state.width - STANDARD_X_RESERVED);
    let y = random_in(&mut state.rng, TARGET_MIN_Y, state.height - TARGET_Y_RESERVED);
    StandardTarget {
        id: state.next_entity_id(),
        pos: Vec2::new(x, y),
        size: STANDARD_SIZE,
        hit: false,
        created_ms: now_ms,
        relocate_at_ms: now_ms + STANDARD_RELOCATE_MS,
    }
}

/// Fill the standard slot if it is empty and the cap allows.
///
/// Returns the new target's id when one was created. When the slot is
/// empty and the cap is spent the session moves to `GamePhase::Finished`.
pub fn fill_standard_slot(state: &mut GameState, now_ms: f64) -> Option<u32> {
    if state.standard_count() > 0 {
        return None;
    }

    if state.standard_exhausted() {
        if state.phase != GamePhase::Finished {
            state.phase = GamePhase::Finished;
            state.events.push(GameEvent::StandardExhausted);
            log::info!("All {} standard targets used", STANDARD_SPAWN_CAP);
        }
        return None;
    }

    let target = random_standard_target(state, now_ms);
    let id = target.id;
    state.standard_spawned += 1;
    log::debug!(
        "Standard target {} spawned ({}/{})",
        id,
        state.standard_spawned,
        STANDARD_SPAWN_CAP
    );
    state.targets.push(Target::Standard(target));
    state.events.push(GameEvent::StandardSpawned {
        ordinal: state.standard_spawned,
    });
    Some(id)
}

/// Swap the standard target at `index` for a freshly placed one.
///
/// The slot is overwritten in a single assignment and the spawn counter is
/// left alone. Returns the new target's id, or `None` when `index` does not
/// hold a standard target.
pub fn replace_standard_target(state: &mut GameState, index: usize, now_ms: f64) -> Option<u32> {
    if !matches!(state.targets.get(index), Some(Target::Standard(_))) {
        return None;
    }
    let replacement = random_standard_target(state, now_ms);
    let new_id = replacement.id;
    state.targets[index] = Target::Standard(replacement);
    Some(new_id)
}

/// Relocate every standard target whose deadline has passed without a hit.
///
/// Runs against the wall clock before each simulation step, paused or not.
pub fn process_relocations(state: &mut GameState, now_ms: f64) {
    let due: Vec<(usize, u32)> = state
        .targets
        .iter()
        .enumerate()
        .filter_map(|(idx, t)| match t {
            Target::Standard(s) if s.relocation_due(now_ms) => Some((idx, s.id)),
            _ => None,
        })
        .collect();

    for &(idx, old_id) in &due {
        if let Some(new_id) = replace_standard_target(state, idx, now_ms) {
            log::debug!("Standard target {} relocated as {}", old_id, new_id);
            state.events.push(GameEvent::TargetRelocated { old_id, new_id });
        }
    }
}
