//! Per-frame simulation step
//!
//! Advances arrows, targets and messages by the frame's elapsed time and
//! resolves hits. Motion is expressed per reference frame and scaled by
//! `elapsed / REFERENCE_FRAME_MS`, with the elapsed time clamped so a stalled
//! tab does not teleport arrows through targets.

use glam::Vec2;
use rand::Rng;

use super::collision::scoring_arrow;
use super::spawn;
use super::state::{FloatingMessage, GameEvent, GameMode, GamePhase, GameState, PRAISES, TargetKind};
use crate::consts::*;
use crate::frame_scale;

/// Input gathered since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position in canvas pixels
    pub pointer: Option<Vec2>,
    /// Primary button went down (start drawing)
    pub press: bool,
    /// Primary button went up (loose the arrow)
    pub release: bool,
    /// Fixed-power shot (Space)
    pub quick_shot: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start the session over
    pub restart: bool,
}

/// Release speed for a hold fraction in `0..=1`
pub fn draw_speed(hold_fraction: f32) -> f32 {
    ARROW_BASE_SPEED + hold_fraction.clamp(0.0, 1.0) * ARROW_POWER_SPEED
}

/// Advance the game to wall-clock time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    let elapsed = now_ms - state.last_frame_ms;
    let dt = if elapsed.is_finite() {
        elapsed.clamp(0.0, MAX_FRAME_MS)
    } else {
        0.0
    };
    if now_ms > state.last_frame_ms {
        state.last_frame_ms = now_ms;
    }
    advance(state, input, dt, now_ms);
}

/// Advance the game by an explicit (already clamped) `dt_ms`.
///
/// `now_ms` is the wall clock used for relocation deadlines and hold timing.
pub fn advance(state: &mut GameState, input: &TickInput, dt_ms: f64, now_ms: f64) {
    if input.restart {
        state.restart(now_ms);
        return;
    }

    // Relocation deadlines run on the wall clock, paused or not
    spawn::process_relocations(state, now_ms);

    if let Some(pointer) = input.pointer.filter(|p| p.is_finite()) {
        state.pointer = pointer;
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            GamePhase::Finished => {}
        }
    }

    if state.phase == GamePhase::Paused {
        // A string let go while paused is dropped, not fired
        if input.release {
            state.draw.release(now_ms);
        }
        return;
    }

    if input.press {
        state.draw.begin(now_ms);
    }
    if input.release {
        if let Some(held) = state.draw.release(now_ms) {
            state.fire(draw_speed(held), false, now_ms);
        }
    }
    if input.quick_shot {
        state.fire(QUICK_SHOT_SPEED, true, now_ms);
    }

    state.draw.charge(dt_ms);

    let scale = frame_scale(dt_ms);
    update_arrows(state, scale);

    match state.mode {
        GameMode::Moving => {
            spawn::maybe_spawn_moving(state);
            spawn::move_and_cull(state, scale);
        }
        GameMode::Standard => {
            spawn::fill_standard_slot(state, now_ms);
        }
    }

    resolve_hits(state, now_ms);

    state.messages.retain_mut(|m| m.advance(scale));
}

fn update_arrows(state: &mut GameState, scale: f32) {
    let (width, height) = (state.width, state.height);
    for arrow in &mut state.arrows {
        arrow.integrate(scale);
    }
    state.arrows.retain(|a| !a.out_of_bounds(width, height));
}

/// Score every target that has an arrow in its hit zone.
///
/// Targets are scanned last to first so removal keeps earlier indices valid.
/// A replaced standard target is not re-checked in the same tick.
fn resolve_hits(state: &mut GameState, now_ms: f64) {
    let mut ti = state.targets.len();
    while ti > 0 {
        ti -= 1;
        let Some(ai) = scoring_arrow(&state.arrows, &state.targets[ti]) else {
            continue;
        };
        let arrow = state.arrows.remove(ai);

        let target = &state.targets[ti];
        let (target_id, kind, pos) = (target.id(), target.kind(), target.pos());

        let points = kind.points();
        state.score += points;
        let praise = PRAISES[state.rng.random_range(0..PRAISES.len())];
        state.messages.push(FloatingMessage::at_target(praise, pos));
        state.events.push(GameEvent::TargetHit {
            target_id,
            kind,
            points,
            praise,
            pos,
        });
        log::debug!(
            "Arrow {} hit target {} for {} (score {})",
            arrow.id,
            target_id,
            points,
            state.score
        );

        match kind {
            TargetKind::Moving => {
                state.targets.remove(ti);
            }
            TargetKind::Standard => {
                spawn::replace_standard_target(state, ti, now_ms);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Arrow, MovingTarget, Target};

    const FRAME: f64 = REFERENCE_FRAME_MS;

    fn arrow_at(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.arrows.push(Arrow {
            id,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            spawned_ms: 0.0,
        });
    }

    fn moving_at(state: &mut GameState, pos: Vec2, size: f32) {
        let id = state.next_entity_id();
        state.targets.push(Target::Moving(MovingTarget {
            id,
            pos,
            size,
            speed: 0.0,
        }));
    }

    #[test]
    fn test_quick_shot_speed_is_fixed() {
        let mut state = GameState::new(GameMode::Moving, 1280.0, 720.0, 1, 0.0);
        let press = TickInput {
            press: true,
            ..Default::default()
        };
        advance(&mut state, &press, FRAME, 0.0);

        // Holding for a long time does not affect the quick shot
        let quick = TickInput {
            quick_shot: true,
            ..Default::default()
        };
        advance(&mut state, &quick, 0.0, 3000.0);
        let speed = state.arrows[0].vel.length();
        assert!((speed - QUICK_SHOT_SPEED).abs() < 1e-3);
        assert!(state.draw.is_drawing());
    }

    #[test]
    fn test_release_speed_follows_hold_time() {
        let mut speeds = Vec::new();
        for hold_ms in [0.0, 300.0, 600.0, 900.0, 2000.0] {
            let mut state = GameState::new(GameMode::Moving, 1280.0, 720.0, 1, 0.0);
            let press = TickInput {
                press: true,
                ..Default::default()
            };
            advance(&mut state, &press, 0.0, 1000.0);
            let release = TickInput {
                release: true,
                ..Default::default()
            };
            advance(&mut state, &release, 0.0, 1000.0 + hold_ms);
            assert_eq!(state.draw.power, 0.0);
            speeds.push(state.arrows[0].vel.length());
        }
        assert!((speeds[0] - 24.0).abs() < 1e-3);
        assert!(speeds.windows(2).all(|w| w[1] >= w[0]));
        assert!((speeds[3] - 52.0).abs() < 1e-3);
        assert!((speeds[4] - 52.0).abs() < 1e-3);
    }

    #[test]
    fn test_arrow_aims_at_pointer_from_hand() {
        let mut state = GameState::new(GameMode::Moving, 1280.0, 720.0, 1, 0.0);
        let input = TickInput {
            pointer: Some(Vec2::new(800.0, 560.0)),
            quick_shot: true,
            ..Default::default()
        };
        advance(&mut state, &input, 0.0, 0.0);
        let arrow = &state.arrows[0];
        // Hand at (200, 560); pointer straight to the right
        assert!((arrow.pos - Vec2::new(228.0, 560.0)).length() < 1e-3);
        assert!(arrow.angle.abs() < 1e-6);
    }

    #[test]
    fn test_arrow_integration_and_gravity() {
        let mut state = GameState::new(GameMode::Moving, 1280.0, 720.0, 1, 0.0);
        state.targets.clear();
        state.pointer = Vec2::new(800.0, 560.0);
        state.fire(24.0, true, 0.0);

        let before = state.arrows[0].clone();
        advance(&mut state, &TickInput::default(), FRAME, 0.0);
        let after = &state.arrows[0];
        assert!((after.pos.x - (before.pos.x + 24.0)).abs() < 1e-3);
        assert!((after.vel.y - (before.vel.y + GRAVITY)).abs() < 1e-6);
    }

    #[test]
    fn test_late_session_start_keeps_full_relocation_delay() {
        // Page clocks are well past zero by the time a session starts
        let start = 7300.0;
        let mut state = GameState::new(GameMode::Standard, 1280.0, 720.0, 5, start);
        let id = state.standard_target().unwrap().id;

        tick(&mut state, &TickInput::default(), start + 16.0);
        assert_eq!(state.standard_target().unwrap().id, id);

        tick(&mut state, &TickInput::default(), start + STANDARD_RELOCATE_MS - 1.0);
        assert_eq!(state.standard_target().unwrap().id, id);

        tick(&mut state, &TickInput::default(), start + STANDARD_RELOCATE_MS);
        assert_ne!(state.standard_target().unwrap().id, id);
    }

    #[test]
    fn test_elapsed_time_is_clamped() {
        let mut state = GameState::new(GameMode::Moving, 1280.0, 720.0, 1, 0.0);
        state.targets.clear();
        state.pointer = Vec2::new(800.0, 560.0);
        state.fire(10.0, true, 0.0);
        let x0 = state.arrows[0].pos.x;

        tick(&mut state, &TickInput::default(), 1000.0);
        let moved = state.arrows[0].pos.x - x0;
        let expected = 10.0 * (MAX_FRAME_MS / REFERENCE_FRAME_MS) as f32;
        assert!((moved - expected).abs() < 1e-3);
        assert_eq!(state.last_frame_ms, 1000.0);
    }

    #[test]
    fn test_offscreen_arrow_removed() {
        let mut state = GameState::new(GameMode::Moving, 1280.0, 720.0, 1, 0.0);
        arrow_at(&mut state, Vec2::new(1385.0, 300.0));
        advance(&mut state, &TickInput::default(), FRAME, 0.0);
        assert!(state.arrows.is_empty());
    }

    #[test]
    fn test_standard_hit_scores_and_replaces() {
        let mut state = GameState::new(GameMode::Standard, 1280.0, 720.0, 11, 0.0);
        let target = state.standard_target().unwrap().clone();
        arrow_at(&mut state, target.pos + Vec2::new(28.0, 0.0));
        state.drain_events();

        advance(&mut state, &TickInput::default(), 0.0, 100.0);

        assert_eq!(state.score, 15);
        assert!(state.arrows.is_empty());
        assert_eq!(state.standard_spawned, 1);
        assert_eq!(state.standard_count(), 1);
        let replacement = state.standard_target().unwrap();
        assert_ne!(replacement.id, target.id);
        assert!(!replacement.hit);
        assert_eq!(replacement.relocate_at_ms, 5100.0);

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].pos, target.pos - Vec2::new(0.0, 40.0));
        assert!(PRAISES.contains(&state.messages[0].text));

        let events = state.drain_events();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::TargetHit {
                kind: TargetKind::Standard,
                points: 15,
                ..
            }]
        ));
    }

    #[test]
    fn test_near_miss_does_not_score() {
        let mut state = GameState::new(GameMode::Standard, 1280.0, 720.0, 11, 0.0);
        let pos = state.standard_target().unwrap().pos;
        arrow_at(&mut state, pos + Vec2::new(0.0, 30.0));
        advance(&mut state, &TickInput::default(), 0.0, 100.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.arrows.len(), 1);
    }

    #[test]
    fn test_moving_hit_removes_target() {
        let mut state = GameState::new(GameMode::Moving, 1280.0, 720.0, 2, 0.0);
        state.targets.clear();
        moving_at(&mut state, Vec2::new(700.0, 300.0), 50.0);
        arrow_at(&mut state, Vec2::new(710.0, 300.0));

        advance(&mut state, &TickInput::default(), 0.0, 0.0);
        assert_eq!(state.score, 10);
        assert!(state.targets.iter().all(|t| t.pos() != Vec2::new(700.0, 300.0)));
        assert!(state.arrows.is_empty());
    }

    #[test]
    fn test_one_arrow_per_target_per_tick() {
        let mut state = GameState::new(GameMode::Moving, 1280.0, 720.0, 2, 0.0);
        state.targets.clear();
        moving_at(&mut state, Vec2::new(700.0, 300.0), 50.0);
        arrow_at(&mut state, Vec2::new(700.0, 300.0));
        arrow_at(&mut state, Vec2::new(702.0, 300.0));

        advance(&mut state, &TickInput::default(), 0.0, 0.0);
        assert_eq!(state.score, 10);
        assert_eq!(state.arrows.len(), 1);
        // The newest arrow scored
        assert_eq!(state.arrows[0].pos, Vec2::new(700.0, 300.0));
    }

    #[test]
    fn test_one_arrow_can_only_score_once() {
        let mut state = GameState::new(GameMode::Moving, 1280.0, 720.0, 2, 0.0);
        state.targets.clear();
        moving_at(&mut state, Vec2::new(700.0, 300.0), 50.0);
        moving_at(&mut state, Vec2::new(705.0, 300.0), 50.0);
        arrow_at(&mut state, Vec2::new(702.0, 300.0));

        advance(&mut state, &TickInput::default(), 0.0, 0.0);
        assert_eq!(state.score, 10);
        assert_eq!(
            state
                .targets
                .iter()
                .filter(|t| t.kind() == TargetKind::Moving && t.pos().x < 1000.0)
                .count(),
            1
        );
    }

    #[test]
    fn test_pause_freezes_motion_but_not_relocation() {
        let mut state = GameState::new(GameMode::Standard, 1280.0, 720.0, 4, 0.0);
        let id = state.standard_target().unwrap().id;
        state.pointer = Vec2::new(800.0, 560.0);
        state.fire(24.0, true, 0.0);
        let x0 = state.arrows[0].pos.x;

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        advance(&mut state, &pause, FRAME, 10.0);
        assert_eq!(state.phase, GamePhase::Paused);

        advance(&mut state, &TickInput::default(), FRAME, 6000.0);
        assert_eq!(state.arrows[0].pos.x, x0);
        assert_ne!(state.standard_target().unwrap().id, id);
        assert_eq!(state.standard_spawned, 1);

        advance(&mut state, &pause, FRAME, 6010.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_release_while_paused_does_not_fire() {
        let mut state = GameState::new(GameMode::Moving, 1280.0, 720.0, 4, 0.0);
        let press = TickInput {
            press: true,
            ..Default::default()
        };
        advance(&mut state, &press, FRAME, 0.0);
        let pause_release = TickInput {
            pause: true,
            release: true,
            ..Default::default()
        };
        advance(&mut state, &pause_release, FRAME, 500.0);
        assert!(state.arrows.is_empty());
        assert!(!state.draw.is_drawing());
    }

    #[test]
    fn test_messages_fade_out() {
        let mut state = GameState::new(GameMode::Moving, 1280.0, 720.0, 2, 0.0);
        state.targets.clear();
        state
            .messages
            .push(FloatingMessage::at_target("Nice!", Vec2::new(500.0, 300.0)));
        for _ in 0..66 {
            advance(&mut state, &TickInput::default(), FRAME, 0.0);
        }
        assert_eq!(state.messages.len(), 1);
        assert!(state.messages[0].pos.y < 260.0);
        advance(&mut state, &TickInput::default(), FRAME, 0.0);
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_restart_input_resets_session() {
        let mut state = GameState::new(GameMode::Moving, 1280.0, 720.0, 2, 0.0);
        state.score = 40;
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        advance(&mut state, &restart, FRAME, 50.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.targets.len(), MOVING_INITIAL_COUNT);
    }
}
