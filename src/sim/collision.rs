//! Arrow/target hit detection
//!
//! Targets are treated as circles around their center. An arrow scores when
//! its tip lies strictly inside a shrunken circle, so grazing the outer ring
//! is not enough.

use glam::Vec2;

use super::state::{Arrow, Target};
use crate::consts::HIT_RADIUS_FRACTION;

/// Distance from the target center under which an arrow tip scores
#[inline]
pub fn hit_distance(target: &Target) -> f32 {
    target.effective_radius() * HIT_RADIUS_FRACTION
}

/// Check whether an arrow tip at `tip` scores against `target`
#[inline]
pub fn arrow_hits_target(tip: Vec2, target: &Target) -> bool {
    tip.distance(target.pos()) < hit_distance(target)
}

/// Index of the arrow that scores against `target`, scanning newest first.
///
/// Only one arrow may score against a target per tick, so the scan stops at
/// the first match.
pub fn scoring_arrow(arrows: &[Arrow], target: &Target) -> Option<usize> {
    arrows
        .iter()
        .enumerate()
        .rev()
        .find(|(_, arrow)| arrow_hits_target(arrow.pos, target))
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{MovingTarget, StandardTarget};

    fn standard_at(pos: Vec2) -> Target {
        Target::Standard(StandardTarget {
            id: 1,
            pos,
            size: 44.0,
            hit: false,
            created_ms: 0.0,
            relocate_at_ms: 5000.0,
        })
    }

    fn arrow_at(id: u32, pos: Vec2) -> Arrow {
        Arrow {
            id,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            spawned_ms: 0.0,
        }
    }

    #[test]
    fn test_hit_threshold_radius_44() {
        let target = standard_at(Vec2::new(600.0, 300.0));
        // 44 * 0.65 = 28.6
        assert!(arrow_hits_target(Vec2::new(628.0, 300.0), &target));
        assert!(!arrow_hits_target(Vec2::new(630.0, 300.0), &target));
        assert!(arrow_hits_target(Vec2::new(600.0, 271.5), &target));
        assert!((hit_distance(&target) - 28.6).abs() < 1e-4);
    }

    #[test]
    fn test_moving_target_uses_full_size() {
        let target = Target::Moving(MovingTarget {
            id: 2,
            pos: Vec2::new(100.0, 100.0),
            size: 60.0,
            speed: 1.0,
        });
        // Drawn at 0.9 * size but scored against size: 60 * 0.65 = 39
        assert!(arrow_hits_target(Vec2::new(138.0, 100.0), &target));
        assert!(!arrow_hits_target(Vec2::new(140.0, 100.0), &target));
    }

    #[test]
    fn test_scoring_arrow_prefers_newest() {
        let target = standard_at(Vec2::new(500.0, 500.0));
        let arrows = vec![
            arrow_at(1, Vec2::new(505.0, 500.0)),
            arrow_at(2, Vec2::new(900.0, 100.0)),
            arrow_at(3, Vec2::new(495.0, 500.0)),
        ];
        assert_eq!(scoring_arrow(&arrows, &target), Some(2));
        assert_eq!(scoring_arrow(&arrows[1..2], &target), None);
    }
}
