//! Procedural archer pose
//!
//! The figure stands at a fixed anchor. The bow arm aims at the pointer; the
//! drawing arm trails it by a small angle and pulls back with draw power.

use glam::Vec2;

use crate::{angle_between, direction};

/// Bow arm upper segment
pub const BOW_UPPER_ARM: f32 = 46.0;
/// Bow arm forearm
pub const BOW_FOREARM: f32 = 28.0;
/// Drawing arm upper segment
pub const DRAW_UPPER_ARM: f32 = 42.0;
/// Drawing forearm at rest
pub const DRAW_FOREARM: f32 = 28.0;
/// Extra pull of the drawing hand at full power
pub const DRAW_PULL: f32 = 18.0;
/// Drawing arm angle offset from the aim, keeps the hand behind the bow
pub const DRAW_ARM_BIAS: f32 = 0.12;

/// Joint positions for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ArcherPose {
    pub base: Vec2,
    pub head: Vec2,
    /// Aim angle from the bow shoulder to the pointer
    pub aim: f32,
    pub bow_shoulder: Vec2,
    pub bow_elbow: Vec2,
    pub bow_hand: Vec2,
    pub draw_shoulder: Vec2,
    pub draw_elbow: Vec2,
    pub draw_hand: Vec2,
    /// Rotation of the bow's local frame (limb runs along local y)
    pub bow_rotation: f32,
    /// Hip/foot pairs for the two legs
    pub legs: [(Vec2, Vec2); 2],
}

impl ArcherPose {
    pub fn compute(base: Vec2, pointer: Vec2, power: f32) -> Self {
        let power = power.clamp(0.0, 1.0);

        let bow_shoulder = base + Vec2::new(-10.0, -100.0);
        let aim = angle_between(bow_shoulder, pointer);
        let aim_dir = direction(aim);
        let bow_elbow = bow_shoulder + aim_dir * BOW_UPPER_ARM;
        let bow_hand = bow_elbow + aim_dir * BOW_FOREARM;

        let draw_shoulder = base + Vec2::new(14.0, -98.0);
        let draw_dir = direction(aim - DRAW_ARM_BIAS);
        let draw_elbow = draw_shoulder + draw_dir * DRAW_UPPER_ARM;
        let draw_hand = draw_elbow + draw_dir * (DRAW_FOREARM + power * DRAW_PULL);

        let bow_rotation = angle_between(bow_hand, draw_hand) + std::f32::consts::FRAC_PI_2;

        Self {
            base,
            head: base + Vec2::new(0.0, -140.0),
            aim,
            bow_shoulder,
            bow_elbow,
            bow_hand,
            draw_shoulder,
            draw_elbow,
            draw_hand,
            bow_rotation,
            legs: [
                (base + Vec2::new(-8.0, -24.0), base + Vec2::new(-8.0, 40.0)),
                (base + Vec2::new(8.0, -24.0), base + Vec2::new(26.0, 52.0)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Vec2 = Vec2::new(200.0, 580.0);

    #[test]
    fn test_bow_arm_points_at_pointer() {
        let pose = ArcherPose::compute(BASE, Vec2::new(900.0, 480.0), 0.0);
        // shoulder at (190, 480): pointer straight ahead
        assert!(pose.aim.abs() < 1e-6);
        assert!((pose.bow_hand - Vec2::new(190.0 + 74.0, 480.0)).length() < 1e-4);
    }

    #[test]
    fn test_draw_hand_pulls_with_power() {
        let pointer = Vec2::new(900.0, 300.0);
        let slack = ArcherPose::compute(BASE, pointer, 0.0);
        let drawn = ArcherPose::compute(BASE, pointer, 1.0);

        let reach = |p: &ArcherPose| p.draw_hand.distance(p.draw_shoulder);
        assert!((reach(&slack) - 70.0).abs() < 1e-3);
        assert!((reach(&drawn) - 88.0).abs() < 1e-3);
        // Joints other than the drawing hand do not move
        assert_eq!(slack.bow_hand, drawn.bow_hand);
        assert_eq!(slack.draw_elbow, drawn.draw_elbow);
    }

    #[test]
    fn test_power_is_clamped() {
        let pointer = Vec2::new(700.0, 200.0);
        assert_eq!(
            ArcherPose::compute(BASE, pointer, 5.0),
            ArcherPose::compute(BASE, pointer, 1.0)
        );
    }
}
