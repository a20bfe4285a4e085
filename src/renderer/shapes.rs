//! Shape parameters for 2D primitives
//!
//! Pure geometry: the canvas painter turns these into path calls.

use glam::Vec2;

/// A rotated bar from `origin` running `length` pixels along `angle`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub origin: Vec2,
    pub angle: f32,
    pub length: f32,
}

/// Segment joining two joints (a limb)
pub fn limb(from: Vec2, to: Vec2) -> Segment {
    let d = to - from;
    Segment {
        origin: from,
        angle: d.y.atan2(d.x),
        length: d.length(),
    }
}

/// Rounded rectangle with its corner radius clamped to fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub r: f32,
}

impl RoundRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32, r: f32) -> Self {
        let r = r.max(0.0).min(w.abs() / 2.0).min(h.abs() / 2.0);
        Self { x, y, w, h, r }
    }

    /// Limb of thickness `width` laid along the local x axis of its segment
    pub fn for_limb(seg: &Segment, width: f32) -> Self {
        Self::new(0.0, -width / 2.0, seg.length, width, width / 2.0)
    }
}

/// One filled disc of a bullseye
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub radius: f32,
    pub color: &'static str,
}

/// Bullseye rings, outermost first
pub fn target_rings(radius: f32) -> [Ring; 3] {
    [
        Ring {
            radius,
            color: "#fff",
        },
        Ring {
            radius: radius * 0.58,
            color: "#e33",
        },
        Ring {
            radius: radius * 0.28,
            color: "#111",
        },
    ]
}

/// Arrow shaft in arrow-local space (x, y, w, h); the tip sits at +x
pub const ARROW_SHAFT: (f32, f32, f32, f32) = (-14.0, -2.0, 28.0, 4.0);

/// Fletching triangle behind the shaft in arrow-local space
pub const ARROW_FLETCHING: [Vec2; 3] = [
    Vec2::new(-14.0, 0.0),
    Vec2::new(-22.0, 6.0),
    Vec2::new(-22.0, -6.0),
];

/// Half the length of the bow limb
pub const BOW_HALF_LENGTH: f32 = 44.0;
/// Control point of the bow limb curve in bow-local space
pub const BOW_LIMB_CONTROL: Vec2 = Vec2::new(18.0, 0.0);

/// Control point of the bow string in bow-local space.
///
/// The string pulls back toward the drawing hand as power rises.
pub fn bow_string_control(power: f32) -> Vec2 {
    let power = power.clamp(0.0, 1.0);
    Vec2::new(power * 10.0, -(power * 30.0).min(24.0))
}
