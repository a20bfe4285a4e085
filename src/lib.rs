//! Archery Range - a side-view archery game on an HTML canvas
//!
//! Core modules:
//! - `sim`: Simulation (arrows, targets, spawn scheduling, hit detection)
//! - `renderer`: Archer pose, draw primitives and the Canvas 2D painter
//! - `settings`: URL-driven session configuration
//! - `audio`: Speech and Web Audio feedback (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::GameMode;

use glam::Vec2;

/// Game configuration constants
///
/// Distances are CSS pixels, times are milliseconds. Speeds are expressed in
/// pixels per reference frame and scaled by `elapsed / REFERENCE_FRAME_MS`.
pub mod consts {
    /// Duration of one nominal 60 Hz frame
    pub const REFERENCE_FRAME_MS: f64 = 16.67;
    /// Largest elapsed time a single tick may integrate
    pub const MAX_FRAME_MS: f64 = 40.0;

    /// Gravity added to arrow vy per reference frame
    pub const GRAVITY: f32 = 0.08;
    /// Release speed with no draw
    pub const ARROW_BASE_SPEED: f32 = 24.0;
    /// Extra release speed at full draw
    pub const ARROW_POWER_SPEED: f32 = 28.0;
    /// Fixed quick-shot speed
    pub const QUICK_SHOT_SPEED: f32 = 28.0;
    /// Hold time that reaches full draw
    pub const FULL_DRAW_MS: f64 = 900.0;
    /// Arrows spawn this far along the aim direction from the hand
    pub const ARROW_SPAWN_OFFSET: f32 = 28.0;
    /// Arrows are dropped once this far outside the canvas horizontally
    pub const ARROW_MARGIN_X: f32 = 100.0;
    /// Arrows are dropped once this far outside the canvas vertically
    pub const ARROW_MARGIN_Y: f32 = 200.0;

    /// Archer anchor (feet/hips) x position
    pub const ARCHER_X: f32 = 200.0;
    /// Archer anchor distance from the bottom edge
    pub const ARCHER_BASE_FROM_BOTTOM: f32 = 140.0;
    /// Arrow release point distance from the bottom edge
    pub const RELEASE_FROM_BOTTOM: f32 = 160.0;

    /// Per-tick chance of a new moving target
    pub const MOVING_SPAWN_CHANCE: f32 = 0.012;
    /// Moving targets spawned when a moving session starts
    pub const MOVING_INITIAL_COUNT: usize = 3;
    pub const MOVING_MIN_SIZE: f32 = 36.0;
    pub const MOVING_SIZE_RANGE: f32 = 28.0;
    pub const MOVING_MIN_SPEED: f32 = 0.6;
    pub const MOVING_SPEED_RANGE: f32 = 0.9;
    /// Spawn distance beyond the right edge (min, random extra)
    pub const MOVING_SPAWN_OFFSET: f32 = 80.0;
    pub const MOVING_SPAWN_JITTER: f32 = 200.0;
    /// Moving targets are culled once `x + size` is below `-MOVING_CULL_MARGIN`
    pub const MOVING_CULL_MARGIN: f32 = 120.0;

    /// Standard target radius
    pub const STANDARD_SIZE: f32 = 44.0;
    /// Total fresh standard spawns per session
    pub const STANDARD_SPAWN_CAP: u32 = 10;
    /// Unhit standard targets relocate after this long
    pub const STANDARD_RELOCATE_MS: f64 = 5000.0;
    /// Standard targets stay right of the archer
    pub const STANDARD_MIN_X: f32 = 420.0;
    pub const STANDARD_X_RESERVED: f32 = 540.0;

    /// Targets never spawn above this y
    pub const TARGET_MIN_Y: f32 = 120.0;
    /// Vertical space reserved for sky margin and ground
    pub const TARGET_Y_RESERVED: f32 = 260.0;

    /// Hit when the arrow is within this fraction of the target radius
    pub const HIT_RADIUS_FRACTION: f32 = 0.65;
    pub const STANDARD_POINTS: u32 = 15;
    pub const MOVING_POINTS: u32 = 10;

    /// Floating message spawn height above the target center
    pub const MESSAGE_RISE: f32 = 40.0;
    pub const MESSAGE_DRIFT: f32 = -0.3;
    pub const MESSAGE_FADE: f32 = 0.015;

    /// Height of the ground band
    pub const GROUND_HEIGHT: f32 = 110.0;
}

/// Elapsed milliseconds expressed in reference frames
#[inline]
pub fn frame_scale(dt_ms: f64) -> f32 {
    (dt_ms / consts::REFERENCE_FRAME_MS) as f32
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit direction for an angle
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
