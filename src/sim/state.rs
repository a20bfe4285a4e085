//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in `GameState`; the renderer only
//! ever borrows it immutably.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::*;
use crate::direction;

/// Which target behaviour the session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Targets drift right to left, spawned at random
    #[default]
    Moving,
    /// One target at a time, relocating when left unhit
    Standard,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Moving => "moving",
            GameMode::Standard => "standard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "moving" => Some(GameMode::Moving),
            "standard" => Some(GameMode::Standard),
            _ => None,
        }
    }

    /// Label shown in the HUD
    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Moving => "Moving Targets",
            GameMode::Standard => "Standard (10 targets)",
        }
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen; relocation deadlines keep running
    Paused,
    /// Standard mode spawn cap used up and the slot is empty
    Finished,
}

/// An arrow in flight
#[derive(Debug, Clone, Serialize)]
pub struct Arrow {
    pub id: u32,
    /// Tip position
    pub pos: Vec2,
    /// Pixels per reference frame
    pub vel: Vec2,
    /// Heading at release (radians)
    pub angle: f32,
    pub spawned_ms: f64,
}

impl Arrow {
    /// Release an arrow from `origin` along `angle`
    pub fn new(id: u32, origin: Vec2, angle: f32, speed: f32, now_ms: f64) -> Self {
        let dir = direction(angle);
        Self {
            id,
            pos: origin + dir * ARROW_SPAWN_OFFSET,
            vel: dir * speed,
            angle,
            spawned_ms: now_ms,
        }
    }

    /// Move by `scale` reference frames, then apply gravity
    pub fn integrate(&mut self, scale: f32) {
        self.pos += self.vel * scale;
        self.vel.y += GRAVITY * scale;
    }

    /// True once the arrow is beyond the canvas plus margin
    pub fn out_of_bounds(&self, width: f32, height: f32) -> bool {
        self.pos.x < -ARROW_MARGIN_X
            || self.pos.x > width + ARROW_MARGIN_X
            || self.pos.y < -ARROW_MARGIN_Y
            || self.pos.y > height + ARROW_MARGIN_Y
    }
}

/// A target drifting toward the left edge
#[derive(Debug, Clone, Serialize)]
pub struct MovingTarget {
    pub id: u32,
    pub pos: Vec2,
    /// Side length of the bounding square
    pub size: f32,
    /// Pixels per reference frame
    pub speed: f32,
}

impl MovingTarget {
    /// Fully past the left margin
    pub fn is_gone(&self) -> bool {
        self.pos.x + self.size < -MOVING_CULL_MARGIN
    }
}

/// A stationary target occupying the standard-mode slot
#[derive(Debug, Clone, Serialize)]
pub struct StandardTarget {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    /// Stays false on a live target: a hit replaces it in the same step
    pub hit: bool,
    pub created_ms: f64,
    /// Wall-clock deadline after which an unhit target relocates.
    /// Replacing the target discards the deadline with it.
    pub relocate_at_ms: f64,
}

impl StandardTarget {
    pub fn relocation_due(&self, now_ms: f64) -> bool {
        !self.hit && now_ms >= self.relocate_at_ms
    }
}

/// Target kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Moving,
    Standard,
}

impl TargetKind {
    /// Points awarded for a hit
    pub fn points(&self) -> u32 {
        match self {
            TargetKind::Moving => MOVING_POINTS,
            TargetKind::Standard => STANDARD_POINTS,
        }
    }
}

/// A target of either kind
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Target {
    Moving(MovingTarget),
    Standard(StandardTarget),
}

impl Target {
    pub fn id(&self) -> u32 {
        match self {
            Target::Moving(t) => t.id,
            Target::Standard(t) => t.id,
        }
    }

    pub fn pos(&self) -> Vec2 {
        match self {
            Target::Moving(t) => t.pos,
            Target::Standard(t) => t.pos,
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Moving(_) => TargetKind::Moving,
            Target::Standard(_) => TargetKind::Standard,
        }
    }

    /// Radius used for hit detection
    pub fn effective_radius(&self) -> f32 {
        match self {
            Target::Moving(t) => t.size,
            Target::Standard(t) => t.size,
        }
    }

    /// Outer ring radius when drawn
    pub fn ring_radius(&self) -> f32 {
        match self {
            Target::Moving(t) => t.size * 0.9,
            Target::Standard(t) => t.size,
        }
    }
}

/// Praise lines shown and spoken on a hit
pub const PRAISES: [&str; 5] = ["Great Shot!", "Bullseye!", "Nice!", "Excellent!", "Perfect!"];

/// Hit text floating upward while fading out
#[derive(Debug, Clone, Serialize)]
pub struct FloatingMessage {
    pub text: &'static str,
    pub pos: Vec2,
    /// Opacity, 1.0 at creation
    pub alpha: f32,
    /// Vertical drift per reference frame
    pub dy: f32,
}

impl FloatingMessage {
    /// Message placed above a hit target
    pub fn at_target(text: &'static str, target_pos: Vec2) -> Self {
        Self {
            text,
            pos: target_pos - Vec2::new(0.0, MESSAGE_RISE),
            alpha: 1.0,
            dy: MESSAGE_DRIFT,
        }
    }

    /// Drift and fade; returns false once fully transparent
    pub fn advance(&mut self, scale: f32) -> bool {
        self.pos.y += self.dy * scale;
        self.alpha -= MESSAGE_FADE * scale;
        self.alpha > 0.0
    }
}

/// Hold-to-draw state of the bow
#[derive(Debug, Clone, Default, Serialize)]
pub struct DrawCharge {
    /// Wall-clock time the fire button went down, while held
    pub pressed_at_ms: Option<f64>,
    /// Visual draw power 0..=1
    pub power: f32,
}

impl DrawCharge {
    pub fn is_drawing(&self) -> bool {
        self.pressed_at_ms.is_some()
    }

    pub fn begin(&mut self, now_ms: f64) {
        if self.pressed_at_ms.is_none() {
            self.pressed_at_ms = Some(now_ms);
        }
    }

    /// Raise the visual power while held
    pub fn charge(&mut self, dt_ms: f64) {
        if self.is_drawing() {
            self.power = (self.power + (dt_ms / FULL_DRAW_MS) as f32).min(1.0);
        }
    }

    /// Let go of the string. Returns the hold fraction (0..=1) if a draw was
    /// in progress; power always drops back to zero.
    pub fn release(&mut self, now_ms: f64) -> Option<f32> {
        let held = self
            .pressed_at_ms
            .take()
            .map(|start| (((now_ms - start) / FULL_DRAW_MS) as f32).clamp(0.0, 1.0));
        self.power = 0.0;
        held
    }
}

/// Events emitted by the simulation for audio, speech and HUD collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ArrowFired { id: u32, speed: f32, quick: bool },
    TargetHit {
        target_id: u32,
        kind: TargetKind,
        points: u32,
        praise: &'static str,
        pos: Vec2,
    },
    /// An unhit standard target timed out and moved
    TargetRelocated { old_id: u32, new_id: u32 },
    /// A fresh standard slot fill (1-based)
    StandardSpawned { ordinal: u32 },
    /// No more standard targets will appear
    StandardExhausted,
    Restarted { mode: GameMode },
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub mode: GameMode,
    pub phase: GamePhase,
    /// Canvas size in CSS pixels
    pub width: f32,
    pub height: f32,
    /// Last known pointer position
    pub pointer: Vec2,
    pub draw: DrawCharge,
    pub arrows: Vec<Arrow>,
    pub targets: Vec<Target>,
    pub messages: Vec<FloatingMessage>,
    pub score: u32,
    /// Fresh standard slot fills so far (never counts replacements)
    pub standard_spawned: u32,
    /// Session seed for reproducibility
    pub seed: u64,
    /// Wall-clock time of the previous tick
    pub last_frame_ms: f64,
    #[serde(skip)]
    pub rng: Pcg32,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session and spawn its opening targets
    pub fn new(mode: GameMode, width: f32, height: f32, seed: u64, now_ms: f64) -> Self {
        let mut state = Self {
            mode,
            phase: GamePhase::Playing,
            width,
            height,
            pointer: Vec2::new(width / 2.0, height / 2.0),
            draw: DrawCharge::default(),
            arrows: Vec::new(),
            targets: Vec::new(),
            messages: Vec::new(),
            score: 0,
            standard_spawned: 0,
            seed,
            last_frame_ms: now_ms,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        };

        super::spawn::populate_initial(&mut state, now_ms);
        log::info!(
            "New {} session ({}x{}, seed {})",
            mode.as_str(),
            width,
            height,
            seed
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Track the canvas size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    /// Point arrows leave the bow from
    pub fn release_origin(&self) -> Vec2 {
        Vec2::new(ARCHER_X, self.height - RELEASE_FROM_BOTTOM)
    }

    /// Anchor of the archer figure
    pub fn archer_base(&self) -> Vec2 {
        Vec2::new(ARCHER_X, self.height - ARCHER_BASE_FROM_BOTTOM)
    }

    /// The active standard target, if any
    pub fn standard_target(&self) -> Option<&StandardTarget> {
        self.targets.iter().find_map(|t| match t {
            Target::Standard(s) => Some(s),
            Target::Moving(_) => None,
        })
    }

    pub fn standard_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| t.kind() == TargetKind::Standard)
            .count()
    }

    /// Spawn cap used up: no fresh standard target will ever appear again
    pub fn standard_exhausted(&self) -> bool {
        self.standard_spawned >= STANDARD_SPAWN_CAP
    }

    /// Fire an arrow from the bow toward the pointer
    pub fn fire(&mut self, speed: f32, quick: bool, now_ms: f64) {
        let origin = self.release_origin();
        let angle = crate::angle_between(origin, self.pointer);
        let id = self.next_entity_id();
        self.arrows.push(Arrow::new(id, origin, angle, speed, now_ms));
        self.events.push(GameEvent::ArrowFired { id, speed, quick });
        log::debug!("Arrow {} fired at {:.1} px/frame (quick: {})", id, speed, quick);
    }

    /// Start over in the same mode with a seed drawn from the current RNG
    pub fn restart(&mut self, now_ms: f64) {
        use rand::Rng;

        let seed = self.rng.random::<u64>();
        *self = GameState::new(self.mode, self.width, self.height, seed, now_ms);
        self.events.push(GameEvent::Restarted { mode: self.mode });
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
