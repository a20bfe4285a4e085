//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only enters through `tick`'s `now_ms` argument
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{arrow_hits_target, hit_distance};
pub use spawn::{fill_standard_slot, process_relocations, replace_standard_target};
pub use state::{
    Arrow, DrawCharge, FloatingMessage, GameEvent, GameMode, GamePhase, GameState, MovingTarget,
    PRAISES, StandardTarget, Target, TargetKind,
};
pub use tick::{TickInput, advance, draw_speed, tick};
