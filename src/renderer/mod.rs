//! Rendering module
//!
//! `pose` and `shapes` are pure geometry and build everywhere; the Canvas 2D
//! painter needs a browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod pose;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use pose::ArcherPose;
