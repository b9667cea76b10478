//! 2D canvas rendering module
//!
//! Draws the scene through an immediate-mode canvas context; the renderer
//! only ever reads the simulation state.

pub mod canvas;
pub mod scene;

pub use canvas::{Canvas, DrawCommand, RecordingCanvas, TextAlign, TextBaseline};
pub use scene::render;
