//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (held keys -> tick input)

pub mod input;

pub use input::{InputMapper, Key};
