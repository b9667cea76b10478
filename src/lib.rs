//! Safari Drive - a side-scrolling highway drive through an endless savanna
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world streaming, roadblock gates, collisions)
//! - `renderer`: 2D canvas drawing of the current state
//! - `platform`: Browser input mapping
//! - `settings`: Data-driven game tuning

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Fixed frame delta in milliseconds (~60 Hz, not measured)
    pub const FRAME_DT_MS: f32 = 16.0;

    /// Canvas dimensions
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Highway band
    pub const HIGHWAY_WIDTH: f32 = 60.0;
    pub const HIGHWAY_COLOR: &str = "#d7d7d7";
    pub const HIGHWAY_LINE_COLOR: &str = "#fff";
    pub const HIGHWAY_LINE_WIDTH: f32 = 5.0;
    pub const HIGHWAY_LINE_LENGTH: f32 = 40.0;
    pub const HIGHWAY_LINE_GAP: f32 = 30.0;

    /// Player vehicle
    pub const PLAYER_SIZE: f32 = 36.0;
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Obstacles
    pub const OBSTACLES_PER_PASS: u32 = 18;
    /// Minimum per-axis separation between any two obstacles
    pub const OBSTACLE_DISTANCE: f32 = 120.0;
    /// Distance travelled before another obstacle pass runs
    pub const OBSTACLE_SPAWN_DISTANCE: f32 = 400.0;
    /// Trees within this screen distance of the player show their number
    pub const TREE_LABEL_RADIUS: f32 = 250.0;

    /// Grass decoration
    pub const GRASS_PATCH_RADIUS: f32 = 1000.0;
    pub const GRASS_PATCH_DENSITY: u32 = 40;

    /// Roadblock gates
    pub const ROADBLOCK_WIDTH: f32 = 42.0;
    pub const ROADBLOCK_HEIGHT: f32 = 32.0;
    pub const ROADBLOCK_COLOR: &str = "#e74c3c";
    pub const ROADBLOCK_FREQ: f32 = 1200.0;
    /// Forced wait at a gate (ms)
    pub const ROADBLOCK_WAIT: f32 = 4000.0;

    /// Entities farther than this (world x) from the player are evicted
    pub const RETAIN_DISTANCE: f32 = 4.0 * VIEWPORT_WIDTH;
}

/// Project a world-space x coordinate into screen space
#[inline]
pub fn world_to_screen_x(world_x: f32, offset_x: f32, viewport_width: f32) -> f32 {
    world_x - offset_x + viewport_width / 2.0
}

/// Project a world-space point into screen space.
///
/// The camera only scrolls horizontally; `offset.y` stays at zero so world y
/// and screen y coincide.
#[inline]
pub fn world_to_screen(pos: Vec2, offset: Vec2, viewport_width: f32) -> Vec2 {
    Vec2::new(
        world_to_screen_x(pos.x, offset.x, viewport_width),
        pos.y - offset.y,
    )
}
