//! Game tuning
//!
//! Every gameplay constant lives here so a page can override them with a
//! JSON blob without a rebuild.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Why a settings override was rejected
#[derive(Debug)]
pub enum SettingsError {
    /// Not valid JSON, or a field of the wrong type
    Malformed(serde_json::Error),
    /// A field that must be a finite value above zero
    NotPositive { field: &'static str, value: f32 },
    /// Gates packed tighter than the blocking reach of one gate
    RoadblocksTooDense { freq: f32, min: f32 },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "malformed settings: {}", e),
            Self::NotPositive { field, value } => {
                write!(f, "{} must be positive, got {}", field, value)
            }
            Self::RoadblocksTooDense { freq, min } => {
                write!(f, "roadblock_freq {} is below the minimum of {}", freq, min)
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e)
    }
}

/// Tunable game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Frame ===
    /// Fixed delta applied per frame (ms)
    pub frame_dt_ms: f32,

    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Highway ===
    pub highway_width: f32,
    pub highway_color: String,
    pub highway_line_color: String,
    pub highway_line_width: f32,
    pub highway_line_length: f32,
    pub highway_line_gap: f32,

    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,

    // === Obstacles ===
    pub obstacles_per_pass: u32,
    pub obstacle_distance: f32,
    pub obstacle_spawn_distance: f32,
    pub tree_label_radius: f32,

    // === Grass ===
    pub grass_patch_radius: f32,
    pub grass_patch_density: u32,

    // === Roadblocks ===
    pub roadblock_width: f32,
    pub roadblock_height: f32,
    pub roadblock_color: String,
    pub roadblock_freq: f32,
    pub roadblock_wait_ms: f32,

    // === Memory ===
    /// Obstacles/roadblocks farther than this from the player are dropped
    pub retain_distance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_dt_ms: FRAME_DT_MS,

            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            highway_width: HIGHWAY_WIDTH,
            highway_color: HIGHWAY_COLOR.to_string(),
            highway_line_color: HIGHWAY_LINE_COLOR.to_string(),
            highway_line_width: HIGHWAY_LINE_WIDTH,
            highway_line_length: HIGHWAY_LINE_LENGTH,
            highway_line_gap: HIGHWAY_LINE_GAP,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,

            obstacles_per_pass: OBSTACLES_PER_PASS,
            obstacle_distance: OBSTACLE_DISTANCE,
            obstacle_spawn_distance: OBSTACLE_SPAWN_DISTANCE,
            tree_label_radius: TREE_LABEL_RADIUS,

            grass_patch_radius: GRASS_PATCH_RADIUS,
            grass_patch_density: GRASS_PATCH_DENSITY,

            roadblock_width: ROADBLOCK_WIDTH,
            roadblock_height: ROADBLOCK_HEIGHT,
            roadblock_color: ROADBLOCK_COLOR.to_string(),
            roadblock_freq: ROADBLOCK_FREQ,
            roadblock_wait_ms: ROADBLOCK_WAIT,

            retain_distance: RETAIN_DISTANCE,
        }
    }
}

impl Settings {
    /// Element holding optional JSON overrides
    #[allow(dead_code)]
    const ELEMENT_ID: &'static str = "game-settings";

    /// Parse and validate settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("frame_dt_ms", self.frame_dt_ms),
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("obstacle_distance", self.obstacle_distance),
            ("roadblock_freq", self.roadblock_freq),
            ("roadblock_wait_ms", self.roadblock_wait_ms),
        ];
        for (field, value) in positive {
            // NaN fails this comparison too
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::NotPositive { field, value });
            }
        }

        // Two gates closer than this could both overlap the vehicle
        let min = self.roadblock_width + self.player_size;
        if self.roadblock_freq < min {
            return Err(SettingsError::RoadblocksTooDense {
                freq: self.roadblock_freq,
                min,
            });
        }
        Ok(())
    }

    /// Vertical centerline of the highway (world and screen space)
    pub fn highway_y(&self) -> f32 {
        self.viewport_height / 2.0
    }

    /// Length of one dash + gap of the highway centerline
    pub fn dash_period(&self) -> f32 {
        self.highway_line_length + self.highway_line_gap
    }

    /// Whether a world y lies off the paved band
    pub fn is_off_road(&self, y: f32) -> bool {
        (y - self.highway_y()).abs() > self.highway_width / 2.0
    }

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::ELEMENT_ID);
                    return settings;
                }
                Err(e) => log::warn!("Ignoring settings override: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
