//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod roadblock;
pub mod state;
pub mod tick;
pub mod world_gen;

pub use collision::{Aabb, too_close};
pub use roadblock::{Roadblock, RoadblockPhase};
pub use state::{GameState, GrassPatch, Obstacle, ObstacleKind, Player, World};
pub use tick::{TickInput, tick};
pub use world_gen::{
    evict_distant, generate_grass_patches, generate_obstacles_around_highway,
    generate_roadblocks, stream_around_player,
};
