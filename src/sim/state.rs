//! Game state and core simulation types
//!
//! The whole session lives in one [`GameState`]: `tick` is the only writer and
//! the renderer only ever borrows it.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::roadblock::Roadblock;
use super::world_gen;
use crate::settings::Settings;

/// Scroll position of the camera
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// World-space point currently under the player
    pub offset: Vec2,
}

/// The player's vehicle
///
/// The vehicle never moves on screen; accepted moves change `World::offset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Fixed screen position (canvas center, on the highway)
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    /// Desired horizontal velocity from input (px per frame)
    pub dx: f32,
    /// Always zero; there is no vertical input
    pub dy: f32,
    /// Remaining forced wait (ms); the player may move only while this is zero
    pub block_timer: f32,
    /// Gate that started the current block
    pub blocking_roadblock: Option<i64>,
}

impl Player {
    pub fn new(settings: &Settings) -> Self {
        Self {
            pos: Vec2::new(settings.viewport_width / 2.0, settings.highway_y()),
            size: settings.player_size,
            speed: settings.player_speed,
            dx: 0.0,
            dy: 0.0,
            block_timer: 0.0,
            blocking_roadblock: None,
        }
    }

    /// Free to move (not held at a roadblock)
    pub fn can_move(&self) -> bool {
        self.block_timer <= 0.0
    }

    /// Screen-space bounding box
    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Rock,
}

impl ObstacleKind {
    /// Footprint (width, height)
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::Tree => Vec2::new(50.0, 70.0),
            ObstacleKind::Rock => Vec2::new(40.0, 30.0),
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ObstacleKind::Tree => "#2b4b1c",
            ObstacleKind::Rock => "#a8a39d",
        }
    }
}

/// An off-road obstacle, immutable once placed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Center in world space
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ObstacleKind,
    /// Sequential label, trees only
    pub tree_id: Option<u32>,
}

impl Obstacle {
    pub fn new(pos: Vec2, kind: ObstacleKind, tree_id: Option<u32>) -> Self {
        Self {
            pos,
            size: kind.size(),
            kind,
            tree_id,
        }
    }

    pub fn color(&self) -> &'static str {
        self.kind.color()
    }
}

/// Decorative grass blot on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrassPatch {
    pub pos: Vec2,
    /// Radius
    pub size: f32,
    pub color: String,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub world: World,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub roadblocks: Vec<Roadblock>,
    pub grass_patches: Vec<GrassPatch>,
    /// Offset at which the grass set was last generated
    pub grass_origin: Vec2,
    /// Offset at which obstacles were last spawned
    pub last_obstacle_spawn: Vec2,
    /// Grid indices of gates already cleared, so evicted gates come back passed.
    ///
    /// Never pruned: a forgotten id would re-arm its gate. Grows by at most one
    /// id per `roadblock_freq` of distinct road driven.
    pub passed_gates: BTreeSet<i64>,
    /// World generation RNG
    pub(crate) rng: Pcg32,
    /// Next tree label
    next_tree_id: u32,
}

impl GameState {
    /// Create a new session and populate the world around the start
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut state = Self {
            seed,
            player: Player::new(&settings),
            settings,
            time_ticks: 0,
            world: World::default(),
            obstacles: Vec::new(),
            roadblocks: Vec::new(),
            grass_patches: Vec::new(),
            grass_origin: Vec2::ZERO,
            last_obstacle_spawn: Vec2::ZERO,
            passed_gates: BTreeSet::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_tree_id: 1,
        };

        let origin = state.world.offset;
        state.grass_origin = origin;
        let center = state.player_world_pos();
        world_gen::generate_grass_patches(&mut state, center);
        world_gen::generate_obstacles_around_highway(&mut state, origin.x);
        world_gen::generate_roadblocks(&mut state, origin.x);
        state.last_obstacle_spawn = origin;

        log::debug!(
            "World seeded: {} obstacles, {} roadblocks, {} grass patches",
            state.obstacles.len(),
            state.roadblocks.len(),
            state.grass_patches.len()
        );

        state
    }

    /// Allocate the next tree label
    pub fn next_tree_id(&mut self) -> u32 {
        let id = self.next_tree_id;
        self.next_tree_id += 1;
        id
    }

    /// Gate with the given grid index, if retained
    pub fn roadblock(&self, id: i64) -> Option<&Roadblock> {
        self.roadblocks.iter().find(|rb| rb.id == id)
    }

    pub fn roadblock_mut(&mut self, id: i64) -> Option<&mut Roadblock> {
        self.roadblocks.iter_mut().find(|rb| rb.id == id)
    }

    /// Player position in world space
    pub fn player_world_pos(&self) -> Vec2 {
        Vec2::new(self.world.offset.x, self.player.pos.y)
    }
}
