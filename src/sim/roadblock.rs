//! Roadblock gates
//!
//! A gate on the highway forces a timed stop the first time the player reaches
//! it. Each gate only moves forward through its phases:
//! `Pending` -> `Blocking` -> `Passed`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Lifecycle of a single gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoadblockPhase {
    /// Not yet reached; will block on contact
    Pending,
    /// Holding the player; `remaining_ms` counts down to release
    Blocking { remaining_ms: f32 },
    /// Released; never blocks again
    Passed,
}

/// A gate placed on a grid line of the highway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadblock {
    /// Grid index along the highway (`x / roadblock_freq`), unique per gate
    pub id: i64,
    /// Center in world space
    pub pos: Vec2,
    pub size: Vec2,
    pub phase: RoadblockPhase,
}

impl Roadblock {
    pub fn new(id: i64, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            pos,
            size,
            phase: RoadblockPhase::Pending,
        }
    }

    /// A gate that starts already cleared
    pub fn passed(id: i64, pos: Vec2, size: Vec2) -> Self {
        Self {
            phase: RoadblockPhase::Passed,
            ..Self::new(id, pos, size)
        }
    }

    /// Will block the next time the player touches it
    pub fn active(&self) -> bool {
        self.phase == RoadblockPhase::Pending
    }

    /// Has been through a full block and is permanently passable
    pub fn blocked_once(&self) -> bool {
        self.phase == RoadblockPhase::Passed
    }

    /// Remaining cooldown in ms (zero unless blocking)
    pub fn timer(&self) -> f32 {
        match self.phase {
            RoadblockPhase::Blocking { remaining_ms } => remaining_ms,
            _ => 0.0,
        }
    }

    /// Bounding box in world space
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Pending -> Blocking. Returns false (and changes nothing) from any other phase.
    pub fn begin_blocking(&mut self, wait_ms: f32) -> bool {
        if self.phase != RoadblockPhase::Pending {
            return false;
        }
        self.phase = RoadblockPhase::Blocking {
            remaining_ms: wait_ms,
        };
        true
    }

    /// Blocking -> Passed. A pending gate is left alone; passed stays passed.
    pub fn mark_passed(&mut self) {
        if matches!(self.phase, RoadblockPhase::Blocking { .. }) {
            self.phase = RoadblockPhase::Passed;
        }
    }

    /// Count down a blocking gate by `dt_ms`; snaps to Passed at zero.
    ///
    /// Returns true on the frame the gate is released.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        if let RoadblockPhase::Blocking { remaining_ms } = self.phase {
            let remaining = remaining_ms - dt_ms;
            if remaining <= 0.0 {
                self.phase = RoadblockPhase::Passed;
                return true;
            }
            self.phase = RoadblockPhase::Blocking {
                remaining_ms: remaining,
            };
        }
        false
    }
}

/// Advance every blocking gate by one frame
pub fn advance_roadblocks(roadblocks: &mut [Roadblock], dt_ms: f32) {
    for rb in roadblocks.iter_mut() {
        if rb.advance(dt_ms) {
            log::debug!("Roadblock {} cooldown elapsed", rb.id);
        }
    }
}
