//! Collision detection for axis-aligned boxes
//!
//! Everything in the world (vehicle, trees, rocks, roadblocks) collides as an
//! axis-aligned bounding box centered on its position.

use glam::Vec2;

/// Axis-aligned bounding box stored as center + half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    /// Box centered on `center` with full `size`
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size / 2.0,
        }
    }

    /// Square box with side `size`
    pub fn square(center: Vec2, size: f32) -> Self {
        Self::new(center, Vec2::splat(size))
    }

    /// Strict overlap on both axes (touching edges do not collide)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }

    /// Whether the box lies entirely outside a `width` x `height` viewport
    /// anchored at the origin
    #[inline]
    pub fn is_outside_viewport(&self, width: f32, height: f32) -> bool {
        self.center.x + self.half.x < 0.0
            || self.center.x - self.half.x > width
            || self.center.y + self.half.y < 0.0
            || self.center.y - self.half.y > height
    }
}

/// Chebyshev-style proximity: both axis distances under `min_distance`
#[inline]
pub fn too_close(a: Vec2, b: Vec2, min_distance: f32) -> bool {
    let d = (a - b).abs();
    d.x < min_distance && d.y < min_distance
}
