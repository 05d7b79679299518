//! Axis-aligned bounding boxes
//!
//! Screen coordinates: x grows to the right, y grows downward, so `top` is
//! the smaller y.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extent: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half_extent.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half_extent.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.half_extent.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half_extent.y
    }
}

/// Overlap test with inclusive bounds: boxes sharing an edge intersect
#[inline]
pub fn is_intersecting(a: &Aabb, b: &Aabb) -> bool {
    a.right() >= b.left() && a.left() <= b.right() && a.bottom() >= b.top() && a.top() <= b.bottom()
}
