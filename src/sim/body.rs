//! Circular bodies and their collision tests
//!
//! Projectiles and targets are both circles; everything that touches geometry
//! goes through `CircleBody`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A circle in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleBody {
    /// Center (screen coordinates, y down)
    pub pos: Vec2,
    /// Radius, always > 0
    pub radius: f32,
}

impl CircleBody {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "circle radius must be positive");
        Self { pos, radius }
    }

    /// Lowest point of the circle (largest screen y)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// Circles collide when their centers are no farther apart than the sum of
/// their radii. Touching exactly counts as a hit.
#[inline]
pub fn circles_collide(a: &CircleBody, b: &CircleBody) -> bool {
    let reach = a.radius + b.radius;
    a.pos.distance_squared(b.pos) <= reach * reach
}

/// Whether the circle rests on or sinks below the floor line
#[inline]
pub fn touches_floor(body: &CircleBody, floor_y: f32) -> bool {
    body.bottom() >= floor_y
}
