//! Physical bodies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::Category;

/// Stable entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Hands out increasing entity IDs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> BodyId {
        let id = BodyId(self.next);
        self.next += 1;
        id
    }
}

/// Collision shape, centred on the body position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

impl Shape {
    /// Full width and height of the bounding box
    pub fn size(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius * 2.0),
            Shape::Rect { half_extents } => half_extents * 2.0,
        }
    }
}

/// A physical object in the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub category: Category,
    /// Centre position
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
    /// Moved by the simulation (fixed bodies only move when the scheduler moves them)
    pub dynamic: bool,
    pub affected_by_gravity: bool,
}

impl Body {
    /// Immovable rectangle
    pub fn fixed_rect(id: BodyId, category: Category, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            category,
            pos,
            vel: Vec2::ZERO,
            shape: Shape::Rect {
                half_extents: size / 2.0,
            },
            dynamic: false,
            affected_by_gravity: false,
        }
    }

    /// Dynamic circle for the player. Gravity stays off until a run starts.
    pub fn player(id: BodyId, pos: Vec2, diameter: f32) -> Self {
        Self {
            id,
            category: Category::Player,
            pos,
            vel: Vec2::ZERO,
            shape: Shape::Circle {
                radius: diameter / 2.0,
            },
            dynamic: true,
            affected_by_gravity: false,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.shape.size()
    }

    /// Lowest and highest y covered by the body
    pub fn vertical_extent(&self) -> (f32, f32) {
        let half = self.size().y / 2.0;
        (self.pos.y - half, self.pos.y + half)
    }

    /// Leftmost and rightmost x covered by the body
    pub fn horizontal_extent(&self) -> (f32, f32) {
        let half = self.size().x / 2.0;
        (self.pos.x - half, self.pos.x + half)
    }
}
