//! Obstacle pair generation
//!
//! A pair is two solid segments with a fixed-size gap between them and a
//! trigger zone filling the gap. Only the vertical offset is random.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, IdAllocator};
use super::category::Category;
use crate::config::{ConfigError, non_negative, positive};

/// Random source for obstacle placement
pub trait ObstacleRng {
    /// Uniform f32 in [0.0, 1.0)
    fn unit_f32(&mut self) -> f32;

    /// Uniform offset in [-max, max]
    fn offset_within(&mut self, max: f32) -> f32 {
        let unit = self.unit_f32().clamp(0.0, 1.0);
        ((unit * 2.0 - 1.0) * max).clamp(-max, max)
    }
}

// Covers Pcg32 in production and any seeded rand generator in tests
impl<T: rand::Rng> ObstacleRng for T {
    fn unit_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Field and obstacle geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleLayout {
    pub field_width: f32,
    pub field_height: f32,
    pub gap_size: f32,
    pub segment_width: f32,
    pub segment_height: f32,
    pub trigger_width: f32,
    pub min_margin: f32,
    pub max_offset_fraction: f32,
}

/// One spawned unit: top segment, bottom segment and trigger zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub id: BodyId,
    /// Shared horizontal centre of all three bodies
    pub x: f32,
    /// Vertical offset sampled at creation
    pub offset: f32,
    pub top: Body,
    pub bottom: Body,
    pub trigger: Body,
    /// Set once the trigger has scored
    pub trigger_consumed: bool,
}

impl ObstaclePair {
    /// Move all three bodies horizontally
    pub fn advance(&mut self, dx: f32) {
        self.x += dx;
        self.top.pos.x = self.x;
        self.bottom.pos.x = self.x;
        self.trigger.pos.x = self.x;
    }

    /// Bottom and top y of the open gap
    pub fn gap_bounds(&self) -> (f32, f32) {
        (self.bottom.vertical_extent().1, self.top.vertical_extent().0)
    }

    pub fn gap_center(&self) -> f32 {
        let (low, high) = self.gap_bounds();
        (low + high) / 2.0
    }

    /// Rightmost x covered by any of the bodies
    pub fn trailing_edge(&self) -> f32 {
        self.bodies()
            .iter()
            .map(|b| b.horizontal_extent().1)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn bodies(&self) -> [&Body; 3] {
        [&self.top, &self.bottom, &self.trigger]
    }
}

/// Builds obstacle pairs from a validated layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleGenerator {
    layout: ObstacleLayout,
    max_offset: f32,
}

impl ObstacleGenerator {
    /// Validate the layout. Any offset in range keeps the gap on screen.
    pub fn new(layout: ObstacleLayout) -> Result<Self, ConfigError> {
        positive("field_width", layout.field_width)?;
        positive("field_height", layout.field_height)?;
        positive("gap_size", layout.gap_size)?;
        positive("segment_width", layout.segment_width)?;
        positive("segment_height", layout.segment_height)?;
        positive("trigger_width", layout.trigger_width)?;
        non_negative("min_margin", layout.min_margin)?;
        non_negative("max_offset_fraction", layout.max_offset_fraction)?;

        if layout.field_height <= layout.gap_size + 2.0 * layout.min_margin {
            return Err(ConfigError::GapTooLarge {
                gap: layout.gap_size,
                margin: layout.min_margin,
                field_height: layout.field_height,
            });
        }

        let max_offset = layout.max_offset_fraction * layout.field_height;
        let limit = (layout.field_height - layout.gap_size) / 2.0 - layout.min_margin;
        if max_offset > limit {
            return Err(ConfigError::OffsetOutOfBounds { max_offset, limit });
        }

        // Segments must cover from the gap to the field edge at the extreme offset
        let required = (layout.field_height - layout.gap_size) / 2.0 + max_offset;
        if layout.segment_height < required {
            return Err(ConfigError::SegmentTooShort {
                height: layout.segment_height,
                required,
            });
        }

        Ok(Self { layout, max_offset })
    }

    pub fn layout(&self) -> &ObstacleLayout {
        &self.layout
    }

    pub fn max_offset(&self) -> f32 {
        self.max_offset
    }

    /// Distance from the field's vertical centre to each segment centre
    pub fn half_gap(&self) -> f32 {
        (self.layout.gap_size + self.layout.segment_height) / 2.0
    }

    /// Off-screen x where new pairs appear
    pub fn spawn_x(&self) -> f32 {
        self.layout.field_width + self.layout.segment_width / 2.0
    }

    /// Build a pair at a random offset
    pub fn generate<R: ObstacleRng + ?Sized>(&self, rng: &mut R, ids: &mut IdAllocator) -> ObstaclePair {
        let offset = rng.offset_within(self.max_offset);
        self.place(offset, ids)
    }

    /// Build a pair at a given offset (clamped to the allowed range)
    pub fn place(&self, offset: f32, ids: &mut IdAllocator) -> ObstaclePair {
        let offset = offset.clamp(-self.max_offset, self.max_offset);
        let layout = &self.layout;
        let x = self.spawn_x();
        let mid_y = layout.field_height / 2.0 + offset;
        let segment = Vec2::new(layout.segment_width, layout.segment_height);

        let id = ids.next_id();
        let top = Body::fixed_rect(
            ids.next_id(),
            Category::Obstacle,
            Vec2::new(x, mid_y + self.half_gap()),
            segment,
        );
        let bottom = Body::fixed_rect(
            ids.next_id(),
            Category::Obstacle,
            Vec2::new(x, mid_y - self.half_gap()),
            segment,
        );
        let trigger = Body::fixed_rect(
            ids.next_id(),
            Category::TriggerZone,
            Vec2::new(x, mid_y),
            Vec2::new(layout.trigger_width, layout.gap_size),
        );

        ObstaclePair {
            id,
            x,
            offset,
            top,
            bottom,
            trigger,
            trigger_consumed: false,
        }
    }
}
