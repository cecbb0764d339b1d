//! Overlap tests between body shapes
//!
//! Only the player is round; everything else is an axis-aligned rectangle, so
//! circle-vs-rect carries most of the weight here.

use glam::Vec2;

use super::body::{Body, Shape};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Closest point on the second shape (if hit)
    pub point: Vec2,
    /// Surface normal pointing from the second shape toward the first
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between a circle and an axis-aligned rectangle
///
/// Touching edges do not count as a hit.
pub fn circle_rect_collision(
    circle_pos: Vec2,
    radius: f32,
    rect_pos: Vec2,
    half_extents: Vec2,
) -> CollisionResult {
    let local = circle_pos - rect_pos;
    let clamped = local.clamp(-half_extents, half_extents);

    if clamped != local {
        // Centre outside the rectangle: distance to the closest point decides
        let delta = local - clamped;
        let dist = delta.length();
        if dist >= radius {
            return CollisionResult::miss();
        }
        return CollisionResult {
            hit: true,
            point: rect_pos + clamped,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    // Centre inside: push out along the shallowest axis
    let to_edge = half_extents - local.abs();
    let (normal, depth) = if to_edge.x < to_edge.y {
        (Vec2::new(local.x.signum(), 0.0), to_edge.x)
    } else {
        (Vec2::new(0.0, local.y.signum()), to_edge.y)
    };
    CollisionResult {
        hit: true,
        point: rect_pos + local + normal * depth,
        normal,
        penetration: depth + radius,
    }
}

/// Check overlap between two circles
pub fn circle_circle_collision(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let delta = a_pos - b_pos;
    let dist = delta.length();
    let reach = a_radius + b_radius;
    if dist >= reach {
        return CollisionResult::miss();
    }
    let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::Y };
    CollisionResult {
        hit: true,
        point: b_pos + normal * b_radius,
        normal,
        penetration: reach - dist,
    }
}

/// Strict overlap of two axis-aligned rectangles
pub fn rects_overlap(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> bool {
    let gap = (a_pos - b_pos).abs() - (a_half + b_half);
    gap.x < 0.0 && gap.y < 0.0
}

/// Check overlap between two bodies; the normal points from `b` toward `a`
pub fn body_collision(a: &Body, b: &Body) -> CollisionResult {
    match (a.shape, b.shape) {
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            circle_rect_collision(a.pos, radius, b.pos, half_extents)
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            let mut result = circle_rect_collision(b.pos, radius, a.pos, half_extents);
            result.normal = -result.normal;
            result
        }
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle_collision(a.pos, ra, b.pos, rb)
        }
        (Shape::Rect { half_extents: ha }, Shape::Rect { half_extents: hb }) => {
            if !rects_overlap(a.pos, ha, b.pos, hb) {
                return CollisionResult::miss();
            }
            let overlap = (ha + hb) - (a.pos - b.pos).abs();
            let delta = a.pos - b.pos;
            let (normal, penetration) = if overlap.x < overlap.y {
                (Vec2::new(delta.x.signum(), 0.0), overlap.x)
            } else {
                (Vec2::new(0.0, delta.y.signum()), overlap.y)
            };
            CollisionResult {
                hit: true,
                point: a.pos - normal * penetration,
                normal,
                penetration,
            }
        }
    }
}

/// Remove the velocity component driving into a surface (no bounce)
pub fn absorb_velocity(vel: Vec2, normal: Vec2) -> Vec2 {
    let into = vel.dot(normal);
    if into < 0.0 { vel - normal * into } else { vel }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_rect_side_hit() {
        // Rect centred at origin, 20x20; circle to the right overlapping by 2
        let result = circle_rect_collision(Vec2::new(18.0, 0.0), 10.0, Vec2::ZERO, Vec2::splat(10.0));
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 0.001);
        assert!((result.penetration - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_rect_corner_miss() {
        // Diagonal distance to corner is ~9.9, radius 9
        let result = circle_rect_collision(Vec2::new(17.0, 17.0), 9.0, Vec2::ZERO, Vec2::splat(10.0));
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_rect_touching_is_not_hit() {
        let result = circle_rect_collision(Vec2::new(20.0, 0.0), 10.0, Vec2::ZERO, Vec2::splat(10.0));
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_centre_inside_rect() {
        // Centre just under the top edge: push up
        let result = circle_rect_collision(Vec2::new(0.0, 8.0), 5.0, Vec2::ZERO, Vec2::new(50.0, 10.0));
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 7.0).abs() < 0.001);
    }

    #[test]
    fn test_rects_overlap() {
        let half = Vec2::splat(5.0);
        assert!(rects_overlap(Vec2::ZERO, half, Vec2::new(9.0, 0.0), half));
        assert!(!rects_overlap(Vec2::ZERO, half, Vec2::new(10.0, 0.0), half));
        assert!(!rects_overlap(Vec2::ZERO, half, Vec2::new(0.0, 11.0), half));
    }

    #[test]
    fn test_absorb_velocity() {
        // Falling onto a floor: vertical speed removed, horizontal kept
        let vel = absorb_velocity(Vec2::new(3.0, -10.0), Vec2::Y);
        assert_eq!(vel, Vec2::new(3.0, 0.0));
        // Moving away: untouched
        let vel = absorb_velocity(Vec2::new(0.0, 10.0), Vec2::Y);
        assert_eq!(vel, Vec2::new(0.0, 10.0));
    }
}
