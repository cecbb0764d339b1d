//! Simulation collaborator
//!
//! The scheduler does not integrate bodies itself. Each tick it hands the
//! player and the scenery to a `Simulation`, which moves dynamic bodies and
//! reports which pairs touched.

use super::body::Body;
use super::collision::{absorb_velocity, body_collision};
use super::contact::ContactEvent;
use crate::GameConfig;

/// Physics backend driven once per tick
pub trait Simulation {
    /// Pick up tunables from a (re)validated config
    fn configure(&mut self, _config: &GameConfig) {}

    /// Advance `player` by `dt` against fixed `scenery`, appending contacts to `contacts`
    fn step(&mut self, player: &mut Body, scenery: &[&Body], dt: f32, contacts: &mut Vec<ContactEvent>);
}

/// Minimal built-in physics: gravity, linear damping, overlap tests and
/// non-penetration against bodies the player collides with. The top of the
/// field is a hard ceiling; touching it is not a contact.
#[derive(Debug, Clone)]
pub struct KinematicSimulation {
    pub gravity: f32,
    pub linear_damping: f32,
    /// Highest y a dynamic body's top edge may reach
    pub ceiling: f32,
}

impl KinematicSimulation {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            gravity: config.gravity,
            linear_damping: config.linear_damping,
            ceiling: config.field_height,
        }
    }

    fn integrate(&self, body: &mut Body, dt: f32) {
        if !body.dynamic {
            return;
        }
        if body.affected_by_gravity {
            body.vel.y -= self.gravity * dt;
        }
        body.vel *= (1.0 - self.linear_damping * dt).max(0.0);
        body.pos += body.vel * dt;

        let (_, top) = body.vertical_extent();
        if top > self.ceiling {
            body.pos.y -= top - self.ceiling;
            body.vel.y = body.vel.y.min(0.0);
        }
    }
}

impl Default for KinematicSimulation {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl Simulation for KinematicSimulation {
    fn configure(&mut self, config: &GameConfig) {
        *self = Self::from_config(config);
    }

    fn step(&mut self, player: &mut Body, scenery: &[&Body], dt: f32, contacts: &mut Vec<ContactEvent>) {
        self.integrate(player, dt);

        for body in scenery {
            let notifies = player.category.notifies(body.category);
            let blocks = player.dynamic && player.category.collides_with(body.category);
            if !notifies && !blocks {
                continue;
            }

            let result = body_collision(player, body);
            if !result.hit {
                continue;
            }
            if notifies {
                contacts.push(ContactEvent::between(player, body));
            }
            if blocks {
                // Restitution 0: push out and drop the inbound velocity
                player.pos += result.normal * result.penetration;
                player.vel = absorb_velocity(player.vel, result.normal);
            }
        }
    }
}
