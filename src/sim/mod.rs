//! Tick-driven gameplay simulation
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Fixed timestep only
//! - Injected RNG only
//! - Stable iteration order (by entity ID)

pub mod body;
pub mod category;
pub mod collision;
pub mod contact;
pub mod obstacle;
pub mod physics;
pub mod state;
pub mod tick;

pub use body::{Body, BodyId, IdAllocator, Shape};
pub use category::{Category, CategoryMask};
pub use collision::{CollisionResult, circle_rect_collision, rects_overlap};
pub use contact::{ContactEvent, Effect, resolve_contact};
pub use obstacle::{ObstacleGenerator, ObstacleLayout, ObstaclePair, ObstacleRng};
pub use physics::{KinematicSimulation, Simulation};
pub use state::{BodyPose, GameEvent, GamePhase, GameState, PairPose, Snapshot};
pub use tick::{TickInput, tick};
