//! Flappy Beetle - gameplay core for a side-scrolling flap game
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (categories, obstacles, contacts, game state)
//! - `game`: Driver owning state, RNG, physics collaborator and high score
//! - `config`: Validated game configuration
//! - `highscore`: Persisted best score with graceful degradation
//! - `ui`: HUD model handed to the external renderer

pub mod config;
pub mod game;
pub mod highscore;
pub mod sim;
pub mod ui;

pub use config::{ConfigError, GameConfig};
pub use game::Game;
pub use highscore::{HighScoreKeeper, HighScoreStore, MemoryStore, PersistError};
pub use ui::{Hud, TapAction};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted by the driver (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Undrained events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 512;

    /// Field dimensions (portrait phone scene)
    pub const FIELD_WIDTH: f32 = 750.0;
    pub const FIELD_HEIGHT: f32 = 1334.0;

    /// Obstacle defaults
    pub const GAP_SIZE: f32 = 340.0;
    pub const SEGMENT_WIDTH: f32 = 60.0;
    pub const TRIGGER_WIDTH: f32 = 40.0;
    pub const MIN_MARGIN: f32 = 40.0;
    /// Offset range as a fraction of field height (~±200 units)
    pub const MAX_OFFSET_FRACTION: f32 = 0.15;
    /// 1.5 seconds at 120 Hz
    pub const SPAWN_INTERVAL_TICKS: u32 = 180;
    /// Horizontal scroll speed (units/s)
    pub const SCROLL_SPEED: f32 = 125.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const GRAVITY: f32 = 1470.0;
    pub const LINEAR_DAMPING: f32 = 1.1;
    pub const FLAP_VELOCITY: f32 = 520.0;

    /// Ground strip below the field
    pub const GROUND_THICKNESS: f32 = 100.0;
}
