//! Game state and core simulation types
//!
//! Everything the scheduler owns lives here. The presentation reads it through
//! `Snapshot`; only `tick` mutates it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, IdAllocator};
use super::category::Category;
use super::obstacle::{ObstacleGenerator, ObstaclePair, ObstacleRng};
use crate::config::{ConfigError, GameConfig};
use crate::consts::MAX_PENDING_EVENTS;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first tap; player hovers
    Idle,
    /// Active gameplay
    Running,
    /// Frozen mid-run
    Paused,
    /// Run ended by a fatal contact
    GameOver,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    Paused,
    Resumed,
    Flapped,
    PairSpawned { id: BodyId, offset: f32 },
    PairRetired { id: BodyId },
    Scored { score: u64 },
    GameOver {
        final_score: u64,
        high_score: u64,
        new_record: bool,
        /// What the player hit
        cause: Category,
    },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub generator: ObstacleGenerator,
    pub phase: GamePhase,
    /// Score of the current (or last) run
    pub score: u64,
    /// Best final score seen
    pub high_score: u64,
    /// Running ticks in the current run
    pub time_ticks: u64,
    /// Ticks until the next spawn
    pub spawn_countdown: u32,
    pub player: Body,
    pub ground: Body,
    /// Active pairs (ascending id)
    pub obstacles: Vec<ObstaclePair>,
    /// Pending events, oldest first; capped at `MAX_PENDING_EVENTS`
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    ids: IdAllocator,
}

impl GameState {
    /// Build an Idle state from a config, rejecting invalid ones
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = ObstacleGenerator::new(config.layout())?;
        let mut ids = IdAllocator::default();
        let player = Body::player(ids.next_id(), player_home(&config), config.player_size);
        let ground = ground_body(ids.next_id(), &config);

        Ok(Self {
            config,
            generator,
            phase: GamePhase::Idle,
            score: 0,
            high_score: 0,
            time_ticks: 0,
            spawn_countdown: 0,
            player,
            ground,
            obstacles: Vec::new(),
            events: Vec::new(),
            ids,
        })
    }

    /// Generate a pair at the trailing edge and add it to the active set
    pub fn spawn_pair<R: ObstacleRng + ?Sized>(&mut self, rng: &mut R) {
        let pair = self.generator.generate(rng, &mut self.ids);
        log::debug!("Spawned pair {:?} at offset {:.1}", pair.id, pair.offset);
        self.push_event(GameEvent::PairSpawned {
            id: pair.id,
            offset: pair.offset,
        });
        self.obstacles.push(pair);
    }

    /// Queue an event, dropping the oldest once the queue is full
    pub fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Swap in a new config between runs
    pub fn reconfigure(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        if matches!(self.phase, GamePhase::Running | GamePhase::Paused) {
            return Err(ConfigError::RunInProgress);
        }
        config.validate()?;
        self.generator = ObstacleGenerator::new(config.layout())?;
        self.ground = ground_body(self.ground.id, &config);
        self.player = Body::player(self.player.id, player_home(&config), config.player_size);
        self.obstacles.clear();
        self.config = config;
        Ok(())
    }

    /// Reset for a fresh run and enter Running
    pub fn start_run(&mut self) {
        self.score = 0;
        self.time_ticks = 0;
        self.spawn_countdown = 0;
        self.obstacles.clear();

        self.player.pos = player_home(&self.config);
        self.player.vel = Vec2::ZERO;
        self.player.affected_by_gravity = true;

        self.phase = GamePhase::Running;
        self.push_event(GameEvent::RunStarted);
        log::info!("Run started (high score {})", self.high_score);
    }

    /// Freeze the run and settle the high score
    pub fn end_run(&mut self, cause: Category) {
        if self.phase != GamePhase::Running {
            return;
        }
        let new_record = self.score > self.high_score;
        self.high_score = self.high_score.max(self.score);
        self.phase = GamePhase::GameOver;
        self.push_event(GameEvent::GameOver {
            final_score: self.score,
            high_score: self.high_score,
            new_record,
            cause,
        });
        log::info!(
            "Game over: hit {}, score {}, high score {}{}",
            cause.as_str(),
            self.score,
            self.high_score,
            if new_record { " (new record)" } else { "" }
        );
    }

    /// Read-only view for the presentation
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            high_score: self.high_score,
            tick: self.time_ticks,
            field: Vec2::new(self.config.field_width, self.config.field_height),
            player: BodyPose::of(&self.player),
            ground: BodyPose::of(&self.ground),
            obstacles: self.obstacles.iter().map(PairPose::of).collect(),
        }
    }
}

/// Default player position: centre of the field
pub fn player_home(config: &GameConfig) -> Vec2 {
    Vec2::new(config.field_width / 2.0, config.field_height / 2.0)
}

/// Ground strip directly below the field
fn ground_body(id: BodyId, config: &GameConfig) -> Body {
    Body::fixed_rect(
        id,
        Category::Ground,
        Vec2::new(config.field_width / 2.0, -config.ground_thickness / 2.0),
        Vec2::new(config.field_width, config.ground_thickness),
    )
}

/// Renderable pose of one body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPose {
    pub id: BodyId,
    pub category: Category,
    pub pos: Vec2,
    pub size: Vec2,
}

impl BodyPose {
    pub fn of(body: &Body) -> Self {
        Self {
            id: body.id,
            category: body.category,
            pos: body.pos,
            size: body.size(),
        }
    }
}

/// Renderable pose of one obstacle pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairPose {
    pub id: BodyId,
    pub x: f32,
    pub offset: f32,
    pub top: BodyPose,
    pub bottom: BodyPose,
    pub trigger: BodyPose,
    pub trigger_consumed: bool,
}

impl PairPose {
    pub fn of(pair: &ObstaclePair) -> Self {
        Self {
            id: pair.id,
            x: pair.x,
            offset: pair.offset,
            top: BodyPose::of(&pair.top),
            bottom: BodyPose::of(&pair.bottom),
            trigger: BodyPose::of(&pair.trigger),
            trigger_consumed: pair.trigger_consumed,
        }
    }
}

/// Per-tick state exposed to the presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub tick: u64,
    /// Field width and height
    pub field: Vec2,
    pub player: BodyPose,
    pub ground: BodyPose,
    pub obstacles: Vec<PairPose>,
}
