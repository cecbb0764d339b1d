//! Game driver
//!
//! Owns the state together with its collaborators (RNG, physics, high score
//! storage), turns presentation commands into tick input and runs the fixed
//! timestep loop.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{ConfigError, GameConfig};
use crate::consts::*;
use crate::highscore::{HighScoreKeeper, HighScoreStore, default_store};
use crate::sim::{
    GameEvent, GamePhase, GameState, KinematicSimulation, ObstacleRng, Simulation, Snapshot,
    TickInput, tick,
};
use crate::ui::{Hud, TapAction};

/// Game instance holding all state
pub struct Game<R: ObstacleRng = Pcg32, S: Simulation = KinematicSimulation> {
    state: GameState,
    rng: R,
    sim: S,
    high_scores: HighScoreKeeper,
    input: TickInput,
    accumulator: f32,
}

impl Game {
    /// Platform storage, entropy-seeded RNG, built-in physics
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = Pcg32::from_rng(&mut rand::rng());
        let sim = KinematicSimulation::from_config(&config);
        Self::with_parts(config, rng, sim, default_store())
    }

    /// Reproducible game with the given storage
    pub fn with_seed(
        config: GameConfig,
        seed: u64,
        store: Box<dyn HighScoreStore>,
    ) -> Result<Self, ConfigError> {
        let sim = KinematicSimulation::from_config(&config);
        Self::with_parts(config, Pcg32::seed_from_u64(seed), sim, store)
    }
}

impl<R: ObstacleRng, S: Simulation> Game<R, S> {
    /// Build from explicit collaborators. Invalid configs never reach Running.
    pub fn with_parts(
        config: GameConfig,
        rng: R,
        mut sim: S,
        store: Box<dyn HighScoreStore>,
    ) -> Result<Self, ConfigError> {
        let mut state = GameState::new(config).inspect_err(|e| {
            log::warn!("Rejected config: {}", e);
        })?;
        sim.configure(&state.config);

        let high_scores = HighScoreKeeper::load(store);
        state.high_score = high_scores.best();

        Ok(Self {
            state,
            rng,
            sim,
            high_scores,
            input: TickInput::default(),
            accumulator: 0.0,
        })
    }

    // === Commands (applied on the next tick) ===

    pub fn start(&mut self) {
        self.input.start = true;
    }

    pub fn pause(&mut self) {
        self.input.pause = true;
    }

    pub fn resume(&mut self) {
        self.input.resume = true;
    }

    pub fn restart(&mut self) {
        self.input.restart = true;
    }

    pub fn flap(&mut self) {
        self.input.flap = true;
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Route a tap (field coordinates) through the HUD buttons
    pub fn tap(&mut self, point: glam::Vec2) -> TapAction {
        let action = self.hud().tap_action(point);
        match action {
            TapAction::Start => self.start(),
            TapAction::Flap => self.flap(),
            TapAction::Pause => self.pause(),
            TapAction::Resume => self.resume(),
            TapAction::Restart => self.restart(),
            TapAction::Ignore => {}
        }
        action
    }

    /// Replace the config between runs; on error the old config stays
    pub fn reconfigure(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        self.state.reconfigure(config).inspect_err(|e| {
            log::warn!("Rejected config: {}", e);
        })?;
        self.sim.configure(&self.state.config);
        Ok(())
    }

    /// Run as many fixed ticks as `frame_dt` covers; returns the count
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        // NaN or infinite deltas count as no time passing
        let frame_dt = if frame_dt.is_finite() { frame_dt } else { 0.0 };
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Exactly one tick with the pending input
    pub fn step(&mut self) {
        tick(
            &mut self.state,
            &self.input,
            &mut self.rng,
            &mut self.sim,
            SIM_DT,
        );

        // Clear one-shot inputs after processing
        self.input.start = false;
        self.input.pause = false;
        self.input.resume = false;
        self.input.restart = false;
        self.input.flap = false;

        if self.state.high_score > self.high_scores.best() {
            self.high_scores.submit(self.state.high_score);
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn high_score(&self) -> u64 {
        self.state.high_score
    }

    pub fn high_score_persistent(&self) -> bool {
        self.high_scores.is_persistent()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn hud(&self) -> Hud {
        Hud::from_snapshot(&self.state.snapshot())
    }

    /// Take the events produced since the last call. Hosts should drain once
    /// per frame; undrained events beyond `MAX_PENDING_EVENTS` drop the oldest.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }
}
