//! Fixed timestep simulation tick
//!
//! Per tick, in order: commands and Running-state effects (flap, scroll,
//! retire, spawn), then the simulation step, then contact resolution, then
//! score and game-over transitions.

use super::body::Body;
use super::contact::resolve_all;
use super::obstacle::ObstacleRng;
use super::physics::Simulation;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Begin a run from Idle
    pub start: bool,
    pub pause: bool,
    pub resume: bool,
    /// Begin a new run after game over
    pub restart: bool,
    /// Upward impulse
    pub flap: bool,
    /// Demo mode - flaps on its own to stay level with the next gap
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick<R, S>(state: &mut GameState, input: &TickInput, rng: &mut R, sim: &mut S, dt: f32)
where
    R: ObstacleRng + ?Sized,
    S: Simulation + ?Sized,
{
    match state.phase {
        GamePhase::Idle => {
            if input.start || input.restart || input.autopilot {
                state.start_run();
            }
        }
        GamePhase::Running => {
            if input.pause {
                state.phase = GamePhase::Paused;
                state.push_event(GameEvent::Paused);
                log::info!("Paused at tick {}", state.time_ticks);
                return;
            }
        }
        GamePhase::Paused => {
            if input.resume {
                state.phase = GamePhase::Running;
                state.push_event(GameEvent::Resumed);
                log::info!("Resumed at tick {}", state.time_ticks);
            }
        }
        GamePhase::GameOver => {
            if input.restart {
                state.start_run();
            }
        }
    }

    // Nothing advances outside a run
    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;

    let flap = input.flap || (input.autopilot && autopilot_wants_flap(state));
    if flap {
        state.player.vel.y = state.config.flap_velocity;
        state.push_event(GameEvent::Flapped);
    }

    // Scroll, then retire pairs that have fully left the field
    let dx = -state.config.scroll_speed * dt;
    for pair in &mut state.obstacles {
        pair.advance(dx);
    }
    let mut retired = Vec::new();
    state.obstacles.retain(|pair| {
        let keep = pair.trailing_edge() >= 0.0;
        if !keep {
            log::debug!("Retired pair {:?}", pair.id);
            retired.push(pair.id);
        }
        keep
    });
    for id in retired {
        state.push_event(GameEvent::PairRetired { id });
    }

    if state.spawn_countdown == 0 {
        state.spawn_pair(rng);
        state.spawn_countdown = state.config.spawn_interval_ticks;
    }
    state.spawn_countdown -= 1;

    // Simulation step
    let mut contacts = Vec::new();
    {
        let scenery: Vec<&Body> = std::iter::once(&state.ground)
            .chain(state.obstacles.iter().flat_map(|p| p.bodies()))
            .collect();
        sim.step(&mut state.player, &scenery, dt, &mut contacts);
    }

    // Resolve and apply
    let outcome = resolve_all(&contacts, &mut state.obstacles);
    if outcome.score_increments > 0 {
        state.score += u64::from(outcome.score_increments);
        state.push_event(GameEvent::Scored { score: state.score });
        log::debug!("Score {}", state.score);
    }
    if let Some(cause) = outcome.fatal {
        state.end_run(cause);
    }
}

/// Flap when below the next gap's centre and not already rising
fn autopilot_wants_flap(state: &GameState) -> bool {
    let player = &state.player;
    let (player_left, _) = player.horizontal_extent();
    let target = state
        .obstacles
        .iter()
        .find(|p| p.trailing_edge() > player_left)
        .map(|p| p.gap_center())
        .unwrap_or(state.config.field_height / 2.0);

    let slack = state.config.gap_size * 0.1;
    player.pos.y < target - slack && player.vel.y <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::consts::SIM_DT;
    use crate::sim::body::BodyId;
    use crate::sim::category::Category;
    use crate::sim::contact::ContactEvent;
    use crate::sim::physics::KinematicSimulation;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Reports a fixed list of contacts every step and never moves anything
    struct ScriptedSimulation {
        contacts: Vec<ContactEvent>,
    }

    impl Simulation for ScriptedSimulation {
        fn step(&mut self, _player: &mut Body, _scenery: &[&Body], _dt: f32, contacts: &mut Vec<ContactEvent>) {
            contacts.extend(self.contacts.iter().copied());
        }
    }

    fn quiet() -> ScriptedSimulation {
        ScriptedSimulation { contacts: Vec::new() }
    }

    fn running_state() -> GameState {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        state.start_run();
        state
    }

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_idle_to_running() {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut sim = quiet();

        tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &start(), &mut rng, &mut sim, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.time_ticks, 1);
        // First pair appears immediately at the trailing edge
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].x, state.generator.spawn_x());
    }

    #[test]
    fn test_spawn_cadence() {
        let config = GameConfig {
            spawn_interval_ticks: 10,
            ..Default::default()
        };
        let mut state = GameState::new(config).unwrap();
        state.start_run();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut sim = quiet();

        for _ in 0..25 {
            tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);
        }
        // Ticks 1, 11 and 21
        assert_eq!(state.obstacles.len(), 3);
        let ids: Vec<BodyId> = state.obstacles.iter().map(|p| p.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_pairs_scroll_and_retire() {
        let config = GameConfig {
            spawn_interval_ticks: 1_000_000,
            scroll_speed: 600.0,
            ..Default::default()
        };
        let mut state = GameState::new(config).unwrap();
        state.start_run();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut sim = quiet();

        tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);
        let spawn_x = state.obstacles[0].x;
        tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);
        assert!((state.obstacles[0].x - (spawn_x - 600.0 * SIM_DT)).abs() < 0.001);

        // 810 units at 5 units/tick
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);
        }
        assert!(state.obstacles.is_empty());
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::PairRetired { .. })));
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut sim = KinematicSimulation::from_config(&state.config);

        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);
        }
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, &mut rng, &mut sim, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = state.snapshot();
        let countdown = state.spawn_countdown;
        for _ in 0..50 {
            let flap = TickInput {
                flap: true,
                ..Default::default()
            };
            tick(&mut state, &flap, &mut rng, &mut sim, SIM_DT);
        }
        assert_eq!(state.snapshot(), frozen);
        assert_eq!(state.spawn_countdown, countdown);

        let resume = TickInput {
            resume: true,
            ..Default::default()
        };
        tick(&mut state, &resume, &mut rng, &mut sim, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.time_ticks, frozen.tick + 1);
    }

    #[test]
    fn test_resume_continues_identically() {
        let mut paused = running_state();
        let mut straight = paused.clone();
        let mut rng_a = Pcg32::seed_from_u64(5);
        let mut rng_b = Pcg32::seed_from_u64(5);
        let mut sim_a = KinematicSimulation::from_config(&paused.config);
        let mut sim_b = sim_a.clone();
        let none = TickInput::default();

        tick(&mut paused, &none, &mut rng_a, &mut sim_a, SIM_DT);
        tick(&mut straight, &none, &mut rng_b, &mut sim_b, SIM_DT);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut paused, &pause, &mut rng_a, &mut sim_a, SIM_DT);
        for _ in 0..10 {
            tick(&mut paused, &none, &mut rng_a, &mut sim_a, SIM_DT);
        }
        let resume = TickInput {
            resume: true,
            ..Default::default()
        };
        tick(&mut paused, &resume, &mut rng_a, &mut sim_a, SIM_DT);
        tick(&mut straight, &none, &mut rng_b, &mut sim_b, SIM_DT);

        assert_eq!(paused.snapshot(), straight.snapshot());
    }

    #[test]
    fn test_flap_sets_upward_velocity() {
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(6);
        let mut sim = quiet();
        let flap = TickInput {
            flap: true,
            ..Default::default()
        };
        tick(&mut state, &flap, &mut rng, &mut sim, SIM_DT);
        assert_eq!(state.player.vel.y, state.config.flap_velocity);
        assert!(state.events.contains(&GameEvent::Flapped));
    }

    #[test]
    fn test_flap_ignored_when_idle() {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut sim = quiet();
        let flap = TickInput {
            flap: true,
            ..Default::default()
        };
        tick(&mut state, &flap, &mut rng, &mut sim, SIM_DT);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_repeated_trigger_contact_scores_once() {
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut sim = quiet();
        tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);

        let event = ContactEvent::between(&state.player, &state.obstacles[0].trigger);
        let mut sim = ScriptedSimulation {
            contacts: vec![event],
        };
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);
        }
        assert_eq!(state.score, 1);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_fatal_contacts_end_run() {
        for fatal in [Category::Obstacle, Category::Ground] {
            let mut state = running_state();
            let mut rng = Pcg32::seed_from_u64(9);
            tick(&mut state, &TickInput::default(), &mut rng, &mut quiet(), SIM_DT);

            let other = match fatal {
                Category::Obstacle => state.obstacles[0].bottom.clone(),
                _ => state.ground.clone(),
            };
            let mut sim = ScriptedSimulation {
                contacts: vec![ContactEvent::between(&state.player, &other)],
            };
            tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);
            assert_eq!(state.phase, GamePhase::GameOver);

            // Further fatal contacts are no-ops
            let events = state.events.len();
            let ticks = state.time_ticks;
            tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);
            assert_eq!(state.events.len(), events);
            assert_eq!(state.time_ticks, ticks);
            assert!(state.events.iter().any(|e| matches!(
                e,
                GameEvent::GameOver { cause, .. } if *cause == fatal
            )));
        }
    }

    #[test]
    fn test_score_and_fatal_in_same_tick() {
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(10);
        tick(&mut state, &TickInput::default(), &mut rng, &mut quiet(), SIM_DT);

        let pair = &state.obstacles[0];
        let mut sim = ScriptedSimulation {
            contacts: vec![
                ContactEvent::between(&state.player, &pair.top),
                ContactEvent::between(&state.player, &pair.trigger),
            ],
        };
        tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);
        assert_eq!(state.score, 1);
        assert_eq!(state.high_score, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_high_score_never_decreases() {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut best = 0;

        for run_score in [3u32, 1, 5, 0, 2] {
            let restart = TickInput {
                start: true,
                restart: true,
                ..Default::default()
            };
            tick(&mut state, &restart, &mut rng, &mut quiet(), SIM_DT);
            assert_eq!(state.phase, GamePhase::Running);
            assert_eq!(state.score, 0);

            // One fresh trigger per point, so each tick scores exactly one
            for _ in 0..run_score {
                state.spawn_pair(&mut rng);
                let trigger = state.obstacles.last().unwrap().trigger.clone();
                let mut sim = ScriptedSimulation {
                    contacts: vec![ContactEvent::between(&state.player, &trigger)],
                };
                tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);
            }
            assert_eq!(state.score, u64::from(run_score));

            let ground = state.ground.clone();
            let mut sim = ScriptedSimulation {
                contacts: vec![ContactEvent::between(&state.player, &ground)],
            };
            tick(&mut state, &TickInput::default(), &mut rng, &mut sim, SIM_DT);
            assert_eq!(state.phase, GamePhase::GameOver);

            best = best.max(u64::from(run_score));
            assert_eq!(state.high_score, best);
        }
    }

    #[test]
    fn test_autopilot_hovers() {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        let mut rng = Pcg32::seed_from_u64(12);
        let mut sim = KinematicSimulation::from_config(&state.config);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        // Two seconds: the first pair has not reached the player yet
        for _ in 0..240 {
            tick(&mut state, &input, &mut rng, &mut sim, SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.player.pos.y > 0.0 && state.player.pos.y < state.config.field_height);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = running_state();
        let mut state2 = running_state();
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);
        let mut sim1 = KinematicSimulation::from_config(&state1.config);
        let mut sim2 = sim1.clone();

        for i in 0..600 {
            let input = TickInput {
                flap: i % 40 == 0,
                ..Default::default()
            };
            tick(&mut state1, &input, &mut rng1, &mut sim1, SIM_DT);
            tick(&mut state2, &input, &mut rng2, &mut sim2, SIM_DT);
        }
        assert_eq!(state1.snapshot(), state2.snapshot());
    }
}
