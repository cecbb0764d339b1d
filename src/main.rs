//! Flappy Beetle entry point
//!
//! Native: headless autopilot demo that logs gameplay events.
//! WASM: exposes the game to the page, which renders and forwards taps.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use flappy_beetle::{Game, GameConfig};

    /// Game handle owned by the page's animation loop
    #[wasm_bindgen]
    pub struct WebGame {
        game: Game,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new() -> Result<WebGame, JsValue> {
            let config = GameConfig::load();
            // Store the effective config so the page can edit it
            config.save();
            let game = Game::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(WebGame { game })
        }

        /// Advance by a frame delta in seconds
        pub fn update(&mut self, dt: f32) -> u32 {
            let ticks = self.game.update(dt);
            for event in self.game.drain_events() {
                log::debug!("{:?}", event);
            }
            ticks
        }

        /// Tap in field coordinates (y-up)
        pub fn tap(&mut self, x: f32, y: f32) {
            self.game.tap(glam::Vec2::new(x, y));
        }

        pub fn set_autopilot(&mut self, enabled: bool) {
            self.game.set_autopilot(enabled);
        }

        pub fn snapshot_json(&self) -> String {
            serde_json::to_string(&self.game.snapshot()).unwrap_or_default()
        }

        pub fn hud_json(&self) -> String {
            serde_json::to_string(&self.game.hud()).unwrap_or_default()
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Flappy Beetle starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_beetle::consts::SIM_DT;
    use flappy_beetle::sim::{GameEvent, GamePhase};
    use flappy_beetle::{Game, GameConfig};

    env_logger::init();
    log::info!("Flappy Beetle (native) starting...");

    let config = match std::env::var("FLAPPY_BEETLE_CONFIG") {
        Ok(path) => GameConfig::load_from(std::path::Path::new(&path)),
        Err(_) => {
            let config = GameConfig::load();
            // Leave an editable copy of the defaults behind
            if !std::path::Path::new(GameConfig::DEFAULT_PATH).exists() {
                config.save();
            }
            config
        }
    };

    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // One autopilot run, capped at two minutes of game time
    const MAX_TICKS: u64 = 120 * 120;
    const FRAME_DT: f32 = 1.0 / 60.0;

    game.set_autopilot(true);
    let mut ticks = 0u64;
    while ticks < MAX_TICKS {
        ticks += u64::from(game.update(FRAME_DT));

        for event in game.drain_events() {
            match event {
                GameEvent::Scored { score } => log::info!("Score {}", score),
                GameEvent::GameOver { .. } => log::info!("{:?}", event),
                other => log::debug!("{:?}", other),
            }
        }

        if game.phase() == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Demo finished after {:.1}s: score {}, high score {}",
        ticks as f32 * SIM_DT,
        game.score(),
        game.high_score()
    );

    match serde_json::to_string_pretty(&game.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
