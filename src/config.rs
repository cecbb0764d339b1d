//! Game configuration
//!
//! Everything tunable about a run. A `Game` is only ever built from a config
//! that passed `validate()`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::obstacle::{ObstacleGenerator, ObstacleLayout};

/// Rejected configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must not be negative (got {value})")]
    Negative { name: &'static str, value: f32 },

    #[error("gap of {gap} with margins of {margin} does not fit in a field {field_height} high")]
    GapTooLarge {
        gap: f32,
        margin: f32,
        field_height: f32,
    },

    #[error("offset range of ±{max_offset} would push the gap off the field (limit ±{limit})")]
    OffsetOutOfBounds { max_offset: f32, limit: f32 },

    #[error("segment height {height} cannot reach the field edge (needs at least {required})")]
    SegmentTooShort { height: f32, required: f32 },

    #[error("player of size {size} cannot pass through a gap of {gap}")]
    PlayerTooLarge { size: f32, gap: f32 },

    #[error("spawn interval must be at least one tick")]
    ZeroSpawnInterval,

    #[error("cannot reconfigure while a run is in progress")]
    RunInProgress,

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Require a strictly positive, finite value
pub(crate) fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Thickness of the ground strip below the field
    pub ground_thickness: f32,

    // === Obstacles ===
    /// Vertical distance between the inner edges of the two segments
    pub gap_size: f32,
    pub segment_width: f32,
    pub segment_height: f32,
    pub trigger_width: f32,
    /// Minimum distance kept between the gap and the field edges
    pub min_margin: f32,
    /// Largest vertical offset, as a fraction of field height
    pub max_offset_fraction: f32,
    /// Ticks between obstacle spawns
    pub spawn_interval_ticks: u32,
    /// Horizontal obstacle speed (units/s)
    pub scroll_speed: f32,

    // === Player ===
    pub player_size: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    pub linear_damping: f32,
    /// Upward speed set by a flap (units/s)
    pub flap_velocity: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            ground_thickness: GROUND_THICKNESS,

            gap_size: GAP_SIZE,
            segment_width: SEGMENT_WIDTH,
            // Tall enough to cover the field edge at any offset
            segment_height: FIELD_HEIGHT,
            trigger_width: TRIGGER_WIDTH,
            min_margin: MIN_MARGIN,
            max_offset_fraction: MAX_OFFSET_FRACTION,
            spawn_interval_ticks: SPAWN_INTERVAL_TICKS,
            scroll_speed: SCROLL_SPEED,

            player_size: PLAYER_SIZE,
            gravity: GRAVITY,
            linear_damping: LINEAR_DAMPING,
            flap_velocity: FLAP_VELOCITY,
        }
    }
}

impl GameConfig {
    /// Obstacle geometry subset
    pub fn layout(&self) -> ObstacleLayout {
        ObstacleLayout {
            field_width: self.field_width,
            field_height: self.field_height,
            gap_size: self.gap_size,
            segment_width: self.segment_width,
            segment_height: self.segment_height,
            trigger_width: self.trigger_width,
            min_margin: self.min_margin,
            max_offset_fraction: self.max_offset_fraction,
        }
    }

    /// Check every constraint a run depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn_interval_ticks == 0 {
            return Err(ConfigError::ZeroSpawnInterval);
        }
        positive("scroll_speed", self.scroll_speed)?;
        positive("ground_thickness", self.ground_thickness)?;
        positive("player_size", self.player_size)?;
        positive("flap_velocity", self.flap_velocity)?;
        non_negative("gravity", self.gravity)?;
        non_negative("linear_damping", self.linear_damping)?;

        // Field and obstacle geometry
        ObstacleGenerator::new(self.layout())?;

        if self.player_size >= self.gap_size {
            return Err(ConfigError::PlayerTooLarge {
                size: self.player_size,
                gap: self.gap_size,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// LocalStorage key (WASM)
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "flappy_beetle_config";
    /// Config file name (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub const DEFAULT_PATH: &'static str = "flappy_beetle.json";

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match storage.set_item(Self::STORAGE_KEY, &self.to_json()) {
                Ok(()) => log::info!("Config saved"),
                Err(_) => log::warn!("Failed to save config"),
            }
        }
    }

    /// Load from the default file in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(std::path::Path::new(Self::DEFAULT_PATH))
    }

    /// Save to the default file in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        self.save_to(std::path::Path::new(Self::DEFAULT_PATH));
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) {
        match std::fs::write(path, self.to_json()) {
            Ok(()) => log::info!("Config saved to {}", path.display()),
            Err(e) => log::warn!("Failed to save config to {}: {}", path.display(), e),
        }
    }

    /// Load from a JSON file, falling back to defaults if absent or invalid
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default config");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_spawn_interval_rejected() {
        let config = GameConfig {
            spawn_interval_ticks: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSpawnInterval));
    }

    #[test]
    fn test_non_positive_speed_rejected() {
        for speed in [0.0, -5.0, f32::NAN] {
            let config = GameConfig {
                scroll_speed: speed,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::NonPositive {
                    name: "scroll_speed",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_invalid_gap_rejected() {
        let config = GameConfig {
            gap_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "gap_size", .. })
        ));

        let config = GameConfig {
            gap_size: 1300.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::GapTooLarge { .. })));
    }

    #[test]
    fn test_player_must_fit_gap() {
        let config = GameConfig {
            player_size: 400.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::PlayerTooLarge { .. })));
    }

    #[test]
    fn test_negative_gravity_rejected() {
        let config = GameConfig {
            gravity: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { name: "gravity", .. })
        ));
    }

    #[test]
    fn test_from_json_partial() {
        let config = GameConfig::from_json(r#"{ "scroll_speed": 200.0 }"#).unwrap();
        assert_eq!(config.scroll_speed, 200.0);
        assert_eq!(config.gap_size, GAP_SIZE);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "spawn_interval_ticks": 0 }"#),
            Err(ConfigError::ZeroSpawnInterval)
        ));
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_load_and_fallback() {
        let path = std::env::temp_dir().join(format!(
            "flappy_beetle_config_test_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        assert_eq!(GameConfig::load_from(&path), GameConfig::default());

        let config = GameConfig {
            scroll_speed: 180.0,
            ..Default::default()
        };
        config.save_to(&path);
        assert_eq!(GameConfig::load_from(&path), config);

        // Invalid contents fall back to defaults
        std::fs::write(&path, r#"{ "gap_size": -1.0 }"#).unwrap();
        assert_eq!(GameConfig::load_from(&path), GameConfig::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let config = GameConfig {
            gap_size: 420.0,
            ..Default::default()
        };
        let parsed = GameConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(parsed, config);
    }
}
