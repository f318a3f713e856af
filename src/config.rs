//! Game balance and tuning
//!
//! Every struct is `#[serde(default)]` so a partial JSON document only needs
//! the values it changes. Loaded once per run and treated as read-only; the
//! values that evolve during a run are copied into `sim::Difficulty` and
//! `sim::BoostTuning`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::BoostKind;

/// Configuration could not be parsed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub target: TargetConfig,
    pub enemies: EnemiesConfig,
    pub boosts: BoostsConfig,
    pub rewards: RewardsConfig,
    pub shop: ShopConfig,
    pub audio: AudioConfig,
}

/// Frame loop and round timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub fixed_step_ms: f32,
    pub max_substeps: u32,
    pub max_frame_delta_ms: f32,
    pub round_duration_ms: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixed_step_ms: FIXED_STEP_MS,
            max_substeps: MAX_SUBSTEPS,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            round_duration_ms: ROUND_DURATION_MS,
        }
    }
}

/// Per-side trim ratios of a sprite rectangle (0..0.49 each)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Trim {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Trim {
    pub const MAX_RATIO: f32 = 0.49;

    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Ratios clamped so opposite trims can never cross
    pub fn clamped(&self) -> Self {
        let c = |r: f32| r.clamp(0.0, Self::MAX_RATIO);
        Self::new(c(self.left), c(self.right), c(self.top), c(self.bottom))
    }
}

/// Player tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Movement speed (m/s)
    pub move_speed_mps: f32,
    pub max_hp: f32,
    pub start_coins: u32,
    /// Sprite rectangle (px)
    pub width_px: f32,
    pub height_px: f32,
    /// Damage box trims (excludes hat and shadow)
    pub collider: Trim,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed_mps: 10.0,
            max_hp: 100.0,
            start_coins: 100,
            width_px: 46.0,
            height_px: 46.0,
            collider: Trim::new(0.25, 0.25, 0.10, 0.03),
        }
    }
}

/// Camera follow tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Follow factor per nominal 60 fps frame (0..1)
    pub smoothness: f32,
    /// Dead-zone half extent as a fraction of the center-to-edge distance
    pub deadzone_half_ratio: f32,
    /// Fixed dead-zone half extents (px); override the ratio when set
    pub deadzone_px_x: Option<f32>,
    pub deadzone_px_y: Option<f32>,
    /// Initial viewport (px); the platform resizes it to the real canvas
    pub view_width_px: f32,
    pub view_height_px: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            smoothness: 0.15,
            deadzone_half_ratio: 0.5,
            deadzone_px_x: None,
            deadzone_px_y: None,
            view_width_px: 1280.0,
            view_height_px: 720.0,
        }
    }
}

/// Delivery objective
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub size_m: f32,
    pub distance_min_m: f32,
    pub distance_max_m: f32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            size_m: 3.2,
            distance_min_m: 100.0,
            distance_max_m: 500.0,
        }
    }
}

/// Damage collider shape of an enemy type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColliderConfig {
    /// Centered circle, radius = half the visual size
    #[default]
    Circle,
    /// Trimmed box, optionally with per-facing trims
    Aabb {
        #[serde(default)]
        trim: Trim,
        #[serde(default)]
        up: Option<Trim>,
        #[serde(default)]
        down: Option<Trim>,
        #[serde(default)]
        side: Option<Trim>,
    },
}

/// Spawn schedule of one enemy class
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub initial_count: u32,
    pub max_count: u32,
    pub interval_ms: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_count: 2,
            max_count: 8,
            interval_ms: 2000.0,
        }
    }
}

/// Per-class escalation applied on every power-up step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassPowerupConfig {
    /// Overrides the global speed delta when set (m/s)
    pub speed_delta_mps: Option<f32>,
    pub max_count_delta: u32,
    pub interval_delta_ms: f32,
    pub damage_delta: f32,
}

/// Homing enemy ("dog")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MobConfig {
    pub size_m: f32,
    pub move_speed_mps: f32,
    pub damage_per_tick: f32,
    pub damage_interval_ms: f32,
    pub max_hp: f32,
    /// Seconds before despawn (0 = never)
    pub lifetime_sec: f32,
    pub collider: ColliderConfig,
    pub frame_duration_ms: f32,
    /// Walk frames per facing
    pub walk_frames: u32,
    pub spawn: SpawnConfig,
    pub powerup: ClassPowerupConfig,
}

impl Default for MobConfig {
    fn default() -> Self {
        Self {
            size_m: 3.2,
            move_speed_mps: 3.0,
            damage_per_tick: 5.0,
            damage_interval_ms: 500.0,
            max_hp: 20.0,
            lifetime_sec: 30.0,
            collider: ColliderConfig::Aabb {
                trim: Trim::default(),
                up: Some(Trim::new(0.26, 0.26, 0.10, 0.04)),
                down: Some(Trim::new(0.25, 0.25, 0.10, 0.06)),
                side: Some(Trim::new(0.17, 0.17, 0.10, 0.06)),
            },
            frame_duration_ms: 140.0,
            walk_frames: 4,
            spawn: SpawnConfig::default(),
            powerup: ClassPowerupConfig {
                speed_delta_mps: Some(1.0),
                max_count_delta: 3,
                interval_delta_ms: 200.0,
                damage_delta: 0.0,
            },
        }
    }
}

/// Straight-line dasher ("car")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub size_m: f32,
    pub move_speed_mps: f32,
    pub damage_per_hit: f32,
    /// Stationary wind-up before the dash (ms)
    pub dash_delay_ms: f32,
    pub max_hp: f32,
    pub lifetime_sec: f32,
    pub collider: ColliderConfig,
    pub frame_duration_ms: f32,
    /// Opaque sprite variants; one is picked at random per spawn
    pub variants: Vec<String>,
    pub spawn: SpawnConfig,
    pub powerup: ClassPowerupConfig,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            size_m: 3.2,
            move_speed_mps: 10.0,
            damage_per_hit: 15.0,
            dash_delay_ms: 250.0,
            max_hp: 20.0,
            lifetime_sec: 0.0,
            collider: ColliderConfig::Circle,
            frame_duration_ms: 120.0,
            variants: ["red_car", "blue_car", "green_car", "yellow_car"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            spawn: SpawnConfig {
                initial_count: 1,
                // Disabled until a power-up step raises the cap
                max_count: 0,
                interval_ms: 3000.0,
            },
            powerup: ClassPowerupConfig {
                speed_delta_mps: Some(10.0),
                max_count_delta: 1,
                interval_delta_ms: 100.0,
                damage_delta: 2.0,
            },
        }
    }
}

/// Global difficulty escalation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupConfig {
    pub interval_sec: f32,
    /// Speed delta for classes without an override (m/s)
    pub speed_delta_mps: f32,
    /// Floor for class spawn intervals (ms)
    pub interval_min_ms: f32,
}

impl Default for PowerupConfig {
    fn default() -> Self {
        Self {
            interval_sec: 20.0,
            speed_delta_mps: 2.0,
            interval_min_ms: 300.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemiesConfig {
    pub mob: MobConfig,
    pub dash: DashConfig,
    pub powerup: PowerupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinConfig {
    pub value_min: u32,
    pub value_max: u32,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            value_min: 10,
            value_max: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub add_seconds: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { add_seconds: 30.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    pub speed_multiplier: f32,
    pub duration_sec: f32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 2.0,
            duration_sec: 10.0,
        }
    }
}

/// Time-limited pickups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostsConfig {
    pub spawn_interval_sec: f32,
    pub size_m: f32,
    /// Spawn ring around the player center (m)
    pub distance_min_m: f32,
    pub distance_max_m: f32,
    /// Enabled kinds, drawn uniformly
    pub kinds: Vec<BoostKind>,
    pub frames: u32,
    pub frame_duration_ms: f32,
    pub coin: CoinConfig,
    pub clock: ClockConfig,
    pub energy: EnergyConfig,
}

impl Default for BoostsConfig {
    fn default() -> Self {
        Self {
            spawn_interval_sec: 20.0,
            size_m: 2.0,
            distance_min_m: 50.0,
            distance_max_m: 150.0,
            kinds: vec![BoostKind::Coin, BoostKind::Clock, BoostKind::Energy],
            frames: 3,
            frame_duration_ms: 160.0,
            coin: CoinConfig::default(),
            clock: ClockConfig::default(),
            energy: EnergyConfig::default(),
        }
    }
}

/// Objective pickup payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsConfig {
    pub add_time_seconds: f32,
    pub add_coins: u32,
    pub heal_full: bool,
    /// Flat heal used when `heal_full` is off
    pub heal_amount: f32,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            add_time_seconds: 15.0,
            add_coins: 50,
            heal_full: true,
            heal_amount: 0.0,
        }
    }
}

/// Cost plus a single amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Upgrade {
    pub cost: u32,
    pub amount: f32,
}

/// Cost plus an amount range
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RangeUpgrade {
    pub cost: u32,
    pub add_min: u32,
    pub add_max: u32,
}

/// Pause-menu upgrades
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub move_speed: Upgrade,
    pub max_hp: Upgrade,
    pub coin_value: RangeUpgrade,
    pub clock_time: Upgrade,
    pub energy_duration: Upgrade,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            move_speed: Upgrade {
                cost: 50,
                amount: 1.0,
            },
            max_hp: Upgrade {
                cost: 30,
                amount: 20.0,
            },
            coin_value: RangeUpgrade {
                cost: 30,
                add_min: 5,
                add_max: 10,
            },
            clock_time: Upgrade {
                cost: 40,
                amount: 10.0,
            },
            energy_duration: Upgrade {
                cost: 20,
                amount: 5.0,
            },
        }
    }
}

/// Cue volumes (0.0 - 1.0)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sfx_volume: f32,
    pub damage: f32,
    pub boost_created: f32,
    pub boost_picked: f32,
    pub reward: f32,
    pub game_over: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sfx_volume: 0.6,
            damage: 0.3,
            boost_created: 0.5,
            boost_picked: 0.5,
            reward: 1.0,
            game_over: 1.0,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "parcel_run_config";

    /// Load config overrides from LocalStorage (WASM only)
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

    /// Load config from the JSON file named by the first CLI argument
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = std::env::args().nth(1) else {
            log::info!("Using default config");
            return Self::default();
        };
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "player": { "max_hp": 250 } }"#).unwrap();
        assert_eq!(config.player.max_hp, 250.0);
        assert_eq!(config.player.move_speed_mps, 10.0);
        assert_eq!(config.enemies.mob.spawn.max_count, 8);
        assert_eq!(config.boosts.kinds.len(), 3);
    }

    #[test]
    fn test_dash_class_starts_disabled() {
        let config = GameConfig::default();
        assert_eq!(config.enemies.dash.spawn.max_count, 0);
        assert_eq!(config.enemies.dash.spawn.initial_count, 1);
    }

    #[test]
    fn test_collider_tagged_json() {
        let json = r#"{ "enemies": { "mob": { "collider": { "type": "aabb", "trim": { "left": 0.1 } } } } }"#;
        let config = GameConfig::from_json(json).unwrap();
        match config.enemies.mob.collider {
            ColliderConfig::Aabb { trim, up, .. } => {
                assert_eq!(trim.left, 0.1);
                assert!(up.is_none());
            }
            ColliderConfig::Circle => panic!("expected aabb collider"),
        }
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_json_roundtrip_preserves_boost_kinds() {
        let config = GameConfig::default();
        let json = config.to_json().unwrap();
        let back = GameConfig::from_json(&json).unwrap();
        assert_eq!(back.boosts.kinds, config.boosts.kinds);
    }

    proptest! {
        #[test]
        fn trim_clamp_stays_in_range(l in -2.0f32..2.0, r in -2.0f32..2.0, t in -2.0f32..2.0, b in -2.0f32..2.0) {
            let c = Trim::new(l, r, t, b).clamped();
            for v in [c.left, c.right, c.top, c.bottom] {
                prop_assert!((0.0..=Trim::MAX_RATIO).contains(&v));
            }
        }
    }
}
