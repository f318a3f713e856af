//! Parcel Run - a top-down survival courier game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (fixed step, spawning, collisions, run state)
//! - `config`: Data-driven game balance with embedded defaults
//! - `audio`: Sound cue mapping and Web Audio playback
//! - `renderer`: Render collaborator boundary (canvas 2D on the web)
//! - `platform`: Frame driver and keyboard input glue

pub mod audio;
pub mod config;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, GameConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// World scale: one meter is this many pixels
    pub const SCALE: f32 = 10.0;

    /// Fixed simulation timestep in ms (240 Hz)
    pub const FIXED_STEP_MS: f32 = 1000.0 / 240.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 10;
    /// Largest frame delta the clock accepts (tab suspension, breakpoints)
    pub const MAX_FRAME_DELTA_MS: f32 = 250.0;

    /// Reference frame length used to make camera smoothing frame-rate independent
    pub const NOMINAL_FRAME_MS: f32 = 16.67;

    /// Round length
    pub const ROUND_DURATION_MS: f32 = 3.0 * 60.0 * 1000.0;

    /// Damage flash floor on the player (ms)
    pub const HIT_FLASH_MS: f32 = 200.0;

    /// Floating text lifetime (ms)
    pub const FLOAT_TEXT_MS: f32 = 1000.0;
}

/// Meters to pixels
#[inline]
pub fn to_px(meters: Vec2) -> Vec2 {
    meters * consts::SCALE
}

/// Pixels to meters
#[inline]
pub fn to_meters(px: Vec2) -> Vec2 {
    px / consts::SCALE
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
