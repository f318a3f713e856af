//! Dead-zone follow camera

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::consts::*;

/// Per-update interpolation factor for a smoothness tuned at 60 fps
#[inline]
pub fn follow_factor(smoothness: f32, delta_ms: f32) -> f32 {
    let steps = (delta_ms / NOMINAL_FRAME_MS).max(0.0);
    1.0 - (1.0 - smoothness).powf(steps)
}

/// Viewport onto the world; `pos` is the top-left corner in meters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
    /// Viewport size (px)
    view: Vec2,
    deadzone_ratio: f32,
    deadzone_px: (Option<f32>, Option<f32>),
    pub smoothness: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            view: Vec2::new(config.view_width_px, config.view_height_px),
            deadzone_ratio: config.deadzone_half_ratio,
            deadzone_px: (config.deadzone_px_x, config.deadzone_px_y),
            smoothness: config.smoothness.clamp(0.0, 1.0),
        }
    }

    pub fn view_size(&self) -> Vec2 {
        self.view
    }

    pub fn set_view_size(&mut self, width: f32, height: f32) {
        self.view = Vec2::new(width.max(0.0), height.max(0.0));
    }

    /// Place the camera so `center` (meters) is mid-screen
    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.view / 2.0 / SCALE;
    }

    /// Top-left corner in world pixels
    pub fn offset_px(&self) -> Vec2 {
        self.pos * SCALE
    }

    pub fn center_px(&self) -> Vec2 {
        self.offset_px() + self.view / 2.0
    }

    /// Dead-zone half extents (px)
    ///
    /// Derived from the center-to-edge distance unless fixed extents are set.
    pub fn deadzone(&self) -> Vec2 {
        let half = self.view / 2.0 * self.deadzone_ratio;
        Vec2::new(
            self.deadzone_px.0.unwrap_or(half.x),
            self.deadzone_px.1.unwrap_or(half.y),
        )
    }

    /// Ease toward keeping `target` (meters) inside the dead-zone
    pub fn follow(&mut self, target: Vec2, delta_ms: f32) {
        let d = target * SCALE - self.center_px();
        let dz = self.deadzone();

        let excess = |d: f32, dz: f32| {
            if d.abs() > dz {
                d - d.signum() * dz
            } else {
                0.0
            }
        };
        let shift = Vec2::new(excess(d.x, dz.x), excess(d.y, dz.y));

        let factor = follow_factor(self.smoothness, delta_ms);
        self.pos += shift * factor / SCALE;
    }
}
