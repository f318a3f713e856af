//! Sprite-frame timers and facing
//!
//! Presentation state only; nothing here feeds back into movement except the
//! facing used to pick per-direction collider trims.

use serde::{Deserialize, Serialize};

/// Four-way sprite facing (left/right share `Side`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Up,
    #[default]
    Down,
    Side,
}

/// Cycles a frame index on a fixed per-frame duration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameTimer {
    pub frame: u32,
    timer_ms: f32,
}

impl FrameTimer {
    /// Advance by `dt`; at most one frame per call, keeping the remainder
    pub fn tick(&mut self, dt: f32, frame_ms: f32, frame_count: u32) {
        if frame_count == 0 || frame_ms <= 0.0 {
            return;
        }
        self.timer_ms += dt;
        if self.timer_ms >= frame_ms {
            self.timer_ms -= frame_ms;
            self.frame = (self.frame + 1) % frame_count;
        }
    }

    pub fn reset(&mut self) {
        self.frame = 0;
        self.timer_ms = 0.0;
    }
}
