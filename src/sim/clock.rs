//! Frame clock and fixed-step accumulator
//!
//! The clock turns a raw frame delta into a bounded one; the stepper drains
//! that delta in fixed increments. Overflow past the substep cap is dropped
//! instead of carried, so a slow device never falls further and further behind.

use crate::consts::*;

/// Clamps raw frame deltas and tracks elapsed simulation time
#[derive(Debug, Clone)]
pub struct Clock {
    max_delta_ms: f32,
    /// Last clamped delta (ms)
    pub delta_ms: f32,
    /// Sum of clamped deltas (ms)
    pub elapsed_ms: f64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DELTA_MS)
    }
}

impl Clock {
    pub fn new(max_delta_ms: f32) -> Self {
        Self {
            max_delta_ms,
            delta_ms: 0.0,
            elapsed_ms: 0.0,
        }
    }

    /// Clamp a frame delta into [0, max] and accumulate it
    pub fn update(&mut self, frame_delta_ms: f32) -> f32 {
        // NaN from a broken timestamp source counts as no time passing
        let clamped = if frame_delta_ms.is_nan() {
            0.0
        } else {
            frame_delta_ms.clamp(0.0, self.max_delta_ms)
        };
        self.delta_ms = clamped;
        self.elapsed_ms += clamped as f64;
        clamped
    }

    pub fn reset(&mut self) {
        self.delta_ms = 0.0;
        self.elapsed_ms = 0.0;
    }
}

/// Fixed-step time accumulator
#[derive(Debug, Clone)]
pub struct FixedStepper {
    pub step_ms: f32,
    pub max_substeps: u32,
    accumulator_ms: f32,
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(FIXED_STEP_MS, MAX_SUBSTEPS)
    }
}

impl FixedStepper {
    pub fn new(step_ms: f32, max_substeps: u32) -> Self {
        Self {
            step_ms: step_ms.max(f32::EPSILON),
            max_substeps,
            accumulator_ms: 0.0,
        }
    }

    /// Time waiting for the next step (ms)
    pub fn accumulated_ms(&self) -> f32 {
        self.accumulator_ms
    }

    /// Add a clamped delta and return how many fixed steps to run now
    pub fn advance(&mut self, delta_ms: f32) -> u32 {
        self.accumulator_ms += delta_ms.max(0.0);

        let mut steps = 0;
        while self.accumulator_ms >= self.step_ms && steps < self.max_substeps {
            self.accumulator_ms -= self.step_ms;
            steps += 1;
        }

        if steps == self.max_substeps && self.accumulator_ms >= self.step_ms {
            log::debug!(
                "Dropping {:.1}ms of simulation backlog",
                self.accumulator_ms
            );
            self.accumulator_ms = 0.0;
        }

        steps
    }

    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
    }
}
