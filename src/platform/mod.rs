//! Platform glue
//!
//! The frame driver turns timestamps into `Game::advance` calls and hands
//! the results to the audio and render collaborators.

pub mod input;

pub use input::{KeyCommand, KeyState};

use crate::audio::{self, AudioSink};
use crate::renderer::{FrameStats, Renderer};
use crate::sim::{Clock, Game, RunState};

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Per-frame sequencing and FPS tracking
#[derive(Debug, Clone)]
pub struct FrameDriver {
    last_timestamp_ms: Option<f64>,
    /// Wall-clock deltas for the readout; keeps ticking while paused
    wall: Clock,
    deltas: [f32; FPS_WINDOW],
    delta_index: usize,
    delta_count: usize,
    fps: f32,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            last_timestamp_ms: None,
            wall: Clock::default(),
            deltas: [0.0; FPS_WINDOW],
            delta_index: 0,
            delta_count: 0,
            fps: 0.0,
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Forget the last timestamp so the next frame has a zero delta
    pub fn reset_baseline(&mut self) {
        self.last_timestamp_ms = None;
    }

    /// Pause or resume; resuming restarts the delta baseline
    pub fn toggle_pause(&mut self, game: &mut Game) {
        game.toggle_pause();
        if game.run_state == RunState::Running {
            self.reset_baseline();
        }
    }

    /// Start a fresh run
    pub fn restart(&mut self, game: &mut Game) {
        game.stop();
        game.start();
        self.reset_baseline();
    }

    fn record_delta(&mut self, clamped_ms: f32) {
        if clamped_ms <= 0.0 {
            return;
        }
        self.deltas[self.delta_index] = clamped_ms;
        self.delta_index = (self.delta_index + 1) % FPS_WINDOW;
        self.delta_count = (self.delta_count + 1).min(FPS_WINDOW);
        let total: f32 = self.deltas[..self.delta_count].iter().sum();
        if total > 0.0 {
            self.fps = self.delta_count as f32 * 1000.0 / total;
        }
    }

    /// Run one display frame at `now_ms`
    pub fn frame(
        &mut self,
        game: &mut Game,
        now_ms: f64,
        renderer: &mut dyn Renderer,
        sink: &mut dyn AudioSink,
    ) -> FrameStats {
        let raw = match self.last_timestamp_ms {
            Some(last) => (now_ms - last) as f32,
            None => 0.0,
        };
        self.last_timestamp_ms = Some(now_ms);

        let clamped = self.wall.update(raw);
        self.record_delta(clamped);

        let steps = game.advance(raw);

        let events = game.drain_events();
        audio::play_events(sink, &game.config.audio, &events);

        let stats = FrameStats {
            fps: self.fps,
            steps,
        };
        if let Err(e) = renderer.render(&game.snapshot(), &stats) {
            log::warn!("Render error: {}", e);
        }
        stats
    }
}
