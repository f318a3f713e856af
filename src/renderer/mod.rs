//! Render collaborator boundary
//!
//! Renderers consume read-only `FrameSnapshot`s; the simulation never draws.
//! On the web the canvas 2D renderer lives in `canvas`.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use thiserror::Error;

use crate::sim::FrameSnapshot;

/// Per-frame loop statistics shown next to the game view
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub fps: f32,
    /// Fixed steps run this frame
    pub steps: u32,
}

/// Renderer failure
///
/// The frame driver logs these and keeps scheduling frames.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no 2d context available")]
    NoContext,
    #[error("canvas call failed: {0}")]
    Canvas(String),
}

pub trait Renderer {
    fn render(&mut self, snapshot: &FrameSnapshot, stats: &FrameStats) -> Result<(), RenderError>;
}

/// Keeps the latest snapshot instead of drawing it
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
    pub last: Option<FrameSnapshot>,
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, snapshot: &FrameSnapshot, _stats: &FrameStats) -> Result<(), RenderError> {
        self.frames += 1;
        self.last = Some(snapshot.clone());
        Ok(())
    }
}
