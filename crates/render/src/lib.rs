//! Rendering adapter: the cube primitive, the immediate-mode [`CubeTarget`]
//! seam, a debug text target, and the per-frame scheduler.
//!
//! # Invariants
//! - Rendering never mutates scene truth; only the scheduler's animation step
//!   writes to [`blocky_kernel::AppState`].
//! - Draw order is composition order; occlusion is left to depth testing.
//! - A failed draw skips one cube, never the frame.

mod cube;
mod frame;
mod renderer;

pub use cube::{Cube, CubeTarget, DrawError, UNIT_CUBE_VERTEX_COUNT, UNIT_CUBE_VERTICES};
pub use frame::{
    CancelToken, FPS_NUMERATOR_MS, FrameHost, FrameReport, FrameScheduler, FrameSignal,
    FrameTelemetry, RunOutcome, render_scene,
};
pub use renderer::{DebugTextRenderer, DrawRecord};

pub fn crate_info() -> &'static str {
    "blocky-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
