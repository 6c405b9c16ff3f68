//! Input mapping: control-surface actions, pointer to clip-space conversion,
//! and the sketch shape list fed by pointer clicks.
//!
//! # Invariants
//! - Raw window events become [`Action`]s before they touch [`blocky_kernel::AppState`].
//! - Pointer mapping never clamps.

pub mod action;
pub mod pointer;
pub mod sketch;

pub use action::{Action, apply};
pub use pointer::{InputError, SurfaceSize, to_clip_space};
pub use sketch::{ShapeKind, ShapeList, ShapeRecord, SketchBrush};

pub fn crate_info() -> &'static str {
    "blocky-input v0.1.0"
}
