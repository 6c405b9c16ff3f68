//! wgpu render backend for the blocky animal.
//!
//! Draws flat-colored unit cubes recorded through [`blocky_render::CubeTarget`].
//! The shader program is validated and its symbols resolved before any GPU
//! resource is created.
//!
//! # Invariants
//! - Setup either completes or fails with a [`SetupError`]; nothing is drawn
//!   with a partial context.
//! - The color buffer is retained between frames and cleared only at the
//!   start of each frame.
//! - Depth testing uses a strict less-than comparison against a depth
//!   cleared to 1.0 every frame.
//! - Renderer never mutates application state.

mod context;
mod error;
mod gpu;
mod shaders;

pub use context::GpuContext;
pub use error::SetupError;
pub use gpu::{FrameRecorder, WgpuRenderer};
pub use shaders::{
    CUBE_SHADER, FRAG_COLOR, FRAGMENT_ENTRY, GLOBAL_ROTATE_MATRIX, MODEL_MATRIX,
    POSITION_ATTRIBUTE, ShaderInterface, UniformSlot, VERTEX_ENTRY, resolve_interface,
};
