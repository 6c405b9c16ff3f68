//! Scene kernel: application state, animation driver, scene composition.
//!
//! # Invariants
//! - Composition is pure with respect to [`AppState`]: equal state gives
//!   bit-identical transforms.
//! - Only the animation driver and explicit setters mutate angles.
//! - The node arena is reset, never reallocated, between frames.

pub mod animation;
pub mod clock;
pub mod config;
pub mod scene;
pub mod state;

pub use animation::{AnimationConfig, Oscillator, update_animation_angles};
pub use clock::FrameClock;
pub use config::{Config, ConfigError, MAX_SCENE_CAPACITY};
pub use scene::{
    BLOCKY_ANIMAL_NODES, BlockyAnimal, NodeDesc, NodeIndex, SceneArena, SceneError, SceneNode,
    compose_blocky_animal,
};
pub use state::{AppState, Joint};

pub fn crate_info() -> &'static str {
    "blocky-kernel v0.1.0"
}
