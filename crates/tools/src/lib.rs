//! Developer tooling: scene inspector for debug panels and the CLI.
//!
//! # Invariants
//! - Tools only read; they never mutate scene or state.

mod inspector;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "blocky-tools v0.1.0"
}
