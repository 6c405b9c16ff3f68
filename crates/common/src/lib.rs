//! Shared value types: model transforms and colors.

mod types;

pub use types::{Color, Transform, TransformOp};
