use crate::sketch::{ShapeList, SketchBrush};
use blocky_kernel::{AppState, Joint};
use glam::Vec2;

/// A high-level intent produced by the control surface or the pointer.
///
/// The kernel never sees raw UI events, only actions. Every action that
/// changes what is on screen asks for an immediate re-render.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start or stop a joint's oscillator.
    SetAnimation { joint: Joint, on: bool },
    /// Manual slider override of a joint angle, in degrees.
    SetAngle { joint: Joint, degrees: f32 },
    /// Global rotation slider, in degrees.
    SetGlobalAngle(f32),
    /// Pointer click or primary-button drag, already in clip space.
    Sketch(Vec2),
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

/// Apply `action`. Returns `true` when the scene should be re-rendered now.
pub fn apply(
    action: &Action,
    state: &mut AppState,
    brush: &SketchBrush,
    shapes: &mut ShapeList,
) -> bool {
    match *action {
        Action::SetAnimation { joint, on } => {
            state.set_animated(joint, on);
            tracing::debug!("{joint:?} animation {}", if on { "on" } else { "off" });
            // Takes effect on the next tick.
            false
        }
        Action::SetAngle { joint, degrees } => {
            state.set_angle(joint, degrees);
            true
        }
        Action::SetGlobalAngle(degrees) => {
            state.global_angle = degrees;
            true
        }
        Action::Sketch(coords) => {
            shapes.push(brush, coords);
            tracing::debug!("sketch shape at ({:.3}, {:.3})", coords.x, coords.y);
            true
        }
        Action::Noop => false,
    }
}
