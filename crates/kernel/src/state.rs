use serde::{Deserialize, Serialize};

/// Which animated joint an angle or toggle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Joint {
    /// Primary oscillator: the yellow limb's swing about Z.
    Yellow,
    /// Secondary oscillator: the magenta block's swing relative to the limb.
    Magenta,
}

/// Explicit application state, passed by reference into the animation
/// driver and the scene composer every frame.
///
/// Every field has a single writer per frame: the UI writes between frames,
/// the animation driver writes at the start of a frame, the composer only reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppState {
    /// World orientation about Y, in degrees.
    pub global_angle: f32,
    pub yellow_angle: f32,
    pub magenta_angle: f32,
    pub yellow_animation: bool,
    pub magenta_animation: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle(&self, joint: Joint) -> f32 {
        match joint {
            Joint::Yellow => self.yellow_angle,
            Joint::Magenta => self.magenta_angle,
        }
    }

    /// Manual override. Persists for as long as the joint is not animated.
    pub fn set_angle(&mut self, joint: Joint, degrees: f32) {
        match joint {
            Joint::Yellow => self.yellow_angle = degrees,
            Joint::Magenta => self.magenta_angle = degrees,
        }
    }

    pub fn is_animated(&self, joint: Joint) -> bool {
        match joint {
            Joint::Yellow => self.yellow_animation,
            Joint::Magenta => self.magenta_animation,
        }
    }

    pub fn set_animated(&mut self, joint: Joint, on: bool) {
        match joint {
            Joint::Yellow => self.yellow_animation = on,
            Joint::Magenta => self.magenta_animation = on,
        }
    }
}
