use crate::state::{AppState, Joint};
use serde::{Deserialize, Serialize};

/// Sinusoidal angle source: `amplitude × sin(frequency × t)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    pub amplitude_degrees: f32,
    /// Angular frequency multiplier applied to elapsed seconds.
    pub frequency: f32,
}

impl Oscillator {
    pub const fn new(amplitude_degrees: f32, frequency: f32) -> Self {
        Self {
            amplitude_degrees,
            frequency,
        }
    }

    /// Angle in degrees at `seconds` since start.
    pub fn angle(&self, seconds: f64) -> f32 {
        (self.amplitude_degrees as f64 * (self.frequency as f64 * seconds).sin()) as f32
    }
}

/// Per-joint oscillator parameters. Distinct frequencies keep the two joints
/// out of phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub yellow: Oscillator,
    pub magenta: Oscillator,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            yellow: Oscillator::new(45.0, 1.0),
            magenta: Oscillator::new(45.0, 3.0),
        }
    }
}

impl AnimationConfig {
    pub fn oscillator(&self, joint: Joint) -> &Oscillator {
        match joint {
            Joint::Yellow => &self.yellow,
            Joint::Magenta => &self.magenta,
        }
    }
}

/// Overwrite the angle of every animated joint with its oscillator value at
/// `seconds`. Joints that are not animated keep their last assigned angle.
pub fn update_animation_angles(state: &mut AppState, config: &AnimationConfig, seconds: f64) {
    for joint in [Joint::Yellow, Joint::Magenta] {
        if state.is_animated(joint) {
            state.set_angle(joint, config.oscillator(joint).angle(seconds));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_oscillator_follows_sine() {
        let config = AnimationConfig::default();
        let mut state = AppState::new();
        state.set_animated(Joint::Yellow, true);
        state.set_animated(Joint::Magenta, true);

        for t in [0.0, 0.25, 1.0, 2.5, 10.0, 1234.5] {
            update_animation_angles(&mut state, &config, t);
            assert_eq!(state.yellow_angle, (45.0 * (1.0 * t).sin()) as f32);
            assert_eq!(state.magenta_angle, (45.0 * (3.0 * t).sin()) as f32);
        }
    }

    #[test]
    fn disabling_freezes_angle() {
        let config = AnimationConfig::default();
        let mut state = AppState::new();
        state.set_animated(Joint::Yellow, true);

        let t0 = 0.7;
        update_animation_angles(&mut state, &config, t0);
        let frozen = state.yellow_angle;
        assert_eq!(frozen, config.yellow.angle(t0));

        state.set_animated(Joint::Yellow, false);
        for t in [0.8, 1.5, 3.0, 100.0] {
            update_animation_angles(&mut state, &config, t);
            assert_eq!(state.yellow_angle, frozen);
        }
    }

    #[test]
    fn manual_override_persists_while_disabled() {
        let config = AnimationConfig::default();
        let mut state = AppState::new();
        state.set_angle(Joint::Magenta, -20.0);
        update_animation_angles(&mut state, &config, 5.0);
        assert_eq!(state.magenta_angle, -20.0);
    }

    #[test]
    fn oscillators_are_desynchronized() {
        let config = AnimationConfig::default();
        assert_ne!(config.yellow.angle(0.5), config.magenta.angle(0.5));
    }
}
