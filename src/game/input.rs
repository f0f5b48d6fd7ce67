//! Input Capture
//!
//! Directional intent as sent by clients: four held-key flags.

use serde::{Deserialize, Serialize};
use crate::core::vec2::Vec2;

/// Held directional keys for a single player.
///
/// Screen coordinates: W moves toward -Y, S toward +Y,
/// A toward -X, D toward +X.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Up
    #[serde(default)]
    pub w: bool,
    /// Left
    #[serde(default)]
    pub a: bool,
    /// Down
    #[serde(default)]
    pub s: bool,
    /// Right
    #[serde(default)]
    pub d: bool,
}

impl PlayerInput {
    /// No keys held.
    pub const NEUTRAL: Self = Self { w: false, a: false, s: false, d: false };

    /// Create from the four flags.
    pub const fn new(w: bool, a: bool, s: bool, d: bool) -> Self {
        Self { w, a, s, d }
    }

    /// Check if any key is held.
    pub fn is_neutral(&self) -> bool {
        !(self.w || self.a || self.s || self.d)
    }

    /// Desired per-tick velocity for the given effective speed.
    ///
    /// Diagonals are not normalized: holding W+D moves at `speed` on
    /// both axes.
    pub fn desired_velocity(&self, speed: f64) -> Vec2 {
        let mut velocity = Vec2::ZERO;
        if self.w {
            velocity.y -= speed;
        }
        if self.s {
            velocity.y += speed;
        }
        if self.a {
            velocity.x -= speed;
        }
        if self.d {
            velocity.x += speed;
        }
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_input() {
        assert!(PlayerInput::NEUTRAL.is_neutral());
        assert_eq!(PlayerInput::NEUTRAL.desired_velocity(5.0), Vec2::ZERO);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let input = PlayerInput::new(true, true, true, true);
        assert_eq!(input.desired_velocity(5.0), Vec2::ZERO);
    }

    #[test]
    fn test_diagonal_not_normalized() {
        let input = PlayerInput::new(true, false, false, true);
        let v = input.desired_velocity(5.0);
        assert_eq!(v, Vec2::new(5.0, -5.0));
        assert!(v.length() > 5.0);
    }

    #[test]
    fn test_missing_flags_default_false() {
        let input: PlayerInput = serde_json::from_str(r#"{"w":true}"#).unwrap();
        assert_eq!(input, PlayerInput::new(true, false, false, false));
    }
}
