//! Pellets
//!
//! Static food scattered over the arena. Consumed pellets are replaced
//! one for one, so the population never changes.

use crate::core::vec2::Vec2;

/// Pellet radius.
pub const PELLET_SIZE: f64 = 4.0;

/// Score and health granted per pellet.
pub const PELLET_VALUE: u64 = 1;

/// Pellet population for a world of edge `world_size`.
#[inline]
pub fn initial_pellet_count(world_size: f64) -> usize {
    (world_size / 2.0).max(0.0) as usize
}

/// A single pellet.
#[derive(Clone, Debug, PartialEq)]
pub struct Pellet {
    /// Monotonic id, never reused
    pub id: u64,
    /// Centre position
    pub position: Vec2,
    /// Radius
    pub size: f64,
    /// Score and health granted on pickup
    pub value: u64,
}

impl Pellet {
    /// Create a standard pellet.
    pub fn new(id: u64, position: Vec2) -> Self {
        Self {
            id,
            position,
            size: PELLET_SIZE,
            value: PELLET_VALUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_count() {
        assert_eq!(initial_pellet_count(8000.0), 4000);
        assert_eq!(initial_pellet_count(101.0), 50);
        assert_eq!(initial_pellet_count(0.0), 0);
    }
}
