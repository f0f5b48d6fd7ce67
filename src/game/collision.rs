//! Collision Detection
//!
//! Circle overlap tests for pellet pickup and PvP contact.

use crate::core::vec2::Vec2;
use crate::game::pellet::Pellet;
use crate::game::player::Player;

/// Check if two circles overlap (touching counts).
#[inline]
pub fn circles_overlap(pos_a: Vec2, radius_a: f64, pos_b: Vec2, radius_b: f64) -> bool {
    let combined = radius_a + radius_b;
    pos_a.distance_squared(pos_b) <= combined * combined
}

/// Check if a player is close enough to absorb a pellet.
///
/// The combined radius is scaled by the player's absorption range and the
/// comparison is strict.
#[inline]
pub fn can_absorb(player: &Player, pellet: &Pellet) -> bool {
    let reach = (player.size + pellet.size) * player.absorption_range;
    player.position.distance_squared(pellet.position) < reach * reach
}

/// Check if two players can trade collision damage this tick.
pub fn players_collide(a: &Player, b: &Player) -> bool {
    if !a.is_alive() || !b.is_alive() {
        return false;
    }
    if a.collision_cooldown > 0.0 || b.collision_cooldown > 0.0 {
        return false;
    }
    circles_overlap(a.position, a.size, b.position, b.size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::PlayerId;

    fn player_at(n: u8, x: f64, y: f64) -> Player {
        Player::new(PlayerId::new([n; 16]), Vec2::new(x, y))
    }

    #[test]
    fn test_circles_overlap_touching() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.01, 0.0), 5.0));
    }

    #[test]
    fn test_can_absorb_strict_and_scaled() {
        let mut p = player_at(1, 0.0, 0.0);
        let touching = Pellet::new(1, Vec2::new(44.0, 0.0));
        assert!(!can_absorb(&p, &touching));

        let inside = Pellet::new(2, Vec2::new(43.9, 0.0));
        assert!(can_absorb(&p, &inside));

        let far = Pellet::new(3, Vec2::new(80.0, 0.0));
        assert!(!can_absorb(&p, &far));
        p.absorption_range = 2.0;
        assert!(can_absorb(&p, &far));
    }

    #[test]
    fn test_players_collide_respects_cooldown() {
        let a = player_at(1, 0.0, 0.0);
        let mut b = player_at(2, 60.0, 0.0);
        assert!(players_collide(&a, &b));

        b.collision_cooldown = 0.1;
        assert!(!players_collide(&a, &b));

        b.collision_cooldown = 0.0;
        b.position = Vec2::new(81.0, 0.0);
        assert!(!players_collide(&a, &b));
    }
}
