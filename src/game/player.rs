//! Player State
//!
//! One avatar in the arena: movement, health and barrier, progression
//! counters, owned auras and the timed effects afflicting it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;
use crate::game::effects::{upsert_effect, ActiveEffect, Aura, EffectKind, EffectStep};
use crate::game::input::PlayerInput;

// =============================================================================
// BASELINE
// =============================================================================

/// Starting radius.
pub const BASE_SIZE: f64 = 40.0;
/// Starting speed (per-tick displacement).
pub const BASE_SPEED: f64 = 5.0;
/// Starting health and max health.
pub const BASE_HEALTH: f64 = 100.0;
/// Starting collision damage.
pub const BASE_DAMAGE: f64 = 10.0;
/// Starting barrier regen delay in seconds.
pub const BASE_BARRIER_REGEN_DELAY: f64 = 3.0;
/// Regen delay after the barrier is broken through.
pub const BROKEN_BARRIER_REGEN_DELAY: f64 = 5.0;
/// Starting pellet absorption multiplier.
pub const BASE_ABSORPTION_RANGE: f64 = 1.0;
/// Score needed for the first card offer.
pub const FIRST_CARD_THRESHOLD: u64 = 10;
/// Threshold doubling stops once this value is reached.
pub const THRESHOLD_DOUBLING_LIMIT: u64 = 160;
/// Flat threshold increase after doubling stops.
pub const THRESHOLD_FLAT_STEP: u64 = 100;

/// Gap under which speed snaps to its target.
const SPEED_EPSILON: f64 = 0.1;
/// Fraction of the speed gap closed per tick.
const SPEED_EASING: f64 = 0.15;
/// Velocity blend factor.
const ACCELERATION: f64 = 0.2;
/// Velocity blend factor once speed exceeds `FAST_SPEED`.
const FAST_ACCELERATION: f64 = 0.3;
const FAST_SPEED: f64 = 10.0;
/// Velocity components below this snap to zero.
const VELOCITY_EPSILON: f64 = 0.01;
/// Kill reward multiplier applied to speed, damage, max health and size.
const KILL_GROWTH: f64 = 1.1;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique player identifier (UUID as bytes).
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random id.
    pub fn random() -> Self {
        Self(*uuid::Uuid::new_v4().as_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// First four bytes as hex, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// A damage effect killed the player during `update`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectKill {
    /// Player that applied the lethal effect
    pub source: PlayerId,
}

/// State of a single player in the arena.
#[derive(Clone, Debug)]
pub struct Player {
    /// Unique player ID
    pub id: PlayerId,
    /// Centre position
    pub position: Vec2,
    /// Per-tick displacement
    pub velocity: Vec2,
    /// Collision and render radius
    pub size: f64,
    /// Current speed, eases toward `target_speed`
    pub speed: f64,
    /// Speed the player settles at once boosts wear off
    pub target_speed: f64,
    /// Baseline speed, untouched by cards and kill rewards
    pub base_speed: f64,
    /// Current health, death at zero
    pub health: f64,
    /// Health cap for healing and respawn refill
    pub max_health: f64,
    /// Damage dealt on collision
    pub damage: f64,
    /// Shield absorbed before health
    pub barrier: f64,
    /// Barrier regen cap
    pub max_barrier: f64,
    /// Barrier restored per second once regen kicks in
    pub barrier_regen_rate: f64,
    /// Seconds without barrier hits before regen starts
    pub barrier_regen_delay: f64,
    /// Seconds since the barrier last absorbed damage
    pub time_since_barrier_hit: f64,
    /// Pellet pickup range multiplier
    pub absorption_range: f64,
    /// Pellet value plus kill rewards
    pub score: u64,
    /// Score that triggers the next card offer
    pub next_card_threshold: u64,
    /// An offer was sent and no card has been chosen yet
    pub card_offer_pending: bool,
    /// Names of applied cards, in order of acquisition
    pub applied_cards: Vec<String>,
    /// Seconds until PvP collisions count again
    pub collision_cooldown: f64,
    /// Auras emitted by this player
    pub auras: Vec<Aura>,
    /// Effects afflicting this player
    pub active_effects: Vec<ActiveEffect>,
    /// Owned parts per set name
    pub set_progress: BTreeMap<String, u32>,
    /// Fraction of speed removed while slowed
    pub slow_factor: f64,
    /// Seconds left on the slow
    pub slow_remaining: f64,
    /// Currently held keys
    pub input: PlayerInput,
}

impl Player {
    /// Create a player at `position` with baseline stats.
    pub fn new(id: PlayerId, position: Vec2) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            size: BASE_SIZE,
            speed: BASE_SPEED,
            target_speed: BASE_SPEED,
            base_speed: BASE_SPEED,
            health: BASE_HEALTH,
            max_health: BASE_HEALTH,
            damage: BASE_DAMAGE,
            barrier: 0.0,
            max_barrier: 0.0,
            barrier_regen_rate: 0.0,
            barrier_regen_delay: BASE_BARRIER_REGEN_DELAY,
            time_since_barrier_hit: 0.0,
            absorption_range: BASE_ABSORPTION_RANGE,
            score: 0,
            next_card_threshold: FIRST_CARD_THRESHOLD,
            card_offer_pending: false,
            applied_cards: Vec::new(),
            collision_cooldown: 0.0,
            auras: Vec::new(),
            active_effects: Vec::new(),
            set_progress: BTreeMap::new(),
            slow_factor: 0.0,
            slow_remaining: 0.0,
            input: PlayerInput::NEUTRAL,
        }
    }

    /// Check if health is above zero.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    // ===== TICK =====

    /// Advance timers, effects, barrier and movement by `dt` seconds.
    ///
    /// Position is not clamped here; the world owns the arena bounds.
    pub fn update(&mut self, dt: f64) -> Option<EffectKill> {
        self.collision_cooldown = (self.collision_cooldown - dt).max(0.0);
        self.slow_remaining = (self.slow_remaining - dt).max(0.0);
        if self.slow_remaining == 0.0 {
            self.slow_factor = 0.0;
        }

        let kill = self.update_active_effects(dt);

        self.regen_barrier(dt);
        self.ease_speed();

        let effective_speed = self.speed * (1.0 - self.slow_factor);
        let desired = self.input.desired_velocity(effective_speed);
        let acceleration = if self.speed > FAST_SPEED {
            FAST_ACCELERATION
        } else {
            ACCELERATION
        };
        self.velocity = self
            .velocity
            .lerp(desired, acceleration)
            .snap_to_zero(VELOCITY_EPSILON);
        self.position = self.position + self.velocity;

        kill
    }

    fn update_active_effects(&mut self, dt: f64) -> Option<EffectKill> {
        let mut kill = None;
        let mut effects = std::mem::take(&mut self.active_effects);

        effects.retain_mut(|effect| match effect.advance(dt) {
            EffectStep::Expired => false,
            EffectStep::Idle => true,
            EffectStep::Damage(amount) => {
                if self.take_damage(amount) && kill.is_none() {
                    kill = Some(EffectKill { source: effect.source });
                }
                true
            }
            EffectStep::Heal(amount) => {
                self.heal(amount);
                true
            }
        });

        self.active_effects = effects;
        kill
    }

    fn regen_barrier(&mut self, dt: f64) {
        if self.barrier >= self.max_barrier || self.barrier_regen_rate <= 0.0 {
            return;
        }
        self.time_since_barrier_hit += dt;
        if self.time_since_barrier_hit >= self.barrier_regen_delay {
            self.barrier = (self.barrier + self.barrier_regen_rate * dt).min(self.max_barrier);
        }
    }

    fn ease_speed(&mut self) {
        let gap = self.target_speed - self.speed;
        if gap.abs() > SPEED_EPSILON {
            self.speed += gap * SPEED_EASING;
        } else {
            self.speed = self.target_speed;
        }
    }

    // ===== COMBAT =====

    /// Apply damage, barrier first. Returns true if health is now zero.
    pub fn take_damage(&mut self, amount: f64) -> bool {
        let mut amount = amount.max(0.0);

        if self.barrier > 0.0 {
            self.time_since_barrier_hit = 0.0;
            if amount <= self.barrier {
                self.barrier -= amount;
                return false;
            }
            amount -= self.barrier;
            self.barrier = 0.0;
            self.barrier_regen_delay = BROKEN_BARRIER_REGEN_DELAY;
        }

        self.health = (self.health - amount).max(0.0);
        self.health <= 0.0
    }

    /// Restore health, capped at max.
    pub fn heal(&mut self, amount: f64) {
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }

    /// Slow the player unless a stronger slow is already active.
    pub fn apply_slow(&mut self, factor: f64, duration: f64) {
        if self.slow_factor < factor {
            self.slow_factor = factor.min(1.0);
            self.slow_remaining = duration;
        }
    }

    /// Install or refresh a timed effect from `source`.
    pub fn add_effect(&mut self, kind: EffectKind, strength: f64, duration: f64, source: PlayerId) {
        upsert_effect(&mut self.active_effects, kind, strength, duration, source);
    }

    /// Reward for killing a player with `victim_score`.
    pub fn reward_kill(&mut self, victim_score: u64) {
        self.score = self.score.saturating_add(victim_score);
        // Target is untouched, so the burst eases back off
        self.speed *= KILL_GROWTH;
        self.damage *= KILL_GROWTH;
        self.max_health *= KILL_GROWTH;
        self.health = self.max_health;
        self.size *= KILL_GROWTH;
    }

    /// Reset to baseline at `position`, keeping identity and held keys.
    pub fn respawn(&mut self, position: Vec2) {
        let input = self.input;
        *self = Player::new(self.id, position);
        self.input = input;
    }

    // ===== PROGRESSION =====

    /// Check if a card offer is due.
    pub fn should_offer_cards(&self) -> bool {
        self.score >= self.next_card_threshold && !self.card_offer_pending
    }

    /// Escalate the threshold after a card is accepted.
    pub fn advance_card_threshold(&mut self) {
        if self.next_card_threshold < THRESHOLD_DOUBLING_LIMIT {
            self.next_card_threshold = self.next_card_threshold.saturating_mul(2);
        } else {
            self.next_card_threshold = self.next_card_threshold.saturating_add(THRESHOLD_FLAT_STEP);
        }
        self.card_offer_pending = false;
    }

    /// Keep health and barrier within their maxima after a stat change.
    pub(crate) fn clamp_pools(&mut self) {
        self.max_health = self.max_health.max(0.0);
        self.max_barrier = self.max_barrier.max(0.0);
        self.health = self.health.clamp(0.0, self.max_health);
        self.barrier = self.barrier.clamp(0.0, self.max_barrier);
    }
}
