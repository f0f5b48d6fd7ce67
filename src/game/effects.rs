//! Auras and Timed Effects
//!
//! Auras are radius-gated pulses emitted by a player onto everyone nearby.
//! Active effects are self-ticking statuses (damage over time or regen)
//! sitting on the afflicted player, keyed by kind and source.

use serde::{Deserialize, Serialize};

use crate::game::player::{Player, PlayerId};

/// Duration of a poison effect installed by a poison aura.
pub const POISON_DURATION: f64 = 3.0;

/// Tick interval of effects installed by auras.
pub const EFFECT_TICK_INTERVAL: f64 = 1.0;

// =============================================================================
// AURA
// =============================================================================

/// What an aura does to players it reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuraKind {
    /// Direct damage
    Damage,
    /// Movement slow (strongest wins)
    Slow,
    /// Installs a poison effect
    Poison,
    /// Damage that heals the emitter
    Lifesteal,
}

impl AuraKind {
    /// Parse a catalog tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "damage" => Some(AuraKind::Damage),
            "slow" => Some(AuraKind::Slow),
            "poison" => Some(AuraKind::Poison),
            "lifesteal" => Some(AuraKind::Lifesteal),
            _ => None,
        }
    }

    /// Catalog/wire tag.
    pub fn as_tag(self) -> &'static str {
        match self {
            AuraKind::Damage => "damage",
            AuraKind::Slow => "slow",
            AuraKind::Poison => "poison",
            AuraKind::Lifesteal => "lifesteal",
        }
    }
}

/// A periodic area effect owned by its emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct Aura {
    /// Effect kind
    pub kind: AuraKind,
    /// Reach beyond the emitter's own radius
    pub radius: f64,
    /// Effect magnitude (damage, slow fraction, poison strength...)
    pub strength: f64,
    /// Seconds between pulses
    pub tick_interval: f64,
    /// Time accumulated since the last pulse
    pub elapsed: f64,
}

impl Aura {
    /// Create a fresh aura with an empty accumulator.
    pub fn new(kind: AuraKind, radius: f64, strength: f64, tick_interval: f64) -> Self {
        Self {
            kind,
            radius,
            strength,
            tick_interval,
            elapsed: 0.0,
        }
    }

    /// Accumulate `dt` and report whether a pulse fires this tick.
    ///
    /// The interval is subtracted rather than zeroed so pulses do not drift.
    /// A non-positive interval pulses every tick.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.elapsed += dt;
        if self.tick_interval <= 0.0 {
            self.elapsed = 0.0;
            return true;
        }
        if self.elapsed >= self.tick_interval {
            self.elapsed -= self.tick_interval;
            return true;
        }
        false
    }

    /// Distance at which a target centre is reached.
    #[inline]
    pub fn reach(&self, emitter_size: f64) -> f64 {
        self.radius + emitter_size
    }
}

/// Result of one aura pulse landing on one target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AuraHit {
    /// Health to restore on the emitter (lifesteal).
    pub emitter_heal: f64,
    /// Target health reached zero.
    pub killed: bool,
}

/// Apply one aura pulse from `emitter` onto `target`.
pub fn apply_aura(aura: &Aura, emitter: PlayerId, target: &mut Player) -> AuraHit {
    match aura.kind {
        AuraKind::Damage => AuraHit {
            emitter_heal: 0.0,
            killed: target.take_damage(aura.strength),
        },
        AuraKind::Slow => {
            target.apply_slow(aura.strength, aura.tick_interval * 2.0);
            AuraHit::default()
        }
        AuraKind::Poison => {
            target.add_effect(EffectKind::Poison, aura.strength, POISON_DURATION, emitter);
            AuraHit::default()
        }
        AuraKind::Lifesteal => AuraHit {
            emitter_heal: aura.strength,
            killed: target.take_damage(aura.strength),
        },
    }
}

// =============================================================================
// ACTIVE EFFECT
// =============================================================================

/// Kind of timed status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Damage over time
    Poison,
    /// Damage over time
    Burn,
    /// Healing over time
    Regen,
}

impl EffectKind {
    /// Wire tag.
    pub fn as_tag(self) -> &'static str {
        match self {
            EffectKind::Poison => "poison",
            EffectKind::Burn => "burn",
            EffectKind::Regen => "regen",
        }
    }
}

/// A timed status afflicting one player.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveEffect {
    /// Effect kind
    pub kind: EffectKind,
    /// Damage or heal per pulse
    pub strength: f64,
    /// Total duration when (re)applied
    pub duration: f64,
    /// Time left
    pub remaining: f64,
    /// Seconds between pulses
    pub tick_interval: f64,
    /// Time accumulated since the last pulse
    pub elapsed: f64,
    /// Player that applied it
    pub source: PlayerId,
}

/// What an active effect did during one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectStep {
    /// Duration ran out; remove the effect.
    Expired,
    /// Nothing this tick.
    Idle,
    /// Deal this much damage.
    Damage(f64),
    /// Heal this much.
    Heal(f64),
}

impl ActiveEffect {
    /// Create an effect with the standard aura tick interval.
    pub fn new(kind: EffectKind, strength: f64, duration: f64, source: PlayerId) -> Self {
        Self {
            kind,
            strength,
            duration,
            remaining: duration,
            tick_interval: EFFECT_TICK_INTERVAL,
            elapsed: 0.0,
            source,
        }
    }

    /// Advance by `dt`.
    pub fn advance(&mut self, dt: f64) -> EffectStep {
        self.remaining -= dt;
        self.elapsed += dt;

        if self.remaining <= 0.0 {
            return EffectStep::Expired;
        }

        if self.elapsed < self.tick_interval {
            return EffectStep::Idle;
        }
        self.elapsed -= self.tick_interval.max(0.0);

        match self.kind {
            EffectKind::Poison | EffectKind::Burn => EffectStep::Damage(self.strength),
            EffectKind::Regen => EffectStep::Heal(self.strength),
        }
    }
}

/// Install or refresh an effect.
///
/// At most one instance exists per (kind, source): reapplying updates
/// strength and duration in place.
pub fn upsert_effect(
    effects: &mut Vec<ActiveEffect>,
    kind: EffectKind,
    strength: f64,
    duration: f64,
    source: PlayerId,
) {
    if let Some(existing) = effects
        .iter_mut()
        .find(|e| e.kind == kind && e.source == source)
    {
        existing.strength = strength;
        existing.duration = duration;
        existing.remaining = duration;
        return;
    }
    effects.push(ActiveEffect::new(kind, strength, duration, source));
}
