//! Card Catalog and Progression
//!
//! Cards are immutable power-ups loaded once at startup. This module owns
//! the weighted draft, card application and set-bonus recomputation.
//!
//! Catalog records keep their string tags (`rarity`, `stat`, `aura_type`)
//! so unknown values survive a round trip to clients; the runtime matches
//! on checked enums.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::rng::DeterministicRng;
use crate::game::effects::{Aura, AuraKind};
use crate::game::player::Player;

/// Draft weight for rarities the catalog does not recognise.
pub const UNKNOWN_RARITY_WEIGHT: u32 = 10;

// =============================================================================
// ERRORS
// =============================================================================

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog is not valid JSON for the card schema.
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two cards share an id.
    #[error("Duplicate card id {0}")]
    DuplicateCardId(u64),
}

// =============================================================================
// RARITY
// =============================================================================

/// Card rarity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rarity {
    /// Weight 100
    Common,
    /// Weight 50
    Uncommon,
    /// Weight 20
    Rare,
    /// Weight 8
    Epic,
    /// Weight 3
    Legendary,
    /// Any other tag; drafted at `UNKNOWN_RARITY_WEIGHT`.
    Other(String),
}

impl Rarity {
    /// Base draft weight.
    pub fn weight(&self) -> u32 {
        match self {
            Rarity::Common => 100,
            Rarity::Uncommon => 50,
            Rarity::Rare => 20,
            Rarity::Epic => 8,
            Rarity::Legendary => 3,
            Rarity::Other(_) => UNKNOWN_RARITY_WEIGHT,
        }
    }
}

impl From<String> for Rarity {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Common" => Rarity::Common,
            "Uncommon" => Rarity::Uncommon,
            "Rare" => Rarity::Rare,
            "Epic" => Rarity::Epic,
            "Legendary" => Rarity::Legendary,
            _ => Rarity::Other(tag),
        }
    }
}

impl From<Rarity> for String {
    fn from(rarity: Rarity) -> Self {
        match rarity {
            Rarity::Common => "Common".into(),
            Rarity::Uncommon => "Uncommon".into(),
            Rarity::Rare => "Rare".into(),
            Rarity::Epic => "Epic".into(),
            Rarity::Legendary => "Legendary".into(),
            Rarity::Other(tag) => tag,
        }
    }
}

// =============================================================================
// STAT
// =============================================================================

/// Stat targeted by a card effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stat {
    /// Multiplies target speed
    Speed,
    /// Multiplies radius
    Size,
    /// Multiplies collision damage
    Damage,
    /// Multiplies max health and refills health
    MaxHealth,
    /// Multiplies pellet absorption range
    AbsorbRange,
    /// Appends an aura
    AuraAdd,
    /// Adds to max barrier and refills barrier
    MaxBarrier,
    /// Adds to barrier regen rate
    BarrierRegen,
    /// Unrecognised; applying it does nothing.
    Other(String),
}

impl From<String> for Stat {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "speed" => Stat::Speed,
            "size" => Stat::Size,
            "damage" => Stat::Damage,
            "max_health" => Stat::MaxHealth,
            "absorbRange" => Stat::AbsorbRange,
            "aura_add" => Stat::AuraAdd,
            "max_barrier" => Stat::MaxBarrier,
            "barrier_regen" => Stat::BarrierRegen,
            _ => Stat::Other(tag),
        }
    }
}

impl From<Stat> for String {
    fn from(stat: Stat) -> Self {
        match stat {
            Stat::Speed => "speed".into(),
            Stat::Size => "size".into(),
            Stat::Damage => "damage".into(),
            Stat::MaxHealth => "max_health".into(),
            Stat::AbsorbRange => "absorbRange".into(),
            Stat::AuraAdd => "aura_add".into(),
            Stat::MaxBarrier => "max_barrier".into(),
            Stat::BarrierRegen => "barrier_regen".into(),
            Stat::Other(tag) => tag,
        }
    }
}

// =============================================================================
// CARD RECORDS
// =============================================================================

/// One stat modification carried by a card or a set bonus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardEffect {
    /// Stat this effect changes
    pub stat: Stat,
    /// Multiplier, or addend for barrier stats
    #[serde(default)]
    pub modifier: f64,
    /// Aura kind tag, only read for aura effects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aura_type: Option<String>,
    /// Aura reach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aura_radius: Option<f64>,
    /// Damage, slow fraction or heal amount per pulse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aura_strength: Option<f64>,
    /// Seconds between pulses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aura_tick: Option<f64>,
}

impl CardEffect {
    /// Plain stat modifier.
    pub fn stat(stat: Stat, modifier: f64) -> Self {
        Self {
            stat,
            modifier,
            aura_type: None,
            aura_radius: None,
            aura_strength: None,
            aura_tick: None,
        }
    }

    /// Aura grant.
    pub fn aura(kind: AuraKind, radius: f64, strength: f64, tick: f64) -> Self {
        Self {
            stat: Stat::AuraAdd,
            modifier: 0.0,
            aura_type: Some(kind.as_tag().to_string()),
            aura_radius: Some(radius),
            aura_strength: Some(strength),
            aura_tick: Some(tick),
        }
    }

    /// Build the runtime aura for an `aura_add` effect.
    ///
    /// Returns `None` for other stats or unknown aura tags.
    pub fn to_aura(&self) -> Option<Aura> {
        if self.stat != Stat::AuraAdd {
            return None;
        }
        let kind = AuraKind::from_tag(self.aura_type.as_deref()?)?;
        Some(Aura::new(
            kind,
            self.aura_radius.unwrap_or(0.0),
            self.aura_strength.unwrap_or(0.0),
            self.aura_tick.unwrap_or(0.0),
        ))
    }
}

/// A card as stored in the catalog and sent in offers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Catalog-unique id
    pub id: u64,
    /// Display name, also the set part name
    pub name: String,
    /// Flavour text
    #[serde(default)]
    pub description: String,
    /// Draft weight class
    pub rarity: Rarity,
    /// Applied in order when the card is chosen
    #[serde(default)]
    pub effects: Vec<CardEffect>,
    /// Name of the set this card is a part of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
}

/// A named set of cards with bonuses keyed by parts owned.
#[derive(Clone, Debug, PartialEq)]
pub struct CardSet {
    /// Set name matched against card `set` tags
    pub name: String,
    /// Card names counted as parts
    pub parts: Vec<String>,
    /// Effects granted when the parts owned reach the key
    pub bonuses: BTreeMap<u32, Vec<CardEffect>>,
}

// =============================================================================
// EFFECT APPLICATION
// =============================================================================

/// Apply a single effect to a player.
pub fn apply_effect(player: &mut Player, effect: &CardEffect) {
    let m = effect.modifier;
    match &effect.stat {
        Stat::Speed => player.target_speed *= m,
        Stat::Size => player.size *= m,
        Stat::Damage => player.damage *= m,
        Stat::MaxHealth => {
            player.max_health *= m;
            player.health = player.max_health;
        }
        Stat::AbsorbRange => player.absorption_range *= m,
        Stat::AuraAdd => match effect.to_aura() {
            Some(aura) => player.auras.push(aura),
            None => warn!(
                player = %player.id,
                aura_type = ?effect.aura_type,
                "Ignoring aura with unknown type"
            ),
        },
        Stat::MaxBarrier => {
            player.max_barrier += m;
            player.barrier = player.max_barrier;
        }
        Stat::BarrierRegen => player.barrier_regen_rate += m,
        Stat::Other(tag) => debug!(player = %player.id, stat = %tag, "Ignoring unknown stat"),
    }
    player.clamp_pools();
}

// =============================================================================
// CATALOG
// =============================================================================

/// Immutable card catalog shared by the hub and the world.
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: Vec<Card>,
    sets: Vec<CardSet>,
}

impl CardCatalog {
    /// Build a catalog, rejecting duplicate card ids.
    pub fn new(cards: Vec<Card>, sets: Vec<CardSet>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for card in &cards {
            if !seen.insert(card.id) {
                return Err(CatalogError::DuplicateCardId(card.id));
            }
        }
        Ok(Self { cards, sets })
    }

    /// Parse a JSON card array and attach the built-in sets.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        Self::new(cards, Self::builtin_sets())
    }

    /// Load a JSON card array from disk and attach the built-in sets.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// All cards in catalog order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// All sets.
    pub fn sets(&self) -> &[CardSet] {
        &self.sets
    }

    /// Look up a card by id.
    pub fn get(&self, id: u64) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Count owned parts per set from a card-name history.
    pub fn set_progress(&self, applied: &[String]) -> BTreeMap<String, u32> {
        let mut progress = BTreeMap::new();
        for name in applied {
            for set in &self.sets {
                let hits = set.parts.iter().filter(|part| *part == name).count() as u32;
                if hits > 0 {
                    *progress.entry(set.name.clone()).or_insert(0) += hits;
                }
            }
        }
        progress
    }

    /// Draw up to `count` distinct cards the player does not already own.
    ///
    /// Weighted by rarity, boosted `(owned + 1) * 2` for sets in progress,
    /// sampled without replacement.
    pub fn draft(&self, count: usize, applied: &[String], rng: &mut DeterministicRng) -> Vec<Card> {
        let owned: BTreeSet<&str> = applied.iter().map(String::as_str).collect();
        let progress = self.set_progress(applied);

        let mut pool: Vec<(&Card, u32)> = self
            .cards
            .iter()
            .filter(|card| !owned.contains(card.name.as_str()))
            .map(|card| {
                let mut weight = card.rarity.weight();
                if let Some(parts) = card.set.as_ref().and_then(|s| progress.get(s)) {
                    weight = weight.saturating_mul((parts + 1) * 2);
                }
                (card, weight)
            })
            .collect();

        let mut total: u64 = pool.iter().map(|(_, w)| u64::from(*w)).sum();
        let mut selected = Vec::with_capacity(count.min(pool.len()));

        while selected.len() < count && !pool.is_empty() {
            let roll = if total == 0 {
                0
            } else {
                rng.next_u64() % total
            };

            let mut cumulative = 0u64;
            let mut index = pool.len() - 1;
            for (i, (_, weight)) in pool.iter().enumerate() {
                cumulative += u64::from(*weight);
                if roll < cumulative {
                    index = i;
                    break;
                }
            }

            let (card, weight) = pool.remove(index);
            total -= u64::from(weight);
            selected.push(card.clone());
        }

        selected
    }

    /// Grant a card: apply its effects, record it, recompute set bonuses.
    pub fn apply_card(&self, player: &mut Player, card: &Card) {
        for effect in &card.effects {
            apply_effect(player, effect);
        }
        player.applied_cards.push(card.name.clone());
        self.calculate_set_bonuses(player);
    }

    /// Recount set progress from the full history and apply the bonus
    /// for each set's current count.
    ///
    /// Bonuses compound: every call layers the current tier on top of the
    /// player's stats again.
    pub fn calculate_set_bonuses(&self, player: &mut Player) {
        player.set_progress = self.set_progress(&player.applied_cards);

        for set in &self.sets {
            let Some(owned) = player.set_progress.get(&set.name).copied() else {
                continue;
            };
            if let Some(bonus) = set.bonuses.get(&owned) {
                debug!(player = %player.id, set = %set.name, owned, "Applying set bonus");
                for effect in bonus {
                    apply_effect(player, effect);
                }
            }
        }
    }

    /// The four sets shipped with the game.
    pub fn builtin_sets() -> Vec<CardSet> {
        use CardEffect as E;

        fn set(name: &str, parts: [&str; 3], bonuses: [Vec<CardEffect>; 3]) -> CardSet {
            CardSet {
                name: name.to_string(),
                parts: parts.iter().map(|p| p.to_string()).collect(),
                bonuses: (1u32..).zip(bonuses).collect(),
            }
        }

        vec![
            set(
                "Berserker Set",
                ["Berserker's Rage I", "Berserker's Rage II", "Berserker's Rage III"],
                [
                    vec![E::stat(Stat::Damage, 1.1)],
                    vec![E::stat(Stat::Damage, 1.3), E::stat(Stat::Speed, 1.1)],
                    vec![
                        E::stat(Stat::Damage, 2.0),
                        E::stat(Stat::Speed, 1.5),
                        E::aura(AuraKind::Damage, 80.0, 10.0, 1.0),
                    ],
                ],
            ),
            set(
                "Guardian Set",
                ["Guardian's Shield I", "Guardian's Shield II", "Guardian's Shield III"],
                [
                    vec![E::stat(Stat::MaxHealth, 1.15)],
                    vec![E::stat(Stat::MaxHealth, 1.4), E::stat(Stat::Size, 1.1)],
                    vec![
                        E::stat(Stat::MaxHealth, 2.0),
                        E::stat(Stat::MaxBarrier, 50.0),
                        E::stat(Stat::BarrierRegen, 4.0),
                    ],
                ],
            ),
            set(
                "Toxic Set",
                ["Toxic Touch I", "Toxic Touch II", "Toxic Touch III"],
                [
                    vec![E::stat(Stat::Damage, 1.05)],
                    vec![
                        E::stat(Stat::Damage, 1.15),
                        E::aura(AuraKind::Poison, 60.0, 3.0, 1.0),
                    ],
                    vec![
                        E::stat(Stat::Damage, 1.3),
                        E::aura(AuraKind::Poison, 100.0, 8.0, 0.5),
                    ],
                ],
            ),
            set(
                "Vampire Set",
                ["Blood Hunger I", "Blood Hunger II", "Blood Hunger III"],
                [
                    vec![E::stat(Stat::MaxHealth, 1.1)],
                    vec![
                        E::stat(Stat::MaxHealth, 1.2),
                        E::aura(AuraKind::Lifesteal, 50.0, 2.0, 1.0),
                    ],
                    vec![
                        E::stat(Stat::MaxHealth, 1.5),
                        E::aura(AuraKind::Lifesteal, 90.0, 5.0, 0.5),
                    ],
                ],
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::player::PlayerId;

    fn card(id: u64, name: &str, rarity: &str) -> Card {
        Card {
            id,
            name: name.to_string(),
            description: String::new(),
            rarity: Rarity::from(rarity.to_string()),
            effects: Vec::new(),
            set: None,
        }
    }

    fn player() -> Player {
        Player::new(PlayerId::new([3; 16]), Vec2::ZERO)
    }

    #[test]
    fn test_parse_catalog_json() {
        let json = r#"[
            {"id": 1, "name": "Swift Feet", "description": "Faster", "rarity": "Common",
             "effects": [{"stat": "speed", "modifier": 1.2}]},
            {"id": 2, "name": "Thorns", "description": "", "rarity": "Mythic",
             "effects": [{"stat": "aura_add", "modifier": 0, "aura_type": "damage",
                          "aura_radius": 60, "aura_strength": 4, "aura_tick": 1.0}],
             "set": "Berserker Set"}
        ]"#;

        let catalog = CardCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.cards().len(), 2);
        assert_eq!(catalog.sets().len(), 4);

        let thorns = catalog.get(2).unwrap();
        assert_eq!(thorns.rarity, Rarity::Other("Mythic".into()));
        assert_eq!(thorns.rarity.weight(), UNKNOWN_RARITY_WEIGHT);
        assert_eq!(thorns.set.as_deref(), Some("Berserker Set"));
        assert_eq!(thorns.effects[0].to_aura().unwrap().kind, AuraKind::Damage);
        assert!(catalog.get(99).is_none());

        // Unknown tags survive serialization
        let json = serde_json::to_string(thorns).unwrap();
        assert!(json.contains("\"rarity\":\"Mythic\""));
        assert!(json.contains("\"stat\":\"aura_add\""));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = CardCatalog::new(vec![card(1, "A", "Common"), card(1, "B", "Rare")], vec![]);
        assert!(matches!(result, Err(CatalogError::DuplicateCardId(1))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            CardCatalog::from_json_str("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_draft_weighted_proportion() {
        let catalog = CardCatalog::new(
            vec![card(1, "Heavy", "Common"), card(2, "Odd", "Strange")],
            vec![],
        )
        .unwrap();
        let mut rng = DeterministicRng::new(42);

        let trials = 20_000;
        let mut first = 0;
        for _ in 0..trials {
            let drawn = catalog.draft(1, &[], &mut rng);
            assert_eq!(drawn.len(), 1);
            if drawn[0].id == 1 {
                first += 1;
            }
        }

        let proportion = first as f64 / trials as f64;
        assert!((proportion - 100.0 / 110.0).abs() < 0.02, "proportion {proportion}");
    }

    #[test]
    fn test_draft_excludes_owned_and_never_repeats() {
        let catalog = CardCatalog::new(
            vec![
                card(1, "A", "Common"),
                card(2, "B", "Rare"),
                card(3, "C", "Epic"),
                card(4, "D", "Legendary"),
            ],
            vec![],
        )
        .unwrap();
        let mut rng = DeterministicRng::new(7);

        for _ in 0..200 {
            let drawn = catalog.draft(3, &["A".to_string()], &mut rng);
            assert_eq!(drawn.len(), 3);
            let ids: BTreeSet<u64> = drawn.iter().map(|c| c.id).collect();
            assert_eq!(ids.len(), 3);
            assert!(!ids.contains(&1));
        }

        // Pool smaller than request
        let drawn = catalog.draft(10, &[], &mut rng);
        assert_eq!(drawn.len(), 4);

        let empty = CardCatalog::default();
        assert!(empty.draft(3, &[], &mut rng).is_empty());
    }

    #[test]
    fn test_draft_prefers_sets_in_progress() {
        let mut part = card(2, "Berserker's Rage II", "Common");
        part.set = Some("Berserker Set".into());
        let catalog = CardCatalog::new(
            vec![card(1, "Plain", "Common"), part],
            CardCatalog::builtin_sets(),
        )
        .unwrap();
        let mut rng = DeterministicRng::new(99);

        // One part owned: weight 100 * (1 + 1) * 2 = 400 vs 100
        let applied = vec!["Berserker's Rage I".to_string()];
        let trials = 10_000;
        let hits = (0..trials)
            .filter(|_| catalog.draft(1, &applied, &mut rng)[0].id == 2)
            .count();
        let proportion = hits as f64 / trials as f64;
        assert!((proportion - 0.8).abs() < 0.03, "proportion {proportion}");
    }

    #[test]
    fn test_apply_stat_effects() {
        let mut p = player();
        p.health = 40.0;

        apply_effect(&mut p, &CardEffect::stat(Stat::Speed, 1.2));
        apply_effect(&mut p, &CardEffect::stat(Stat::MaxHealth, 1.5));
        apply_effect(&mut p, &CardEffect::stat(Stat::AbsorbRange, 2.0));
        apply_effect(&mut p, &CardEffect::stat(Stat::MaxBarrier, 25.0));
        apply_effect(&mut p, &CardEffect::stat(Stat::BarrierRegen, 3.0));
        apply_effect(&mut p, &CardEffect::stat(Stat::Other("luck".into()), 9.0));

        assert!((p.target_speed - 6.0).abs() < 1e-9);
        assert_eq!(p.speed, 5.0);
        assert_eq!(p.max_health, 150.0);
        assert_eq!(p.health, 150.0);
        assert_eq!(p.absorption_range, 2.0);
        assert_eq!(p.max_barrier, 25.0);
        assert_eq!(p.barrier, 25.0);
        assert_eq!(p.barrier_regen_rate, 3.0);
    }

    #[test]
    fn test_unknown_aura_type_ignored() {
        let mut p = player();
        let mut effect = CardEffect::aura(AuraKind::Slow, 50.0, 0.3, 1.0);
        apply_effect(&mut p, &effect);
        assert_eq!(p.auras.len(), 1);

        effect.aura_type = Some("freeze".into());
        apply_effect(&mut p, &effect);
        assert_eq!(p.auras.len(), 1);
    }

    #[test]
    fn test_set_bonus_rederived_per_tier() {
        let mut rage1 = card(10, "Berserker's Rage I", "Rare");
        rage1.set = Some("Berserker Set".into());
        let mut rage2 = card(11, "Berserker's Rage II", "Rare");
        rage2.set = Some("Berserker Set".into());
        let catalog =
            CardCatalog::new(vec![rage1.clone(), rage2.clone()], CardCatalog::builtin_sets()).unwrap();

        let mut p = player();
        catalog.apply_card(&mut p, &rage1);
        assert_eq!(p.set_progress.get("Berserker Set"), Some(&1));
        assert!((p.damage - 11.0).abs() < 1e-9);
        assert_eq!(p.target_speed, 5.0);

        catalog.apply_card(&mut p, &rage2);
        assert_eq!(p.set_progress.get("Berserker Set"), Some(&2));
        // Tier 2 only: x1.3 damage and x1.1 speed on top of tier 1's result
        assert!((p.damage - 14.3).abs() < 1e-9);
        assert!((p.target_speed - 5.5).abs() < 1e-9);
        assert_eq!(p.applied_cards, vec!["Berserker's Rage I", "Berserker's Rage II"]);
    }

    #[test]
    fn test_set_bonus_compounds_on_unrelated_cards() {
        let mut rage1 = card(10, "Berserker's Rage I", "Rare");
        rage1.set = Some("Berserker Set".into());
        let plain = card(20, "Plain", "Common");
        let catalog =
            CardCatalog::new(vec![rage1.clone(), plain.clone()], CardCatalog::builtin_sets()).unwrap();

        let mut p = player();
        catalog.apply_card(&mut p, &rage1);
        catalog.apply_card(&mut p, &plain);
        assert!((p.damage - 12.1).abs() < 1e-9);
    }

    #[test]
    fn test_builtin_sets_shape() {
        let sets = CardCatalog::builtin_sets();
        let names: Vec<&str> = sets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Berserker Set", "Guardian Set", "Toxic Set", "Vampire Set"]);
        for set in &sets {
            assert_eq!(set.parts.len(), 3);
            assert_eq!(set.bonuses.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_shipped_catalog_parses() {
        let catalog = CardCatalog::from_json_str(include_str!("../../cards.json")).unwrap();
        let set_names: Vec<&str> = catalog.sets().iter().map(|s| s.name.as_str()).collect();

        for card in catalog.cards() {
            if let Some(set) = &card.set {
                assert!(set_names.contains(&set.as_str()), "unknown set {set}");
            }
            for effect in &card.effects {
                assert!(!matches!(effect.stat, Stat::Other(_)), "unknown stat on {}", card.name);
            }
        }
        for set in catalog.sets() {
            for part in &set.parts {
                assert!(catalog.cards().iter().any(|c| &c.name == part), "missing {part}");
            }
        }
    }
}
