//! # Weighted Loot Selection
//!
//! **Luck-Adjusted, Capped, Reproducible Draws**
//!
//! This module implements the loot selection half of the fairness engine:
//!
//! - Entries are walked in definition order with a cumulative-weight scan,
//!   so a given table and seed always reproduce the same pick
//! - Player luck boosts rare-or-better entries only, and the boost is
//!   capped at 2x no matter how large the raw luck value is
//! - Luck below 1.0 is never a penalty: only boosts apply
//!
//! ## Fairness Model
//!
//! The selection roll is continuous over `[0, total_adjusted)`, so no two
//! entries can tie and the walk needs no tie-break rule beyond definition
//! order. The adjusted total is computed fresh for every draw; nothing
//! luck-dependent is ever cached on the table.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FairnessResult, RewardError};

/// Maximum multiplier luck can apply to a rare-or-better entry's weight.
///
/// Capping here prevents unbounded exploitation from extreme luck values.
pub const LUCK_CAP: f64 = 2.0;

/// Rarity tier for loot entries.
///
/// The ordering is total and fixed: `Common < Uncommon < Rare < Epic <
/// Legendary`. Both selection boosts and payout multipliers key off it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Rarity {
    /// Common items (gray) - the bulk of drops.
    Common = 0,
    /// Uncommon items (green).
    Uncommon = 1,
    /// Rare items (blue) - first tier luck applies to.
    Rare = 2,
    /// Epic items (purple).
    Epic = 3,
    /// Legendary items (orange).
    Legendary = 4,
}

impl Rarity {
    /// Payout multiplier for this rarity.
    ///
    /// These values are process-wide constants and never change at runtime.
    #[inline]
    #[must_use]
    pub const fn payout_multiplier(self) -> f64 {
        match self {
            Self::Common => 1.0,
            Self::Uncommon => 1.5,
            Self::Rare => 2.5,
            Self::Epic => 4.0,
            Self::Legendary => 7.5,
        }
    }

    /// Whether player luck applies to entries of this rarity.
    #[inline]
    #[must_use]
    pub const fn luck_applies(self) -> bool {
        matches!(self, Self::Rare | Self::Epic | Self::Legendary)
    }
}

/// Category of a loot entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Stackable currency (coins).
    Currency,
    /// Usable tool.
    Tool,
    /// Research element.
    Element,
    /// Unique, indivisible collectible.
    Nft,
    /// Anything else.
    Other,
}

/// A single entry in a loot table.
///
/// Entries are immutable once a table is registered; balance changes go
/// through the TOML configs and a re-registration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// Item identifier (non-empty).
    pub item_id: String,
    /// Item category.
    pub kind: ItemKind,
    /// Base selection weight (higher = more likely).
    pub weight: u32,
    /// Item rarity.
    pub rarity: Rarity,
    /// Minimum payout amount.
    pub min_amount: u32,
    /// Maximum payout amount.
    pub max_amount: u32,
}

impl LootEntry {
    /// Validates the entry's invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RewardError::InvalidEntry`] if the item id is empty, the
    /// weight is zero, or `min_amount > max_amount`.
    pub fn validate(&self) -> FairnessResult<()> {
        if self.item_id.is_empty() {
            return Err(RewardError::InvalidEntry {
                item_id: "<unnamed>".to_string(),
                reason: "item id must be non-empty".to_string(),
            });
        }
        if self.weight == 0 {
            return Err(RewardError::InvalidEntry {
                item_id: self.item_id.clone(),
                reason: "weight must be a positive integer".to_string(),
            });
        }
        if self.min_amount > self.max_amount {
            return Err(RewardError::InvalidEntry {
                item_id: self.item_id.clone(),
                reason: format!(
                    "min_amount {} exceeds max_amount {}",
                    self.min_amount, self.max_amount
                ),
            });
        }
        Ok(())
    }

    /// Whether this entry is a single indivisible item (count, not amount).
    ///
    /// Unit items always pay out exactly 1; only *which* item drops varies,
    /// never its quantity.
    #[inline]
    #[must_use]
    pub const fn is_unit_item(&self) -> bool {
        self.min_amount == 1 && self.max_amount == 1
    }
}

/// A named, ordered list of weighted loot entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    /// Table name (also its registry key).
    pub name: String,
    /// All possible rewards, in definition order. The order is part of the
    /// table's identity: the selection walk depends on it.
    pub entries: Vec<LootEntry>,
    /// Total raw weight of all entries (recomputed on registration, never
    /// stored stale).
    #[serde(skip)]
    pub total_weight: u32,
}

impl LootTable {
    /// Creates a table with its total weight already computed.
    #[must_use]
    pub fn new(name: impl Into<String>, entries: Vec<LootEntry>) -> Self {
        let mut table = Self {
            name: name.into(),
            entries,
            total_weight: 0,
        };
        table.calculate_total_weight();
        table
    }

    /// Recomputes the cached sum of raw entry weights.
    pub fn calculate_total_weight(&mut self) {
        self.total_weight = self.entries.iter().map(|e| e.weight).sum();
    }

    /// Validates the table and every entry in it.
    ///
    /// # Errors
    ///
    /// Returns [`RewardError::InvalidTable`] for an empty table and
    /// [`RewardError::InvalidEntry`] for the first malformed entry.
    pub fn validate(&self) -> FairnessResult<()> {
        if self.entries.is_empty() {
            return Err(RewardError::InvalidTable {
                table: self.name.clone(),
                reason: "table has no entries".to_string(),
            });
        }
        for entry in &self.entries {
            entry.validate()?;
        }
        Ok(())
    }
}

/// Outcome of a weighted selection, before payout calculation.
#[derive(Clone, Copy, Debug)]
pub struct Selection<'a> {
    /// The entry that was drawn.
    pub entry: &'a LootEntry,
    /// The luck-adjusted weight the entry carried in this draw (audit).
    pub effective_weight: f64,
}

/// Computes an entry's luck-adjusted selection weight.
///
/// Rare-or-better entries are boosted by `min(luck, 2.0)` when `luck > 1.0`.
/// Luck at or below 1.0 leaves the raw weight untouched: luck is never a
/// penalty.
#[inline]
#[must_use]
pub fn adjusted_weight(entry: &LootEntry, luck: f64) -> f64 {
    let raw = f64::from(entry.weight);
    if entry.rarity.luck_applies() && luck > 1.0 {
        raw * luck.min(LUCK_CAP)
    } else {
        raw
    }
}

/// Performs one weighted draw against the table.
///
/// Pure function of the table, the luck value, and the random source. The
/// caller owns the generator, so a seeded generator reproduces the exact
/// same pick every time.
///
/// # Errors
///
/// - [`RewardError::InvalidContext`] if `luck` is negative or non-finite
/// - [`RewardError::InvalidTable`] if the table is empty or the adjusted
///   weight total is not positive
pub fn select<'a, R: Rng + ?Sized>(
    table: &'a LootTable,
    luck: f64,
    rng: &mut R,
) -> FairnessResult<Selection<'a>> {
    if !luck.is_finite() || luck < 0.0 {
        return Err(RewardError::InvalidContext(format!(
            "player luck must be finite and >= 0, got {luck}"
        )));
    }
    if table.entries.is_empty() {
        return Err(RewardError::InvalidTable {
            table: table.name.clone(),
            reason: "table has no entries".to_string(),
        });
    }

    let total_adjusted: f64 = table
        .entries
        .iter()
        .map(|e| adjusted_weight(e, luck))
        .sum();
    if total_adjusted <= 0.0 {
        return Err(RewardError::InvalidTable {
            table: table.name.clone(),
            reason: "no selectable weight".to_string(),
        });
    }

    let roll = rng.gen_range(0.0..total_adjusted);

    let mut cumulative = 0.0;
    for entry in &table.entries {
        let effective_weight = adjusted_weight(entry, luck);
        cumulative += effective_weight;
        if roll < cumulative {
            return Ok(Selection {
                entry,
                effective_weight,
            });
        }
    }

    // Accumulation error can leave the roll on the final boundary. Never
    // hand out an entry with non-positive effective weight, even here.
    let entry = table
        .entries
        .iter()
        .rev()
        .find(|e| adjusted_weight(e, luck) > 0.0)
        .ok_or_else(|| RewardError::InvalidTable {
            table: table.name.clone(),
            reason: "no selectable weight".to_string(),
        })?;
    Ok(Selection {
        entry,
        effective_weight: adjusted_weight(entry, luck),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn entry(item_id: &str, weight: u32, rarity: Rarity) -> LootEntry {
        LootEntry {
            item_id: item_id.to_string(),
            kind: ItemKind::Currency,
            weight,
            rarity,
            min_amount: 1,
            max_amount: 10,
        }
    }

    #[test]
    fn test_total_weight_is_sum_of_raw_weights() {
        let table = LootTable::new("test", vec![entry("a", 50, Rarity::Common), entry("b", 5, Rarity::Legendary)]);
        assert_eq!(table.total_weight, 55);
    }

    #[test]
    fn test_luck_cap_enforced_exactly() {
        let rare = entry("rare", 40, Rarity::Rare);
        assert_eq!(adjusted_weight(&rare, 10.0), 80.0);
        assert_eq!(adjusted_weight(&rare, 2.0), 80.0);
        assert_eq!(adjusted_weight(&rare, 1.5), 60.0);
    }

    #[test]
    fn test_low_luck_is_not_a_penalty() {
        let rare = entry("rare", 40, Rarity::Rare);
        assert_eq!(adjusted_weight(&rare, 0.5), 40.0);
        assert_eq!(adjusted_weight(&rare, 1.0), 40.0);
        assert_eq!(adjusted_weight(&rare, 0.0), 40.0);
    }

    #[test]
    fn test_luck_never_boosts_common_or_uncommon() {
        let common = entry("common", 40, Rarity::Common);
        let uncommon = entry("uncommon", 40, Rarity::Uncommon);
        assert_eq!(adjusted_weight(&common, 10.0), 40.0);
        assert_eq!(adjusted_weight(&uncommon, 10.0), 40.0);
    }

    #[test]
    fn test_select_is_deterministic_under_fixed_seed() {
        let table = LootTable::new(
            "test",
            vec![
                entry("a", 50, Rarity::Common),
                entry("b", 30, Rarity::Uncommon),
                entry("c", 20, Rarity::Rare),
            ],
        );

        let pick = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            select(&table, 1.0, &mut rng).unwrap().entry.item_id.clone()
        };

        for seed in 0..50 {
            assert_eq!(pick(seed), pick(seed));
        }
    }

    #[test]
    fn test_select_single_entry_always_wins() {
        let table = LootTable::new("test", vec![entry("only", 1, Rarity::Common)]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let selection = select(&table, 1.0, &mut rng).unwrap();
            assert_eq!(selection.entry.item_id, "only");
            assert_eq!(selection.effective_weight, 1.0);
        }
    }

    #[test]
    fn test_select_empty_table_fails() {
        let table = LootTable::new("empty", vec![]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = select(&table, 1.0, &mut rng).unwrap_err();
        assert!(matches!(err, RewardError::InvalidTable { .. }));
    }

    #[test]
    fn test_select_negative_luck_fails() {
        let table = LootTable::new("test", vec![entry("a", 1, Rarity::Common)]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = select(&table, -0.1, &mut rng).unwrap_err();
        assert!(matches!(err, RewardError::InvalidContext(_)));
    }

    #[test]
    fn test_validate_rejects_zero_weight() {
        let mut bad = entry("bad", 1, Rarity::Common);
        bad.weight = 0;
        assert!(matches!(
            bad.validate().unwrap_err(),
            RewardError::InvalidEntry { .. }
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_amounts() {
        let mut bad = entry("bad", 1, Rarity::Common);
        bad.min_amount = 10;
        bad.max_amount = 2;
        assert!(matches!(
            bad.validate().unwrap_err(),
            RewardError::InvalidEntry { .. }
        ));
    }

    #[test]
    fn test_validate_rejects_empty_item_id() {
        let bad = entry("", 1, Rarity::Common);
        assert!(matches!(
            bad.validate().unwrap_err(),
            RewardError::InvalidEntry { .. }
        ));
    }

    #[test]
    fn test_rarity_ordering_is_total() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Uncommon < Rarity::Rare);
        assert!(Rarity::Rare < Rarity::Epic);
        assert!(Rarity::Epic < Rarity::Legendary);
    }

    #[test]
    fn test_luck_boost_shifts_distribution_toward_rare() {
        let table = LootTable::new(
            "test",
            vec![entry("common", 50, Rarity::Common), entry("rare", 50, Rarity::Rare)],
        );

        let count_rare = |luck: f64| {
            let mut rng = ChaCha8Rng::seed_from_u64(99);
            (0..10_000)
                .filter(|_| select(&table, luck, &mut rng).unwrap().entry.item_id == "rare")
                .count()
        };

        let neutral = count_rare(1.0);
        let lucky = count_rare(2.0);
        assert!(
            lucky > neutral,
            "luck 2.0 should select rare more often: {lucky} vs {neutral}"
        );
    }
}
