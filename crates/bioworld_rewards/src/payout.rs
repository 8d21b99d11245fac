//! # Payout Amount Calculation
//!
//! Converts a selected loot entry into a concrete integer amount:
//!
//! ```text
//! final = base_value * rarity_multiplier * uniform(0.8, 1.2) * (1 + ln(level + 1) * 0.5)
//! ```
//!
//! then rounds and clamps into the entry's declared `[min, max]` range.
//!
//! The base value is the range midpoint for scalar entries. Unit items
//! (`min == max == 1`) bypass the formula entirely and always pay exactly 1:
//! for those, the *item* is the reward, not its quantity.
//!
//! The variance band and the entry selection are the only sources of
//! randomness in the whole payout path.

use rand::Rng;

use crate::error::{FairnessResult, RewardError};
use crate::loot::{LootEntry, Rarity};

/// Lower bound of the payout variance band (-20%).
pub const VARIANCE_MIN: f64 = 0.8;

/// Upper bound of the payout variance band (+20%).
pub const VARIANCE_MAX: f64 = 1.2;

/// Scale applied to the logarithmic level bonus.
const LEVEL_BONUS_SCALE: f64 = 0.5;

/// Level bonus: `ln(level + 1) * 0.5`.
///
/// Logarithmic on purpose - each additional level is worth less than the
/// one before it, so high-level players keep an edge without runaway
/// payouts.
#[inline]
#[must_use]
pub fn level_bonus(player_level: u32) -> f64 {
    (f64::from(player_level) + 1.0).ln() * LEVEL_BONUS_SCALE
}

/// Base value of an entry before any scaling.
///
/// The canonical rule: the `[min, max]` midpoint for scalar entries,
/// literal 1 for unit items.
#[inline]
#[must_use]
pub fn base_value(entry: &LootEntry) -> f64 {
    if entry.is_unit_item() {
        1.0
    } else {
        (f64::from(entry.min_amount) + f64::from(entry.max_amount)) / 2.0
    }
}

/// The scaled payout before rounding and clamping, at a fixed variance.
///
/// Exposed so tests can hold variance constant and check rarity/level
/// monotonicity directly.
#[inline]
#[must_use]
pub fn raw_payout(base: f64, rarity: Rarity, variance: f64, player_level: u32) -> f64 {
    base * rarity.payout_multiplier() * variance * (1.0 + level_bonus(player_level))
}

/// Computes the final integer payout amount for a selected entry.
///
/// # Errors
///
/// - [`RewardError::InvalidEntry`] if the entry fails validation
/// - [`RewardError::InvalidContext`] if `player_level` is zero
pub fn calculate_amount<R: Rng + ?Sized>(
    entry: &LootEntry,
    player_level: u32,
    rng: &mut R,
) -> FairnessResult<u32> {
    entry.validate()?;
    if player_level < 1 {
        return Err(RewardError::InvalidContext(
            "player level must be >= 1".to_string(),
        ));
    }

    // Unit items: the item itself is the reward. No formula, no variance.
    if entry.is_unit_item() {
        return Ok(1);
    }

    let variance = rng.gen_range(VARIANCE_MIN..=VARIANCE_MAX);
    let raw = raw_payout(base_value(entry), entry.rarity, variance, player_level);
    let clamped = raw
        .round()
        .clamp(f64::from(entry.min_amount), f64::from(entry.max_amount));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let amount = clamped as u32;
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::ItemKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn entry(rarity: Rarity, min_amount: u32, max_amount: u32) -> LootEntry {
        LootEntry {
            item_id: "coins".to_string(),
            kind: ItemKind::Currency,
            weight: 1,
            rarity,
            min_amount,
            max_amount,
        }
    }

    #[test]
    fn test_level_one_bonus_matches_formula() {
        let bonus = level_bonus(1);
        assert!((bonus - 2.0_f64.ln() * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_level_bonus_has_diminishing_returns() {
        let step_low = level_bonus(2) - level_bonus(1);
        let step_high = level_bonus(100) - level_bonus(99);
        assert!(step_high < step_low);
    }

    #[test]
    fn test_base_value_is_range_midpoint() {
        assert!((base_value(&entry(Rarity::Common, 1, 10)) - 5.5).abs() < 1e-12);
        assert!((base_value(&entry(Rarity::Common, 4, 4)) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_unit_item_always_pays_exactly_one() {
        let nft = entry(Rarity::Legendary, 1, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1_000 {
            assert_eq!(calculate_amount(&nft, 50, &mut rng).unwrap(), 1);
        }
    }

    #[test]
    fn test_amount_stays_within_declared_range() {
        let e = entry(Rarity::Epic, 5, 20);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..10_000 {
            let amount = calculate_amount(&e, 30, &mut rng).unwrap();
            assert!((5..=20).contains(&amount), "amount {amount} out of range");
        }
    }

    #[test]
    fn test_rarity_payout_is_monotonic_at_fixed_variance() {
        let base = 10.0;
        let common = raw_payout(base, Rarity::Common, 1.0, 5);
        let uncommon = raw_payout(base, Rarity::Uncommon, 1.0, 5);
        let rare = raw_payout(base, Rarity::Rare, 1.0, 5);
        let epic = raw_payout(base, Rarity::Epic, 1.0, 5);
        let legendary = raw_payout(base, Rarity::Legendary, 1.0, 5);
        assert!(common < uncommon && uncommon < rare && rare < epic && epic < legendary);
    }

    #[test]
    fn test_higher_level_pays_more_on_average() {
        let e = entry(Rarity::Common, 1, 1_000);
        let total = |level: u32| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            (0..1_000)
                .map(|_| u64::from(calculate_amount(&e, level, &mut rng).unwrap()))
                .sum::<u64>()
        };
        assert!(total(50) > total(1));
    }

    #[test]
    fn test_zero_level_rejected() {
        let e = entry(Rarity::Common, 1, 10);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            calculate_amount(&e, 0, &mut rng).unwrap_err(),
            RewardError::InvalidContext(_)
        ));
    }

    #[test]
    fn test_malformed_entry_rejected_at_payout() {
        let bad = entry(Rarity::Common, 10, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            calculate_amount(&bad, 1, &mut rng).unwrap_err(),
            RewardError::InvalidEntry { .. }
        ));
    }

    #[test]
    fn test_never_zero_when_min_is_at_least_one() {
        let e = entry(Rarity::Common, 1, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..5_000 {
            assert!(calculate_amount(&e, 1, &mut rng).unwrap() >= 1);
        }
    }
}
