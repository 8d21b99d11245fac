//! Statistical simulation over a loot table.
//!
//! Runs a seeded batch of full rolls (selection + payout) and returns
//! histogram data, used to verify empirically that observed selection
//! shares converge on the adjusted-weight proportions.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::context::PlayerContext;
use crate::error::FairnessResult;
use crate::loot::{self, LootTable, Rarity};
use crate::payout;

/// Histogram data from a simulation run.
#[derive(Clone, Debug, Default)]
pub struct RollStatistics {
    /// Total number of rolls performed.
    pub total_rolls: u64,
    /// Selection counts by item id.
    pub item_counts: HashMap<String, u64>,
    /// Selection counts by rarity tier.
    pub rarity_counts: HashMap<Rarity, u64>,
    /// Sum of all payout amounts.
    pub amount_total: u64,
}

impl RollStatistics {
    /// Fraction of rolls that selected the given item, in `[0, 1]`.
    #[must_use]
    pub fn selection_share(&self, item_id: &str) -> f64 {
        if self.total_rolls == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let share =
            self.item_counts.get(item_id).copied().unwrap_or(0) as f64 / self.total_rolls as f64;
        share
    }

    /// Mean payout amount across all rolls.
    #[must_use]
    pub fn mean_amount(&self) -> f64 {
        if self.total_rolls == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = self.amount_total as f64 / self.total_rolls as f64;
        mean
    }
}

/// Runs `iterations` seeded rolls against the table and tallies results.
///
/// # Errors
///
/// Fails on the first invalid input, same taxonomy as a single roll; a
/// valid table and context never fail mid-run.
pub fn simulate(
    table: &LootTable,
    context: &PlayerContext,
    iterations: u32,
    seed: u64,
) -> FairnessResult<RollStatistics> {
    context.validate()?;
    table.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut stats = RollStatistics::default();

    for _ in 0..iterations {
        let selection = loot::select(table, context.luck, &mut rng)?;
        let amount = payout::calculate_amount(selection.entry, context.level, &mut rng)?;

        stats.total_rolls += 1;
        *stats
            .item_counts
            .entry(selection.entry.item_id.clone())
            .or_insert(0) += 1;
        *stats.rarity_counts.entry(selection.entry.rarity).or_insert(0) += 1;
        stats.amount_total += u64::from(amount);
    }

    Ok(stats)
}
