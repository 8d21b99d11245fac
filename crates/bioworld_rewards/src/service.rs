//! # Reward Service
//!
//! The registry-backed entry point the request-handling layer calls.
//!
//! ## The Reward Pipeline
//!
//! ```text
//! Client request -> HTTP layer (external) -> RewardService ->
//!   1. Validate player context
//!   2. Look up the registered loot table
//!   3. Weighted selection (luck-adjusted, capped)
//!   4. Payout calculation (rarity, variance, level bonus)
//!   5. Return a structured result for the response body
//! ```
//!
//! Registration happens once at startup from the TOML configs; after that
//! every operation is a pure read plus a caller-supplied random source, so
//! concurrent rolls need no coordination. Callers that want reproducible
//! draws pass a seeded generator (or use [`RewardService::roll_seeded`]);
//! there is no global RNG state anywhere in this crate.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::context::PlayerContext;
use crate::error::{FairnessResult, RewardError};
use crate::loot::{self, ItemKind, LootTable, Rarity};
use crate::payout;
use crate::research::{self, ElementSet};

/// A resolved reward: the output of one selection + payout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RewardResult {
    /// Id of the item that was won.
    pub item_id: String,
    /// Category of the item.
    pub kind: ItemKind,
    /// Rarity of the item.
    pub rarity: Rarity,
    /// Final integer amount, within the entry's declared range.
    pub amount: u32,
    /// The luck-adjusted weight used in the draw (audit/testing).
    pub effective_weight: f64,
}

/// Outcome of an NPC interaction: a reward plus a display message.
#[derive(Clone, Debug, PartialEq)]
pub struct Interaction {
    /// The reward that was rolled.
    pub reward: RewardResult,
    /// Human-readable message for the client.
    pub message: String,
}

/// A research contribution to score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildContribution {
    /// Elements used in the build (duplicate-free set).
    pub elements: ElementSet,
    /// Caller-supplied base contribution, >= 0.
    pub base_contribution: f64,
}

/// Scored research contribution, ready for the collaborator to persist.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContributionReceipt {
    /// The base contribution as supplied.
    pub base_contribution: f64,
    /// The unique build bonus for the element combination.
    pub unique_build_bonus: f64,
    /// Base plus bonus.
    pub total_contribution: f64,
}

/// Registry of loot tables plus the reward operations over them.
///
/// Storage of tables themselves is external; this service only holds the
/// validated in-memory values it was handed at startup.
#[derive(Debug, Default)]
pub struct RewardService {
    /// Loot tables indexed by name.
    tables: HashMap<String, LootTable>,
}

impl RewardService {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Registers a loot table, validating it first.
    ///
    /// The cached total weight is recomputed here, so callers can hand in
    /// tables built by hand or straight from config without worrying about
    /// staleness. Registering under an existing name replaces the table.
    ///
    /// # Errors
    ///
    /// Returns the table's validation error; an invalid table is never
    /// registered.
    pub fn register_table(&mut self, mut table: LootTable) -> FairnessResult<()> {
        if let Err(err) = table.validate() {
            warn!(table = %table.name, %err, "rejected loot table");
            return Err(err);
        }
        table.calculate_total_weight();
        debug!(
            table = %table.name,
            entries = table.entries.len(),
            total_weight = table.total_weight,
            "registered loot table"
        );
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    /// Looks up a registered table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&LootTable> {
        self.tables.get(name)
    }

    fn require_table(&self, name: &str) -> FairnessResult<&LootTable> {
        self.tables
            .get(name)
            .ok_or_else(|| RewardError::TableNotFound(name.to_string()))
    }

    /// Rolls once on a registered table: selection then payout.
    ///
    /// # Errors
    ///
    /// - [`RewardError::InvalidContext`] if the context is out of domain
    /// - [`RewardError::TableNotFound`] if no table has that name
    /// - [`RewardError::InvalidTable`] if the table cannot be drawn from
    pub fn roll<R: Rng + ?Sized>(
        &self,
        table_name: &str,
        context: &PlayerContext,
        rng: &mut R,
    ) -> FairnessResult<RewardResult> {
        context.validate()?;
        let table = self.require_table(table_name)?;

        let selection = loot::select(table, context.luck, rng)?;
        let amount = payout::calculate_amount(selection.entry, context.level, rng)?;

        Ok(RewardResult {
            item_id: selection.entry.item_id.clone(),
            kind: selection.entry.kind,
            rarity: selection.entry.rarity,
            amount,
            effective_weight: selection.effective_weight,
        })
    }

    /// Rolls with a locally-scoped generator seeded by the caller.
    ///
    /// Each call builds its own `ChaCha8Rng`, so concurrent draws share no
    /// RNG state and a given seed always reproduces the same result.
    ///
    /// # Errors
    ///
    /// Same as [`RewardService::roll`].
    pub fn roll_seeded(
        &self,
        table_name: &str,
        context: &PlayerContext,
        seed: u64,
    ) -> FairnessResult<RewardResult> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.roll(table_name, context, &mut rng)
    }

    /// Handles an NPC interaction: one roll plus a display message.
    ///
    /// # Errors
    ///
    /// Same as [`RewardService::roll`].
    pub fn interact<R: Rng + ?Sized>(
        &self,
        table_name: &str,
        context: &PlayerContext,
        rng: &mut R,
    ) -> FairnessResult<Interaction> {
        let reward = self.roll(table_name, context, rng)?;
        let message = reward_message(&reward);
        Ok(Interaction { reward, message })
    }

    /// Scores a research contribution's unique build bonus.
    ///
    /// The receipt carries `base + bonus`; persisting the running total is
    /// the collaborator's job.
    ///
    /// # Errors
    ///
    /// Returns [`RewardError::InvalidContext`] if the base contribution is
    /// negative or non-finite.
    pub fn research_contribution(
        &self,
        contribution: BuildContribution,
    ) -> FairnessResult<ContributionReceipt> {
        if !contribution.base_contribution.is_finite() || contribution.base_contribution < 0.0 {
            return Err(RewardError::InvalidContext(format!(
                "base contribution must be finite and >= 0, got {}",
                contribution.base_contribution
            )));
        }

        let unique_build_bonus = research::build_bonus(contribution.elements);
        Ok(ContributionReceipt {
            base_contribution: contribution.base_contribution,
            unique_build_bonus,
            total_contribution: contribution.base_contribution + unique_build_bonus,
        })
    }
}

/// Builds the client-facing message for a rolled reward.
fn reward_message(reward: &RewardResult) -> String {
    match reward.kind {
        ItemKind::Currency => format!("You received {} {}!", reward.amount, reward.item_id),
        ItemKind::Nft => format!("A unique {} is now yours!", reward.item_id),
        ItemKind::Tool | ItemKind::Element | ItemKind::Other => {
            format!("You received {}x {}.", reward.amount, reward.item_id)
        }
    }
}
