//! # Bioworld Reward Fairness Engine
//!
//! Pure Rust reward logic for the Bioworld ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Deterministic under a fixed seed** - every draw is a pure function
//!    of its inputs plus a caller-supplied random source
//! 2. **Capped luck** - rare-or-better selection weights scale by at most
//!    2x, no matter how extreme the player's luck value
//! 3. **Fail loudly** - malformed tables, entries, and contexts are
//!    rejected before any computation, never silently clamped
//! 4. **External configuration** - all balance data in TOML files
//!
//! ## Thread Safety
//!
//! All operations are stateless reads over tables registered at startup.
//! There is no global RNG: each call owns its generator, so concurrent
//! rolls from any number of request handlers need no coordination.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bioworld_rewards::{PlayerContext, RewardService};
//!
//! let mut service = RewardService::new();
//! for table in bioworld_rewards::config::load_tables("data/loot.toml".as_ref())? {
//!     service.register_table(table)?;
//! }
//!
//! let context = PlayerContext::new(12, 1.4)?;
//! let reward = service.roll_seeded("npc_helper", &context, action_seed)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod context;
pub mod error;
pub mod loot;
pub mod payout;
pub mod research;
pub mod service;
pub mod stats;

pub use context::PlayerContext;
pub use error::{FairnessResult, RewardError};
pub use loot::{ItemKind, LootEntry, LootTable, Rarity, Selection, LUCK_CAP};
pub use research::{ElementSet, ElementTag};
pub use service::{
    BuildContribution, ContributionReceipt, Interaction, RewardResult, RewardService,
};
pub use stats::RollStatistics;
