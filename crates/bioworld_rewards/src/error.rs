//! # Reward Error Types
//!
//! All errors that can occur in the reward fairness engine.
//!
//! Every variant is a deterministic caller-input or configuration problem.
//! Nothing here is transient, so nothing is ever retried; the HTTP layer
//! maps these directly to client-visible error responses.

use thiserror::Error;

/// Errors that can occur in the reward fairness engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewardError {
    /// Loot table cannot be drawn from: empty, or no selectable weight.
    #[error("invalid loot table '{table}': {reason}")]
    InvalidTable {
        /// Name of the offending table.
        table: String,
        /// What made the table undrawable.
        reason: String,
    },

    /// A loot entry is malformed. Caught at registration or config-parse
    /// time wherever possible so bad balance data never reaches a draw.
    #[error("invalid loot entry '{item_id}': {reason}")]
    InvalidEntry {
        /// Item id of the offending entry.
        item_id: String,
        /// What made the entry invalid.
        reason: String,
    },

    /// Player context failed validation (level or luck out of domain).
    #[error("invalid player context: {0}")]
    InvalidContext(String),

    /// No loot table registered under the requested name.
    #[error("loot table not found: {0}")]
    TableNotFound(String),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for reward fairness operations.
pub type FairnessResult<T> = Result<T, RewardError>;
