//! Per-call player context.
//!
//! Supplied fresh for every roll and never persisted by this crate.

use serde::{Deserialize, Serialize};

use crate::error::{FairnessResult, RewardError};

/// The requesting player's state for a single reward operation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerContext {
    /// Player level, >= 1.
    pub level: u32,
    /// Luck scalar, >= 0.0 and centered at 1.0 (neutral).
    pub luck: f64,
}

impl PlayerContext {
    /// Creates a validated context.
    ///
    /// # Errors
    ///
    /// Returns [`RewardError::InvalidContext`] if either field is out of
    /// domain.
    pub fn new(level: u32, luck: f64) -> FairnessResult<Self> {
        let context = Self { level, luck };
        context.validate()?;
        Ok(context)
    }

    /// Validates the context's domain constraints.
    ///
    /// # Errors
    ///
    /// Returns [`RewardError::InvalidContext`] if `level < 1` or `luck` is
    /// negative or non-finite.
    pub fn validate(&self) -> FairnessResult<()> {
        if self.level < 1 {
            return Err(RewardError::InvalidContext(format!(
                "player level must be >= 1, got {}",
                self.level
            )));
        }
        if !self.luck.is_finite() || self.luck < 0.0 {
            return Err(RewardError::InvalidContext(format!(
                "player luck must be finite and >= 0, got {}",
                self.luck
            )));
        }
        Ok(())
    }
}

impl Default for PlayerContext {
    fn default() -> Self {
        Self {
            level: 1,
            luck: 1.0,
        }
    }
}
