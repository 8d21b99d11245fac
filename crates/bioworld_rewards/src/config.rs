//! # Loot Table Configuration
//!
//! All balance data lives in external TOML files and is loaded once at
//! startup. A config file holds any number of tables:
//!
//! ```toml
//! [[tables]]
//! name = "npc_helper"
//!
//! [[tables.entries]]
//! item_id = "coins"
//! kind = "currency"
//! weight = 50
//! rarity = "common"
//! min_amount = 1
//! max_amount = 10
//!
//! [[tables.entries]]
//! item_id = "gene_fragment"
//! kind = "nft"
//! weight = 5
//! rarity = "legendary"
//! min_amount = 1
//! max_amount = 1
//! ```
//!
//! Every entry is validated at parse time, so malformed balance data is
//! rejected before it can ever reach a draw.

use std::path::Path;

use serde::Deserialize;

use crate::error::{FairnessResult, RewardError};
use crate::loot::LootTable;

/// Top-level shape of a loot config file.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    /// All tables defined in the file.
    #[serde(default)]
    tables: Vec<LootTable>,
}

/// Parses loot tables from TOML text.
///
/// Returned tables are fully validated and have their cached total weight
/// computed.
///
/// # Errors
///
/// - [`RewardError::InvalidConfig`] if the TOML is malformed or an enum
///   value is out of vocabulary
/// - [`RewardError::InvalidTable`] / [`RewardError::InvalidEntry`] if a
///   table fails validation
pub fn parse_tables(raw: &str) -> FairnessResult<Vec<LootTable>> {
    let file: ConfigFile =
        toml::from_str(raw).map_err(|e| RewardError::InvalidConfig(e.to_string()))?;

    let mut tables = file.tables;
    for table in &mut tables {
        table.validate()?;
        table.calculate_total_weight();
    }
    Ok(tables)
}

/// Loads loot tables from a TOML file on disk.
///
/// # Errors
///
/// Returns [`RewardError::InvalidConfig`] if the file cannot be read, plus
/// everything [`parse_tables`] can return.
pub fn load_tables(path: &Path) -> FairnessResult<Vec<LootTable>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| RewardError::InvalidConfig(format!("{}: {e}", path.display())))?;
    parse_tables(&raw)
}
