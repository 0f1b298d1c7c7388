mod json;
mod sqlite;

use anyhow::Result;

use crate::domain::{GameRecord, RosterRecord};

pub use json::JsonTables;
pub use sqlite::SqliteTables;

/// Where the roster and the game history come from
pub trait TableSource {
    fn load_roster(&self) -> Result<Vec<RosterRecord>>;
    fn load_history(&self) -> Result<Vec<GameRecord>>;
}
