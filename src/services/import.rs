use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::config::settings::AppConfig;
use crate::domain::Roster;
use crate::tables::{JsonTables, SqliteTables, TableSource};

/// Copies JSON league tables into a fresh SQLite database
pub struct ImportService {
    config: AppConfig,
}

impl ImportService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, roster_path: &Path, history_path: &Path) -> Result<()> {
        let db_path = &self.config.storage.database_path;
        let temp_db_path = format!("{}.tmp", db_path);

        info!("=== Starting Import (Atomic) ===\n");
        info!("Target DB: {}, Temp DB: {}", db_path, temp_db_path);

        // Clean up previous temp file if exists
        if Path::new(&temp_db_path).exists() {
            std::fs::remove_file(&temp_db_path)
                .with_context(|| format!("Failed to remove stale {}", temp_db_path))?;
        }

        self.import_to_db(&temp_db_path, roster_path, history_path)?;

        std::fs::rename(&temp_db_path, db_path)
            .with_context(|| format!("Failed to move {} over {}", temp_db_path, db_path))?;
        info!("Successfully swapped database to {}", db_path);

        info!("=== Import Complete ===");
        Ok(())
    }

    fn import_to_db(&self, db_path: &str, roster_path: &Path, history_path: &Path) -> Result<()> {
        let source = JsonTables::new(roster_path, history_path);
        let roster = source.load_roster()?;
        // a pool the pairing run would refuse never reaches the database
        Roster::from_records(&roster).context("Roster rejected")?;
        let history = source.load_history()?;
        info!("  → Read {} players and {} games", roster.len(), history.len());

        let tables = SqliteTables::open(db_path)?;
        tables.reset()?;
        tables.import(&roster, &history)?;
        info!("  → Wrote tables to {}\n", db_path);

        Ok(())
    }
}
