use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::TableSource;
use crate::domain::{GameRecord, RosterRecord};
use crate::errors::{load_context, save_context, RecordIssue};

/// Roster and history exported as JSON arrays of row objects
pub struct JsonTables {
    roster_path: PathBuf,
    history_path: PathBuf,
}

impl JsonTables {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(roster_path: P, history_path: Q) -> Self {
        Self {
            roster_path: roster_path.as_ref().to_path_buf(),
            history_path: history_path.as_ref().to_path_buf(),
        }
    }

    /// Write any serializable table as pretty JSON
    pub fn save<T: Serialize>(path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data).context("Failed to serialize table")?;
        fs::write(path, json).with_context(|| save_context("table", &path.display().to_string()))?;

        info!("Saved table to: {}", path.display());
        Ok(())
    }

    fn read_rows(&self, path: &Path, table: &str) -> Result<Vec<Value>> {
        let json = fs::read_to_string(path)
            .with_context(|| load_context(table, &path.display().to_string()))?;

        let rows: Vec<Value> = serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse {} from {:?}. First 200 chars: {}",
                table,
                path,
                json.chars().take(200).collect::<String>()
            )
        })?;

        Ok(rows)
    }
}

impl TableSource for JsonTables {
    fn load_roster(&self) -> Result<Vec<RosterRecord>> {
        let rows = self.read_rows(&self.roster_path, "roster")?;

        // one bad roster row fails the whole load
        rows.into_iter()
            .enumerate()
            .map(|(idx, row)| {
                serde_json::from_value(row)
                    .with_context(|| format!("Invalid roster row {}", idx))
            })
            .collect()
    }

    fn load_history(&self) -> Result<Vec<GameRecord>> {
        let rows = self.read_rows(&self.history_path, "history")?;
        let mut records = Vec::with_capacity(rows.len());

        for (idx, row) in rows.into_iter().enumerate() {
            match serde_json::from_value::<GameRecord>(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    let issue = RecordIssue::Malformed {
                        row: idx,
                        reason: e.to_string(),
                    };
                    warn!("Skipping history record: {}", issue);
                }
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("league_pairings_json_{}", name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_roster_and_history() {
        let dir = temp_dir("load");
        let roster = dir.join("roster.json");
        let history = dir.join("history.json");

        fs::write(
            &roster,
            r#"[{"id": "Alice", "rating": 1500, "color_score": -1}, {"id": "bob", "rating": 1490.5, "color_score": 0}]"#,
        )
        .unwrap();
        fs::write(
            &history,
            r#"[
                {"white": "alice", "black": "bob", "round": "3", "start_date": 1700000000, "result": "1-0"},
                "not a row",
                {"white": "bob", "black": "alice", "round": 4}
            ]"#,
        )
        .unwrap();

        let tables = JsonTables::new(&roster, &history);
        let roster = tables.load_roster().unwrap();
        let history = tables.load_history().unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[1].rating, Some(1490.5));
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].round, Some(3));
        assert_eq!(history[1].result, None);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = temp_dir("missing");
        let tables = JsonTables::new(dir.join("nope.json"), dir.join("nope.json"));

        let err = tables.load_roster().unwrap_err();
        assert!(err.to_string().contains("Failed to load roster"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_writes_pretty_json() {
        let dir = temp_dir("save");
        let path = dir.join("out.json");

        JsonTables::save(&path, &vec![RosterRecord::new("a", 1.0, 0.0)]).unwrap();
        let written = fs::read_to_string(&path).unwrap();

        assert!(written.contains("\"id\": \"a\""));
        fs::remove_dir_all(&dir).unwrap();
    }
}
