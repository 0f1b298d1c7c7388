use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use crate::domain::RosterRecord;

/// Add one roster row. A repeated id violates the primary key and fails.
pub fn insert_player(conn: &mut DbConn, record: &RosterRecord) -> Result<()> {
    let sql = "INSERT INTO players (id, rating, color_score) VALUES (?1, ?2, ?3)";

    conn.execute(sql, params![record.id, record.rating, record.color_score])
        .with_context(|| format!("Failed to insert player {}", record.id))
        .map(|_| ())
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<RosterRecord> {
    Ok(RosterRecord {
        id: row.get(0)?,
        rating: row.get(1)?,
        color_score: row.get(2)?,
    })
}

/// Roster in insertion order
pub fn list_roster(conn: &mut DbConn) -> Result<Vec<RosterRecord>> {
    let sql = "SELECT id, rating, color_score FROM players ORDER BY rowid";

    let mut stmt = conn
        .prepare(sql)
        .context("Database has no players table; run `import` first")?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read players table")?;

    Ok(rows)
}
