use anyhow::{Context, Result};
use log::warn;
use rusqlite::params;

use super::connection::DbConn;
use crate::domain::GameRecord;

pub fn insert_game(conn: &mut DbConn, record: &GameRecord) -> Result<()> {
    let sql = "INSERT INTO games (game_id, white, black, round, start_date, result) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

    conn.execute(
        sql,
        params![
            record.game_id,
            record.white,
            record.black,
            record.round,
            record.start_date,
            record.result
        ],
    )
    .context("Failed to insert game")
    .map(|_| ())
}

fn parse_game_row(row: &rusqlite::Row) -> rusqlite::Result<GameRecord> {
    Ok(GameRecord {
        game_id: row.get(0)?,
        white: row.get(1)?,
        black: row.get(2)?,
        round: row.get(3)?,
        start_date: row.get(4)?,
        result: row.get(5)?,
    })
}

/// Game rows in table order. Rows with unreadable columns are skipped.
pub fn list_records(conn: &mut DbConn) -> Result<Vec<GameRecord>> {
    let sql = "SELECT game_id, white, black, round, start_date, result FROM games ORDER BY id";

    let mut stmt = conn
        .prepare(sql)
        .context("Database has no games table; run `import` first")?;
    let mut records = Vec::new();

    for (idx, row) in stmt.query_map([], parse_game_row)?.enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping unreadable games row {}: {}", idx, e),
        }
    }

    Ok(records)
}
