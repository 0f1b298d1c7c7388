use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use crate::domain::{BoardRecord, Pairing};

/// Store the boards of `round`, replacing whatever was saved for it before
pub fn replace_round(conn: &mut DbConn, round: i64, pairings: &[Pairing]) -> Result<()> {
    let tx = conn.transaction().context("Failed to start transaction")?;

    tx.execute("DELETE FROM pairings WHERE round = ?1", params![round])
        .context("Failed to clear previous pairings")?;

    for (idx, pairing) in pairings.iter().enumerate() {
        tx.execute(
            "INSERT INTO pairings (round, board, white, black) VALUES (?1, ?2, ?3, ?4)",
            params![round, (idx + 1) as i64, pairing.white, pairing.black],
        )
        .context("Failed to insert pairing")?;
    }

    tx.commit().context("Failed to commit pairings")
}

fn parse_board_row(row: &rusqlite::Row) -> rusqlite::Result<BoardRecord> {
    let board: i64 = row.get(0)?;

    Ok(BoardRecord {
        board: board as usize,
        white: row.get(1)?,
        black: row.get(2)?,
    })
}

/// Saved boards of `round`, in board order
pub fn list_by_round(conn: &mut DbConn, round: i64) -> Result<Vec<BoardRecord>> {
    let sql = "SELECT board, white, black FROM pairings WHERE round = ?1 ORDER BY board";

    let mut stmt = conn
        .prepare(sql)
        .context("Database has no pairings table; run `import` first")?;
    let rows = stmt
        .query_map(params![round], parse_board_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read boards of round {}", round))?;

    Ok(rows)
}
