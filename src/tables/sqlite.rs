use anyhow::Result;

use super::TableSource;
use crate::database::{self, DbPool};
use crate::domain::{BoardRecord, GameRecord, Pairing, RosterRecord};

/// League tables kept in a SQLite database
pub struct SqliteTables {
    pool: DbPool,
}

impl SqliteTables {
    pub fn open(database_path: &str) -> Result<Self> {
        Ok(Self {
            pool: database::create_pool(database_path)?,
        })
    }

    /// Drop and recreate every table
    pub fn reset(&self) -> Result<()> {
        let mut conn = database::get_connection(&self.pool)?;
        database::setup::reset_database(&mut conn)
    }

    pub fn import(&self, roster: &[RosterRecord], history: &[GameRecord]) -> Result<()> {
        let mut conn = database::get_connection(&self.pool)?;

        for record in roster {
            database::players::insert_player(&mut conn, record)?;
        }
        for record in history {
            database::games::insert_game(&mut conn, record)?;
        }

        Ok(())
    }

    pub fn save_pairings(&self, round: i64, pairings: &[Pairing]) -> Result<()> {
        let mut conn = database::get_connection(&self.pool)?;
        database::pairings::replace_round(&mut conn, round, pairings)
    }

    pub fn load_pairings(&self, round: i64) -> Result<Vec<BoardRecord>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::pairings::list_by_round(&mut conn, round)
    }
}

impl TableSource for SqliteTables {
    fn load_roster(&self) -> Result<Vec<RosterRecord>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::players::list_roster(&mut conn)
    }

    fn load_history(&self) -> Result<Vec<GameRecord>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::games::list_records(&mut conn)
    }
}
