use chrono::DateTime;

use super::models::{GameRecord, GameStatus, HistoricalGame};
use super::roster::canonical_id;
use crate::config::PairingSettings;
use crate::errors::RecordIssue;

/// Historical games ordered most recent first.
///
/// Ordering is by round number, then start date, then row position, all
/// descending. Round is authoritative: a game with a round always ranks
/// above one without, and dates only order games inside the same round
/// (or games that carry no round at all).
#[derive(Debug, Clone, Default)]
pub struct History {
    games: Vec<HistoricalGame>,
    skipped: Vec<RecordIssue>,
}

impl History {
    pub fn from_records(records: &[GameRecord], settings: &PairingSettings) -> Self {
        let mut games = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();

        for (row, record) in records.iter().enumerate() {
            match convert_record(row, record, settings) {
                Ok(game) => games.push(game),
                Err(issue) => skipped.push(issue),
            }
        }

        sort_most_recent_first(&mut games);

        Self { games, skipped }
    }

    pub fn games(&self) -> &[HistoricalGame] {
        &self.games
    }

    /// Rows that could not take part, in table order
    pub fn skipped(&self) -> &[RecordIssue] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Games involving `player`, most recent first
    pub fn games_of<'a>(&'a self, player: &'a str) -> impl Iterator<Item = &'a HistoricalGame> {
        self.games.iter().filter(move |g| g.involves(player))
    }

    /// Most recent game between exactly these two players, in either color
    pub fn last_meeting(&self, a: &str, b: &str) -> Option<&HistoricalGame> {
        self.games.iter().find(|g| g.is_between(a, b))
    }
}

fn convert_record(
    row: usize,
    record: &GameRecord,
    settings: &PairingSettings,
) -> Result<HistoricalGame, RecordIssue> {
    let white = required_player(row, "white", record.white.as_deref())?;
    let black = required_player(row, "black", record.black.as_deref())?;

    if white == black {
        return Err(RecordIssue::SelfPairing { row, player: white });
    }

    let start_date = record
        .start_date
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    if record.round.is_none() && start_date.is_none() {
        return Err(RecordIssue::MissingOrderingKey { row });
    }

    Ok(HistoricalGame {
        white,
        black,
        round: record.round,
        start_date,
        status: classify_result(record.result.as_deref(), settings),
        row,
    })
}

fn required_player(
    row: usize,
    side: &'static str,
    raw: Option<&str>,
) -> Result<String, RecordIssue> {
    raw.map(canonical_id)
        .filter(|id| !id.is_empty())
        .ok_or(RecordIssue::MissingPlayer { row, side })
}

fn classify_result(result: Option<&str>, settings: &PairingSettings) -> GameStatus {
    if settings.is_active_result(result) {
        GameStatus::InProgress
    } else {
        GameStatus::Finished(result.unwrap_or_default().trim().to_string())
    }
}

fn sort_most_recent_first(games: &mut [HistoricalGame]) {
    games.sort_by(|a, b| b.recency_key().cmp(&a.recency_key()));
}
