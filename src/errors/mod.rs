use thiserror::Error;

/// Problems with the roster that stop a run before any graph is built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Roster row {row} has an empty player id")]
    EmptyId { row: usize },

    #[error("Player '{0}' appears more than once in the roster")]
    DuplicatePlayer(String),

    #[error("Player '{0}' has no rating")]
    MissingRating(String),

    #[error("Player '{0}' has no color score")]
    MissingColorScore(String),

    #[error("Player '{id}' has a non-finite {field}")]
    NonFinite { id: String, field: &'static str },

    #[error("Number of players can't be odd (got {0})")]
    OddPlayerCount(usize),
}

/// Fatal outcomes of a pairing run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PairingError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// `isolated` have no eligible opponent at all. `unplaced` are the
    /// players left without a board by the largest possible partial round.
    #[error("{}", describe_unmatchable(.isolated, .unplaced))]
    Unmatchable {
        isolated: Vec<String>,
        unplaced: Vec<String>,
    },
}

fn describe_unmatchable(isolated: &[String], unplaced: &[String]) -> String {
    let mut message = format!(
        "No perfect matching exists; players left without a board: {}",
        unplaced.join(", ")
    );
    if !isolated.is_empty() {
        message.push_str(&format!(
            " (no eligible opponent at all: {})",
            isolated.join(", ")
        ));
    }
    message
}

/// A historical row that cannot take part in the computation.
/// These are skipped with a warning, never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordIssue {
    #[error("History row {row} is not a game record: {reason}")]
    Malformed { row: usize, reason: String },

    #[error("History row {row} has no {side} player")]
    MissingPlayer { row: usize, side: &'static str },

    #[error("History row {row} pairs '{player}' with themself")]
    SelfPairing { row: usize, player: String },

    #[error("History row {row} has neither a round nor a start date")]
    MissingOrderingKey { row: usize },
}

/// Add context to table load errors
pub fn load_context(table: &str, location: &str) -> String {
    format!("Failed to load {} from: {}", table, location)
}

/// Add context to table write errors
pub fn save_context(table: &str, location: &str) -> String {
    format!("Failed to save {} to: {}", table, location)
}
