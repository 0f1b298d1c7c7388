use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Stated inclination to play a color.
/// Ordered `White < Neutral < Black`, used only to break ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColorPreference {
    White,
    Neutral,
    Black,
}

impl ColorPreference {
    pub fn from_score(score: f64) -> Self {
        if score <= -1.0 {
            ColorPreference::White
        } else if score >= 1.0 {
            ColorPreference::Black
        } else {
            ColorPreference::Neutral
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColorPreference::White => "white",
            ColorPreference::Neutral => "neutral",
            ColorPreference::Black => "black",
        }
    }
}

/// Validated league member taking part in a pairing run
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub rating: f64,
    pub preference: ColorPreference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Finished(String),
}

impl GameStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, GameStatus::InProgress)
    }
}

/// A past or ongoing game, immutable for the duration of a run
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalGame {
    pub white: String,
    pub black: String,
    pub round: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub status: GameStatus,
    /// Position of the row in the source table
    pub row: usize,
}

impl HistoricalGame {
    pub fn involves(&self, player: &str) -> bool {
        self.white == player || self.black == player
    }

    pub fn opponent_of(&self, player: &str) -> Option<&str> {
        if self.white == player {
            Some(&self.black)
        } else if self.black == player {
            Some(&self.white)
        } else {
            None
        }
    }

    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.white == a && self.black == b) || (self.white == b && self.black == a)
    }

    /// Round outranks start date, start date outranks row position.
    /// A present value always sorts above a missing one.
    pub fn recency_key(&self) -> (Option<i64>, Option<DateTime<Utc>>, usize) {
        (self.round, self.start_date, self.row)
    }
}

/// One board of the round: `white` plays `black`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub white: String,
    pub black: String,
}

impl Pairing {
    pub fn new(white: impl Into<String>, black: impl Into<String>) -> Self {
        Self {
            white: white.into(),
            black: black.into(),
        }
    }

    pub fn contains(&self, player: &str) -> bool {
        self.white == player || self.black == player
    }
}

// --- Tabular Records ---

/// Raw roster row as exported from the league sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub id: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub color_score: Option<f64>,
}

impl RosterRecord {
    pub fn new(id: impl Into<String>, rating: f64, color_score: f64) -> Self {
        Self {
            id: id.into(),
            rating: Some(rating),
            color_score: Some(color_score),
        }
    }
}

/// Raw game row; every field is optional so partial rows still load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default)]
    pub white: Option<String>,
    #[serde(default)]
    pub black: Option<String>,
    #[serde(default, deserialize_with = "lenient_round")]
    pub round: Option<i64>,
    /// Unix seconds
    #[serde(default)]
    pub start_date: Option<i64>,
    #[serde(default)]
    pub result: Option<String>,
}

impl GameRecord {
    pub fn new(white: &str, black: &str, round: i64, result: Option<&str>) -> Self {
        Self {
            game_id: None,
            white: Some(white.to_string()),
            black: Some(black.to_string()),
            round: Some(round),
            start_date: None,
            result: result.map(|r| r.to_string()),
        }
    }

    pub fn with_start_date(mut self, unix_seconds: i64) -> Self {
        self.start_date = Some(unix_seconds);
        self
    }
}

/// Spreadsheet exports carry rounds as numbers or numeric strings
fn lenient_round<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// Output row of a saved pairing list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardRecord {
    pub board: usize,
    pub white: String,
    pub black: String,
}
