use std::collections::HashSet;

use super::models::{ColorPreference, Player, RosterRecord};
use crate::errors::InputError;

/// Validated set of players for one round.
/// Ids are unique and lowercase, and the pool size is even.
#[derive(Debug, Clone)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn from_records(records: &[RosterRecord]) -> Result<Self, InputError> {
        let players = records
            .iter()
            .enumerate()
            .map(|(row, record)| build_player(row, record))
            .collect::<Result<Vec<_>, _>>()?;

        ensure_unique(&players)?;
        ensure_even(&players)?;

        Ok(Self { players })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(|p| p.id.as_str())
    }
}

pub fn canonical_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn build_player(row: usize, record: &RosterRecord) -> Result<Player, InputError> {
    let id = canonical_id(&record.id);
    if id.is_empty() {
        return Err(InputError::EmptyId { row });
    }

    let rating = record
        .rating
        .ok_or_else(|| InputError::MissingRating(id.clone()))?;
    let color_score = record
        .color_score
        .ok_or_else(|| InputError::MissingColorScore(id.clone()))?;

    ensure_finite(&id, "rating", rating)?;
    ensure_finite(&id, "color score", color_score)?;

    Ok(Player {
        id,
        rating,
        preference: ColorPreference::from_score(color_score),
    })
}

fn ensure_finite(id: &str, field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NonFinite {
            id: id.to_string(),
            field,
        })
    }
}

fn ensure_unique(players: &[Player]) -> Result<(), InputError> {
    let mut seen = HashSet::new();

    for player in players {
        if !seen.insert(player.id.as_str()) {
            return Err(InputError::DuplicatePlayer(player.id.clone()));
        }
    }

    Ok(())
}

fn ensure_even(players: &[Player]) -> Result<(), InputError> {
    if players.len() % 2 == 0 {
        Ok(())
    } else {
        Err(InputError::OddPlayerCount(players.len()))
    }
}
