use std::collections::{HashMap, HashSet};

use crate::domain::{History, Roster};

/// Unordered pair of player ids, stored lexically ordered
pub type PlayerPair = (String, String);

pub fn unordered_pair(a: &str, b: &str) -> PlayerPair {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Recent and ongoing opponents of every rostered player
#[derive(Debug, Clone, Default)]
pub struct Eligibility {
    recent: HashMap<String, Vec<String>>,
    active: HashSet<PlayerPair>,
}

impl Eligibility {
    pub fn compute(roster: &Roster, history: &History, recency_window: usize) -> Self {
        let recent = roster
            .ids()
            .map(|id| (id.to_string(), recent_opponents(history, id, recency_window)))
            .collect();

        Self {
            recent,
            active: active_pairs(history),
        }
    }

    /// Up to `k` most recent opponents, most recent first. Repeats are kept.
    pub fn recent_opponents(&self, player: &str) -> &[String] {
        self.recent.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `opponent` is among the recent opponents of `player`
    pub fn is_recent(&self, player: &str, opponent: &str) -> bool {
        self.recent_opponents(player).iter().any(|o| o == opponent)
    }

    /// Both sides list each other as recent. One-sided records do not count.
    pub fn is_mutually_recent(&self, a: &str, b: &str) -> bool {
        self.is_recent(a, b) && self.is_recent(b, a)
    }

    pub fn is_active(&self, a: &str, b: &str) -> bool {
        self.active.contains(&unordered_pair(a, b))
    }

    pub fn allows(&self, a: &str, b: &str) -> bool {
        a != b && !self.is_active(a, b) && !self.is_mutually_recent(a, b)
    }
}

fn recent_opponents(history: &History, player: &str, k: usize) -> Vec<String> {
    history
        .games_of(player)
        .filter_map(|game| game.opponent_of(player))
        .take(k)
        .map(str::to_string)
        .collect()
}

fn active_pairs(history: &History) -> HashSet<PlayerPair> {
    history
        .games()
        .iter()
        .filter(|game| game.status.is_active())
        .map(|game| unordered_pair(&game.white, &game.black))
        .collect()
}
