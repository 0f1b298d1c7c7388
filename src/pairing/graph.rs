use std::collections::BTreeMap;

use log::debug;

use super::eligibility::Eligibility;
use crate::config::PairingSettings;
use crate::domain::{ColorPreference, Player, Roster};

/// Undirected weighted graph over the roster.
/// An edge means the pair may be paired; its weight is the cost of doing so.
#[derive(Debug, Clone)]
pub struct CompatibilityGraph {
    players: Vec<Player>,
    adjacency: Vec<BTreeMap<usize, f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

impl CompatibilityGraph {
    pub fn build(roster: &Roster, eligibility: &Eligibility, settings: &PairingSettings) -> Self {
        let players = roster.players().to_vec();
        let mut adjacency = vec![BTreeMap::new(); players.len()];

        for a in 0..players.len() {
            for b in (a + 1)..players.len() {
                if let Some(weight) = edge_weight(&players[a], &players[b], eligibility, settings) {
                    adjacency[a].insert(b, weight);
                    adjacency[b].insert(a, weight);
                }
            }
        }

        Self { players, adjacency }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn node_count(&self) -> usize {
        self.players.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeMap::len).sum::<usize>() / 2
    }

    pub fn player(&self, node: usize) -> &Player {
        &self.players[node]
    }

    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        self.adjacency.get(a).and_then(|n| n.get(&b)).copied()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Every edge once, with `a < b`, in node order
    pub fn edges(&self) -> Vec<Edge> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, neighbours)| {
                neighbours
                    .range((a + 1)..)
                    .map(move |(&b, &weight)| Edge { a, b, weight })
            })
            .collect()
    }

    /// Players with no eligible opponent at all
    pub fn isolated_players(&self) -> Vec<String> {
        (0..self.node_count())
            .filter(|&node| self.degree(node) == 0)
            .map(|node| self.players[node].id.clone())
            .collect()
    }
}

fn edge_weight(
    a: &Player,
    b: &Player,
    eligibility: &Eligibility,
    settings: &PairingSettings,
) -> Option<f64> {
    if !eligibility.allows(&a.id, &b.id) {
        debug!("No edge {} - {}: recent or ongoing opponents", a.id, b.id);
        return None;
    }

    let same_preference = shares_strict_preference(a, b);

    if same_preference && settings.exclude_same_preference {
        debug!("No edge {} - {}: both prefer {}", a.id, b.id, a.preference.as_str());
        return None;
    }

    let mut weight = (a.rating - b.rating).abs();
    if same_preference {
        weight += settings.same_preference_penalty;
    }

    Some(weight)
}

fn shares_strict_preference(a: &Player, b: &Player) -> bool {
    a.preference == b.preference && a.preference != ColorPreference::Neutral
}
