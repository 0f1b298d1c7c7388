use log::{debug, info};

use super::colors::resolve_colors;
use super::eligibility::Eligibility;
use super::graph::CompatibilityGraph;
use super::matching::{min_weight_perfect_matching, WeightedEdge};
use crate::config::PairingSettings;
use crate::domain::{History, Pairing, Roster};
use crate::errors::PairingError;

/// Pairings for one round, in board order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundPlan {
    pub pairings: Vec<Pairing>,
    pub total_rating_gap: f64,
}

pub struct RoundPlanner<'a> {
    settings: &'a PairingSettings,
}

impl<'a> RoundPlanner<'a> {
    pub fn new(settings: &'a PairingSettings) -> Self {
        Self { settings }
    }

    pub fn build_graph(&self, roster: &Roster, history: &History) -> CompatibilityGraph {
        let eligibility = Eligibility::compute(roster, history, self.settings.recency_window);
        let graph = CompatibilityGraph::build(roster, &eligibility, self.settings);

        info!(
            "  → Compatibility graph: {} players, {} eligible pairs",
            graph.node_count(),
            graph.edge_count()
        );

        graph
    }

    pub fn plan(&self, roster: &Roster, history: &History) -> Result<RoundPlan, PairingError> {
        let graph = self.build_graph(roster, history);
        self.plan_on(&graph, history)
    }

    /// Pair a previously built graph. All-or-nothing: either every player
    /// is placed or an error names the players that cannot be.
    pub fn plan_on(
        &self,
        graph: &CompatibilityGraph,
        history: &History,
    ) -> Result<RoundPlan, PairingError> {
        let matched = match_players(graph)?;

        let pairings = matched
            .iter()
            .map(|&(a, b)| resolve_colors(graph.player(a), graph.player(b), history))
            .collect();

        let total_rating_gap = matched
            .iter()
            .map(|&(a, b)| (graph.player(a).rating - graph.player(b).rating).abs())
            .sum();

        info!("  → Paired {} boards, total rating gap {:.1}", matched.len(), total_rating_gap);

        Ok(RoundPlan {
            pairings,
            total_rating_gap,
        })
    }
}

/// Node pairs of a min-weight perfect matching, in board order
fn match_players(graph: &CompatibilityGraph) -> Result<Vec<(usize, usize)>, PairingError> {
    let edges: Vec<WeightedEdge> = graph
        .edges()
        .into_iter()
        .map(|e| WeightedEdge::new(e.a, e.b, e.weight))
        .collect();

    let mut matched =
        min_weight_perfect_matching(graph.node_count(), &edges).map_err(|uncovered| {
            PairingError::Unmatchable {
                isolated: graph.isolated_players(),
                unplaced: uncovered
                    .into_iter()
                    .map(|node| graph.player(node).id.clone())
                    .collect(),
            }
        })?;

    // nodes follow roster order, so sorting by the lower node gives board order
    matched.sort_unstable();

    for &(a, b) in &matched {
        debug!("Matched {} - {}", graph.player(a).id, graph.player(b).id);
    }

    Ok(matched)
}
