use std::collections::HashSet;
use std::fmt::Write as _;

use crate::domain::Pairing;
use crate::pairing::eligibility::unordered_pair;
use crate::pairing::CompatibilityGraph;

/// Render the compatibility graph as Graphviz DOT for operator review.
/// Matched pairs are drawn bold, isolated players are filled red.
pub fn to_dot(graph: &CompatibilityGraph, pairings: &[Pairing]) -> String {
    let matched: HashSet<_> = pairings
        .iter()
        .map(|p| unordered_pair(&p.white, &p.black))
        .collect();

    let mut out = String::from("graph pairings {\n    node [shape=ellipse];\n");

    for (node, player) in graph.players().iter().enumerate() {
        let style = if graph.degree(node) == 0 {
            ", style=filled, fillcolor=red"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "    \"{}\" [label=\"{}\\n{:.0}\"{}];",
            escape(&player.id),
            escape(&player.id),
            player.rating,
            style
        );
    }

    for edge in graph.edges() {
        let a = &graph.player(edge.a).id;
        let b = &graph.player(edge.b).id;
        let style = if matched.contains(&unordered_pair(a, b)) {
            ", style=bold, color=blue"
        } else {
            ", color=gray"
        };
        let _ = writeln!(
            out,
            "    \"{}\" -- \"{}\" [label=\"{}\"{}];",
            escape(a),
            escape(b),
            format_weight(edge.weight),
            style
        );
    }

    out.push_str("}\n");
    out
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{:.0}", weight)
    } else {
        format!("{:.1}", weight)
    }
}
