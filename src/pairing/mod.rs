pub mod colors;
pub mod eligibility;
pub mod graph;
pub mod matching;
pub mod planner;

pub use colors::resolve_colors;
pub use eligibility::Eligibility;
pub use graph::CompatibilityGraph;
pub use planner::{RoundPlan, RoundPlanner};
