use anyhow::{Context, Result};
use colored::Colorize;
use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;

use crate::config::settings::AppConfig;
use crate::domain::{BoardRecord, History, Roster};
use crate::pairing::{CompatibilityGraph, RoundPlan, RoundPlanner};
use crate::render::to_dot;
use crate::tables::{JsonTables, SqliteTables, TableSource};

#[derive(Debug, Clone, Default)]
pub struct PairingOptions {
    /// Round number under which the boards are stored
    pub round: Option<i64>,
    pub output: Option<PathBuf>,
    pub dot: Option<PathBuf>,
}

pub struct PairingService {
    config: AppConfig,
}

impl PairingService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, source: &dyn TableSource, options: &PairingOptions) -> Result<RoundPlan> {
        info!("=== Starting Pairing ===\n");

        let roster = self.load_roster(source)?;
        info!("  → Loaded {} players", roster.len());

        let history = self.load_history(source)?;

        let planner = RoundPlanner::new(&self.config.pairing);
        let graph = planner.build_graph(&roster, &history);

        let plan = match planner.plan_on(&graph, &history) {
            Ok(plan) => plan,
            Err(e) => {
                error!("Pairing failed: {}", e);
                // still render the graph so the isolated players show up
                self.write_dot(&graph, &RoundPlan::default(), options)?;
                return Err(e.into());
            }
        };

        self.write_dot(&graph, &plan, options)?;
        self.write_output(&plan, options)?;
        print_pairings(&plan);

        info!("=== Pairing Complete ===");
        Ok(plan)
    }

    pub fn save_round(&self, tables: &SqliteTables, round: i64, plan: &RoundPlan) -> Result<()> {
        tables.save_pairings(round, &plan.pairings)?;
        info!("  → Saved {} boards for round {}", plan.pairings.len(), round);
        Ok(())
    }

    fn load_roster(&self, source: &dyn TableSource) -> Result<Roster> {
        let records = source.load_roster()?;
        Roster::from_records(&records).context("Roster rejected")
    }

    fn load_history(&self, source: &dyn TableSource) -> Result<History> {
        let records = source.load_history()?;
        let history = History::from_records(&records, &self.config.pairing);

        info!(
            "  → Loaded {} historical games ({} skipped)",
            history.len(),
            history.skipped().len()
        );
        for issue in history.skipped() {
            warn!("Skipping history record: {}", issue);
        }

        Ok(history)
    }

    fn write_dot(
        &self,
        graph: &CompatibilityGraph,
        plan: &RoundPlan,
        options: &PairingOptions,
    ) -> Result<()> {
        if let Some(path) = &options.dot {
            fs::write(path, to_dot(graph, &plan.pairings))
                .with_context(|| format!("Failed to write graph to {}", path.display()))?;
            info!("  → Wrote compatibility graph to {}", path.display());
        }
        Ok(())
    }

    fn write_output(&self, plan: &RoundPlan, options: &PairingOptions) -> Result<()> {
        if let Some(path) = &options.output {
            JsonTables::save(path, &board_records(plan))?;
        }
        Ok(())
    }
}

pub fn board_records(plan: &RoundPlan) -> Vec<BoardRecord> {
    plan.pairings
        .iter()
        .enumerate()
        .map(|(idx, p)| BoardRecord {
            board: idx + 1,
            white: p.white.clone(),
            black: p.black.clone(),
        })
        .collect()
}

fn print_pairings(plan: &RoundPlan) {
    for (idx, pairing) in plan.pairings.iter().enumerate() {
        println!(
            "{:>3}. {} vs {}",
            idx + 1,
            format!("@{}", pairing.white).bold(),
            format!("@{}", pairing.black).dimmed()
        );
    }
}
