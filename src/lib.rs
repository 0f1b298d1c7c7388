pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod pairing;
pub mod render;
pub mod services;
pub mod tables;

use std::path::Path;

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::{Cli, PairArgs};
use log::warn;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::{ImportService, PairingOptions, PairingService};
use crate::tables::{JsonTables, SqliteTables};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_pair(args: &PairArgs) -> Result<()> {
    let config = pair_config(args);
    let database_path = config.storage.database_path.clone();
    let service = PairingService::new(config);

    let options = PairingOptions {
        round: args.round,
        output: args.output.clone(),
        dot: args.dot.clone(),
    };

    match (&args.roster, &args.history) {
        (Some(roster), Some(history)) => {
            if args.round.is_some() {
                warn!("--round is only stored when pairing from the database");
            }
            let tables = JsonTables::new(roster, history);
            service.run(&tables, &options)?;
        }
        _ => {
            if !Path::new(&database_path).exists() {
                bail!("No league database at {}; run `import` first", database_path);
            }
            let tables = SqliteTables::open(&database_path)?;
            let plan = service.run(&tables, &options)?;
            if let Some(round) = options.round {
                service.save_round(&tables, round, &plan)?;
            }
        }
    }

    Ok(())
}

pub fn handle_import(roster: &Path, history: &Path, database: Option<&str>) -> Result<()> {
    let mut config = AppConfig::new();
    if let Some(path) = database {
        config.storage.database_path = path.to_string();
    }

    let service = ImportService::new(config);
    service.run(roster, history)
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

fn pair_config(args: &PairArgs) -> AppConfig {
    let mut config = AppConfig::new();

    if let Some(window) = args.window {
        config.pairing.recency_window = window;
    }
    if let Some(penalty) = args.penalty {
        config.pairing.same_preference_penalty = penalty;
    }
    if args.strict_colors {
        config.pairing.exclude_same_preference = true;
    }
    if let Some(path) = &args.database {
        config.storage.database_path = path.clone();
    }

    config
}
