use anyhow::Result;

use league_pairings::cli::Command;
use league_pairings::{handle_completions, handle_import, handle_pair, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Pair(args) => handle_pair(args),
        Command::Import {
            roster,
            history,
            database,
        } => handle_import(roster, history, database.as_deref()),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
