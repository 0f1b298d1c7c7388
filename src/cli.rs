use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "correspondence chess league round pairing")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Pair the next round from the roster and the game history
    Pair(PairArgs),
    /// Load JSON roster and history tables into a fresh SQLite database
    Import {
        /// Roster JSON file
        #[arg(long)]
        roster: PathBuf,
        /// Game history JSON file
        #[arg(long)]
        history: PathBuf,
        /// Target database (defaults to $DATABASE_PATH or league.db)
        #[arg(long)]
        database: Option<String>,
    },
    /// Print shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct PairArgs {
    /// Roster JSON file; read tables from JSON instead of the database
    #[arg(long, requires = "history", conflicts_with = "database")]
    pub roster: Option<PathBuf>,
    /// Game history JSON file
    #[arg(long, requires = "roster")]
    pub history: Option<PathBuf>,
    /// League database (defaults to $DATABASE_PATH or league.db)
    #[arg(long)]
    pub database: Option<String>,
    /// Number of recent games whose opponents are avoided
    #[arg(short = 'k', long)]
    pub window: Option<usize>,
    /// Extra cost for pairing two players who want the same color
    #[arg(long)]
    pub penalty: Option<f64>,
    /// Never pair two players who want the same color
    #[arg(long)]
    pub strict_colors: bool,
    /// Save the boards under this round number (database only)
    #[arg(short, long)]
    pub round: Option<i64>,
    /// Write the boards as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Write the compatibility graph as Graphviz DOT
    #[arg(long)]
    pub dot: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair_from_json() {
        let cli = Cli::parse_from([
            "league_pairings",
            "pair",
            "--roster",
            "roster.json",
            "--history",
            "history.json",
            "-k",
            "3",
        ]);

        match cli.command {
            Command::Pair(args) => {
                assert_eq!(args.roster, Some(PathBuf::from("roster.json")));
                assert_eq!(args.window, Some(3));
                assert!(!args.strict_colors);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_roster_requires_history() {
        let result = Cli::try_parse_from(["league_pairings", "pair", "--roster", "roster.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_tables_conflict_with_database() {
        let result = Cli::try_parse_from([
            "league_pairings",
            "pair",
            "--roster",
            "r.json",
            "--history",
            "h.json",
            "--database",
            "league.db",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::parse_from(["league_pairings", "completions", "bash"]);
        assert_eq!(cli.command, Command::Completions { shell: Shell::Bash });
    }
}
