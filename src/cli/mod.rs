//! CLI command definitions for the kanban server.
//!
//! The main entry point is the `Cli` struct which contains subcommands.

use clap::{Args, Parser, Subcommand};

/// Kanban board server and maintenance tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web server (default if no subcommand given)
    Serve(ServeArgs),

    /// Populate priorities and the default boards if not done yet
    Seed,

    /// Create a board
    AddBoard(AddBoardArgs),
}

/// Options for `serve`.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to listen on (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Options for `add-board`.
#[derive(Args, Debug)]
pub struct AddBoardArgs {
    /// Board title (unique, at most 30 characters)
    #[arg(long)]
    pub title: String,

    /// Optional description
    #[arg(long)]
    pub desc: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_none() {
        let cli = Cli::parse_from(["kanban"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.log, "2");
    }

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::parse_from(["kanban", "-v", "serve", "--port", "8080", "--host", "0.0.0.0"]);
        assert!(cli.verbose);
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_add_board() {
        let cli = Cli::parse_from([
            "kanban",
            "--database",
            "test.db",
            "add-board",
            "--title",
            "Blocked",
            "--desc",
            "Waiting on others",
        ]);
        assert_eq!(cli.database.as_deref(), Some("test.db"));
        match cli.command {
            Some(Command::AddBoard(args)) => {
                assert_eq!(args.title, "Blocked");
                assert_eq!(args.desc.as_deref(), Some("Waiting on others"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
