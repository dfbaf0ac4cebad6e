//! Kanban board server
//!
//! Serves the board listing over HTTP and provides seeding and board
//! maintenance commands.

use anyhow::Result;
use clap::Parser;
use kanban_board::cli::{AddBoardArgs, Cli, Command, ServeArgs};
use kanban_board::config::{Config, ConfigLoader, ConfigPaths};
use kanban_board::dashboard::{AppState, start_server};
use kanban_board::db::{Database, SeedOutcome};
use kanban_board::logging::{self, LogTarget};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let mut paths = ConfigPaths::discover();
    if let Some(config_path) = &cli.config {
        paths = paths.with_file(config_path);
    }
    let loader = ConfigLoader::load(paths)?;
    if !loader.sources().is_empty() {
        info!(sources = ?loader.sources(), "Using config files");
    }
    let mut config = loader.into_config();

    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.into();
    }

    config.ensure_db_dir()?;
    let db = Database::open(&config.server.db_path)?;
    info!(path = %config.server.db_path.display(), "Opened database");

    match cli.command {
        None => serve(db, config, ServeArgs::default()).await,
        Some(Command::Serve(args)) => serve(db, config, args).await,
        Some(Command::Seed) => {
            match db.seed()? {
                SeedOutcome::Seeded => println!("Seeded priorities and default boards."),
                SeedOutcome::AlreadySeeded => println!("Database already seeded; nothing to do."),
            }
            Ok(())
        }
        Some(Command::AddBoard(AddBoardArgs { title, desc })) => {
            let board = db.create_board(&title, desc.as_deref())?;
            println!("Created board {} ({})", board.id, board.title);
            Ok(())
        }
    }
}

async fn serve(db: Database, mut config: Config, args: ServeArgs) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if config.board.seed_on_start {
        db.seed()?;
    }

    info!(move_mode = %config.board.move_mode, "Task moves configured");
    let state = AppState::new(Arc::new(db), config.board.move_mode);
    let handle = start_server(state, &config.bind_addr()).await?;
    println!("Kanban board at http://{}/", handle.local_addr());

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C");
    handle.shutdown().await;
    Ok(())
}
