//! Taskboard
//!
//! A kanban task board: REST API over tasks and columns, plus CLI commands
//! that drive the board view-model against a running server.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use taskboard::cli::board::{run_board, run_move};
use taskboard::cli::{Cli, Command};
use taskboard::config::Config;
use taskboard::db::Database;
use taskboard::http;
use taskboard::logging::{self, LogTarget};
use taskboard::service::BoardService;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let (mut config, config_path) = Config::discover(cli.config.as_deref().map(std::path::Path::new))?;
    match &config_path {
        Some(path) => debug!("Using config file {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    // Override from CLI arguments
    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.into();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command {
        Some(Command::Seed) => {
            let db = open_database(&config)?;
            let seeded = BoardService::new(Arc::clone(&db)).seed_default_columns()?;
            if seeded.is_empty() {
                println!("Board already has columns, nothing to do");
            } else {
                println!("Created {} columns", seeded.len());
            }
            close_database(db);
        }
        Some(Command::Board { url, all }) => {
            let url = url.unwrap_or_else(|| config.api_url());
            run_board(&url, all).await?;
        }
        Some(Command::Move {
            task,
            column_position,
            url,
        }) => {
            let url = url.unwrap_or_else(|| config.api_url());
            run_move(&url, task, column_position).await?;
        }
        Some(Command::Serve) | None => {
            run_server(config).await?;
        }
    }

    Ok(())
}

fn open_database(config: &Config) -> Result<Arc<Database>> {
    config.ensure_db_dir()?;
    let db = Database::open(&config.server.db_path)?;
    info!("Opened database {}", config.server.db_path.display());
    Ok(Arc::new(db))
}

fn close_database(db: Arc<Database>) {
    match Arc::try_unwrap(db) {
        Ok(db) => match db.close() {
            Ok(()) => debug!("Database closed"),
            Err(e) => warn!("Failed to close database: {}", e),
        },
        Err(_) => warn!("Database still in use at shutdown, leaving it to drop"),
    }
}

async fn run_server(config: Config) -> Result<()> {
    let db = open_database(&config)?;
    let service = BoardService::new(Arc::clone(&db));

    let server = http::start_server(service, &config.server.host, config.server.port).await?;

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C, shutting down");

    server.shutdown().await;
    close_database(db);
    Ok(())
}
