//! CLI command definitions for taskboard.
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod board;

use clap::{Parser, Subcommand};

/// Kanban task board server and client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

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
    /// Start the board API (default if no subcommand given)
    Serve,

    /// Insert the default columns into an empty board
    Seed,

    /// Print the board of a running server
    Board {
        /// Base URL of the board API (default: derived from config)
        #[arg(long)]
        url: Option<String>,

        /// Include archived columns
        #[arg(long)]
        all: bool,
    },

    /// Move a task to another column on a running server
    Move {
        /// Task id
        task: i64,

        /// Position of the target column
        column_position: i64,

        /// Base URL of the board API (default: derived from config)
        #[arg(long)]
        url: Option<String>,
    },
}
