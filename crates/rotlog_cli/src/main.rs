//! rotlog CLI
//!
//! Command-line tools for rotating binary append logs.
//!
//! # Commands
//!
//! - `write` - Append payloads to a log
//! - `dump` - Print every payload of a log, oldest first
//! - `backups` - List the rotated backups of a log
//! - `demo` - Write a batch of sample events and read them back

mod commands;

use clap::{Parser, Subcommand};
use rotlog_core::LogConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default log used by the demo when no path is given.
const DEMO_PATH: &str = "./logs/events.bin";

/// rotlog command-line log tools.
#[derive(Parser)]
#[command(name = "rotlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the active log file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Size in bytes at which the active file is rolled over
    #[arg(global = true, long, default_value_t = 1024 * 1024)]
    max_size: u64,

    /// Width in bytes of the frame length prefix
    #[arg(global = true, long, default_value_t = rotlog_core::DEFAULT_PREFIX_WIDTH)]
    prefix_width: u8,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append payloads to the log, one frame each
    Write {
        /// Payloads to append
        #[arg(required = true)]
        payloads: Vec<String>,

        /// Sync file data after every write
        #[arg(short, long)]
        sync: bool,
    },

    /// Print every payload in write order
    Dump {
        /// Maximum number of payloads to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List rotated backup files
    Backups {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Write sample events and read them back
    Demo,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = LogConfig::new()
        .max_file_size(cli.max_size)
        .prefix_width(cli.prefix_width);

    match cli.command {
        Commands::Write { payloads, sync } => {
            let path = cli.path.ok_or("Log path required for write")?;
            commands::write::run(&path, config.sync_on_write(sync), &payloads)?;
        }
        Commands::Dump { limit, format } => {
            let path = cli.path.ok_or("Log path required for dump")?;
            commands::dump::run(&path, &config, limit, &format)?;
        }
        Commands::Backups { format } => {
            let path = cli.path.ok_or("Log path required for backups")?;
            commands::backups::run(&path, &format)?;
        }
        Commands::Demo => {
            let path = cli.path.unwrap_or_else(|| PathBuf::from(DEMO_PATH));
            commands::demo::run(&path, config.prefix_width)?;
        }
        Commands::Version => {
            println!("rotlog CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("rotlog core v{}", rotlog_core::VERSION);
        }
    }

    Ok(())
}
