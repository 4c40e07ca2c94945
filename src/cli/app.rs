//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{list_cmd, product_cmd, remote_cmd, scan_cmd, tag_cmd};
use crate::storage::{Config, GlobalConfig, Home, HOME_ENV};

#[derive(Parser)]
#[command(name = "shelfscan")]
#[command(author, version, about = "Barcode scans to a shelf-sorted shopping list")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Home directory containing .shelfscan (defaults to searching upward from cwd)
    #[arg(long, global = true, env = HOME_ENV)]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new shelfscan home
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Manage catalog products
    #[command(subcommand)]
    Product(product_cmd::ProductCommands),

    /// Manage shopping lists
    #[command(subcommand)]
    List(list_cmd::ListCommands),

    /// Manage product tags
    #[command(subcommand)]
    Tag(tag_cmd::TagCommands),

    /// Work with the remote task list directly
    #[command(subcommand)]
    Remote(remote_cmd::RemoteCommands),

    /// Read scan codes and add them to the list until input ends
    Scan {
        /// Read codes from this file or device instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let scanning = matches!(cli.command, Commands::Scan { .. });
    init_tracing(cli.verbose, scanning);

    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global().unwrap_or_else(|_| GlobalConfig::default()).default_format,
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("shelfscan starting");

    if let Commands::Init { path } = &cli.command {
        output.verbose_ctx("init", &format!("Initializing home at: {}", path.display()));
        let home = Home::init(path)?;
        output.verbose_ctx("init", &format!("Created catalog at: {}", home.catalog_path().display()));
        output.success(&format!("Initialized shelfscan home at {}", home.root().display()));
        return Ok(());
    }

    let home = Home::locate(cli.home.as_deref())?;
    output.verbose_ctx("home", &format!("Using {}", home.dir().display()));

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Product(cmd) => product_cmd::run(cmd, &output, &home)?,
        Commands::List(cmd) => list_cmd::run(cmd, &output, &home)?,
        Commands::Tag(cmd) => tag_cmd::run(cmd, &output, &home)?,
        Commands::Remote(cmd) => remote_cmd::run(cmd, &output, &home)?,
        Commands::Scan { input } => scan_cmd::run(&output, &home, input)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Installs the log subscriber; `RUST_LOG` overrides the level picked here
fn init_tracing(verbose: bool, scanning: bool) {
    let level = if verbose {
        "debug"
    } else if scanning {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second init (tests calling run twice) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
