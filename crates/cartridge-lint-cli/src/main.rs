//! cartridge-lint CLI tool.
//!
//! Usage:
//! ```bash
//! cartridge-lint check [OPTIONS] [PATH]
//! cartridge-lint list-rules
//! cartridge-lint init
//! cartridge-lint file-names [PATH]
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

use config_resolver::ConfigSource;

/// Certification auditor for Salesforce B2C Commerce cartridge repositories
#[derive(Parser)]
#[command(name = "cartridge-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "CARTRIDGE_LINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run audit checks
    Check {
        /// Cartridge repository to audit (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Preset to run: recommended, strict or minimal
        #[arg(short, long)]
        preset: Option<String>,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Lowest severity that fails the run: error, warning or info
        #[arg(long)]
        fail_on: Option<String>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// List template and script names, flagging ones off the naming convention
    FileNames {
        /// Cartridge repository to list (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Directory receiving fileNames.txt
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },
}

/// Output format for audit results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            preset,
            rules,
            exclude,
            fail_on,
        } => {
            let source = ConfigSource::resolve(&path, cli.config.as_deref());
            let options = commands::check::CheckOptions {
                format,
                preset,
                rules,
                exclude,
                fail_on,
            };
            commands::check::run(&path, options, &source)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
        Commands::FileNames { path, output } => {
            let source = ConfigSource::resolve(&path, cli.config.as_deref());
            commands::file_names::run(&path, &output, &source)
        }
    }
}
