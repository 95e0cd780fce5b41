//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    analyze::AnalyzeArgs, completions::CompletionsArgs, dashboard::DashboardArgs,
    generate::GenerateArgs, import::ImportArgs,
};
use crate::core::ConfigOverrides;

#[derive(Parser)]
#[command(name = "wab")]
#[command(author, version, about = "Warehouse process A/B testing toolkit")]
#[command(long_about = "Generate synthetic warehouse orders, load them into an order store, and compare process A against process B on processing time and labor cost.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file (YAML), layered over ~/.config/wab/config.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Order store path (default: warehouse_ab_test.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Order store credential (prefer WAB_DB_PASSWORD)
    #[arg(long, global = true)]
    pub db_password: Option<String>,
}

impl GlobalOpts {
    /// Command-line layer of the configuration
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            db_path: self.db.clone(),
            db_password: self.db_password.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a synthetic order table as CSV
    Generate(GenerateArgs),

    /// Load an order CSV into the order store
    Import(ImportArgs),

    /// Compare process A and B (means, Welch t-test, improvement, charts)
    Analyze(AnalyzeArgs),

    /// Interactive dashboard with group filter and metric selector
    Dashboard(DashboardArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables and charts
    #[default]
    Auto,
    /// JSON format (for programming)
    Json,
}
