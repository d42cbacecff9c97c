//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - ask: route a question and call the selected service
//! - route: classify a question without calling anything
//! - sentiment/risk/strategy: direct service calls
//! - config: show/validate effective configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Analyst - routes research questions to analytic services
#[derive(Parser, Debug)]
#[command(name = "analyst")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Route a question and call the selected service
    Ask {
        /// Free-text research question
        query: String,

        /// Force a specific tool (sentiment, risk, strategy; any casing)
        #[arg(short, long)]
        tool: Option<String>,
    },

    /// Classify a question without calling any service
    Route {
        /// Free-text research question
        query: String,

        /// Force a specific tool (sentiment, risk, strategy; any casing)
        #[arg(short, long)]
        tool: Option<String>,
    },

    /// Fetch sentiment panel statistics
    Sentiment {
        /// Comma-separated tickers (defaults from config)
        #[arg(short = 'T', long)]
        tickers: Option<String>,

        /// Range start, YYYY-MM-DD (defaults from config)
        #[arg(long)]
        from: Option<String>,

        /// Range end, YYYY-MM-DD (defaults from config)
        #[arg(long)]
        to: Option<String>,
    },

    /// Summarize filing risks for an issuer
    Risk {
        /// Issuer symbol (defaults from config)
        #[arg(short, long)]
        issuer: Option<String>,

        /// Filing year (defaults from config)
        #[arg(short, long)]
        year: Option<i32>,

        /// Question to ask the risk service
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Strategy metrics and backtests
    Strategy {
        #[command(subcommand)]
        command: StrategyCommands,
    },

    /// Configuration inspection
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Strategy subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum StrategyCommands {
    /// Fetch metrics from the most recent run
    Metrics,

    /// Run a fresh backtest
    Backtest {
        /// Factor column (defaults from config)
        #[arg(short, long)]
        factor: Option<String>,

        /// Holding horizon in days (defaults from config)
        #[arg(long)]
        horizon: Option<u32>,

        /// Trading universe (defaults from config)
        #[arg(short, long)]
        universe: Option<String>,

        /// Transaction costs in basis points (defaults from config)
        #[arg(long)]
        costs_bps: Option<u32>,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Validate configuration and data paths
    Validate,
}
