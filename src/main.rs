use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;

use analyst::client::{
    strategy_metrics_or_backtest, AnalyticsClient, BacktestRequest, HttpAnalyticsClient, PanelStats,
    PanelStatsRequest, RiskQuery, RiskSummary, StrategyReport,
};
use analyst::config::Config;
use analyst::router::{RoutingDecision, Tool};
use cli::Cli;
use cli::commands::{Commands, ConfigCommands, StrategyCommands};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("analyst")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("analyst.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Ask { query, tool } => handle_ask_command(query, tool.as_deref(), config).await,
        Commands::Route { query, tool } => handle_route_command(query, tool.as_deref(), config),
        Commands::Sentiment { tickers, from, to } => {
            handle_sentiment_command(tickers.as_deref(), from.as_deref(), to.as_deref(), config).await
        }
        Commands::Risk { issuer, year, query } => {
            handle_risk_command(issuer.as_deref(), *year, query.as_deref(), config).await
        }
        Commands::Strategy { command } => handle_strategy_command(command, config).await,
        Commands::Config { command } => handle_config_command(command, config),
    }
}

/// Parse an override string at the boundary, warning on unrecognized values.
///
/// An unrecognized tool name falls through to scoring, matching the router's
/// contract that bad overrides are "absent", not errors.
fn parse_override(tool: Option<&str>) -> Option<Tool> {
    let raw = tool?;
    match Tool::parse(raw) {
        Some(tool) => Some(tool),
        None => {
            log::warn!("Unrecognized tool override: {}", raw);
            println!("{} {}", "Unrecognized tool, falling back to scoring:".yellow(), raw);
            None
        }
    }
}

fn announce_decision(decision: &RoutingDecision) {
    println!(
        "{} {} (confidence {:.2}). {}",
        "Routing →".cyan(),
        decision.tool.to_string().bold(),
        decision.confidence,
        decision.reason
    );
    if decision.confidence == 0.0 {
        println!(
            "{}",
            "No keywords matched; consider --tool to force a service.".yellow()
        );
    }
}

fn handle_route_command(query: &str, tool: Option<&str>, config: &Config) -> Result<()> {
    info!("Routing query: {}", query);
    let decision = config.intent_router().route(query, parse_override(tool));
    announce_decision(&decision);
    Ok(())
}

async fn handle_ask_command(query: &str, tool: Option<&str>, config: &Config) -> Result<()> {
    info!("Asking: {}", query);
    let decision = config.intent_router().route(query, parse_override(tool));
    announce_decision(&decision);

    let client = HttpAnalyticsClient::new(config.services.clone()).context("Failed to create service client")?;

    match decision.tool {
        Tool::Sentiment => {
            let request = PanelStatsRequest::from_config(&config.sentiment);
            let stats = client
                .sentiment_panel_stats(request)
                .await
                .context("Sentiment service call failed")?;
            print_panel_stats(&stats)?;
        }
        Tool::Risk => {
            // The free-text question doubles as the risk query
            let request = RiskQuery::new(config.risk.issuer.clone(), config.risk.year, query.to_string());
            let summary = client.risk_summarize(request).await.context("Risk service call failed")?;
            print_risk_summary(&summary)?;
        }
        Tool::Strategy => {
            let report = strategy_metrics_or_backtest(&client, &config.strategy)
                .await
                .context("Strategy service call failed")?;
            print_strategy_report(&report)?;
        }
    }

    Ok(())
}

async fn handle_sentiment_command(
    tickers: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    config: &Config,
) -> Result<()> {
    let mut sentiment = config.sentiment.clone();
    if let Some(tickers) = tickers {
        sentiment.tickers = tickers.to_string();
    }
    if let Some(from) = from {
        sentiment.date_from = from.to_string();
    }
    if let Some(to) = to {
        sentiment.date_to = to.to_string();
    }

    info!("Fetching panel stats for {} ({}..{})", sentiment.tickers, sentiment.date_from, sentiment.date_to);

    let client = HttpAnalyticsClient::new(config.services.clone()).context("Failed to create service client")?;
    let stats = client
        .sentiment_panel_stats(PanelStatsRequest::from_config(&sentiment))
        .await
        .context("Sentiment service call failed")?;
    print_panel_stats(&stats)
}

async fn handle_risk_command(
    issuer: Option<&str>,
    year: Option<i32>,
    query: Option<&str>,
    config: &Config,
) -> Result<()> {
    let issuer = issuer.unwrap_or(&config.risk.issuer).to_string();
    let year = year.unwrap_or(config.risk.year);
    let query = query.map(str::to_string).unwrap_or_else(RiskQuery::default_question);

    info!("Summarizing {} {} risks: {}", issuer, year, query);

    let client = HttpAnalyticsClient::new(config.services.clone()).context("Failed to create service client")?;
    let summary = client
        .risk_summarize(RiskQuery::new(issuer, year, query))
        .await
        .context("Risk service call failed")?;
    print_risk_summary(&summary)
}

async fn handle_strategy_command(command: &StrategyCommands, config: &Config) -> Result<()> {
    let client = HttpAnalyticsClient::new(config.services.clone()).context("Failed to create service client")?;

    let report = match command {
        StrategyCommands::Metrics => {
            info!("Fetching last strategy metrics");
            client.strategy_last_metrics().await.context("Strategy service call failed")?
        }
        StrategyCommands::Backtest { factor, horizon, universe, costs_bps } => {
            let mut strategy = config.strategy.clone();
            if let Some(factor) = factor {
                strategy.factor = factor.clone();
            }
            if let Some(horizon) = horizon {
                strategy.horizon = *horizon;
            }
            if let Some(universe) = universe {
                strategy.universe = universe.clone();
            }
            if let Some(costs_bps) = costs_bps {
                strategy.costs_bps = *costs_bps;
            }

            info!("Running backtest: factor={} horizon={}", strategy.factor, strategy.horizon);
            client
                .strategy_run_backtest(BacktestRequest::from_config(&strategy))
                .await
                .context("Strategy service call failed")?
        }
    };

    print_strategy_report(&report)
}

fn handle_config_command(command: &ConfigCommands, config: &Config) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let rendered = serde_yaml::to_string(config).context("Failed to render config")?;
            print!("{}", rendered);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            for msg in config.validate_paths() {
                println!("{} {}", "warning:".yellow(), msg);
            }
            println!("{}", "Config OK".green());
        }
    }
    Ok(())
}

fn print_panel_stats(stats: &PanelStats) -> Result<()> {
    println!("{}", "Sentiment".green().bold());
    println!("{}", serde_json::to_string_pretty(&stats.stats).context("Failed to render stats")?);
    println!("{} {} daily records", "Series:".cyan(), stats.series.len());
    Ok(())
}

fn print_risk_summary(summary: &RiskSummary) -> Result<()> {
    println!("{}", "Risk Summary".green().bold());
    println!("{}", summary.summary_text());
    if !summary.categories.is_empty() {
        println!("{}", "Categories".cyan());
        println!(
            "{}",
            serde_json::to_string_pretty(&summary.categories).context("Failed to render categories")?
        );
    }
    if !summary.sources.is_empty() {
        println!("{}", "Sources".cyan());
        println!(
            "{}",
            serde_json::to_string_pretty(&summary.sources).context("Failed to render sources")?
        );
    }
    Ok(())
}

fn print_strategy_report(report: &StrategyReport) -> Result<()> {
    println!("{}", "Strategy Metrics".green().bold());
    println!(
        "{}",
        serde_json::to_string_pretty(&report.metrics).context("Failed to render metrics")?
    );
    match &report.equity_curve_path {
        Some(path) => println!("{} {}", "Equity curve:".cyan(), path),
        None => println!("{}", "No equity curve image found yet.".yellow()),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
