//! Downstream analytic service clients
//!
//! This module provides:
//! - Request/response types for the three services
//! - AnalyticsClient trait for service abstraction
//! - HttpAnalyticsClient implementation over reqwest
//! - MockAnalyticsClient for tests

pub mod http;
pub mod mock;
pub mod types;

use async_trait::async_trait;

use crate::config::StrategyConfig;
use crate::error::Result;

pub use http::HttpAnalyticsClient;
pub use mock::MockAnalyticsClient;
pub use types::{BacktestRequest, PanelStats, PanelStatsRequest, RiskQuery, RiskSummary, StrategyReport};

/// The three analytic services behind one seam.
///
/// Each method maps to one downstream endpoint; request construction and
/// response decoding live with the implementation. The router never touches
/// this trait; callers dispatch on its decision.
#[async_trait]
pub trait AnalyticsClient: Send + Sync {
    /// Sentiment panel statistics for tickers over a date range.
    async fn sentiment_panel_stats(&self, request: PanelStatsRequest) -> Result<PanelStats>;

    /// Risk summary for an issuer's filing year.
    async fn risk_summarize(&self, request: RiskQuery) -> Result<RiskSummary>;

    /// Metrics from the most recent strategy run.
    async fn strategy_last_metrics(&self) -> Result<StrategyReport>;

    /// Run a fresh backtest.
    async fn strategy_run_backtest(&self, request: BacktestRequest) -> Result<StrategyReport>;
}

/// Fetch the last strategy metrics, running a backtest when they are stale.
///
/// Mirrors the routed strategy flow: reuse the previous run's report unless
/// metrics are missing or IC is null, in which case a backtest with the
/// configured defaults produces a fresh one.
pub async fn strategy_metrics_or_backtest(
    client: &dyn AnalyticsClient,
    strategy: &StrategyConfig,
) -> Result<StrategyReport> {
    let report = client.strategy_last_metrics().await?;
    if !report.needs_backtest() {
        return Ok(report);
    }

    log::info!("No usable last metrics, running backtest with factor {}", strategy.factor);
    client.strategy_run_backtest(BacktestRequest::from_config(strategy)).await
}
