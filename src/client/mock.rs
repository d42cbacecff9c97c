//! Mock analytics client for tests.
//!
//! Canned JSON per endpoint plus call counters, so tests can assert both
//! the decoded payloads and the dispatch path taken.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::types::{BacktestRequest, PanelStats, PanelStatsRequest, RiskQuery, RiskSummary, StrategyReport};
use crate::client::AnalyticsClient;
use crate::error::Result;

/// In-process stand-in for the three services.
#[derive(Debug)]
pub struct MockAnalyticsClient {
    panel_stats: Value,
    risk_summary: Value,
    last_metrics: Value,
    backtest: Value,
    calls: Mutex<Calls>,
}

#[derive(Debug, Default, Clone)]
struct Calls {
    sentiment: usize,
    risk: usize,
    metrics: usize,
    backtest: usize,
}

impl Default for MockAnalyticsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnalyticsClient {
    pub fn new() -> Self {
        Self {
            panel_stats: json!({"stats": {}, "series": []}),
            risk_summary: json!({"summary": null, "categories": [], "sources": []}),
            last_metrics: json!({"metrics": {"IC": 0.0}}),
            backtest: json!({"metrics": {"IC": 0.0}}),
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn with_panel_stats(mut self, body: Value) -> Self {
        self.panel_stats = body;
        self
    }

    pub fn with_risk_summary(mut self, body: Value) -> Self {
        self.risk_summary = body;
        self
    }

    pub fn with_last_metrics(mut self, body: Value) -> Self {
        self.last_metrics = body;
        self
    }

    pub fn with_backtest(mut self, body: Value) -> Self {
        self.backtest = body;
        self
    }

    pub fn sentiment_calls(&self) -> usize {
        self.calls.lock().unwrap().sentiment
    }

    pub fn risk_calls(&self) -> usize {
        self.calls.lock().unwrap().risk
    }

    pub fn metrics_calls(&self) -> usize {
        self.calls.lock().unwrap().metrics
    }

    pub fn backtest_calls(&self) -> usize {
        self.calls.lock().unwrap().backtest
    }
}

#[async_trait]
impl AnalyticsClient for MockAnalyticsClient {
    async fn sentiment_panel_stats(&self, _request: PanelStatsRequest) -> Result<PanelStats> {
        self.calls.lock().unwrap().sentiment += 1;
        Ok(serde_json::from_value(self.panel_stats.clone())?)
    }

    async fn risk_summarize(&self, _request: RiskQuery) -> Result<RiskSummary> {
        self.calls.lock().unwrap().risk += 1;
        Ok(serde_json::from_value(self.risk_summary.clone())?)
    }

    async fn strategy_last_metrics(&self) -> Result<StrategyReport> {
        self.calls.lock().unwrap().metrics += 1;
        Ok(serde_json::from_value(self.last_metrics.clone())?)
    }

    async fn strategy_run_backtest(&self, _request: BacktestRequest) -> Result<StrategyReport> {
        self.calls.lock().unwrap().backtest += 1;
        Ok(serde_json::from_value(self.backtest.clone())?)
    }
}
