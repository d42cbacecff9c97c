//! Request and response types for the analytic services.
//!
//! The services are opaque: only the fields this front-end actually reads
//! are typed, the rest rides along as raw JSON. Responses tolerate missing
//! fields since the service versions drift independently of this crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{SentimentConfig, StrategyConfig};

/// Body for POST /panel_stats on the sentiment service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelStatsRequest {
    pub tickers: Vec<String>,
    pub date_from: String,
    pub date_to: String,
}

impl PanelStatsRequest {
    pub fn new(tickers: Vec<String>, date_from: impl Into<String>, date_to: impl Into<String>) -> Self {
        Self {
            tickers,
            date_from: date_from.into(),
            date_to: date_to.into(),
        }
    }

    /// Request with the configured default tickers and date range.
    pub fn from_config(sentiment: &SentimentConfig) -> Self {
        Self::new(sentiment.ticker_list(), sentiment.date_from.clone(), sentiment.date_to.clone())
    }
}

/// Panel statistics plus the per-day sentiment series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelStats {
    /// Aggregate statistics, keyed by the service.
    pub stats: Value,

    /// Daily records (ticker, date, avg_sentiment, ...).
    pub series: Vec<Value>,
}

/// Body for POST /summarize_risk on the risk service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskQuery {
    pub issuer: String,
    pub year: i32,
    pub query: String,
}

impl RiskQuery {
    pub fn new(issuer: impl Into<String>, year: i32, query: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            year,
            query: query.into(),
        }
    }

    /// The service's catch-all question when the caller has none.
    pub fn default_question() -> String {
        "top risks".to_string()
    }
}

/// Risk summary with categorized findings and source excerpts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSummary {
    pub summary: Option<String>,
    pub categories: Vec<Value>,
    pub sources: Vec<Value>,
}

impl RiskSummary {
    /// Summary text, or the placeholder the dashboard used to show.
    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or("(no summary)")
    }
}

/// Body for POST /run_backtest on the strategy service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub factor: String,
    pub horizon: u32,
    pub universe: String,
    pub costs_bps: u32,
}

impl BacktestRequest {
    /// Request with the configured backtest defaults.
    pub fn from_config(strategy: &StrategyConfig) -> Self {
        Self {
            factor: strategy.factor.clone(),
            horizon: strategy.horizon,
            universe: strategy.universe.clone(),
            costs_bps: strategy.costs_bps,
        }
    }
}

/// Strategy run output: metrics plus an optional equity-curve image path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyReport {
    pub metrics: Value,

    pub equity_curve_path: Option<String>,
}

impl StrategyReport {
    /// Whether the report is too stale or empty to present.
    ///
    /// A run without metrics, or whose IC came back null, means the service
    /// has nothing cached and a fresh backtest is needed.
    pub fn needs_backtest(&self) -> bool {
        match &self.metrics {
            Value::Object(m) if !m.is_empty() => m.get("IC").is_none_or(|ic| ic.is_null()),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_panel_stats_request_from_config() {
        let request = PanelStatsRequest::from_config(&SentimentConfig::default());
        assert_eq!(request.tickers, vec!["AAPL", "MSFT", "NVDA"]);
        assert_eq!(request.date_from, "2024-01-01");
        assert_eq!(request.date_to, "2024-12-31");
    }

    #[test]
    fn test_panel_stats_request_serializes_expected_body() {
        let request = PanelStatsRequest::new(vec!["AAPL".to_string()], "2023-01-01", "2023-12-31");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"tickers": ["AAPL"], "date_from": "2023-01-01", "date_to": "2023-12-31"})
        );
    }

    #[test]
    fn test_panel_stats_tolerates_missing_fields() {
        let stats: PanelStats = serde_json::from_value(json!({"stats": {"n": 3}})).unwrap();
        assert_eq!(stats.stats["n"], json!(3));
        assert!(stats.series.is_empty());
    }

    #[test]
    fn test_risk_query_body() {
        let request = RiskQuery::new("AAPL", 2023, RiskQuery::default_question());
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({"issuer": "AAPL", "year": 2023, "query": "top risks"}));
    }

    #[test]
    fn test_risk_summary_placeholder() {
        let summary = RiskSummary::default();
        assert_eq!(summary.summary_text(), "(no summary)");

        let summary: RiskSummary = serde_json::from_value(json!({"summary": "liquidity tight"})).unwrap();
        assert_eq!(summary.summary_text(), "liquidity tight");
    }

    #[test]
    fn test_backtest_request_from_config() {
        let request = BacktestRequest::from_config(&StrategyConfig::default());
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"factor": "SENT_L1", "horizon": 1, "universe": "SP500", "costs_bps": 10})
        );
    }

    #[test]
    fn test_needs_backtest_on_empty_or_null_ic() {
        assert!(StrategyReport::default().needs_backtest());

        let report: StrategyReport = serde_json::from_value(json!({"metrics": {}})).unwrap();
        assert!(report.needs_backtest());

        let report: StrategyReport = serde_json::from_value(json!({"metrics": {"IC": null}})).unwrap();
        assert!(report.needs_backtest());

        let report: StrategyReport = serde_json::from_value(json!({"metrics": {"IC": 0.03}})).unwrap();
        assert!(!report.needs_backtest());
    }

    #[test]
    fn test_strategy_report_curve_path() {
        let report: StrategyReport =
            serde_json::from_value(json!({"metrics": {"IC": 0.03}, "equity_curve_path": "reports/eq.png"}))
                .unwrap();
        assert_eq!(report.equity_curve_path.as_deref(), Some("reports/eq.png"));
    }
}
