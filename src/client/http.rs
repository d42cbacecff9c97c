//! HTTP implementation of the analytics client
//!
//! One reqwest client shared across the three services; each endpoint gets
//! its own timeout since backtests run far longer than metric reads.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::client::types::{BacktestRequest, PanelStats, PanelStatsRequest, RiskQuery, RiskSummary, StrategyReport};
use crate::client::AnalyticsClient;
use crate::config::ServicesConfig;
use crate::error::{AnalystError, Result};

/// Analytics client over HTTP.
pub struct HttpAnalyticsClient {
    client: Client,
    services: ServicesConfig,
}

impl HttpAnalyticsClient {
    /// Create a client for the configured service endpoints.
    pub fn new(services: ServicesConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| AnalystError::Service(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, services })
    }

    /// The configured endpoints.
    pub fn services(&self) -> &ServicesConfig {
        &self.services
    }

    async fn post_json<B: Serialize>(&self, service: &str, url: String, body: &B, timeout_ms: u64) -> Result<Value> {
        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_millis(timeout_ms))
            .json(body)
            .send()
            .await
            .map_err(|e| AnalystError::Service(format!("{}: request failed: {}", service, e)))?;

        Self::decode(service, response).await
    }

    async fn get_json(&self, service: &str, url: String, timeout_ms: u64) -> Result<Value> {
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(|e| AnalystError::Service(format!("{}: request failed: {}", service, e)))?;

        Self::decode(service, response).await
    }

    async fn decode(service: &str, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AnalystError::Service(format!("{}: {}: {}", service, status, error_body)));
        }

        response
            .json()
            .await
            .map_err(|e| AnalystError::Service(format!("{}: failed to parse response: {}", service, e)))
    }
}

#[async_trait]
impl AnalyticsClient for HttpAnalyticsClient {
    async fn sentiment_panel_stats(&self, request: PanelStatsRequest) -> Result<PanelStats> {
        let url = format!("{}/panel_stats", self.services.sentiment_base_url);
        let body = self
            .post_json("sentiment", url, &request, self.services.sentiment_timeout_ms)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn risk_summarize(&self, request: RiskQuery) -> Result<RiskSummary> {
        let url = format!("{}/summarize_risk", self.services.risk_base_url);
        let body = self.post_json("risk", url, &request, self.services.risk_timeout_ms).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn strategy_last_metrics(&self) -> Result<StrategyReport> {
        let url = format!("{}/last_metrics", self.services.strategy_base_url);
        let body = self.get_json("strategy", url, self.services.metrics_timeout_ms).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn strategy_run_backtest(&self, request: BacktestRequest) -> Result<StrategyReport> {
        let url = format!("{}/run_backtest", self.services.strategy_base_url);
        let body = self
            .post_json("strategy", url, &request, self.services.backtest_timeout_ms)
            .await?;
        Ok(serde_json::from_value(body)?)
    }
}

impl std::fmt::Debug for HttpAnalyticsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAnalyticsClient")
            .field("sentiment", &self.services.sentiment_base_url)
            .field("risk", &self.services.risk_base_url)
            .field("strategy", &self.services.strategy_base_url)
            .finish()
    }
}
