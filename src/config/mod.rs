//! Configuration system for Analyst.
//!
//! Layered load:
//! 1. Explicit path (`--config`)
//! 2. .analyst.yml in current directory (project config)
//! 3. ~/.config/analyst/analyst.yml (user config)
//! 4. Default values
//!
//! Environment variables override whatever the file layer produced, using
//! the same names the original dotenv deployment used (SENTIMENT_BASE_URL,
//! DEFAULT_TICKERS, RISK_DEFAULT_YEAR, ...).

use chrono::NaiveDate;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::router::{IntentRouter, IntentRule, Tool, rules};

/// Top-level configuration for Analyst.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Downstream service endpoints and timeouts.
    pub services: ServicesConfig,

    /// Sentiment query defaults.
    pub sentiment: SentimentConfig,

    /// Risk query defaults.
    pub risk: RiskConfig,

    /// Strategy backtest defaults.
    pub strategy: StrategyConfig,

    /// Intent router keyword overrides.
    pub router: RouterConfig,
}

impl Config {
    /// Load configuration with fallback chain, then apply env overrides.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .analyst.yml in current directory
    /// 3. ~/.config/analyst/analyst.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_files(config_path)?;
        config.apply_env_overrides();
        config.expand_paths();
        Ok(config)
    }

    fn load_files(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project config
        let project_config = PathBuf::from(".analyst.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .analyst.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .analyst.yml: {}", e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("analyst").join("analyst.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Apply environment-variable overrides on top of the file layer.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SENTIMENT_BASE_URL") {
            self.services.sentiment_base_url = v;
        }
        if let Ok(v) = env::var("RISK_BASE_URL") {
            self.services.risk_base_url = v;
        }
        if let Ok(v) = env::var("STRATEGY_BASE_URL") {
            self.services.strategy_base_url = v;
        }

        if let Ok(v) = env::var("SENTIMENT_PANEL_PATH") {
            self.sentiment.panel_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("DEFAULT_TICKERS") {
            self.sentiment.tickers = v;
        }
        if let Ok(v) = env::var("DEFAULT_DATE_FROM") {
            self.sentiment.date_from = v;
        }
        if let Ok(v) = env::var("DEFAULT_DATE_TO") {
            self.sentiment.date_to = v;
        }

        if let Ok(v) = env::var("RISK_DATA_DIR") {
            self.risk.data_dir = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("RISK_DEFAULT_ISSUER") {
            self.risk.issuer = v;
        }
        if let Ok(v) = env::var("RISK_DEFAULT_YEAR") {
            match v.parse() {
                Ok(year) => self.risk.year = year,
                Err(_) => log::warn!("Ignoring non-numeric RISK_DEFAULT_YEAR: {}", v),
            }
        }

        if let Ok(v) = env::var("STRAT_REPORT_DIR") {
            self.strategy.report_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("STRAT_SENTIMENT_PANEL_PATH") {
            self.strategy.panel_path = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("STRAT_DEFAULT_FACTOR") {
            self.strategy.factor = v;
        }
        if let Ok(v) = env::var("STRAT_DEFAULT_HORIZON") {
            match v.parse() {
                Ok(horizon) => self.strategy.horizon = horizon,
                Err(_) => log::warn!("Ignoring non-numeric STRAT_DEFAULT_HORIZON: {}", v),
            }
        }
    }

    /// Expand `~` and absolutize the configured data paths.
    fn expand_paths(&mut self) {
        self.sentiment.panel_path = absolutize(&self.sentiment.panel_path);
        self.strategy.report_dir = absolutize(&self.strategy.report_dir);
        if let Some(dir) = &self.risk.data_dir {
            self.risk.data_dir = Some(absolutize(dir));
        }
        if let Some(path) = &self.strategy.panel_path {
            self.strategy.panel_path = Some(absolutize(path));
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.services.validate()?;
        self.router.validate()?;

        let from = parse_date(&self.sentiment.date_from)?;
        let to = parse_date(&self.sentiment.date_to)?;
        if from > to {
            eyre::bail!(
                "sentiment date range is inverted: {} > {}",
                self.sentiment.date_from,
                self.sentiment.date_to
            );
        }
        if self.strategy.horizon == 0 {
            eyre::bail!("strategy.horizon must be > 0");
        }
        Ok(())
    }

    /// Warn-level messages for missing data paths.
    ///
    /// These are hints, not errors: the downstream services own the data,
    /// so a missing local path only matters for locally-served setups.
    pub fn validate_paths(&self) -> Vec<String> {
        let mut msgs = Vec::new();
        if !self.sentiment.panel_path.exists() {
            msgs.push(format!(
                "sentiment panel not found: {}",
                self.sentiment.panel_path.display()
            ));
        }
        if !self.strategy.report_dir.exists() {
            msgs.push(format!(
                "strategy report dir missing: {} (created by strategy runs)",
                self.strategy.report_dir.display()
            ));
        }
        if let Some(dir) = &self.risk.data_dir {
            if !dir.exists() {
                msgs.push(format!("risk data dir not found: {}", dir.display()));
            }
        }
        msgs
    }

    /// Build the intent router from the configured keyword table.
    pub fn intent_router(&self) -> IntentRouter {
        IntentRouter::new(self.router.rules())
    }
}

/// Downstream service endpoints and per-call timeouts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Sentiment service base URL.
    #[serde(rename = "sentiment-base-url")]
    pub sentiment_base_url: String,

    /// Risk service base URL.
    #[serde(rename = "risk-base-url")]
    pub risk_base_url: String,

    /// Strategy service base URL.
    #[serde(rename = "strategy-base-url")]
    pub strategy_base_url: String,

    /// Timeout for panel_stats calls in milliseconds.
    #[serde(rename = "sentiment-timeout-ms")]
    pub sentiment_timeout_ms: u64,

    /// Timeout for summarize_risk calls in milliseconds.
    #[serde(rename = "risk-timeout-ms")]
    pub risk_timeout_ms: u64,

    /// Timeout for last_metrics calls in milliseconds.
    #[serde(rename = "metrics-timeout-ms")]
    pub metrics_timeout_ms: u64,

    /// Timeout for run_backtest calls in milliseconds.
    #[serde(rename = "backtest-timeout-ms")]
    pub backtest_timeout_ms: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            sentiment_base_url: "http://localhost:8601".to_string(),
            risk_base_url: "http://localhost:8602".to_string(),
            strategy_base_url: "http://localhost:8603".to_string(),
            sentiment_timeout_ms: 60_000,
            risk_timeout_ms: 120_000,
            metrics_timeout_ms: 30_000,
            backtest_timeout_ms: 180_000, // backtests are slow
        }
    }
}

impl ServicesConfig {
    fn validate(&self) -> Result<()> {
        if self.sentiment_timeout_ms == 0
            || self.risk_timeout_ms == 0
            || self.metrics_timeout_ms == 0
            || self.backtest_timeout_ms == 0
        {
            eyre::bail!("service timeouts must be > 0");
        }
        Ok(())
    }
}

/// Sentiment query defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Local sentiment panel path (only relevant for locally-served data).
    #[serde(rename = "panel-path")]
    pub panel_path: PathBuf,

    /// Comma-separated default tickers.
    pub tickers: String,

    /// Default range start (YYYY-MM-DD).
    #[serde(rename = "date-from")]
    pub date_from: String,

    /// Default range end (YYYY-MM-DD).
    #[serde(rename = "date-to")]
    pub date_to: String,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            panel_path: PathBuf::from("samples/sentiment_panel.sample.parquet"),
            tickers: "AAPL,MSFT,NVDA".to_string(),
            date_from: "2024-01-01".to_string(),
            date_to: "2024-12-31".to_string(),
        }
    }
}

impl SentimentConfig {
    /// Split the comma-separated ticker list, dropping empty entries.
    pub fn ticker_list(&self) -> Vec<String> {
        self.tickers
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Risk query defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Optional local filings directory for the risk service.
    #[serde(rename = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Default issuer.
    pub issuer: String,

    /// Default filing year.
    pub year: i32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            issuer: "AAPL".to_string(),
            year: 2023,
        }
    }
}

/// Strategy backtest defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Directory where the strategy service writes reports.
    #[serde(rename = "report-dir")]
    pub report_dir: PathBuf,

    /// Panel path for backtests; falls back to the sentiment panel.
    #[serde(rename = "panel-path")]
    pub panel_path: Option<PathBuf>,

    /// Default factor column.
    pub factor: String,

    /// Default holding horizon in days.
    pub horizon: u32,

    /// Default trading universe.
    pub universe: String,

    /// Default transaction costs in basis points.
    #[serde(rename = "costs-bps")]
    pub costs_bps: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from("samples/strategy_reports"),
            panel_path: None,
            factor: "SENT_L1".to_string(),
            horizon: 1,
            universe: "SP500".to_string(),
            costs_bps: 10,
        }
    }
}

/// Intent router keyword overrides.
///
/// Each tool keeps its built-in keyword list unless overridden here. An
/// override must be non-empty; table order stays risk, sentiment, strategy
/// regardless of how the file orders its keys.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Keywords that route to the risk service.
    pub risk: Option<Vec<String>>,

    /// Keywords that route to the sentiment service.
    pub sentiment: Option<Vec<String>>,

    /// Keywords that route to the strategy service.
    pub strategy: Option<Vec<String>>,
}

impl RouterConfig {
    /// Materialize the rule table, filling gaps from the built-in defaults.
    pub fn rules(&self) -> Vec<IntentRule> {
        let keywords = |tool: Tool| -> Vec<String> {
            let overridden = match tool {
                Tool::Risk => &self.risk,
                Tool::Sentiment => &self.sentiment,
                Tool::Strategy => &self.strategy,
            };
            match overridden {
                Some(kws) => kws.clone(),
                None => match tool {
                    Tool::Risk => rules::RISK_KEYWORDS.iter().map(|k| k.to_string()).collect(),
                    Tool::Sentiment => rules::SENTIMENT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
                    Tool::Strategy => rules::STRATEGY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
                },
            }
        };

        Tool::ALL.iter().map(|&tool| IntentRule::new(tool, keywords(tool))).collect()
    }

    fn validate(&self) -> Result<()> {
        for (name, kws) in [
            ("risk", &self.risk),
            ("sentiment", &self.sentiment),
            ("strategy", &self.strategy),
        ] {
            if let Some(kws) = kws {
                if kws.is_empty() {
                    eyre::bail!("router.{} keyword list must not be empty", name);
                }
                if kws.iter().any(|k| k.trim().is_empty()) {
                    eyre::bail!("router.{} contains a blank keyword", name);
                }
            }
        }
        Ok(())
    }
}

/// Expand a leading `~` and absolutize against the current directory.
fn absolutize(path: &Path) -> PathBuf {
    let expanded = if let Ok(stripped) = path.strip_prefix("~") {
        match dirs::home_dir() {
            Some(home) => home.join(stripped),
            None => path.to_path_buf(),
        }
    } else {
        path.to_path_buf()
    };

    std::path::absolute(&expanded).unwrap_or(expanded)
}

/// Parse a YYYY-MM-DD date string.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid date (expected YYYY-MM-DD): {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.services.sentiment_base_url, "http://localhost:8601");
        assert_eq!(config.sentiment.tickers, "AAPL,MSFT,NVDA");
        assert_eq!(config.sentiment.date_from, "2024-01-01");
        assert_eq!(config.risk.issuer, "AAPL");
        assert_eq!(config.risk.year, 2023);
        assert_eq!(config.strategy.factor, "SENT_L1");
        assert_eq!(config.strategy.horizon, 1);
        assert_eq!(config.services.backtest_timeout_ms, 180_000);
    }

    #[test]
    fn test_defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_ticker_list_splits_and_trims() {
        let mut config = SentimentConfig::default();
        config.tickers = " AAPL, MSFT ,,NVDA ".to_string();
        assert_eq!(config.ticker_list(), vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
services:
  risk-base-url: http://risk.internal:9000
risk:
  issuer: MSFT
  year: 2022
router:
  sentiment: [vibes, chatter]
"#
        )
        .unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.services.risk_base_url, "http://risk.internal:9000");
        // Untouched sections keep defaults
        assert_eq!(config.services.sentiment_base_url, "http://localhost:8601");
        assert_eq!(config.risk.issuer, "MSFT");
        assert_eq!(config.risk.year, 2022);

        let rules = config.router.rules();
        assert_eq!(rules[1].keywords, vec!["vibes", "chatter"]);
        // Non-overridden tools keep the built-in table
        assert_eq!(rules[0].keywords.len(), rules::RISK_KEYWORDS.len());
    }

    #[test]
    fn test_load_explicit_file_missing_fails() {
        let missing = PathBuf::from("/nonexistent/analyst.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_malformed_yaml_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "services: [not, a, mapping").unwrap();
        assert!(Config::load(Some(&file.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_router_config_rules_order() {
        let config = RouterConfig {
            strategy: Some(vec!["momentum".to_string()]),
            ..Default::default()
        };
        let rules = config.rules();
        assert_eq!(rules[0].tool, Tool::Risk);
        assert_eq!(rules[1].tool, Tool::Sentiment);
        assert_eq!(rules[2].tool, Tool::Strategy);
        assert_eq!(rules[2].keywords, vec!["momentum"]);
    }

    #[test]
    fn test_empty_keyword_override_rejected() {
        let config = Config {
            router: RouterConfig {
                risk: Some(vec![]),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_keyword_rejected() {
        let config = Config {
            router: RouterConfig {
                sentiment: Some(vec!["news".to_string(), "  ".to_string()]),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_date_range_rejected() {
        let mut config = Config::default();
        config.sentiment.date_from = "2024-12-31".to_string();
        config.sentiment.date_to = "2024-01-01".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut config = Config::default();
        config.sentiment.date_to = "yesterday".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.services.metrics_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_paths_reports_missing() {
        let mut config = Config::default();
        config.sentiment.panel_path = PathBuf::from("/nonexistent/panel.parquet");
        config.strategy.report_dir = PathBuf::from("/nonexistent/reports");
        let msgs = config.validate_paths();
        assert!(msgs.iter().any(|m| m.contains("panel not found")));
        assert!(msgs.iter().any(|m| m.contains("report dir missing")));
    }

    #[test]
    fn test_absolutize_tilde() {
        if let Some(home) = dirs::home_dir() {
            let p = absolutize(Path::new("~/data/panel.parquet"));
            assert!(p.starts_with(home));
        }
    }

    #[test]
    fn test_absolutize_relative() {
        let p = absolutize(Path::new("samples/panel.parquet"));
        assert!(p.is_absolute());
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-01-31").is_ok());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn test_intent_router_from_config() {
        let config = Config {
            router: RouterConfig {
                sentiment: Some(vec!["buzz".to_string()]),
                ..Default::default()
            },
            ..Default::default()
        };
        let router = config.intent_router();
        let decision = router.route("what is the buzz on nvda", None);
        assert_eq!(decision.tool, Tool::Sentiment);
    }

    #[test]
    fn test_env_overrides() {
        // SAFETY: tests in this module touching the environment restore it
        // before returning; no other test in this crate reads these vars
        unsafe {
            std::env::set_var("DEFAULT_TICKERS", "TSLA,AMD");
            std::env::set_var("STRAT_DEFAULT_FACTOR", "MOM_5");
            std::env::set_var("STRAT_DEFAULT_HORIZON", "not-a-number");
        }

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.sentiment.tickers, "TSLA,AMD");
        assert_eq!(config.strategy.factor, "MOM_5");
        // Unparseable numeric override is ignored
        assert_eq!(config.strategy.horizon, 1);

        // SAFETY: restoring the environment to its original state
        unsafe {
            std::env::remove_var("DEFAULT_TICKERS");
            std::env::remove_var("STRAT_DEFAULT_FACTOR");
            std::env::remove_var("STRAT_DEFAULT_HORIZON");
        }
    }
}
