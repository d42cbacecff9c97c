//! Canonical keyword table for intent routing.
//!
//! Declared in tie-break order: risk, sentiment, strategy. Config may swap
//! in custom keyword lists per tool; this table is the built-in default.

use super::{IntentRule, Tool};

/// Keywords that vote for the risk summarizer.
pub const RISK_KEYWORDS: [&str; 8] = [
    "risk",
    "10-k",
    "item 1a",
    "regulatory",
    "liquidity",
    "cybersecurity",
    "credit",
    "counterparty",
];

/// Keywords that vote for the sentiment panel.
pub const SENTIMENT_KEYWORDS: [&str; 6] = ["sentiment", "headline", "news", "tone", "positive", "negative"];

/// Keywords that vote for the strategy backtester.
pub const STRATEGY_KEYWORDS: [&str; 7] = [
    "sharpe",
    "backtest",
    "ic",
    "returns",
    "equity curve",
    "performance",
    "alpha",
];

/// The default rule table, in canonical order.
pub fn default_rules() -> Vec<IntentRule> {
    vec![
        IntentRule::new(Tool::Risk, RISK_KEYWORDS),
        IntentRule::new(Tool::Sentiment, SENTIMENT_KEYWORDS),
        IntentRule::new(Tool::Strategy, STRATEGY_KEYWORDS),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_order() {
        let rules = default_rules();
        let tools: Vec<Tool> = rules.iter().map(|r| r.tool).collect();
        assert_eq!(tools, vec![Tool::Risk, Tool::Sentiment, Tool::Strategy]);
    }

    #[test]
    fn test_default_rules_nonempty_keywords() {
        for rule in default_rules() {
            assert!(!rule.keywords.is_empty(), "{} has no keywords", rule.tool);
        }
    }

    #[test]
    fn test_multiword_keywords_present() {
        let rules = default_rules();
        assert!(rules[0].keywords.iter().any(|k| k == "item 1a"));
        assert!(rules[2].keywords.iter().any(|k| k == "equity curve"));
    }
}
