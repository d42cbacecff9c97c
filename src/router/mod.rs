//! Intent routing for research queries.
//!
//! Maps a free-text question to one of the three analytic services
//! (sentiment, risk, strategy) by counting keyword hits per service.
//! An explicit tool override short-circuits scoring entirely.

pub mod rules;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use rules::default_rules;

/// The closed set of downstream analytic tools.
///
/// Declaration order is the canonical rule-table order and decides ties:
/// risk, then sentiment, then strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Risk,
    Sentiment,
    Strategy,
}

impl Tool {
    /// All tools in canonical order.
    pub const ALL: [Tool; 3] = [Tool::Risk, Tool::Sentiment, Tool::Strategy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Risk => "risk",
            Tool::Sentiment => "sentiment",
            Tool::Strategy => "strategy",
        }
    }

    /// Parse a caller-supplied tool name, case-insensitively.
    ///
    /// Anything outside the fixed set yields `None` ("no override"), never
    /// an error. This is the only place raw override strings are handled;
    /// the router itself takes `Option<Tool>`.
    pub fn parse(s: &str) -> Option<Tool> {
        match s.trim().to_lowercase().as_str() {
            "risk" => Some(Tool::Risk),
            "sentiment" => Some(Tool::Sentiment),
            "strategy" => Some(Tool::Strategy),
            _ => None,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the rule table: a tool and the keywords that vote for it.
///
/// Immutable after construction. Keywords are stored lower-cased so that
/// matching stays a plain substring check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRule {
    pub tool: Tool,
    pub keywords: Vec<String>,
}

impl IntentRule {
    pub fn new(tool: Tool, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tool,
            keywords: keywords.into_iter().map(|k| k.into().to_lowercase()).collect(),
        }
    }
}

/// The outcome of classifying one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Selected downstream tool.
    pub tool: Tool,
    /// Confidence in [0.0, 1.0]. Zero means no keyword matched at all.
    pub confidence: f64,
    /// Human-readable justification including the winning match count.
    pub reason: String,
}

/// Keyword-scoring intent classifier.
///
/// Holds an immutable ordered rule table, injected at construction so tests
/// and config can swap the keyword set without touching the algorithm. The
/// table order is load-bearing: the first rule achieving the maximum score
/// wins, which also resolves the all-zero case.
#[derive(Debug, Clone)]
pub struct IntentRouter {
    rules: Vec<IntentRule>,
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self { rules: default_rules() }
    }
}

impl IntentRouter {
    /// Build a router over a custom rule table.
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// The rule table, in tie-break order.
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Classify a query, optionally forced to a specific tool.
    ///
    /// Total over its inputs: empty or nonsensical text is valid and yields
    /// a decision with confidence 0.0 rather than an error. A present
    /// `override_tool` is authoritative and bypasses scoring.
    pub fn route(&self, query: &str, override_tool: Option<Tool>) -> RoutingDecision {
        if let Some(tool) = override_tool {
            return RoutingDecision {
                tool,
                confidence: 1.0,
                reason: format!("Forced tool = {tool}"),
            };
        }

        let ql = query.to_lowercase();

        // Substring containment, not tokenization: "risks" counts for "risk".
        let scores: Vec<usize> = self
            .rules
            .iter()
            .map(|rule| rule.keywords.iter().filter(|kw| ql.contains(kw.as_str())).count())
            .collect();

        // First rule in table order achieving the maximum wins, which also
        // settles the all-zero tie.
        let mut winner_idx = 0;
        let mut winning_score = 0;
        for (i, &score) in scores.iter().enumerate() {
            if score > winning_score {
                winner_idx = i;
                winning_score = score;
            }
        }

        let tool = self.rules.get(winner_idx).map(|r| r.tool).unwrap_or(Tool::Risk);

        // A decisive win among few matched tools scores high; a win shared
        // with other matching tools scores low. Clamped so that a lone tool
        // matching many keywords stays within [0, 1].
        let nonzero = scores.iter().filter(|&&s| s > 0).count();
        let confidence = if nonzero == 0 {
            0.0
        } else {
            (winning_score as f64 / nonzero as f64).min(1.0)
        };

        RoutingDecision {
            tool,
            confidence,
            reason: format!("Matched {winning_score} keywords for '{tool}'."),
        }
    }
}
