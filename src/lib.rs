//! Analyst - a research copilot front-end
//!
//! Analyst routes free-text research questions to one of three analytic
//! services (sentiment, risk, strategy) via a keyword-scoring intent router,
//! forwards configured parameters, and prints the JSON responses.

pub mod client;
pub mod config;
pub mod error;
pub mod router;

pub use error::{AnalystError, Result};
