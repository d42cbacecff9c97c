//! CLI module for analyst - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for routed questions,
//! direct service calls, and config inspection.

pub mod commands;

pub use commands::Cli;
