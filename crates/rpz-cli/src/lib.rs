//! # rpz-cli
//!
//! Command-line front end for the rpzgen pipeline.
//!
//! ## Features
//!
//! - **Sources**: any number of (URL, format) pairs, fetched concurrently
//! - **Outputs**: any number of (destination, policy) zone files per run
//! - **Config file**: optional TOML defaults for name server, email, timeout
//! - **Change detection**: destinations are only replaced when content changed

pub mod cli;
pub mod config;

pub use cli::run;
