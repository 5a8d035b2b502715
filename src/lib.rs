//! The ChartMogul CLI client library.
//!
//! This crate fetches key business metrics from the ChartMogul metrics API
//! and prints them as JSON, CSV or a terminal line chart.
//!
//! # Modules
//!
//! - `actions`: The metric action run for a parsed command line
//! - `api`: The analytics API seam and its data types
//! - `auth`: Credential validation with bounded re-entry
//! - `chartmogul`: HTTP implementation of the analytics API
//! - `commands`: CLI command definition and argument parsing
//! - `configuration`: Configuration management
//! - `credentials`: Persistence of the API token and secret key
//! - `fetcher`: Authenticated metric retrieval
//! - `format`: JSON and CSV formatting of entries
//! - `presenter`: Text and chart rendering
//! - `query`: Metric query construction and validation

pub mod actions;
pub mod api;
pub mod auth;
pub mod chartmogul;
pub mod commands;
pub mod configuration;
pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod http_utils;
pub mod presenter;
pub mod prompt;
pub mod query;
pub mod spinner;

#[cfg(test)]
mod testing;
