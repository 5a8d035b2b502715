//! Actions executed for a parsed command line.

pub mod metrics;
