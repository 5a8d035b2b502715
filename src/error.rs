use thiserror::Error;

use crate::{
    api::ApiError, auth::AuthError, configuration::ConfigurationError,
    credentials::CredentialStoreError, fetcher::FetchError, format::FormattingError,
    query::QueryError,
};

/// Exit code for every fatal error
pub const EXIT_FAILURE: i32 = 1;

/// Error types that can occur during CLI command execution
#[derive(Debug, Error)]
pub enum CliError {
    /// The metric, dates or interval given on the command line are invalid
    #[error("{0}")]
    QueryError(#[from] QueryError),
    /// Error related to configuration loading or management
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    #[error("{0}")]
    CredentialStoreError(#[from] CredentialStoreError),
    #[error("{0}")]
    AuthError(#[from] AuthError),
    #[error("{0}")]
    FetchError(#[from] FetchError),
    #[error("{0}")]
    ApiError(#[from] ApiError),
    /// Error related to data formatting
    #[error("Formatting error: {0}")]
    FormattingError(#[from] FormattingError),
}

impl CliError {
    /// Errors caused by the command line itself, best answered with the usage help
    pub fn is_usage_error(&self) -> bool {
        matches!(self, CliError::QueryError(e) if !matches!(e, QueryError::EncodingError(_)))
    }

    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }
}
