//! The remote analytics API as seen by the rest of the crate.
//!
//! [`AnalyticsApi`] is the seam between the authentication/fetch flow and the
//! HTTP client in [`crate::chartmogul`], so the flow can run against an
//! in-memory implementation in tests.

use crate::credentials::Credential;
use crate::query::{Metric, QueryDescriptor, QueryError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error emitted by the analytics API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The service rejected the token/key pair (HTTP 401)
    #[error("Authentication failed! Bad API token or key?")]
    Unauthorized,
    #[error("HTTP {status}: {body}")]
    Remote { status: StatusCode, body: String },
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("{0}")]
    QueryError(#[from] QueryError),
}

/// A validated credential pair authorizing API requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    credential: Credential,
}

impl Session {
    pub(crate) fn new(credential: Credential) -> Self {
        Self { credential }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

/// One data point returned by the metrics endpoints.
///
/// Entries are passed through untouched; only the date marker and the value
/// of the requested metric are ever read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricEntry(Map<String, Value>);

impl MetricEntry {
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn date(&self) -> Option<&str> {
        self.0.get("date").and_then(Value::as_str)
    }

    /// The scalar stored under the metric's name, if it is numeric
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.0.get(metric.as_ref()).and_then(Value::as_f64)
    }
}

impl From<Map<String, Value>> for MetricEntry {
    fn from(fields: Map<String, Value>) -> Self {
        MetricEntry(fields)
    }
}

/// Body of a metrics response
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsResponse {
    pub entries: Vec<MetricEntry>,
}

#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// Check a credential against the service's authenticated ping endpoint.
    async fn ping(&self, credential: &Credential) -> Result<(), ApiError>;

    /// Fetch the entries for a query, in the order the service returns them.
    async fn fetch_metrics(
        &self,
        session: &Session,
        query: &QueryDescriptor,
    ) -> Result<Vec<MetricEntry>, ApiError>;
}
