//! ChartMogul metrics API client.

use crate::api::{AnalyticsApi, ApiError, MetricEntry, MetricsResponse, Session};
use crate::configuration::Configuration;
use crate::credentials::Credential;
use crate::http_utils::{HttpClient, HttpRequestConfig};
use crate::query::QueryDescriptor;
use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

pub const PING_PATH: &str = "/ping";

pub struct ChartMogulClient {
    http: HttpClient,
}

impl ChartMogulClient {
    pub fn new(configuration: &Configuration) -> Result<Self, ApiError> {
        let http = HttpClient::new(HttpRequestConfig::from_configuration(configuration))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl AnalyticsApi for ChartMogulClient {
    async fn ping(&self, credential: &Credential) -> Result<(), ApiError> {
        trace!("Pinging {}...", self.http.url(PING_PATH, None));
        let _: Value = self.http.get(PING_PATH, None, credential).await?;
        Ok(())
    }

    async fn fetch_metrics(
        &self,
        session: &Session,
        query: &QueryDescriptor,
    ) -> Result<Vec<MetricEntry>, ApiError> {
        let query_string = query.to_query_string()?;
        let response: MetricsResponse = self
            .http
            .get(&query.path(), Some(&query_string), session.credential())
            .await?;
        trace!("Received {} entries", response.entries.len());
        Ok(response.entries)
    }
}
