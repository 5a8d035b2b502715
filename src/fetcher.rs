//! Authenticated metric retrieval.

use crate::api::{AnalyticsApi, ApiError, MetricEntry, Session};
use crate::auth::{AuthError, Authenticator};
use crate::prompt::CredentialPrompt;
use crate::query::QueryDescriptor;
use crate::spinner::Spinner;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    AuthError(#[from] AuthError),
    #[error("{0}")]
    ApiError(#[from] ApiError),
}

pub struct MetricFetcher<'a, A> {
    api: &'a A,
    spinner: &'a Spinner,
}

impl<'a, A: AnalyticsApi> MetricFetcher<'a, A> {
    pub fn new(api: &'a A, spinner: &'a Spinner) -> Self {
        Self { api, spinner }
    }

    /// Issue one request for `query`. A 401 comes back as
    /// [`ApiError::Unauthorized`].
    pub async fn fetch(
        &self,
        session: &Session,
        query: &QueryDescriptor,
    ) -> Result<Vec<MetricEntry>, ApiError> {
        self.spinner.start("Fetching metrics...");
        let result = self.api.fetch_metrics(session, query).await;
        self.spinner.stop();
        result
    }

    /// Fetch `query`, sending the user back through authentication whenever
    /// the service rejects the session. Any other failure is final.
    pub async fn fetch_with_reauth<P: CredentialPrompt>(
        &self,
        authenticator: &mut Authenticator<'_, A, P>,
        mut session: Session,
        query: &QueryDescriptor,
    ) -> Result<Vec<MetricEntry>, FetchError> {
        loop {
            match self.fetch(&session, query).await {
                Ok(entries) => return Ok(entries),
                Err(ApiError::Unauthorized) => {
                    debug!("Metrics request was unauthorized, re-authenticating");
                    session = authenticator.recover().await?;
                }
                Err(e) => return Err(FetchError::ApiError(e)),
            }
        }
    }
}
