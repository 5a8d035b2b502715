//! In-memory doubles for the API and prompt seams, shared by unit tests.

use crate::api::{AnalyticsApi, ApiError, MetricEntry, Session};
use crate::credentials::Credential;
use crate::prompt::{CredentialPrompt, PromptError};
use crate::query::QueryDescriptor;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// API double accepting a fixed set of tokens
#[derive(Default)]
pub struct FakeApi {
    /// Tokens the ping endpoint accepts
    pub ping_accepts: Mutex<HashSet<String>>,
    /// Tokens the metrics endpoint accepts
    pub fetch_accepts: Mutex<HashSet<String>>,
    /// When set, every ping fails with this status
    pub ping_failure: Option<StatusCode>,
    pub entries: Vec<MetricEntry>,
    pub pings: Mutex<Vec<String>>,
    /// `(token, path?query)` of every fetch
    pub fetches: Mutex<Vec<(String, String)>>,
}

impl FakeApi {
    pub fn accepting(tokens: &[&str]) -> Self {
        let tokens: HashSet<String> = tokens.iter().map(|t| t.to_string()).collect();
        Self {
            ping_accepts: Mutex::new(tokens.clone()),
            fetch_accepts: Mutex::new(tokens),
            ..Default::default()
        }
    }

    pub fn with_entries(mut self, entries: Vec<MetricEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn ping_count(&self) -> usize {
        self.pings.lock().unwrap().len()
    }

    pub fn fetch_log(&self) -> Vec<(String, String)> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalyticsApi for FakeApi {
    async fn ping(&self, credential: &Credential) -> Result<(), ApiError> {
        self.pings.lock().unwrap().push(credential.token().to_string());
        if let Some(status) = self.ping_failure {
            return Err(ApiError::Remote {
                status,
                body: "service unavailable".to_string(),
            });
        }
        if self.ping_accepts.lock().unwrap().contains(credential.token()) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    async fn fetch_metrics(
        &self,
        session: &Session,
        query: &QueryDescriptor,
    ) -> Result<Vec<MetricEntry>, ApiError> {
        let token = session.credential().token().to_string();
        let target = format!("{}?{}", query.path(), query.to_query_string()?);
        self.fetches.lock().unwrap().push((token.clone(), target));

        if self.fetch_accepts.lock().unwrap().contains(&token) {
            Ok(self.entries.clone())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

/// Prompt double replaying scripted answers, then generating throwaway ones
#[derive(Default)]
pub struct ScriptedPrompt {
    pub answers: VecDeque<Credential>,
    pub calls: usize,
}

impl ScriptedPrompt {
    pub fn new(answers: Vec<Credential>) -> Self {
        Self {
            answers: answers.into(),
            calls: 0,
        }
    }
}

impl CredentialPrompt for ScriptedPrompt {
    fn request_credential(&mut self) -> Result<Credential, PromptError> {
        self.calls += 1;
        Ok(self
            .answers
            .pop_front()
            .unwrap_or_else(|| Credential::new(format!("bad-token-{}", self.calls), "bad-key")))
    }
}

/// Prompt double simulating the user pressing Esc
pub struct CancellingPrompt;

impl CredentialPrompt for CancellingPrompt {
    fn request_credential(&mut self) -> Result<Credential, PromptError> {
        Err(PromptError::Cancelled)
    }
}

pub fn entry(json: &str) -> MetricEntry {
    serde_json::from_str(json).unwrap()
}
