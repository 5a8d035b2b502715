//! Credential validation with bounded interactive re-entry.
//!
//! The [`Authenticator`] walks `Unauthenticated → Validating → Authenticated`.
//! Each rejected credential counts against a retry budget; while budget is
//! left the user is asked for a new token/key pair, which is persisted and
//! validated in turn. Once the budget is spent the authenticator ends in
//! [`AuthState::Failed`]. Transport and non-401 remote errors are never
//! retried.

use crate::api::{AnalyticsApi, ApiError, Session};
use crate::configuration::DEFAULT_MAX_AUTH_RETRIES;
use crate::credentials::{Credential, CredentialStore, CredentialStoreError};
use crate::prompt::{CredentialPrompt, PromptError};
use crate::spinner::Spinner;
use color_print::ceprintln;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Every credential was rejected and the retry budget is spent
    #[error("Authentication error. Quitting ChartMogul CLI.")]
    AttemptsExhausted { retries: u32 },
    #[error("{0}")]
    ApiError(#[from] ApiError),
    #[error("{0}")]
    PromptError(#[from] PromptError),
    #[error("{0}")]
    CredentialStoreError(#[from] CredentialStoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Validating,
    Authenticated,
    Failed,
}

/// Outcome of checking one credential against the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Authenticated(Session),
    Rejected,
}

pub struct Authenticator<'a, A, P> {
    api: &'a A,
    prompt: P,
    store: CredentialStore,
    spinner: &'a Spinner,
    max_retries: u32,
    retries: u32,
    state: AuthState,
}

impl<'a, A, P> Authenticator<'a, A, P>
where
    A: AnalyticsApi,
    P: CredentialPrompt,
{
    pub fn new(api: &'a A, prompt: P, store: CredentialStore, spinner: &'a Spinner) -> Self {
        Self {
            api,
            prompt,
            store,
            spinner,
            max_retries: DEFAULT_MAX_AUTH_RETRIES,
            retries: 0,
            state: AuthState::Unauthenticated,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Number of re-entries triggered by rejected credentials so far
    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Establish a session, starting from `initial` when a credential is
    /// already known. Without one the user is prompted before the first
    /// validation.
    pub async fn authenticate(&mut self, initial: Option<Credential>) -> Result<Session, AuthError> {
        let credential = match initial {
            Some(credential) => credential,
            None => {
                self.spinner.stop();
                ceprintln!("<bold><red>Authentication required!</red></bold>");
                self.enter_credential()?
            }
        };

        self.validate_until_accepted(credential).await
    }

    /// Recover from a session the service stopped accepting. This counts as
    /// a rejection against the same retry budget as [`Self::authenticate`].
    pub async fn recover(&mut self) -> Result<Session, AuthError> {
        debug!("Session was rejected by the API");
        self.state = AuthState::Unauthenticated;
        let credential = self.handle_rejection()?;
        self.validate_until_accepted(credential).await
    }

    /// Check a single credential without touching the retry budget.
    pub async fn validate(&mut self, credential: Credential) -> Result<Verdict, AuthError> {
        self.state = AuthState::Validating;
        self.spinner.start("Authenticating...");
        trace!("Validating credential (retry {} of {})...", self.retries, self.max_retries);

        match self.api.ping(&credential).await {
            Ok(()) => {
                debug!("Credential accepted");
                self.state = AuthState::Authenticated;
                Ok(Verdict::Authenticated(Session::new(credential)))
            }
            Err(ApiError::Unauthorized) => {
                debug!("Credential rejected");
                self.state = AuthState::Unauthenticated;
                Ok(Verdict::Rejected)
            }
            Err(e) => {
                self.spinner.stop();
                self.state = AuthState::Failed;
                Err(AuthError::ApiError(e))
            }
        }
    }

    async fn validate_until_accepted(
        &mut self,
        mut credential: Credential,
    ) -> Result<Session, AuthError> {
        loop {
            match self.validate(credential).await? {
                Verdict::Authenticated(session) => return Ok(session),
                Verdict::Rejected => credential = self.handle_rejection()?,
            }
        }
    }

    /// Spend one retry on a fresh credential, or fail once the budget is gone.
    fn handle_rejection(&mut self) -> Result<Credential, AuthError> {
        self.spinner.stop();
        ceprintln!("<red>Authentication failed! Bad API token or key?</>");

        if self.retries >= self.max_retries {
            self.state = AuthState::Failed;
            return Err(AuthError::AttemptsExhausted {
                retries: self.retries,
            });
        }
        self.retries += 1;
        debug!("Retry {} of {}", self.retries, self.max_retries);

        self.enter_credential()
    }

    /// Ask for a new pair and persist it before it is validated.
    fn enter_credential(&mut self) -> Result<Credential, AuthError> {
        self.spinner.stop();

        let entered = self
            .prompt
            .request_credential()
            .map_err(AuthError::from)
            .and_then(|credential| {
                self.store.save(&credential)?;
                Ok(credential)
            });

        if entered.is_err() {
            self.state = AuthState::Failed;
        }
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CancellingPrompt, FakeApi, ScriptedPrompt};
    use reqwest::StatusCode;
    use tempfile::{tempdir, TempDir};

    fn store() -> (TempDir, CredentialStore) {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn test_stored_credential_is_accepted_without_prompt() {
        let (_dir, store) = store();
        let api = FakeApi::accepting(&["good"]);
        let spinner = Spinner::hidden();
        let mut auth = Authenticator::new(&api, ScriptedPrompt::default(), store, &spinner);

        let session = auth
            .authenticate(Some(Credential::new("good", "key")))
            .await
            .unwrap();

        assert_eq!(session.credential().token(), "good");
        assert_eq!(auth.state(), AuthState::Authenticated);
        assert_eq!(auth.prompt().calls, 0);
        assert_eq!(auth.retries(), 0);
        assert_eq!(api.ping_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_prompts_once_before_validation() {
        let (_dir, store) = store();
        let api = FakeApi::accepting(&["fresh"]);
        let spinner = Spinner::hidden();
        let prompt = ScriptedPrompt::new(vec![Credential::new("fresh", "key")]);
        let mut auth = Authenticator::new(&api, prompt, store.clone(), &spinner);

        let session = auth.authenticate(None).await.unwrap();

        assert_eq!(session.credential().token(), "fresh");
        assert_eq!(auth.prompt().calls, 1);
        assert_eq!(api.ping_count(), 1);
        // entered credentials are persisted
        assert_eq!(store.load().unwrap(), Some(Credential::new("fresh", "key")));
    }

    #[tokio::test]
    async fn test_rejected_credential_is_replaced() {
        let (_dir, store) = store();
        let api = FakeApi::accepting(&["second"]);
        let spinner = Spinner::hidden();
        let prompt = ScriptedPrompt::new(vec![Credential::new("second", "key")]);
        let mut auth = Authenticator::new(&api, prompt, store.clone(), &spinner);

        let session = auth
            .authenticate(Some(Credential::new("first", "key")))
            .await
            .unwrap();

        assert_eq!(session.credential().token(), "second");
        assert_eq!(auth.retries(), 1);
        assert_eq!(auth.prompt().calls, 1);
        assert_eq!(*api.pings.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(store.load().unwrap().unwrap().token(), "second");
    }

    #[tokio::test]
    async fn test_retry_budget_is_bounded() {
        for max_retries in [0, 1, 4] {
            let (_dir, store) = store();
            let api = FakeApi::accepting(&[]);
            let spinner = Spinner::hidden();
            let mut auth = Authenticator::new(&api, ScriptedPrompt::default(), store, &spinner)
                .with_max_retries(max_retries);

            let result = auth.authenticate(Some(Credential::new("bad", "key"))).await;

            match result {
                Err(AuthError::AttemptsExhausted { retries }) => assert_eq!(retries, max_retries),
                other => panic!("expected AttemptsExhausted, got {:?}", other),
            }
            assert_eq!(auth.state(), AuthState::Failed);
            assert_eq!(auth.prompt().calls, max_retries as usize);
            assert_eq!(api.ping_count(), max_retries as usize + 1);
        }
    }

    #[tokio::test]
    async fn test_default_budget_is_four_retries() {
        let (_dir, store) = store();
        let api = FakeApi::accepting(&[]);
        let spinner = Spinner::hidden();
        let mut auth = Authenticator::new(&api, ScriptedPrompt::default(), store, &spinner);

        let error = auth.authenticate(None).await.unwrap_err();

        assert_eq!(
            error.to_string(),
            "Authentication error. Quitting ChartMogul CLI."
        );
        assert_eq!(auth.retries(), 4);
        // the initial prompt plus one per retry
        assert_eq!(auth.prompt().calls, 5);
    }

    #[tokio::test]
    async fn test_remote_failure_is_not_retried() {
        let (_dir, store) = store();
        let api = FakeApi {
            ping_failure: Some(StatusCode::SERVICE_UNAVAILABLE),
            ..FakeApi::accepting(&["good"])
        };
        let spinner = Spinner::hidden();
        let mut auth = Authenticator::new(&api, ScriptedPrompt::default(), store, &spinner);

        let result = auth.authenticate(Some(Credential::new("good", "key"))).await;

        assert!(matches!(
            result,
            Err(AuthError::ApiError(ApiError::Remote { .. }))
        ));
        assert_eq!(auth.state(), AuthState::Failed);
        assert_eq!(auth.prompt().calls, 0);
        assert_eq!(api.ping_count(), 1);
        assert!(!spinner.is_spinning());
    }

    #[tokio::test]
    async fn test_cancelled_prompt_is_fatal() {
        let (_dir, store) = store();
        let api = FakeApi::accepting(&["good"]);
        let spinner = Spinner::hidden();
        let mut auth = Authenticator::new(&api, CancellingPrompt, store, &spinner);

        let result = auth.authenticate(None).await;

        assert!(matches!(
            result,
            Err(AuthError::PromptError(PromptError::Cancelled))
        ));
        assert_eq!(auth.state(), AuthState::Failed);
        assert_eq!(api.ping_count(), 0);
    }

    #[tokio::test]
    async fn test_recover_shares_the_retry_budget() {
        let (_dir, store) = store();
        let api = FakeApi::accepting(&["good"]);
        let spinner = Spinner::hidden();
        let prompt = ScriptedPrompt::new(vec![
            Credential::new("good", "key"),
            Credential::new("good", "key"),
        ]);
        let mut auth =
            Authenticator::new(&api, prompt, store, &spinner).with_max_retries(1);

        let session = auth
            .authenticate(Some(Credential::new("good", "key")))
            .await
            .unwrap();
        assert_eq!(session.credential().token(), "good");
        auth.recover().await.unwrap();
        assert_eq!(auth.retries(), 1);

        // the budget is now spent
        let result = auth.recover().await;
        assert!(matches!(result, Err(AuthError::AttemptsExhausted { .. })));
    }
}
