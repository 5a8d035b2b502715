//! Interactive entry of the API token and secret key.

use crate::credentials::Credential;
use inquire::validator::Validation;
use inquire::{CustomUserError, InquireError, Password, PasswordDisplayMode, Text};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Credential entry was cancelled.")]
    Cancelled,
    #[error("Failed to read credentials from the terminal: {0}")]
    TerminalError(String),
}

impl From<InquireError> for PromptError {
    fn from(error: InquireError) -> Self {
        match error {
            InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                PromptError::Cancelled
            }
            other => PromptError::TerminalError(other.to_string()),
        }
    }
}

/// Source of fresh credentials when none are stored or the current ones are rejected
pub trait CredentialPrompt {
    fn request_credential(&mut self) -> Result<Credential, PromptError>;
}

fn not_blank(input: &str) -> Result<Validation, CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Invalid("A value is required".into()))
    } else {
        Ok(Validation::Valid)
    }
}

/// Terminal prompt; the secret key is never echoed.
#[derive(Debug, Default)]
pub struct InquirePrompt;

impl CredentialPrompt for InquirePrompt {
    fn request_credential(&mut self) -> Result<Credential, PromptError> {
        let token = Text::new("API Token:").with_validator(not_blank).prompt()?;
        let key = Password::new("Secret Key:")
            .with_display_mode(PasswordDisplayMode::Hidden)
            .without_confirmation()
            .with_validator(not_blank)
            .prompt()?;

        Ok(Credential::new(token.trim(), key.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_maps_to_cancelled() {
        assert!(matches!(
            PromptError::from(InquireError::OperationCanceled),
            PromptError::Cancelled
        ));
        assert!(matches!(
            PromptError::from(InquireError::OperationInterrupted),
            PromptError::Cancelled
        ));
        assert!(matches!(
            PromptError::from(InquireError::NotTTY),
            PromptError::TerminalError(_)
        ));
    }

    #[test]
    fn test_blank_input_is_invalid() {
        assert!(matches!(not_blank("  "), Ok(Validation::Invalid(_))));
        assert!(matches!(not_blank("abc"), Ok(Validation::Valid)));
    }
}
