//! Submission outcome and the per-form result slot.

use crate::client::GenerationClient;
use crate::error::FailureKind;
use crate::request::GenerationForm;
use crate::transport::Transport;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Coarse lifecycle state of a form's submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Outcome of the latest submission.
///
/// The artifact URL only exists on `Succeeded`, the message only on
/// `Failed`, so a stale value can never outlive a new submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GenerationResult {
    #[default]
    Idle,
    InFlight,
    Succeeded {
        /// Absolute URL of the generated image
        artifact_url: String,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

impl GenerationResult {
    /// Fold an error into a failed result using `fallback` when the error
    /// carries no user-presentable text.
    pub fn from_error(err: &Error, fallback: &str) -> Self {
        GenerationResult::Failed {
            kind: err.failure_kind(),
            message: err.user_message(fallback),
        }
    }

    pub fn status(&self) -> GenerationStatus {
        match self {
            GenerationResult::Idle => GenerationStatus::Idle,
            GenerationResult::InFlight => GenerationStatus::InFlight,
            GenerationResult::Succeeded { .. } => GenerationStatus::Succeeded,
            GenerationResult::Failed { .. } => GenerationStatus::Failed,
        }
    }

    pub fn artifact_url(&self) -> Option<&str> {
        match self {
            GenerationResult::Succeeded { artifact_url } => Some(artifact_url),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            GenerationResult::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            GenerationResult::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, GenerationResult::InFlight)
    }
}

/// One form plus its single result slot (a "tab").
///
/// `submit` takes `&mut self`, so a second submission cannot start while
/// the first is still running.
#[derive(Debug, Clone, Default)]
pub struct FormSession<F> {
    form: F,
    result: GenerationResult,
}

impl<F: GenerationForm> FormSession<F> {
    pub fn new(form: F) -> Self {
        Self {
            form,
            result: GenerationResult::Idle,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn result(&self) -> &GenerationResult {
        &self.result
    }

    /// Submit the current form state, replacing whatever result was held.
    pub fn submit<T: Transport>(&mut self, client: &GenerationClient<T>) -> &GenerationResult {
        self.result = GenerationResult::InFlight;
        self.result = client.submit(&self.form);
        &self.result
    }

    /// Save the current artifact under the form's default file name.
    pub fn download<T: Transport>(
        &self,
        client: &GenerationClient<T>,
        dest_dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let url = self.result.artifact_url().ok_or_else(|| {
            Error::ValidationError("No generated image to download".to_string())
        })?;
        client.trigger_download(url, self.form.endpoint().default_file_name(), dest_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_follow_variant() {
        let ok = GenerationResult::Succeeded {
            artifact_url: "http://localhost:8000/download/a.png".into(),
        };
        assert_eq!(ok.status(), GenerationStatus::Succeeded);
        assert_eq!(ok.artifact_url(), Some("http://localhost:8000/download/a.png"));
        assert!(ok.error_message().is_none());

        let failed = GenerationResult::from_error(
            &Error::TransportError("refused".into()),
            "Failed to generate poster",
        );
        assert_eq!(failed.status(), GenerationStatus::Failed);
        assert_eq!(failed.failure_kind(), Some(FailureKind::Transport));
        assert_eq!(failed.error_message(), Some("Failed to generate poster"));
        assert!(failed.artifact_url().is_none());

        assert_eq!(GenerationResult::default().status(), GenerationStatus::Idle);
    }
}
