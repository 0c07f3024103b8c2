use crate::wizard::{DraftField, WizardStep};
use std::fmt;
use thiserror::Error;

/// Message shown when a rejection carries no reason of its own.
pub const GENERIC_FAILURE: &str = "Please try again later.";

/// A wizard action that is not permitted in the current state.
///
/// None of these change the wizard; the caller may correct the input and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("A submission is in flight")]
    Busy,

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("No step follows {0:?}, submit instead")]
    NoNextStep(WizardStep),

    #[error("Submit is only available from the final step (at {0:?})")]
    NotAtFinalStep(WizardStep),

    #[error("Step {step:?} is incomplete: {missing:?}")]
    StepIncomplete {
        step: WizardStep,
        missing: Vec<DraftField>,
    },

    #[error("Consent required")]
    ConsentRequired,

    #[error("'{value}' is not an offered {field:?} option")]
    UnknownOption { field: DraftField, value: String },

    #[error("No submission is in flight")]
    NotSubmitting,
}

/// The submission collaborator refused or failed to accept a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionRejected {
    reason: Option<String>,
}

impl SubmissionRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            reason: (!reason.trim().is_empty()).then_some(reason),
        }
    }

    pub fn without_reason() -> Self {
        Self { reason: None }
    }

    /// The collaborator's own explanation, if it gave one.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Human-readable text, falling back to [`GENERIC_FAILURE`].
    pub fn message(&self) -> &str {
        self.reason().unwrap_or(GENERIC_FAILURE)
    }
}

impl fmt::Display for SubmissionRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for SubmissionRejected {}
