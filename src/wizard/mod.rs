//! Repair request wizard.
//!
//! A linear three-step flow (device, contact, pickup and consent) whose
//! forward navigation is gated by per-step predicates, ending in a single
//! submit action handled by an external [`Submitter`].

mod draft;
mod error;
mod machine;
pub mod step;

pub use draft::{DraftField, WizardDraft};
pub use error::{SubmissionRejected, WizardError, GENERIC_FAILURE};
pub use machine::{RequestWizard, SubmitOutcome, SubmitReceipt, Submitter, WizardState};
pub use step::{is_step_valid, missing_fields, WizardStep};
