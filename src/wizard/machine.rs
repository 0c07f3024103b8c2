use crate::catalog::{issues_for, models_for, PickupSlot, Urgency};
use crate::wizard::step::missing_fields;
use crate::wizard::{DraftField, SubmissionRejected, WizardDraft, WizardError, WizardStep};
use std::future::Future;
use tracing::{debug, info, warn};

/// What the submission collaborator hands back on acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub ticket_id: String,
}

/// External collaborator that accepts a completed draft.
///
/// Timeouts are the implementation's business; the wizard waits for
/// whatever the returned future resolves to.
pub trait Submitter {
    fn submit(
        &self,
        draft: &WizardDraft,
    ) -> impl Future<Output = Result<SubmitReceipt, SubmissionRejected>>;
}

/// Result of a completed submit round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted { ticket_id: String },
    Failed(SubmissionRejected),
}

/// Observable state of a wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    Editing(WizardStep),
    Submitting,
    Submitted { ticket_id: String },
    /// Annotation on the final step; the draft is untouched.
    SubmitFailed(SubmissionRejected),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SubmitStatus {
    Idle,
    Submitting,
    Submitted(String),
    Failed(SubmissionRejected),
}

/// Linear three-step request wizard.
///
/// Owns the draft exclusively. Every mutation goes through a method so that
/// derived option lists and dependent fields can never disagree with the
/// selected brand or category.
#[derive(Debug, Clone)]
pub struct RequestWizard {
    step: WizardStep,
    draft: WizardDraft,
    available_models: &'static [&'static str],
    available_issues: &'static [&'static str],
    status: SubmitStatus,
}

impl Default for RequestWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::DeviceInfo,
            draft: WizardDraft::default(),
            available_models: &[],
            available_issues: &[],
            status: SubmitStatus::Idle,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    /// Models for the selected brand; empty until a brand is chosen.
    pub fn available_models(&self) -> &'static [&'static str] {
        self.available_models
    }

    /// Issues for the selected category; empty until a category is chosen.
    pub fn available_issues(&self) -> &'static [&'static str] {
        self.available_issues
    }

    pub fn state(&self) -> WizardState {
        match &self.status {
            SubmitStatus::Idle => WizardState::Editing(self.step),
            SubmitStatus::Submitting => WizardState::Submitting,
            SubmitStatus::Submitted(ticket_id) => WizardState::Submitted {
                ticket_id: ticket_id.clone(),
            },
            SubmitStatus::Failed(rejected) => WizardState::SubmitFailed(rejected.clone()),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    pub fn missing_fields(&self) -> Vec<DraftField> {
        missing_fields(self.step, &self.draft)
    }

    // -------------------- Selections --------------------

    /// Select a brand, clearing the model and recomputing the model list.
    pub fn select_brand(&mut self, brand: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let models = models_for(brand).ok_or_else(|| unknown(DraftField::DeviceBrand, brand))?;

        self.draft.device_brand = brand.to_string();
        self.draft.device_model.clear();
        self.available_models = models;
        Ok(())
    }

    pub fn select_model(&mut self, model: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if !self.available_models.contains(&model) {
            return Err(unknown(DraftField::DeviceModel, model));
        }
        self.draft.device_model = model.to_string();
        Ok(())
    }

    /// Select an issue category, clearing the specific issue and recomputing
    /// the issue list.
    pub fn select_category(&mut self, category: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let issues =
            issues_for(category).ok_or_else(|| unknown(DraftField::IssueCategory, category))?;

        self.draft.issue_category = category.to_string();
        self.draft.specific_issue.clear();
        self.available_issues = issues;
        Ok(())
    }

    pub fn select_issue(&mut self, issue: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if !self.available_issues.contains(&issue) {
            return Err(unknown(DraftField::SpecificIssue, issue));
        }
        self.draft.specific_issue = issue.to_string();
        Ok(())
    }

    // -------------------- Free-form fields --------------------

    pub fn set_description(&mut self, value: impl Into<String>) -> Result<(), WizardError> {
        let value = value.into();
        self.edit(|d| d.description = value)
    }

    pub fn set_urgency(&mut self, urgency: Urgency) -> Result<(), WizardError> {
        self.edit(|d| d.urgency = urgency)
    }

    pub fn set_customer_name(&mut self, value: impl Into<String>) -> Result<(), WizardError> {
        let value = value.into();
        self.edit(|d| d.customer_name = value)
    }

    pub fn set_customer_email(&mut self, value: impl Into<String>) -> Result<(), WizardError> {
        let value = value.into();
        self.edit(|d| d.customer_email = value)
    }

    pub fn set_customer_phone(&mut self, value: impl Into<String>) -> Result<(), WizardError> {
        let value = value.into();
        self.edit(|d| d.customer_phone = value)
    }

    pub fn set_pickup_address(&mut self, value: impl Into<String>) -> Result<(), WizardError> {
        let value = value.into();
        self.edit(|d| d.pickup_address = value)
    }

    pub fn set_pickup_time(&mut self, slot: Option<PickupSlot>) -> Result<(), WizardError> {
        self.edit(|d| d.pickup_time = slot)
    }

    pub fn set_gdpr_consent(&mut self, consent: bool) -> Result<(), WizardError> {
        self.edit(|d| d.gdpr_consent = consent)
    }

    // -------------------- Navigation --------------------

    /// Move to the next step if the current one is complete.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        let next = self.step.next().ok_or(WizardError::NoNextStep(self.step))?;

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(WizardError::StepIncomplete {
                step: self.step,
                missing,
            });
        }

        self.step = next;
        debug!("Wizard advanced to step {}", next.number());
        Ok(next)
    }

    /// Move to the previous step. Going back is never gated on validity.
    pub fn retreat(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        let previous = self.step.previous().ok_or(WizardError::AtFirstStep)?;
        self.step = previous;
        debug!("Wizard retreated to step {}", previous.number());
        Ok(previous)
    }

    /// Discard the draft and return to the first step.
    pub fn reset(&mut self) -> Result<(), WizardError> {
        if self.is_submitting() {
            return Err(WizardError::Busy);
        }
        *self = Self::new();
        Ok(())
    }

    // -------------------- Submission --------------------

    /// Gate a submission and enter Submitting, returning the payload to send.
    ///
    /// The wizard stays in Submitting until [`finish_submit`](Self::finish_submit)
    /// is called, so a caller that abandons the request must still finish it.
    pub fn begin_submit(&mut self) -> Result<WizardDraft, WizardError> {
        self.ensure_editable()?;
        if self.step != WizardStep::PickupConsent {
            return Err(WizardError::NotAtFinalStep(self.step));
        }
        if !self.draft.gdpr_consent {
            return Err(WizardError::ConsentRequired);
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(WizardError::StepIncomplete {
                step: self.step,
                missing,
            });
        }

        self.status = SubmitStatus::Submitting;
        Ok(self.draft.clone())
    }

    /// Apply the collaborator's answer to an in-flight submission.
    ///
    /// Success clears the draft and returns to the first step. Failure keeps
    /// the draft and the final step so the user can retry as-is.
    pub fn finish_submit(
        &mut self,
        result: Result<SubmitReceipt, SubmissionRejected>,
    ) -> Result<SubmitOutcome, WizardError> {
        if !self.is_submitting() {
            return Err(WizardError::NotSubmitting);
        }

        match result {
            Ok(receipt) => {
                info!("Repair request submitted as {}", receipt.ticket_id);
                *self = Self::new();
                self.status = SubmitStatus::Submitted(receipt.ticket_id.clone());
                Ok(SubmitOutcome::Submitted {
                    ticket_id: receipt.ticket_id,
                })
            }
            Err(rejected) => {
                warn!("Repair request rejected: {}", rejected.message());
                self.status = SubmitStatus::Failed(rejected.clone());
                Ok(SubmitOutcome::Failed(rejected))
            }
        }
    }

    /// Submit the draft through `submitter`, waiting in Submitting for the answer.
    ///
    /// Only gating errors are returned as `Err`; a rejection by the
    /// collaborator is a [`SubmitOutcome::Failed`].
    pub async fn submit<S: Submitter>(&mut self, submitter: &S) -> Result<SubmitOutcome, WizardError> {
        let payload = self.begin_submit()?;
        let result = submitter.submit(&payload).await;
        self.finish_submit(result)
    }

    /// Reject while a submission is in flight, and drop a stale outcome
    /// annotation once the user acts again.
    fn ensure_editable(&mut self) -> Result<(), WizardError> {
        match self.status {
            SubmitStatus::Submitting => Err(WizardError::Busy),
            SubmitStatus::Idle => Ok(()),
            _ => {
                self.status = SubmitStatus::Idle;
                Ok(())
            }
        }
    }

    fn edit(&mut self, apply: impl FnOnce(&mut WizardDraft)) -> Result<(), WizardError> {
        self.ensure_editable()?;
        apply(&mut self.draft);
        Ok(())
    }
}

fn unknown(field: DraftField, value: &str) -> WizardError {
    WizardError::UnknownOption {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Records every payload and answers with a fixed result.
    struct FakeSubmitter {
        answer: Result<SubmitReceipt, SubmissionRejected>,
        calls: Cell<usize>,
        last: RefCell<Option<WizardDraft>>,
    }

    impl FakeSubmitter {
        fn accepting(ticket_id: &str) -> Self {
            Self::answering(Ok(SubmitReceipt {
                ticket_id: ticket_id.to_string(),
            }))
        }

        fn rejecting(detail: &str) -> Self {
            Self::answering(Err(SubmissionRejected::new(detail)))
        }

        fn answering(answer: Result<SubmitReceipt, SubmissionRejected>) -> Self {
            Self {
                answer,
                calls: Cell::new(0),
                last: RefCell::new(None),
            }
        }
    }

    impl Submitter for FakeSubmitter {
        async fn submit(&self, draft: &WizardDraft) -> Result<SubmitReceipt, SubmissionRejected> {
            self.calls.set(self.calls.get() + 1);
            *self.last.borrow_mut() = Some(draft.clone());
            self.answer.clone()
        }
    }

    fn fill_device_info(wizard: &mut RequestWizard) {
        wizard.select_brand("iPhone").unwrap();
        wizard.select_model("iPhone 15 Pro").unwrap();
        wizard.select_category("Screen Issues").unwrap();
        wizard.select_issue("Cracked Screen").unwrap();
    }

    fn fill_contact(wizard: &mut RequestWizard) {
        wizard.set_customer_name("John Doe").unwrap();
        wizard.set_customer_email("john@example.com").unwrap();
        wizard.set_customer_phone("+1-555-0123").unwrap();
    }

    /// A wizard on the final step with every field filled.
    fn ready_wizard() -> RequestWizard {
        let mut wizard = RequestWizard::new();
        fill_device_info(&mut wizard);
        wizard.set_description("Dropped on concrete").unwrap();
        wizard.set_urgency(Urgency::Urgent).unwrap();
        wizard.advance().unwrap();
        fill_contact(&mut wizard);
        wizard.advance().unwrap();
        wizard.set_pickup_address("123 Main St").unwrap();
        wizard.set_pickup_time(Some(PickupSlot::Morning)).unwrap();
        wizard.set_gdpr_consent(true).unwrap();
        wizard
    }

    // ==================== Initial State Tests ====================

    #[test]
    fn test_new_wizard_starts_empty_at_step_one() {
        let wizard = RequestWizard::new();
        assert_eq!(wizard.state(), WizardState::Editing(WizardStep::DeviceInfo));
        assert_eq!(wizard.draft(), &WizardDraft::default());
        assert!(wizard.available_models().is_empty());
        assert!(wizard.available_issues().is_empty());
    }

    // ==================== Selection Tests ====================

    #[test]
    fn test_brand_change_clears_model() {
        let mut wizard = RequestWizard::new();
        wizard.select_brand("iPhone").unwrap();
        wizard.select_model("iPhone 15 Pro").unwrap();

        wizard.select_brand("Samsung").unwrap();

        assert_eq!(wizard.draft().device_brand, "Samsung");
        assert_eq!(wizard.draft().device_model, "");
        assert!(wizard.available_models().contains(&"Galaxy S24"));
        assert!(!wizard.available_models().contains(&"iPhone 15 Pro"));
    }

    #[test]
    fn test_reselecting_same_brand_still_clears_model() {
        let mut wizard = RequestWizard::new();
        wizard.select_brand("Google").unwrap();
        wizard.select_model("Pixel 8").unwrap();
        wizard.select_brand("Google").unwrap();
        assert!(wizard.draft().device_model.is_empty());
    }

    #[test]
    fn test_category_change_clears_issue() {
        let mut wizard = RequestWizard::new();
        wizard.select_category("Screen Issues").unwrap();
        wizard.select_issue("Black Screen").unwrap();

        wizard.select_category("Battery Issues").unwrap();

        assert_eq!(wizard.draft().specific_issue, "");
        assert_eq!(wizard.available_issues()[0], "Fast Battery Drain");
    }

    #[test]
    fn test_unknown_brand_rejected_and_state_kept() {
        let mut wizard = RequestWizard::new();
        wizard.select_brand("iPhone").unwrap();
        wizard.select_model("iPhone 14").unwrap();

        let err = wizard.select_brand("Nokia").unwrap_err();
        assert_eq!(
            err,
            WizardError::UnknownOption {
                field: DraftField::DeviceBrand,
                value: "Nokia".to_string()
            }
        );
        assert_eq!(wizard.draft().device_model, "iPhone 14");
    }

    #[test]
    fn test_model_from_other_brand_rejected() {
        let mut wizard = RequestWizard::new();
        wizard.select_brand("Samsung").unwrap();
        assert!(matches!(
            wizard.select_model("iPhone 15 Pro"),
            Err(WizardError::UnknownOption { field: DraftField::DeviceModel, .. })
        ));
    }

    #[test]
    fn test_model_before_brand_rejected() {
        let mut wizard = RequestWizard::new();
        assert!(wizard.select_model("iPhone 15").is_err());
        assert!(wizard.select_issue("Cracked Screen").is_err());
    }

    // ==================== Navigation Tests ====================

    #[test]
    fn test_advance_blocked_until_step_complete() {
        let mut wizard = RequestWizard::new();
        wizard.select_brand("iPhone").unwrap();

        let err = wizard.advance().unwrap_err();
        assert_eq!(
            err,
            WizardError::StepIncomplete {
                step: WizardStep::DeviceInfo,
                missing: vec![
                    DraftField::DeviceModel,
                    DraftField::IssueCategory,
                    DraftField::SpecificIssue
                ],
            }
        );
        assert_eq!(wizard.step(), WizardStep::DeviceInfo);
    }

    #[test]
    fn test_brand_change_blocks_advance_until_model_chosen() {
        let mut wizard = RequestWizard::new();
        fill_device_info(&mut wizard);
        wizard.select_brand("Samsung").unwrap();

        assert_eq!(
            wizard.advance().unwrap_err(),
            WizardError::StepIncomplete {
                step: WizardStep::DeviceInfo,
                missing: vec![DraftField::DeviceModel],
            }
        );
        assert_eq!(wizard.step(), WizardStep::DeviceInfo);

        wizard.select_model("Galaxy S24").unwrap();
        assert_eq!(wizard.advance().unwrap(), WizardStep::ContactDetails);
        assert_eq!(wizard.draft().device_model, "Galaxy S24");
    }

    #[test]
    fn test_category_change_blocks_advance_until_issue_chosen() {
        let mut wizard = RequestWizard::new();
        fill_device_info(&mut wizard);
        wizard.select_category("Battery Issues").unwrap();

        assert_eq!(
            wizard.advance().unwrap_err(),
            WizardError::StepIncomplete {
                step: WizardStep::DeviceInfo,
                missing: vec![DraftField::SpecificIssue],
            }
        );

        wizard.select_issue("Fast Battery Drain").unwrap();
        assert_eq!(wizard.advance().unwrap(), WizardStep::ContactDetails);
        assert_eq!(wizard.draft().device_model, "iPhone 15 Pro");
    }

    #[test]
    fn test_advance_through_steps() {
        let mut wizard = RequestWizard::new();
        fill_device_info(&mut wizard);
        assert_eq!(wizard.advance(), Ok(WizardStep::ContactDetails));

        assert!(wizard.advance().is_err());
        fill_contact(&mut wizard);
        assert_eq!(wizard.advance(), Ok(WizardStep::PickupConsent));
    }

    #[test]
    fn test_no_advance_from_final_step() {
        let mut wizard = ready_wizard();
        assert_eq!(
            wizard.advance(),
            Err(WizardError::NoNextStep(WizardStep::PickupConsent))
        );
    }

    #[test]
    fn test_retreat_is_ungated() {
        let mut wizard = ready_wizard();
        wizard.set_customer_name("").unwrap();
        wizard.set_pickup_address("").unwrap();

        assert_eq!(wizard.retreat(), Ok(WizardStep::ContactDetails));
        assert_eq!(wizard.retreat(), Ok(WizardStep::DeviceInfo));
        assert_eq!(wizard.retreat(), Err(WizardError::AtFirstStep));
    }

    #[test]
    fn test_retreat_keeps_draft() {
        let mut wizard = ready_wizard();
        let before = wizard.draft().clone();
        wizard.retreat().unwrap();
        assert_eq!(wizard.draft(), &before);
    }

    #[test]
    fn test_reset_discards_draft() {
        let mut wizard = ready_wizard();
        wizard.reset().unwrap();
        assert_eq!(wizard.step(), WizardStep::DeviceInfo);
        assert_eq!(wizard.draft(), &WizardDraft::default());
        assert!(wizard.available_models().is_empty());
    }

    // ==================== Submit Gating Tests ====================

    #[test]
    fn test_submit_requires_final_step() {
        let mut wizard = RequestWizard::new();
        assert_eq!(
            wizard.begin_submit(),
            Err(WizardError::NotAtFinalStep(WizardStep::DeviceInfo))
        );
    }

    #[test]
    fn test_submit_without_consent_rejected() {
        let mut wizard = ready_wizard();
        wizard.set_gdpr_consent(false).unwrap();

        assert_eq!(wizard.begin_submit(), Err(WizardError::ConsentRequired));
        assert_eq!(wizard.state(), WizardState::Editing(WizardStep::PickupConsent));
    }

    #[test]
    fn test_submit_without_address_is_incomplete() {
        let mut wizard = ready_wizard();
        wizard.set_pickup_address("  ").unwrap();
        assert!(matches!(
            wizard.begin_submit(),
            Err(WizardError::StepIncomplete { step: WizardStep::PickupConsent, .. })
        ));
    }

    #[test]
    fn test_busy_while_submitting() {
        let mut wizard = ready_wizard();
        wizard.begin_submit().unwrap();

        assert_eq!(wizard.state(), WizardState::Submitting);
        assert_eq!(wizard.begin_submit(), Err(WizardError::Busy));
        assert_eq!(wizard.retreat(), Err(WizardError::Busy));
        assert_eq!(wizard.set_customer_name("Jane"), Err(WizardError::Busy));
        assert_eq!(wizard.select_brand("Samsung"), Err(WizardError::Busy));
        assert_eq!(wizard.reset(), Err(WizardError::Busy));
    }

    #[test]
    fn test_finish_without_begin() {
        let mut wizard = ready_wizard();
        let result = wizard.finish_submit(Err(SubmissionRejected::without_reason()));
        assert_eq!(result, Err(WizardError::NotSubmitting));
    }

    // ==================== Submit Round Trip Tests ====================

    #[tokio::test]
    async fn test_successful_submit_resets_wizard() {
        let mut wizard = ready_wizard();
        let expected_payload = wizard.draft().clone();
        let submitter = FakeSubmitter::accepting("FN-2025-099");

        let outcome = wizard.submit(&submitter).await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Submitted {
                ticket_id: "FN-2025-099".to_string()
            }
        );
        assert_eq!(
            wizard.state(),
            WizardState::Submitted {
                ticket_id: "FN-2025-099".to_string()
            }
        );
        assert_eq!(wizard.step(), WizardStep::DeviceInfo);
        assert_eq!(wizard.draft(), &WizardDraft::default());
        assert_eq!(submitter.last.borrow().as_ref(), Some(&expected_payload));
    }

    #[tokio::test]
    async fn test_failed_submit_preserves_draft_and_allows_retry() {
        let mut wizard = ready_wizard();
        let before = wizard.draft().clone();
        let rejecting = FakeSubmitter::rejecting("duplicate request");

        let outcome = wizard.submit(&rejecting).await.unwrap();

        let rejected = SubmissionRejected::new("duplicate request");
        assert_eq!(outcome, SubmitOutcome::Failed(rejected.clone()));
        assert_eq!(wizard.state(), WizardState::SubmitFailed(rejected));
        assert_eq!(wizard.step(), WizardStep::PickupConsent);
        assert_eq!(wizard.draft(), &before);

        let accepting = FakeSubmitter::accepting("FN-2025-100");
        let retry = wizard.submit(&accepting).await.unwrap();
        assert!(matches!(retry, SubmitOutcome::Submitted { .. }));
        assert_eq!(accepting.last.borrow().as_ref(), Some(&before));
    }

    #[tokio::test]
    async fn test_consent_gate_never_reaches_submitter() {
        let mut wizard = ready_wizard();
        wizard.set_gdpr_consent(false).unwrap();
        let submitter = FakeSubmitter::accepting("FN-2025-101");

        assert_eq!(wizard.submit(&submitter).await, Err(WizardError::ConsentRequired));
        assert_eq!(submitter.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_editing_clears_failure_annotation() {
        let mut wizard = ready_wizard();
        wizard
            .submit(&FakeSubmitter::answering(Err(SubmissionRejected::without_reason())))
            .await
            .unwrap();
        assert!(matches!(wizard.state(), WizardState::SubmitFailed(_)));

        wizard.set_pickup_address("456 Oak Ave").unwrap();
        assert_eq!(wizard.state(), WizardState::Editing(WizardStep::PickupConsent));
    }
}
