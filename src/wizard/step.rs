//! Wizard steps and their validity predicates.
//!
//! Predicates are pure functions over [`WizardDraft`] so each can be tested
//! without driving the state machine.

use crate::wizard::{DraftField, WizardDraft};

/// Ordinal position in the three-step flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    DeviceInfo = 1,
    ContactDetails = 2,
    PickupConsent = 3,
}

const DEVICE_INFO_FIELDS: &[DraftField] = &[
    DraftField::DeviceBrand,
    DraftField::DeviceModel,
    DraftField::IssueCategory,
    DraftField::SpecificIssue,
];

const CONTACT_FIELDS: &[DraftField] = &[
    DraftField::CustomerName,
    DraftField::CustomerEmail,
    DraftField::CustomerPhone,
];

const PICKUP_FIELDS: &[DraftField] = &[DraftField::PickupAddress, DraftField::GdprConsent];

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [
        WizardStep::DeviceInfo,
        WizardStep::ContactDetails,
        WizardStep::PickupConsent,
    ];

    /// 1-based ordinal.
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::DeviceInfo => Some(WizardStep::ContactDetails),
            WizardStep::ContactDetails => Some(WizardStep::PickupConsent),
            WizardStep::PickupConsent => None,
        }
    }

    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::DeviceInfo => None,
            WizardStep::ContactDetails => Some(WizardStep::DeviceInfo),
            WizardStep::PickupConsent => Some(WizardStep::ContactDetails),
        }
    }

    /// Fields that must be set before leaving this step forward.
    pub fn required_fields(&self) -> &'static [DraftField] {
        match self {
            WizardStep::DeviceInfo => DEVICE_INFO_FIELDS,
            WizardStep::ContactDetails => CONTACT_FIELDS,
            WizardStep::PickupConsent => PICKUP_FIELDS,
        }
    }

    /// Translation key of the progress-bar label.
    pub fn label_key(&self) -> &'static str {
        match self {
            WizardStep::DeviceInfo => "submitRequest.steps.deviceInfo",
            WizardStep::ContactDetails => "submitRequest.steps.contactDetails",
            WizardStep::PickupConsent => "submitRequest.steps.pickupConsent",
        }
    }

    /// Translation key of the card title.
    pub fn title_key(&self) -> &'static str {
        match self {
            WizardStep::DeviceInfo => "submitRequest.stepTitles.deviceInfo",
            WizardStep::ContactDetails => "submitRequest.stepTitles.contactDetails",
            WizardStep::PickupConsent => "submitRequest.stepTitles.pickupConsent",
        }
    }
}

pub fn device_info_complete(draft: &WizardDraft) -> bool {
    all_set(DEVICE_INFO_FIELDS, draft)
}

/// Presence only; address syntax is left to the receiving service.
pub fn contact_details_complete(draft: &WizardDraft) -> bool {
    all_set(CONTACT_FIELDS, draft)
}

pub fn pickup_consent_complete(draft: &WizardDraft) -> bool {
    all_set(PICKUP_FIELDS, draft)
}

pub fn is_step_valid(step: WizardStep, draft: &WizardDraft) -> bool {
    match step {
        WizardStep::DeviceInfo => device_info_complete(draft),
        WizardStep::ContactDetails => contact_details_complete(draft),
        WizardStep::PickupConsent => pickup_consent_complete(draft),
    }
}

/// Required fields of `step` that are not yet set, in form order.
pub fn missing_fields(step: WizardStep, draft: &WizardDraft) -> Vec<DraftField> {
    step.required_fields()
        .iter()
        .copied()
        .filter(|field| !field.is_set(draft))
        .collect()
}

fn all_set(fields: &[DraftField], draft: &WizardDraft) -> bool {
    fields.iter().all(|field| field.is_set(draft))
}
