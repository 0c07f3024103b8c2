use crate::catalog::{PickupSlot, Urgency};
use serde::{Deserialize, Serialize};

/// The in-progress repair request, and the payload sent on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardDraft {
    pub device_brand: String,
    pub device_model: String,
    pub issue_category: String,
    pub specific_issue: String,
    pub description: String,
    pub urgency: Urgency,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub pickup_address: String,
    pub pickup_time: Option<PickupSlot>,
    pub gdpr_consent: bool,
}

/// Fields that gate progression through the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    DeviceBrand,
    DeviceModel,
    IssueCategory,
    SpecificIssue,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    PickupAddress,
    GdprConsent,
}

impl DraftField {
    /// Translation key of the field's form label.
    pub fn label_key(&self) -> &'static str {
        match self {
            DraftField::DeviceBrand => "submitRequest.form.deviceBrand",
            DraftField::DeviceModel => "submitRequest.form.deviceModel",
            DraftField::IssueCategory => "submitRequest.form.issueCategory",
            DraftField::SpecificIssue => "submitRequest.form.specificIssue",
            DraftField::CustomerName => "submitRequest.form.fullName",
            DraftField::CustomerEmail => "submitRequest.form.emailAddress",
            DraftField::CustomerPhone => "submitRequest.form.phoneNumber",
            DraftField::PickupAddress => "submitRequest.form.pickupAddress",
            DraftField::GdprConsent => "submitRequest.form.gdprConsent",
        }
    }

    /// Whether the field holds a usable value in `draft`.
    ///
    /// Text fields count as set when they contain something other than
    /// whitespace; consent counts as set only when given.
    pub fn is_set(&self, draft: &WizardDraft) -> bool {
        let text = match self {
            DraftField::DeviceBrand => &draft.device_brand,
            DraftField::DeviceModel => &draft.device_model,
            DraftField::IssueCategory => &draft.issue_category,
            DraftField::SpecificIssue => &draft.specific_issue,
            DraftField::CustomerName => &draft.customer_name,
            DraftField::CustomerEmail => &draft.customer_email,
            DraftField::CustomerPhone => &draft.customer_phone,
            DraftField::PickupAddress => &draft.pickup_address,
            DraftField::GdprConsent => return draft.gdpr_consent,
        };
        !text.trim().is_empty()
    }
}
