//! Static option tables offered by the request wizard.
//!
//! Brand and category names double as submitted values, so they are not
//! translated; pickup slots and urgency levels carry a translation key.

use serde::{Deserialize, Serialize};

/// A device brand and the models offered for it.
#[derive(Debug, Clone, Copy)]
pub struct DeviceBrand {
    pub name: &'static str,
    pub models: &'static [&'static str],
}

/// An issue category and the specific issues offered for it.
#[derive(Debug, Clone, Copy)]
pub struct IssueCategory {
    pub category: &'static str,
    pub issues: &'static [&'static str],
}

pub const DEVICE_BRANDS: &[DeviceBrand] = &[
    DeviceBrand {
        name: "iPhone",
        models: &[
            "iPhone 15 Pro Max",
            "iPhone 15 Pro",
            "iPhone 15",
            "iPhone 14 Pro Max",
            "iPhone 14 Pro",
            "iPhone 14",
            "iPhone 13",
            "iPhone 12",
            "Other iPhone",
        ],
    },
    DeviceBrand {
        name: "Samsung",
        models: &[
            "Galaxy S24 Ultra",
            "Galaxy S24+",
            "Galaxy S24",
            "Galaxy S23",
            "Galaxy Note 20",
            "Galaxy A54",
            "Other Samsung",
        ],
    },
    DeviceBrand {
        name: "Google",
        models: &["Pixel 8 Pro", "Pixel 8", "Pixel 7", "Pixel 6", "Other Pixel"],
    },
    DeviceBrand {
        name: "OnePlus",
        models: &["OnePlus 12", "OnePlus 11", "OnePlus 10", "Other OnePlus"],
    },
    DeviceBrand {
        name: "Other",
        models: &["Huawei", "Xiaomi", "LG", "Motorola", "Other Brand"],
    },
];

pub const ISSUE_CATEGORIES: &[IssueCategory] = &[
    IssueCategory {
        category: "Screen Issues",
        issues: &[
            "Cracked Screen",
            "Black Screen",
            "Screen Flickering",
            "Touch Not Working",
            "Display Lines",
        ],
    },
    IssueCategory {
        category: "Battery Issues",
        issues: &[
            "Fast Battery Drain",
            "Won't Charge",
            "Overheating",
            "Battery Swelling",
            "Random Shutdowns",
        ],
    },
    IssueCategory {
        category: "Audio Issues",
        issues: &[
            "No Sound",
            "Speaker Distortion",
            "Microphone Not Working",
            "Headphone Jack Issues",
        ],
    },
    IssueCategory {
        category: "Camera Issues",
        issues: &[
            "Camera Won't Open",
            "Blurry Photos",
            "Flash Not Working",
            "Front Camera Issues",
        ],
    },
    IssueCategory {
        category: "Network Issues",
        issues: &[
            "No Signal",
            "WiFi Not Working",
            "Bluetooth Issues",
            "Mobile Data Problems",
        ],
    },
    IssueCategory {
        category: "Physical Damage",
        issues: &[
            "Water Damage",
            "Cracked Back",
            "Bent Frame",
            "Broken Buttons",
            "Charging Port Damage",
        ],
    },
    IssueCategory {
        category: "Software Issues",
        issues: &[
            "Won't Turn On",
            "Frozen Screen",
            "App Crashes",
            "Slow Performance",
            "Storage Full",
        ],
    },
];

/// Models offered for `brand`, or `None` for an unknown brand.
pub fn models_for(brand: &str) -> Option<&'static [&'static str]> {
    DEVICE_BRANDS
        .iter()
        .find(|b| b.name == brand)
        .map(|b| b.models)
}

/// Specific issues offered for `category`, or `None` for an unknown category.
pub fn issues_for(category: &str) -> Option<&'static [&'static str]> {
    ISSUE_CATEGORIES
        .iter()
        .find(|c| c.category == category)
        .map(|c| c.issues)
}

/// How quickly the customer needs the device back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
}

impl Urgency {
    pub const ALL: [Urgency; 2] = [Urgency::Normal, Urgency::Urgent];

    pub fn label_key(&self) -> &'static str {
        match self {
            Urgency::Normal => "submitRequest.urgencyOptions.normal",
            Urgency::Urgent => "submitRequest.urgencyOptions.urgent",
        }
    }
}

/// Preferred pickup window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupSlot {
    #[serde(rename = "9am-12pm")]
    Morning,
    #[serde(rename = "12pm-3pm")]
    Afternoon,
    #[serde(rename = "3pm-6pm")]
    Evening,
    #[serde(rename = "flexible")]
    Flexible,
}

impl PickupSlot {
    pub const ALL: [PickupSlot; 4] = [
        PickupSlot::Morning,
        PickupSlot::Afternoon,
        PickupSlot::Evening,
        PickupSlot::Flexible,
    ];

    /// Value sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PickupSlot::Morning => "9am-12pm",
            PickupSlot::Afternoon => "12pm-3pm",
            PickupSlot::Evening => "3pm-6pm",
            PickupSlot::Flexible => "flexible",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            PickupSlot::Morning => "submitRequest.pickupTimeOptions.morning",
            PickupSlot::Afternoon => "submitRequest.pickupTimeOptions.afternoon",
            PickupSlot::Evening => "submitRequest.pickupTimeOptions.evening",
            PickupSlot::Flexible => "submitRequest.pickupTimeOptions.flexible",
        }
    }
}
