//! Variant payload schemas.
//!
//! Every payload is a plain struct with container-level `#[serde(default)]`,
//! so absent keys take the variant default. Optional sub-features are plain
//! `bool`s that default to `false`: only an explicit JSON `true` enables them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadlineContent {
    pub text: String,
    /// Heading level, 1-6
    pub level: u8,
    pub subheadline: Option<String>,
}

impl Default for HeadlineContent {
    fn default() -> Self {
        Self {
            text: "Your headline here".to_string(),
            level: 1,
            subheadline: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextContent {
    pub text: String,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            text: "Tell your visitors why this matters.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageContent {
    pub src: Option<String>,
    pub alt: String,
    pub link: Option<String>,
    pub width: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonContent {
    pub label: String,
    pub url: String,
    pub open_in_new_tab: bool,
}

impl Default for ButtonContent {
    fn default() -> Self {
        Self {
            label: "Get started".to_string(),
            url: "#".to_string(),
            open_in_new_tab: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoContent {
    pub url: Option<String>,
    pub autoplay: bool,
    pub show_controls: bool,
}

impl Default for VideoContent {
    fn default() -> Self {
        Self {
            url: None,
            autoplay: false,
            show_controls: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Textarea,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}

impl FormField {
    fn new(name: &str, label: &str, field_type: FieldType, required: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormContent {
    pub title: String,
    pub fields: Vec<FormField>,
    pub submit_label: String,
    pub redirect_url: Option<String>,
    /// Optional phone capture; off unless explicitly `true`
    pub collect_phone: bool,
}

impl Default for FormContent {
    fn default() -> Self {
        Self {
            title: "Get instant access".to_string(),
            fields: vec![
                FormField::new("name", "Your name", FieldType::Text, false),
                FormField::new("email", "Your email", FieldType::Email, true),
            ],
            submit_label: "Send".to_string(),
            redirect_url: None,
            collect_phone: false,
        }
    }
}

/// Checkout widget. `enable_card` and `enable_bank` are the two payment
/// methods; at least one of them must stay enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutContent {
    pub product_name: String,
    /// Display string only; pricing is computed elsewhere
    pub price_label: String,
    pub button_label: String,
    pub enable_card: bool,
    pub enable_bank: bool,
    /// Optional address collection; off unless explicitly `true`
    pub collect_address: bool,
}

impl CheckoutContent {
    pub fn enabled_payment_methods(&self) -> usize {
        usize::from(self.enable_card) + usize::from(self.enable_bank)
    }
}

impl Default for CheckoutContent {
    fn default() -> Self {
        Self {
            product_name: "Your product".to_string(),
            price_label: "$49".to_string(),
            button_label: "Complete purchase".to_string(),
            enable_card: true,
            enable_bank: false,
            collect_address: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub highlighted: bool,
    pub cta_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingTableContent {
    pub plans: Vec<PricingPlan>,
}

impl Default for PricingTableContent {
    fn default() -> Self {
        Self {
            plans: vec![
                PricingPlan {
                    name: "Basic".to_string(),
                    price: "$19/mo".to_string(),
                    features: vec!["Core features".to_string()],
                    highlighted: false,
                    cta_label: "Choose Basic".to_string(),
                },
                PricingPlan {
                    name: "Pro".to_string(),
                    price: "$49/mo".to_string(),
                    features: vec!["Everything in Basic".to_string(), "Priority support".to_string()],
                    highlighted: true,
                    cta_label: "Choose Pro".to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestimonialContent {
    pub quote: String,
    pub author: String,
    pub role: Option<String>,
    pub avatar: Option<String>,
}

impl Default for TestimonialContent {
    fn default() -> Self {
        Self {
            quote: "This changed everything for us.".to_string(),
            author: "Happy customer".to_string(),
            role: None,
            avatar: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountdownContent {
    pub ends_at: Option<DateTime<Utc>>,
    pub expired_message: String,
}

impl Default for CountdownContent {
    fn default() -> Self {
        Self {
            ends_at: None,
            expired_message: "This offer has ended.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DividerStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DividerContent {
    pub style: DividerStyle,
    pub thickness: u8,
}

impl Default for DividerContent {
    fn default() -> Self {
        Self {
            style: DividerStyle::Solid,
            thickness: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpacerContent {
    pub height: String,
}

impl Default for SpacerContent {
    fn default() -> Self {
        Self {
            height: "32px".to_string(),
        }
    }
}
