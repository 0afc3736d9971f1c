use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::Currency;
use crate::modules::cart::LineItem;

/// Everything PayPal needs to create a payment intent, built from a ledger
/// snapshot at create time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentIntentRequest {
    pub currency: Currency,
    pub total: Decimal,
    pub line_items: Vec<LineItem>,
    pub description: String,
    pub return_url: String,
    pub cancel_url: String,
}

/// Result of a successful intent creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIntent {
    /// PayPal payment id (`PAY-...`), the correlation id for the redirect round-trip
    pub intent_id: String,

    /// Where the buyer must be sent to approve the payment
    pub approval_url: String,
}

/// HATEOAS link returned on every PayPal resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Find the `href` of the first link with the given `rel`
pub fn find_link<'a>(links: &'a [Link], rel: &str) -> Option<&'a str> {
    links
        .iter()
        .find(|link| link.rel.eq_ignore_ascii_case(rel))
        .map(|link| link.href.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerInfo {
    #[serde(default)]
    pub payer_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payer {
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_info: Option<PayerInfo>,
}

/// A PayPal payment resource as returned by get/execute/list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub id: String,
    #[serde(default)]
    pub intent: Option<String>,
    /// created, approved, failed
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub payer: Option<Payer>,
    #[serde(default)]
    pub transactions: Vec<Value>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    /// Fields not modelled above (failure_reason, cart, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentDetails {
    pub fn is_approved(&self) -> bool {
        self.state.as_deref() == Some("approved")
    }

    pub fn approval_url(&self) -> Option<&str> {
        find_link(&self.links, "approval_url")
    }
}

/// A page of payments from `GET /v1/payments/payment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentHistory {
    #[serde(default)]
    pub payments: Vec<PaymentDetails>,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub next_id: Option<String>,
}
