use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::core::Currency;
use crate::modules::cart::NewItem;
use crate::modules::gateways::models::PaymentDetails;

/// Session key prefix for pending payments; the checkout id is appended
pub const PENDING_PAYMENT_KEY: &str = "paypal_payment_id";

/// Identifies one checkout attempt and scopes its session slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckoutId(String);

impl CheckoutId {
    /// Fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Session key holding this attempt's pending payment
    pub fn session_key(&self) -> String {
        format!("{}:{}", PENDING_PAYMENT_KEY, self.0)
    }
}

impl Default for CheckoutId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for CheckoutId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CheckoutId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for CheckoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Correlation record stored between intent creation and capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPayment {
    pub intent_id: String,
    pub created_at: DateTime<Utc>,
}

impl PendingPayment {
    pub fn new(intent_id: impl Into<String>) -> Self {
        Self {
            intent_id: intent_id.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether the record is older than `ttl` at `now`. No ttl means it never expires.
    pub fn is_expired(&self, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
        match ttl {
            Some(ttl) => now - self.created_at > ttl,
            None => false,
        }
    }
}

/// Query parameters PayPal appends to the return URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackParams {
    #[serde(rename = "PayerID", default)]
    pub payer_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "paymentId", default)]
    pub payment_id: Option<String>,
}

impl CallbackParams {
    pub fn new(payer_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            payer_id: Some(payer_id.into()),
            token: Some(token.into()),
            payment_id: None,
        }
    }

    pub fn payer_id(&self) -> Option<&str> {
        non_empty(&self.payer_id)
    }

    pub fn token(&self) -> Option<&str> {
        non_empty(&self.token)
    }

    pub fn payment_id(&self) -> Option<&str> {
        non_empty(&self.payment_id)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Lifecycle of one checkout attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    Idle,
    PendingApproval,
    Captured,
    Failed,
}

/// Result of handling a PayPal return callback
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    /// Payment executed
    Captured(PaymentDetails),
    /// Nothing to capture: stray, replayed, expired or incomplete callback
    NoPendingPayment,
}

impl CallbackOutcome {
    pub fn is_captured(&self) -> bool {
        matches!(self, CallbackOutcome::Captured(_))
    }
}

/// Body of `POST /checkout`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCheckoutRequest {
    #[serde(default)]
    pub currency: Option<Currency>,
    pub items: Vec<NewItem>,
    #[serde(default)]
    pub description: String,
    /// May contain `{checkout_id}`
    pub return_url: String,
    #[serde(default)]
    pub cancel_url: Option<String>,
}

/// Response of `POST /checkout`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutCreated {
    pub checkout_id: CheckoutId,
    pub intent_id: String,
    pub approval_url: String,
}
