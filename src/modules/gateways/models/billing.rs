// Billing plan and agreement resources for /v1/payments/billing-plans and
// /v1/payments/billing-agreements. PayPal sends counters such as
// `frequency_interval` and `cycles` as strings, so they stay strings here.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::payment::{find_link, Link};
use crate::core::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanType {
    Fixed,
    Infinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanState {
    Created,
    Active,
    Inactive,
    Deleted,
}

impl PlanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanState::Created => "CREATED",
            PlanState::Active => "ACTIVE",
            PlanState::Inactive => "INACTIVE",
            PlanState::Deleted => "DELETED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DefinitionType {
    Trial,
    Regular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    #[serde(alias = "Day")]
    Day,
    #[serde(alias = "Week")]
    Week,
    #[serde(alias = "Month")]
    Month,
    #[serde(alias = "Year")]
    Year,
}

/// One billing cycle definition within a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub definition_type: DefinitionType,
    pub frequency: Frequency,
    pub frequency_interval: String,
    /// "0" means infinite
    pub cycles: String,
    pub amount: Money,
}

impl PaymentDefinition {
    pub fn new(
        name: impl Into<String>,
        definition_type: DefinitionType,
        frequency: Frequency,
        frequency_interval: u32,
        cycles: u32,
        amount: Money,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            definition_type,
            frequency,
            frequency_interval: frequency_interval.to_string(),
            cycles: cycles.to_string(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantPreferences {
    pub return_url: String,
    pub cancel_url: String,
    /// YES or NO
    pub auto_bill_amount: String,
    /// CONTINUE or CANCEL
    pub initial_fail_amount_action: String,
    pub max_fail_attempts: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_fee: Option<Money>,
}

impl MerchantPreferences {
    /// Auto-billing, continue on initial failure, unlimited retries
    pub fn new(return_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        Self {
            return_url: return_url.into(),
            cancel_url: cancel_url.into(),
            auto_bill_amount: "YES".to_string(),
            initial_fail_amount_action: "CONTINUE".to_string(),
            max_fail_attempts: "0".to_string(),
            setup_fee: None,
        }
    }
}

/// Body of `POST /v1/payments/billing-plans`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub payment_definitions: Vec<PaymentDefinition>,
    pub merchant_preferences: MerchantPreferences,
}

/// A billing plan resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub plan_type: Option<PlanType>,
    #[serde(default)]
    pub state: Option<PlanState>,
    #[serde(default)]
    pub payment_definitions: Vec<PaymentDefinition>,
    #[serde(default)]
    pub merchant_preferences: Option<MerchantPreferences>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlanList {
    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub total_items: Option<String>,
    #[serde(default)]
    pub total_pages: Option<String>,
}

/// Caller-controlled part of an agreement; plan and payer are filled in by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementDraft {
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
}

impl Default for AgreementDraft {
    fn default() -> Self {
        Self {
            name: "Base Agreement".to_string(),
            description: "Basic Agreement".to_string(),
            start_date: Utc::now() + chrono::Duration::minutes(1),
        }
    }
}

impl AgreementDraft {
    /// Start date in the `yyyy-MM-ddTHH:mm:ssZ` form PayPal requires
    pub fn start_date_wire(&self) -> String {
        self.start_date.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// A billing agreement resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agreement {
    /// Absent until the agreement is executed
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Active, Suspended, Cancelled, ...
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub plan: Option<Value>,
    #[serde(default)]
    pub payer: Option<Value>,
    #[serde(default)]
    pub agreement_details: Option<Value>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Agreement {
    pub fn approval_url(&self) -> Option<&str> {
        find_link(&self.links, "approval_url")
    }
}

/// Agreement awaiting buyer approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedAgreement {
    pub agreement: Agreement,
    pub approval_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementTransaction {
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub fee_amount: Option<Money>,
    #[serde(default)]
    pub net_amount: Option<Money>,
    #[serde(default)]
    pub payer_email: Option<String>,
    #[serde(default)]
    pub payer_name: Option<String>,
    #[serde(default)]
    pub time_stamp: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AgreementTransactions {
    #[serde(default)]
    pub agreement_transaction_list: Vec<AgreementTransaction>,
}
