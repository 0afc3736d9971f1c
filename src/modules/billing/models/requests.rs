use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::core::{AppError, Result};
use crate::modules::gateways::models::{AgreementDraft, PlanState};

/// Query of `GET /billing/plans`
#[derive(Debug, Default, Deserialize)]
pub struct ListPlansQuery {
    #[serde(default)]
    pub status: Option<PlanState>,
}

/// Body of `POST /billing/agreements`
///
/// Exactly one of `plan` (catalog name) or `plan_id` must be given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAgreementRequest {
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
}

/// Which plan an agreement is created for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSelector {
    Named(String),
    Id(String),
}

impl CreateAgreementRequest {
    pub fn plan_selector(&self) -> Result<PlanSelector> {
        let named = self.plan.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let id = self.plan_id.as_deref().map(str::trim).filter(|s| !s.is_empty());

        match (named, id) {
            (Some(name), None) => Ok(PlanSelector::Named(name.to_string())),
            (None, Some(id)) => Ok(PlanSelector::Id(id.to_string())),
            (Some(_), Some(_)) => Err(AppError::validation(
                "Specify either plan or plan_id, not both",
            )),
            (None, None) => Err(AppError::validation("plan or plan_id is required")),
        }
    }

    /// Agreement metadata, or `None` to use the defaults entirely
    pub fn draft(&self) -> Option<AgreementDraft> {
        if self.name.is_none() && self.description.is_none() && self.start_date.is_none() {
            return None;
        }

        let mut draft = AgreementDraft::default();
        if let Some(name) = &self.name {
            draft.name = name.clone();
        }
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        if let Some(start_date) = self.start_date {
            draft.start_date = start_date;
        }
        Some(draft)
    }
}

/// Body of `POST /billing/agreements/execute`
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteAgreementRequest {
    pub token: String,
}

/// Optional body of the suspend/reactivate/cancel routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgreementNote {
    #[serde(default)]
    pub note: Option<String>,
}

/// Query of `GET /billing/agreements/{id}/transactions`
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}
