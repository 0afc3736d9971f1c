use std::sync::Arc;

use chrono::{Days, Months, NaiveDate, Utc};
use tracing::info;

use crate::config::PlanCatalog;
use crate::core::{AppError, Result};
use crate::modules::gateways::models::{
    Agreement, AgreementDraft, AgreementTransactions, CreatedAgreement, Plan, PlanList,
    PlanRequest, PlanState,
};
use crate::modules::gateways::services::BillingGateway;

pub const DEFAULT_SUSPEND_NOTE: &str = "Suspending the agreement";
pub const DEFAULT_REACTIVATE_NOTE: &str = "Re-Active the agreement";
pub const DEFAULT_CANCEL_NOTE: &str = "Cancel the agreement";

/// Transaction history reaches this far back when no start date is given
const HISTORY_YEARS: u32 = 15;
/// ...and this many days ahead when no end date is given
const HISTORY_LOOKAHEAD_DAYS: u64 = 5;

/// Service for billing plan and agreement pass-through
pub struct BillingService {
    gateway: Arc<dyn BillingGateway>,
    catalog: PlanCatalog,
}

impl BillingService {
    pub fn new(gateway: Arc<dyn BillingGateway>, catalog: PlanCatalog) -> Self {
        Self { gateway, catalog }
    }

    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    /// Plan id configured for a catalog name
    pub fn resolve_plan(&self, name: &str) -> Result<&str> {
        self.catalog.get(name).ok_or_else(|| {
            AppError::validation(format!("No billing plan configured for '{}'", name))
        })
    }

    pub async fn create_plan(&self, request: &PlanRequest) -> Result<Plan> {
        if request.name.trim().is_empty() {
            return Err(AppError::validation("Plan name is required"));
        }
        if request.payment_definitions.is_empty() {
            return Err(AppError::validation(
                "Plan must have at least one payment definition",
            ));
        }

        self.gateway.create_plan(request).await
    }

    pub async fn get_plan(&self, plan_id: &str) -> Result<Plan> {
        self.gateway.get_plan(require("plan id", plan_id)?).await
    }

    pub async fn list_plans(&self, state: Option<PlanState>) -> Result<PlanList> {
        self.gateway.list_plans(state).await
    }

    pub async fn activate_plan(&self, plan_id: &str) -> Result<Plan> {
        self.gateway.activate_plan(require("plan id", plan_id)?).await
    }

    pub async fn delete_plan(&self, plan_id: &str) -> Result<()> {
        self.gateway.delete_plan(require("plan id", plan_id)?).await
    }

    /// Create an agreement for a plan id, using the default name, description
    /// and start date (one minute from now) when no draft is given
    pub async fn create_agreement(
        &self,
        plan_id: &str,
        draft: Option<AgreementDraft>,
    ) -> Result<CreatedAgreement> {
        let plan_id = require("plan id", plan_id)?;
        let draft = draft.unwrap_or_default();

        let created = self.gateway.create_agreement(plan_id, &draft).await?;
        info!(plan_id = %plan_id, "Billing agreement awaiting buyer approval");
        Ok(created)
    }

    /// Create an agreement for a named catalog plan
    pub async fn create_agreement_for(
        &self,
        plan_name: &str,
        draft: Option<AgreementDraft>,
    ) -> Result<CreatedAgreement> {
        let plan_id = self.resolve_plan(plan_name)?.to_string();
        self.create_agreement(&plan_id, draft).await
    }

    pub async fn execute_agreement(&self, token: &str) -> Result<Agreement> {
        self.gateway
            .execute_agreement(require("agreement token", token)?)
            .await
    }

    pub async fn get_agreement(&self, agreement_id: &str) -> Result<Agreement> {
        self.gateway
            .get_agreement(require("agreement id", agreement_id)?)
            .await
    }

    pub async fn suspend_agreement(&self, agreement_id: &str, note: Option<&str>) -> Result<Agreement> {
        self.gateway
            .suspend_agreement(
                require("agreement id", agreement_id)?,
                note_or(note, DEFAULT_SUSPEND_NOTE),
            )
            .await
    }

    pub async fn reactivate_agreement(
        &self,
        agreement_id: &str,
        note: Option<&str>,
    ) -> Result<Agreement> {
        self.gateway
            .reactivate_agreement(
                require("agreement id", agreement_id)?,
                note_or(note, DEFAULT_REACTIVATE_NOTE),
            )
            .await
    }

    pub async fn cancel_agreement(&self, agreement_id: &str, note: Option<&str>) -> Result<Agreement> {
        self.gateway
            .cancel_agreement(
                require("agreement id", agreement_id)?,
                note_or(note, DEFAULT_CANCEL_NOTE),
            )
            .await
    }

    /// Transactions of an agreement. Missing bounds fall back to
    /// [`transaction_window`] around today.
    pub async fn agreement_transactions(
        &self,
        agreement_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<AgreementTransactions> {
        let agreement_id = require("agreement id", agreement_id)?;
        let (default_start, default_end) = transaction_window(Utc::now().date_naive());
        let start_date = start_date.unwrap_or(default_start);
        let end_date = end_date.unwrap_or(default_end);

        if start_date > end_date {
            return Err(AppError::validation(format!(
                "start_date {} is after end_date {}",
                start_date, end_date
            )));
        }

        self.gateway
            .list_agreement_transactions(agreement_id, start_date, end_date)
            .await
    }
}

/// Default transaction search window: fifteen years back, five days ahead
pub fn transaction_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today
        .checked_sub_months(Months::new(HISTORY_YEARS * 12))
        .unwrap_or(NaiveDate::MIN);
    let end = today
        .checked_add_days(Days::new(HISTORY_LOOKAHEAD_DAYS))
        .unwrap_or(NaiveDate::MAX);
    (start, end)
}

fn require<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(AppError::validation(format!("{} is required", what)))
    } else {
        Ok(value)
    }
}

fn note_or<'a>(note: Option<&'a str>, default: &'a str) -> &'a str {
    note.map(str::trim)
        .filter(|note| !note.is_empty())
        .unwrap_or(default)
}
