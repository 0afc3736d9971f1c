use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::Result;
use crate::modules::gateways::models::{
    Agreement, AgreementDraft, AgreementTransactions, CreatedAgreement, CreatedIntent,
    PaymentDetails, PaymentHistory, PaymentIntentRequest, Plan, PlanList, PlanRequest, PlanState,
};

/// Payment gateway for the create → approve → execute intent flow
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent and return its id and approval URL
    async fn create_intent(&self, request: &PaymentIntentRequest) -> Result<CreatedIntent>;

    /// Execute an approved intent on behalf of the payer
    async fn execute_intent(&self, intent_id: &str, payer_id: &str) -> Result<PaymentDetails>;

    /// Fetch a single intent
    async fn get_intent(&self, intent_id: &str) -> Result<PaymentDetails>;

    /// Page through intents, newest first
    async fn list_intents(&self, limit: u32, offset: u32) -> Result<PaymentHistory>;

    /// Get gateway name
    fn name(&self) -> &str;
}

/// Recurring billing plans and agreements. Every call is a single
/// request/response against the gateway.
#[async_trait]
pub trait BillingGateway: Send + Sync {
    async fn create_plan(&self, request: &PlanRequest) -> Result<Plan>;

    async fn get_plan(&self, plan_id: &str) -> Result<Plan>;

    async fn list_plans(&self, state: Option<PlanState>) -> Result<PlanList>;

    /// Move a plan to ACTIVE and return the updated plan
    async fn activate_plan(&self, plan_id: &str) -> Result<Plan>;

    async fn delete_plan(&self, plan_id: &str) -> Result<()>;

    /// Create an agreement for a plan; the buyer must visit the approval URL
    async fn create_agreement(
        &self,
        plan_id: &str,
        draft: &AgreementDraft,
    ) -> Result<CreatedAgreement>;

    /// Execute an approved agreement using the token from the approval redirect
    async fn execute_agreement(&self, token: &str) -> Result<Agreement>;

    async fn get_agreement(&self, agreement_id: &str) -> Result<Agreement>;

    async fn suspend_agreement(&self, agreement_id: &str, note: &str) -> Result<Agreement>;

    async fn reactivate_agreement(&self, agreement_id: &str, note: &str) -> Result<Agreement>;

    async fn cancel_agreement(&self, agreement_id: &str, note: &str) -> Result<Agreement>;

    async fn list_agreement_transactions(
        &self,
        agreement_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AgreementTransactions>;
}
