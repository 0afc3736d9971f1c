use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use super::gateway_trait::BillingGateway;
use super::paypal::PaypalClient;
use crate::core::{AppError, Result};
use crate::modules::gateways::models::{
    Agreement, AgreementDraft, AgreementTransactions, CreatedAgreement, Plan, PlanList,
    PlanRequest, PlanState,
};

const PLANS_PATH: &str = "/v1/payments/billing-plans";
const AGREEMENTS_PATH: &str = "/v1/payments/billing-agreements";

#[derive(Debug, Serialize)]
struct WireAgreement<'a> {
    name: &'a str,
    description: &'a str,
    start_date: String,
    plan: WirePlanRef<'a>,
    payer: WirePayer,
}

#[derive(Debug, Serialize)]
struct WirePlanRef<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct WirePayer {
    payment_method: &'static str,
}

#[derive(Debug, Serialize)]
struct StateDescriptor<'a> {
    note: &'a str,
}

impl PaypalClient {
    /// POST a state descriptor to `/{agreement_id}/{action}` and re-fetch the agreement
    async fn change_agreement_state(
        &self,
        operation: &str,
        agreement_id: &str,
        action: &str,
        note: &str,
    ) -> Result<Agreement> {
        let path = format!("{}/{}/{}", AGREEMENTS_PATH, agreement_id, action);
        let http = self
            .authorized(Method::POST, &path)
            .await?
            .json(&StateDescriptor { note });

        self.send_no_content(operation, http)
            .await
            .map_err(|e| e.with_correlation_id(agreement_id))?;

        tracing::info!(agreement_id = %agreement_id, action = action, "Billing agreement state changed");

        self.get_agreement(agreement_id).await
    }
}

#[async_trait]
impl BillingGateway for PaypalClient {
    async fn create_plan(&self, request: &PlanRequest) -> Result<Plan> {
        let http = self.authorized(Method::POST, PLANS_PATH).await?.json(request);
        let plan: Plan = self.send_json("create_plan", http).await?;

        tracing::info!(plan_id = %plan.id, name = %request.name, "Billing plan created");
        Ok(plan)
    }

    async fn get_plan(&self, plan_id: &str) -> Result<Plan> {
        let path = format!("{}/{}", PLANS_PATH, plan_id);
        let http = self.authorized(Method::GET, &path).await?;

        self.send_json("get_plan", http)
            .await
            .map_err(|e| e.with_correlation_id(plan_id))
    }

    async fn list_plans(&self, state: Option<PlanState>) -> Result<PlanList> {
        let mut http = self.authorized(Method::GET, PLANS_PATH).await?;
        if let Some(state) = state {
            http = http.query(&[("status", state.as_str())]);
        }

        // PayPal answers an empty listing with `{}` or an empty 204
        let list: Option<PlanList> = self.send_optional_json("list_plans", http).await?;

        Ok(list.unwrap_or_default())
    }

    async fn activate_plan(&self, plan_id: &str) -> Result<Plan> {
        let path = format!("{}/{}", PLANS_PATH, plan_id);
        let patch = json!([{
            "op": "replace",
            "path": "/",
            "value": {"state": "ACTIVE"}
        }]);
        let http = self.authorized(Method::PATCH, &path).await?.json(&patch);

        self.send_no_content("activate_plan", http)
            .await
            .map_err(|e| e.with_correlation_id(plan_id))?;

        tracing::info!(plan_id = %plan_id, "Billing plan activated");
        self.get_plan(plan_id).await
    }

    async fn delete_plan(&self, plan_id: &str) -> Result<()> {
        // PayPal deletes a plan by patching its state
        let path = format!("{}/{}", PLANS_PATH, plan_id);
        let patch = json!([{
            "op": "replace",
            "path": "/",
            "value": {"state": "DELETED"}
        }]);
        let http = self.authorized(Method::PATCH, &path).await?.json(&patch);

        self.send_no_content("delete_plan", http)
            .await
            .map_err(|e| e.with_correlation_id(plan_id))?;

        tracing::info!(plan_id = %plan_id, "Billing plan deleted");
        Ok(())
    }

    async fn create_agreement(
        &self,
        plan_id: &str,
        draft: &AgreementDraft,
    ) -> Result<CreatedAgreement> {
        let body = WireAgreement {
            name: &draft.name,
            description: &draft.description,
            start_date: draft.start_date_wire(),
            plan: WirePlanRef { id: plan_id },
            payer: WirePayer {
                payment_method: "paypal",
            },
        };
        let http = self
            .authorized(Method::POST, AGREEMENTS_PATH)
            .await?
            .json(&body);

        let agreement: Agreement = self
            .send_json("create_agreement", http)
            .await
            .map_err(|e| e.with_correlation_id(plan_id))?;

        let approval_url = agreement
            .approval_url()
            .ok_or_else(|| {
                AppError::gateway(
                    "create_agreement",
                    "MISSING_APPROVAL_URL",
                    "PayPal response did not include an approval_url link",
                )
                .with_correlation_id(plan_id)
            })?
            .to_string();

        Ok(CreatedAgreement {
            agreement,
            approval_url,
        })
    }

    async fn execute_agreement(&self, token: &str) -> Result<Agreement> {
        let path = format!("{}/{}/agreement-execute", AGREEMENTS_PATH, token);
        let http = self.authorized(Method::POST, &path).await?.json(&json!({}));

        let agreement: Agreement = self
            .send_json("execute_agreement", http)
            .await
            .map_err(|e| e.with_correlation_id(token))?;

        tracing::info!(agreement_id = ?agreement.id, "Billing agreement executed");
        Ok(agreement)
    }

    async fn get_agreement(&self, agreement_id: &str) -> Result<Agreement> {
        let path = format!("{}/{}", AGREEMENTS_PATH, agreement_id);
        let http = self.authorized(Method::GET, &path).await?;

        self.send_json("get_agreement", http)
            .await
            .map_err(|e| e.with_correlation_id(agreement_id))
    }

    async fn suspend_agreement(&self, agreement_id: &str, note: &str) -> Result<Agreement> {
        self.change_agreement_state("suspend_agreement", agreement_id, "suspend", note)
            .await
    }

    async fn reactivate_agreement(&self, agreement_id: &str, note: &str) -> Result<Agreement> {
        self.change_agreement_state("reactivate_agreement", agreement_id, "re-activate", note)
            .await
    }

    async fn cancel_agreement(&self, agreement_id: &str, note: &str) -> Result<Agreement> {
        self.change_agreement_state("cancel_agreement", agreement_id, "cancel", note)
            .await
    }

    async fn list_agreement_transactions(
        &self,
        agreement_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AgreementTransactions> {
        let path = format!("{}/{}/transactions", AGREEMENTS_PATH, agreement_id);
        let http = self.authorized(Method::GET, &path).await?.query(&[
            ("start_date", start_date.format("%Y-%m-%d").to_string()),
            ("end_date", end_date.format("%Y-%m-%d").to_string()),
        ]);

        self.send_json("list_agreement_transactions", http)
            .await
            .map_err(|e| e.with_correlation_id(agreement_id))
    }
}
