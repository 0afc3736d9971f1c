use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::billing::models::{
    AgreementNote, CreateAgreementRequest, ExecuteAgreementRequest, ListPlansQuery,
    PlanSelector, TransactionsQuery,
};
use crate::modules::billing::services::BillingService;
use crate::modules::gateways::models::PlanRequest;

/// Create a billing plan
/// POST /billing/plans
pub async fn create_plan(
    service: web::Data<Arc<BillingService>>,
    request: web::Json<PlanRequest>,
) -> Result<HttpResponse, AppError> {
    let plan = service.create_plan(&request).await?;
    Ok(HttpResponse::Created().json(plan))
}

/// List billing plans, optionally filtered by state
/// GET /billing/plans
pub async fn list_plans(
    service: web::Data<Arc<BillingService>>,
    query: web::Query<ListPlansQuery>,
) -> Result<HttpResponse, AppError> {
    let plans = service.list_plans(query.status).await?;
    Ok(HttpResponse::Ok().json(plans))
}

/// GET /billing/plans/{id}
pub async fn get_plan(
    service: web::Data<Arc<BillingService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let plan = service.get_plan(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(plan))
}

/// POST /billing/plans/{id}/activate
pub async fn activate_plan(
    service: web::Data<Arc<BillingService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let plan = service.activate_plan(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(plan))
}

/// DELETE /billing/plans/{id}
pub async fn delete_plan(
    service: web::Data<Arc<BillingService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_plan(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Create an agreement for a catalog plan name or a plan id
/// POST /billing/agreements
pub async fn create_agreement(
    service: web::Data<Arc<BillingService>>,
    request: web::Json<CreateAgreementRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = request.draft();
    let created = match request.plan_selector()? {
        PlanSelector::Named(name) => service.create_agreement_for(&name, draft).await?,
        PlanSelector::Id(plan_id) => service.create_agreement(&plan_id, draft).await?,
    };

    Ok(HttpResponse::Created().json(created))
}

/// Execute an agreement after buyer approval
/// POST /billing/agreements/execute
pub async fn execute_agreement(
    service: web::Data<Arc<BillingService>>,
    request: web::Json<ExecuteAgreementRequest>,
) -> Result<HttpResponse, AppError> {
    let agreement = service.execute_agreement(&request.token).await?;
    Ok(HttpResponse::Ok().json(agreement))
}

/// GET /billing/agreements/{id}
pub async fn get_agreement(
    service: web::Data<Arc<BillingService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let agreement = service.get_agreement(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(agreement))
}

fn note_of(body: &Option<web::Json<AgreementNote>>) -> Option<&str> {
    body.as_ref().and_then(|body| body.note.as_deref())
}

/// POST /billing/agreements/{id}/suspend
pub async fn suspend_agreement(
    service: web::Data<Arc<BillingService>>,
    path: web::Path<String>,
    body: Option<web::Json<AgreementNote>>,
) -> Result<HttpResponse, AppError> {
    let agreement = service
        .suspend_agreement(&path.into_inner(), note_of(&body))
        .await?;
    Ok(HttpResponse::Ok().json(agreement))
}

/// POST /billing/agreements/{id}/reactivate
pub async fn reactivate_agreement(
    service: web::Data<Arc<BillingService>>,
    path: web::Path<String>,
    body: Option<web::Json<AgreementNote>>,
) -> Result<HttpResponse, AppError> {
    let agreement = service
        .reactivate_agreement(&path.into_inner(), note_of(&body))
        .await?;
    Ok(HttpResponse::Ok().json(agreement))
}

/// POST /billing/agreements/{id}/cancel
pub async fn cancel_agreement(
    service: web::Data<Arc<BillingService>>,
    path: web::Path<String>,
    body: Option<web::Json<AgreementNote>>,
) -> Result<HttpResponse, AppError> {
    let agreement = service
        .cancel_agreement(&path.into_inner(), note_of(&body))
        .await?;
    Ok(HttpResponse::Ok().json(agreement))
}

/// GET /billing/agreements/{id}/transactions
pub async fn agreement_transactions(
    service: web::Data<Arc<BillingService>>,
    path: web::Path<String>,
    query: web::Query<TransactionsQuery>,
) -> Result<HttpResponse, AppError> {
    let transactions = service
        .agreement_transactions(&path.into_inner(), query.start_date, query.end_date)
        .await?;
    Ok(HttpResponse::Ok().json(transactions))
}

/// Configure billing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/billing")
            .route("/plans", web::post().to(create_plan))
            .route("/plans", web::get().to(list_plans))
            .route("/plans/{id}", web::get().to(get_plan))
            .route("/plans/{id}", web::delete().to(delete_plan))
            .route("/plans/{id}/activate", web::post().to(activate_plan))
            .route("/agreements", web::post().to(create_agreement))
            .route("/agreements/execute", web::post().to(execute_agreement))
            .route("/agreements/{id}", web::get().to(get_agreement))
            .route("/agreements/{id}/suspend", web::post().to(suspend_agreement))
            .route("/agreements/{id}/reactivate", web::post().to(reactivate_agreement))
            .route("/agreements/{id}/cancel", web::post().to(cancel_agreement))
            .route(
                "/agreements/{id}/transactions",
                web::get().to(agreement_transactions),
            ),
    );
}
