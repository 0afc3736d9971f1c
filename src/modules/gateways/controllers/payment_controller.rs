use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::gateways::services::PaymentGateway;

/// Query parameters for listing payments
#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    10
}

/// List payments
/// GET /payments
pub async fn list_payments(
    gateway: web::Data<Arc<dyn PaymentGateway>>,
    query: web::Query<ListPaymentsQuery>,
) -> Result<HttpResponse, AppError> {
    let history = gateway.list_intents(query.limit, query.offset).await?;
    Ok(HttpResponse::Ok().json(history))
}

/// Get payment details
/// GET /payments/{id}
pub async fn get_payment(
    gateway: web::Data<Arc<dyn PaymentGateway>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payment = gateway.get_intent(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payment))
}

/// Configure payment lookup routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::get().to(list_payments))
            .route("/{id}", web::get().to(get_payment)),
    );
}
