use std::sync::Arc;

use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::Duration;
use serde_json::json;

use crate::config::Config;
use crate::core::error::AppError;
use crate::core::Currency;
use crate::modules::checkout::models::{
    CallbackOutcome, CallbackParams, CheckoutCreated, CheckoutId, CreateCheckoutRequest,
};
use crate::modules::checkout::services::{InMemorySessionStore, PaymentSessionCoordinator};
use crate::modules::gateways::services::PaymentGateway;

/// Placeholder in `return_url`/`cancel_url` replaced by the new checkout id
const CHECKOUT_ID_PLACEHOLDER: &str = "{checkout_id}";

/// Checkout defaults shared with the handlers as app data
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub default_currency: Currency,
    pub token_ttl: Option<Duration>,
}

impl CheckoutSettings {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            default_currency: config.paypal.currency,
            token_ttl: config.session.token_ttl()?,
        })
    }
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            default_currency: Currency::default(),
            token_ttl: Some(Duration::minutes(60)),
        }
    }
}

/// Cookie session key listing the checkout ids started by this browser
const OWNED_CHECKOUTS_KEY: &str = "checkout_ids";

/// Oldest ids are dropped once a browser has this many open checkouts
const MAX_OWNED_CHECKOUTS: usize = 8;

fn coordinator_for(
    gateway: &web::Data<Arc<dyn PaymentGateway>>,
    settings: &CheckoutSettings,
    store: &web::Data<InMemorySessionStore>,
    checkout_id: CheckoutId,
) -> PaymentSessionCoordinator<InMemorySessionStore> {
    PaymentSessionCoordinator::new(
        gateway.get_ref().clone(),
        store.get_ref().clone(),
        checkout_id,
    )
    .with_token_ttl(settings.token_ttl)
}

fn owned_checkouts(session: &Session) -> Result<Vec<CheckoutId>, AppError> {
    session
        .get::<Vec<CheckoutId>>(OWNED_CHECKOUTS_KEY)
        .map(Option::unwrap_or_default)
        .map_err(|e| AppError::session(format!("Failed to read checkout ids: {}", e)))
}

/// Record in the browser session that it started `checkout_id`
fn claim_checkout(session: &Session, checkout_id: &CheckoutId) -> Result<(), AppError> {
    let mut owned = owned_checkouts(session)?;
    owned.retain(|id| id != checkout_id);
    owned.push(checkout_id.clone());
    if owned.len() > MAX_OWNED_CHECKOUTS {
        owned.drain(..owned.len() - MAX_OWNED_CHECKOUTS);
    }

    session
        .insert(OWNED_CHECKOUTS_KEY, owned)
        .map_err(|e| AppError::session(format!("Failed to store checkout ids: {}", e)))
}

/// Start a checkout and return the PayPal approval URL
/// POST /checkout
///
/// The pending payment is kept server-side; the browser session only records
/// which checkout ids it started.
pub async fn create_checkout(
    gateway: web::Data<Arc<dyn PaymentGateway>>,
    settings: web::Data<CheckoutSettings>,
    store: web::Data<InMemorySessionStore>,
    session: Session,
    request: web::Json<CreateCheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let checkout_id = CheckoutId::new();
    let mut coordinator = coordinator_for(&gateway, &settings, &store, checkout_id.clone());

    coordinator.set_currency(request.currency.unwrap_or(settings.default_currency));
    coordinator.add_items(request.items)?;
    coordinator.set_return_url(
        request
            .return_url
            .replace(CHECKOUT_ID_PLACEHOLDER, checkout_id.as_str()),
    );
    if let Some(cancel_url) = request.cancel_url {
        coordinator.set_cancel_url(cancel_url.replace(CHECKOUT_ID_PLACEHOLDER, checkout_id.as_str()));
    }

    let created = coordinator.create_payment(&request.description).await?;
    claim_checkout(&session, &checkout_id)?;

    Ok(HttpResponse::Created().json(CheckoutCreated {
        checkout_id,
        intent_id: created.intent_id,
        approval_url: created.approval_url,
    }))
}

/// PayPal return redirect
/// GET /checkout/{checkout_id}/callback
pub async fn checkout_callback(
    gateway: web::Data<Arc<dyn PaymentGateway>>,
    settings: web::Data<CheckoutSettings>,
    store: web::Data<InMemorySessionStore>,
    session: Session,
    path: web::Path<String>,
    query: web::Query<CallbackParams>,
) -> Result<HttpResponse, AppError> {
    let checkout_id = CheckoutId::from(path.into_inner());

    if !owned_checkouts(&session)?.contains(&checkout_id) {
        tracing::debug!(checkout_id = %checkout_id, "Callback for a checkout this session did not start");
        return Ok(no_pending_payment());
    }

    let mut coordinator = coordinator_for(&gateway, &settings, &store, checkout_id);

    match coordinator.resolve_callback(&query).await? {
        CallbackOutcome::Captured(details) => Ok(HttpResponse::Ok().json(details)),
        CallbackOutcome::NoPendingPayment => Ok(no_pending_payment()),
    }
}

fn no_pending_payment() -> HttpResponse {
    HttpResponse::Ok().json(json!({"status": "no_pending_payment"}))
}

/// Configure checkout routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/checkout")
            .route("", web::post().to(create_checkout))
            .route("/{checkout_id}/callback", web::get().to(checkout_callback)),
    );
}
