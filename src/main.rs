use std::sync::Arc;
use std::time::Duration;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use paypal_checkout::billing::{self, BillingService};
use paypal_checkout::checkout::{self, CheckoutSettings, ExpirySweeper, InMemorySessionStore};
use paypal_checkout::config::{init_tracing, Config};
use paypal_checkout::gateways::{self, BillingGateway, PaymentGateway, PaypalClient};

/// How often abandoned pending payments are purged
const SWEEP_PERIOD: Duration = Duration::from_secs(5 * 60);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(&config.logging).context("Failed to initialise logging")?;

    tracing::info!("Starting PayPal checkout server");
    tracing::info!(
        mode = %config.paypal.mode,
        currency = %config.paypal.currency,
        plans = config.plans.len(),
        "PayPal configured"
    );

    let client = Arc::new(PaypalClient::new(&config.paypal)?);
    let payments: Arc<dyn PaymentGateway> = client.clone();
    let billing_gateway: Arc<dyn BillingGateway> = client;
    let billing_service = Arc::new(BillingService::new(billing_gateway, config.plans.clone()));
    let settings = CheckoutSettings::from_config(&config)?;

    // Pending payments stay on the server so a replayed cookie cannot revive them
    let pending_payments = InMemorySessionStore::new();
    match settings.token_ttl {
        Some(ttl) => {
            let sweeper = Arc::new(ExpirySweeper::new(
                pending_payments.clone(),
                ttl,
                SWEEP_PERIOD,
            ));
            tokio::spawn(sweeper.start());
        }
        None => tracing::warn!("Pending payment expiry disabled; abandoned checkouts are kept"),
    }

    let session_key = match &config.session.cookie_key {
        Some(key) => Key::from(key.as_bytes()),
        None => {
            tracing::warn!("SESSION_KEY not set, generated a key; sessions will not survive a restart");
            Key::generate()
        }
    };

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(payments.clone()))
            .app_data(web::Data::new(billing_service.clone()))
            .app_data(web::Data::new(settings.clone()))
            .app_data(web::Data::new(pending_payments.clone()))
            .route("/health", web::get().to(health_check))
            .configure(checkout::configure)
            .configure(gateways::configure)
            .configure(billing::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "paypal-checkout"
    }))
}
