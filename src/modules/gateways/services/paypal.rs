use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::gateway_trait::PaymentGateway;
use super::paypal_auth::PaypalAuth;
use crate::config::PaypalConfig;
use crate::core::{AppError, Result};
use crate::modules::gateways::models::{
    find_link, CreatedIntent, Link, PaymentDetails, PaymentHistory, PaymentIntentRequest,
};

/// PayPal REST client for the classic `/v1/payments` API
///
/// Implements [`PaymentGateway`] here and `BillingGateway` in `paypal_billing`.
/// API Documentation: https://developer.paypal.com/docs/api/payments/v1/
#[derive(Debug)]
pub struct PaypalClient {
    client: Client,
    base_url: String,
    auth: PaypalAuth,
}

impl PaypalClient {
    /// Create a client from loaded configuration
    pub fn new(config: &PaypalConfig) -> Result<Self> {
        Self::with_base_url(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.base_url(),
            config.connection_timeout(),
        )
    }

    /// Create a client against an explicit API host (sandbox, live or a test double)
    pub fn with_base_url(
        client_id: String,
        client_secret: String,
        base_url: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: PaypalAuth::new(client_id, client_secret),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request builder carrying a bearer token
    pub(super) async fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.auth.bearer_token(&self.client, &self.base_url).await?;
        let url = format!("{}{}", self.base_url, path);

        Ok(self
            .client
            .request(method, url)
            .bearer_auth(token)
            .header("Accept", "application/json"))
    }

    /// Send and parse a JSON response body
    pub(super) async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let body = self.send(operation, request).await?;
        parse_body(operation, &body)
    }

    /// Like `send_json`, but an empty success body (204) yields `None`.
    /// A non-empty body that does not parse is still an error.
    pub(super) async fn send_optional_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Option<T>> {
        let body = self.send(operation, request).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        parse_body(operation, &body).map(Some)
    }

    /// Send a request whose success response has no useful body (204)
    pub(super) async fn send_no_content(&self, operation: &str, request: RequestBuilder) -> Result<()> {
        self.send(operation, request).await.map(|_| ())
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|e| map_send_error(operation, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_send_error(operation, e))?;

        if !status.is_success() {
            tracing::warn!(
                operation = operation,
                status = status.as_u16(),
                "PayPal API returned an error"
            );
            return Err(parse_error_body(operation, status.as_u16(), &body));
        }

        Ok(body)
    }
}

fn parse_body<T: DeserializeOwned>(operation: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        AppError::gateway(
            operation,
            "INVALID_RESPONSE",
            format!("Failed to parse PayPal response: {}", e),
        )
    })
}

/// Map transport failures to gateway errors, distinguishing timeouts and
/// connection failures from other request errors
pub(crate) fn map_send_error(operation: &str, e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::gateway(operation, "TIMEOUT", format!("PayPal gateway timed out: {}", e))
    } else if e.is_connect() {
        AppError::gateway(
            operation,
            "CONNECTION_ERROR",
            format!("PayPal gateway unavailable: {}", e),
        )
    } else {
        AppError::gateway(operation, "REQUEST_FAILED", format!("PayPal API request failed: {}", e))
    }
}

#[derive(Debug, Deserialize)]
struct PaypalErrorBody {
    name: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    debug_id: Option<String>,
}

/// PayPal error bodies look like `{"name": "VALIDATION_ERROR", "message": "...", "debug_id": "..."}`.
/// Anything else is reported with the HTTP status as the code.
fn parse_error_body(operation: &str, status: u16, body: &str) -> AppError {
    match serde_json::from_str::<PaypalErrorBody>(body) {
        Ok(err) => {
            let message = match err.debug_id {
                Some(debug_id) => format!("{} (debug id: {})", err.message, debug_id),
                None => err.message,
            };
            AppError::gateway(operation, err.name, message)
        }
        Err(_) => AppError::gateway(operation, status.to_string(), format!("HTTP {}: {}", status, body)),
    }
}

// PayPal wire structures for POST /v1/payments/payment

#[derive(Debug, Serialize)]
struct WirePayment<'a> {
    intent: &'static str,
    payer: WirePayer,
    redirect_urls: WireRedirectUrls<'a>,
    transactions: Vec<WireTransaction<'a>>,
}

#[derive(Debug, Serialize)]
struct WirePayer {
    payment_method: &'static str,
}

#[derive(Debug, Serialize)]
struct WireRedirectUrls<'a> {
    return_url: &'a str,
    cancel_url: &'a str,
}

#[derive(Debug, Serialize)]
struct WireTransaction<'a> {
    amount: WireAmount,
    item_list: WireItemList<'a>,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct WireAmount {
    currency: &'static str,
    total: String,
}

#[derive(Debug, Serialize)]
struct WireItemList<'a> {
    items: Vec<WireItem<'a>>,
}

#[derive(Debug, Serialize)]
struct WireItem<'a> {
    name: &'a str,
    currency: &'static str,
    sku: &'a str,
    quantity: String,
    price: String,
}

impl<'a> WirePayment<'a> {
    fn from_request(request: &'a PaymentIntentRequest) -> Self {
        let items = request
            .line_items
            .iter()
            .map(|item| WireItem {
                name: item.name(),
                currency: item.currency().code(),
                sku: item.sku(),
                quantity: item.quantity().to_string(),
                price: item.currency().format_wire(item.unit_price()),
            })
            .collect();

        Self {
            intent: "sale",
            payer: WirePayer {
                payment_method: "paypal",
            },
            redirect_urls: WireRedirectUrls {
                return_url: &request.return_url,
                cancel_url: &request.cancel_url,
            },
            transactions: vec![WireTransaction {
                amount: WireAmount {
                    currency: request.currency.code(),
                    total: request.currency.format_wire(request.total),
                },
                item_list: WireItemList { items },
                description: &request.description,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireCreatedPayment {
    id: String,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Serialize)]
struct WireExecution<'a> {
    payer_id: &'a str,
}

#[async_trait]
impl PaymentGateway for PaypalClient {
    async fn create_intent(&self, request: &PaymentIntentRequest) -> Result<CreatedIntent> {
        let body = WirePayment::from_request(request);

        let http = self
            .authorized(Method::POST, "/v1/payments/payment")
            .await?
            .json(&body);

        let created: WireCreatedPayment = self.send_json("create_intent", http).await.map_err(|e| {
            tracing::error!(error = %e, request = ?body, "PayPal payment creation failed");
            e
        })?;

        let approval_url = find_link(&created.links, "approval_url")
            .ok_or_else(|| {
                AppError::gateway(
                    "create_intent",
                    "MISSING_APPROVAL_URL",
                    "PayPal response did not include an approval_url link",
                )
                .with_correlation_id(created.id.clone())
            })?
            .to_string();

        Ok(CreatedIntent {
            intent_id: created.id,
            approval_url,
        })
    }

    async fn execute_intent(&self, intent_id: &str, payer_id: &str) -> Result<PaymentDetails> {
        let path = format!("/v1/payments/payment/{}/execute", intent_id);
        let http = self
            .authorized(Method::POST, &path)
            .await?
            .json(&WireExecution { payer_id });

        self.send_json("execute_intent", http)
            .await
            .map_err(|e| e.with_correlation_id(intent_id))
    }

    async fn get_intent(&self, intent_id: &str) -> Result<PaymentDetails> {
        let path = format!("/v1/payments/payment/{}", intent_id);
        let http = self.authorized(Method::GET, &path).await?;

        self.send_json("get_intent", http)
            .await
            .map_err(|e| e.with_correlation_id(intent_id))
    }

    async fn list_intents(&self, limit: u32, offset: u32) -> Result<PaymentHistory> {
        let http = self
            .authorized(Method::GET, "/v1/payments/payment")
            .await?
            .query(&[("count", limit), ("start_index", offset)]);

        self.send_json("list_intents", http).await
    }

    fn name(&self) -> &str {
        "paypal"
    }
}
