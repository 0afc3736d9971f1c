// Integration tests for PaypalClient over real HTTP
//
// Uses the actix-test fake PayPal API from helpers to check:
// 1. OAuth client-credentials token acquisition and caching
// 2. the exact JSON sent to POST /v1/payments/payment
// 3. execute/get/list wire paths and parameters
// 4. PayPal error bodies surfacing as Gateway errors

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::{spawn_fake_paypal, TestDataFactory};
use paypal_checkout::checkout::{
    CallbackParams, CheckoutId, InMemorySessionStore, PaymentSessionCoordinator,
};
use paypal_checkout::core::AppError;
use paypal_checkout::gateways::models::PaymentIntentRequest;
use paypal_checkout::gateways::{PaymentGateway, PaypalClient};
use paypal_checkout::cart::ItemLedger;
use serde_json::json;

fn widget_gadget_request() -> PaymentIntentRequest {
    let mut ledger = ItemLedger::default();
    ledger.add_items(TestDataFactory::widget_gadget()).unwrap();

    PaymentIntentRequest {
        currency: ledger.currency(),
        total: ledger.total(),
        line_items: ledger.items().to_vec(),
        description: "Order #1001".to_string(),
        return_url: "https://shop.example/return".to_string(),
        cancel_url: "https://shop.example/cancel".to_string(),
    }
}

#[actix_web::test]
async fn test_create_intent_wire_format() {
    let paypal = spawn_fake_paypal();
    let client = paypal.client();

    let created = client.create_intent(&widget_gadget_request()).await.unwrap();

    assert_eq!(created.intent_id, "PAY-FAKE123");
    assert_eq!(
        created.approval_url,
        "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_express-checkout&token=EC-FAKE"
    );

    let sent = paypal.state.last_request().unwrap();
    assert_eq!(sent.method, "POST");
    assert_eq!(sent.path, "/v1/payments/payment");
    assert_eq!(
        sent.body,
        json!({
            "intent": "sale",
            "payer": {"payment_method": "paypal"},
            "redirect_urls": {
                "return_url": "https://shop.example/return",
                "cancel_url": "https://shop.example/cancel"
            },
            "transactions": [{
                "amount": {"currency": "USD", "total": "24.98"},
                "item_list": {"items": [
                    {"name": "Widget", "currency": "USD", "sku": "W1", "quantity": "2", "price": "9.99"},
                    {"name": "Gadget", "currency": "USD", "sku": "G1", "quantity": "1", "price": "5.00"}
                ]},
                "description": "Order #1001"
            }]
        })
    );
}

#[actix_web::test]
async fn test_access_token_is_cached() {
    let paypal = spawn_fake_paypal();
    let client = paypal.client();

    client.get_intent("PAY-1").await.unwrap();
    client.get_intent("PAY-2").await.unwrap();
    client.list_intents(10, 0).await.unwrap();

    assert_eq!(paypal.state.token_requests(), 1);
    assert_eq!(paypal.state.requests().len(), 3);
}

#[actix_web::test]
async fn test_rejected_credentials() {
    let paypal = spawn_fake_paypal();
    let client = paypal.client_with_credentials("bad-client", "client-secret");

    let err = client.get_intent("PAY-1").await.unwrap_err();

    match err {
        AppError::Gateway {
            operation, code, ..
        } => {
            assert_eq!(operation, "oauth_token");
            assert_eq!(code, "invalid_client");
        }
        other => panic!("expected gateway error, got {:?}", other),
    }
    assert!(paypal.state.requests().is_empty());
}

#[actix_web::test]
async fn test_execute_intent() {
    let paypal = spawn_fake_paypal();
    let client = paypal.client();

    let details = client.execute_intent("PAY-FAKE123", "QYR5Z8XDVJNXQ").await.unwrap();

    assert_eq!(details.id, "PAY-FAKE123");
    assert!(details.is_approved());
    let sent = paypal.state.last_request().unwrap();
    assert_eq!(sent.path, "/v1/payments/payment/PAY-FAKE123/execute");
    assert_eq!(sent.body, json!({"payer_id": "QYR5Z8XDVJNXQ"}));
}

#[actix_web::test]
async fn test_declined_execute_maps_paypal_error() {
    let paypal = spawn_fake_paypal();
    let client = paypal.client();

    let err = client.execute_intent("PAY-DECLINED", "PAYER").await.unwrap_err();

    match err {
        AppError::Gateway {
            operation,
            code,
            message,
            correlation_id,
        } => {
            assert_eq!(operation, "execute_intent");
            assert_eq!(code, "INSTRUMENT_DECLINED");
            assert!(message.contains("fake-debug-400"));
            assert_eq!(correlation_id.as_deref(), Some("PAY-DECLINED"));
        }
        other => panic!("expected gateway error, got {:?}", other),
    }
}

#[actix_web::test]
async fn test_list_intents_paging_parameters() {
    let paypal = spawn_fake_paypal();
    let client = paypal.client();

    let history = client.list_intents(5, 10).await.unwrap();

    assert_eq!(history.count, 2);
    assert_eq!(history.payments.len(), 2);
    assert_eq!(history.next_id.as_deref(), Some("PAY-3"));

    let sent = paypal.state.last_request().unwrap();
    assert_eq!(sent.method, "GET");
    assert_eq!(sent.query, "count=5&start_index=10");
}

#[actix_web::test]
async fn test_unreachable_gateway() {
    // Nothing listens on the discard port
    let client = PaypalClient::with_base_url(
        "id".to_string(),
        "secret".to_string(),
        "http://127.0.0.1:9",
        Duration::from_millis(500),
    )
    .unwrap();

    let err = client.get_intent("PAY-1").await.unwrap_err();

    match err {
        AppError::Gateway { code, .. } => {
            assert!(code == "CONNECTION_ERROR" || code == "TIMEOUT", "got {}", code);
        }
        other => panic!("expected gateway error, got {:?}", other),
    }
}

#[actix_web::test]
async fn test_full_checkout_against_fake_paypal() {
    let paypal = spawn_fake_paypal();
    let gateway: Arc<dyn PaymentGateway> = Arc::new(paypal.client());
    let store = InMemorySessionStore::new();

    let mut checkout =
        PaymentSessionCoordinator::new(gateway.clone(), store.clone(), CheckoutId::from("o-1"));
    checkout.add_items(TestDataFactory::widget_gadget()).unwrap();
    checkout.set_return_url("https://shop.example/return");
    let created = checkout.create_payment("Order #1001").await.unwrap();
    assert_eq!(created.intent_id, "PAY-FAKE123");

    let mut callback = PaymentSessionCoordinator::new(gateway, store.clone(), CheckoutId::from("o-1"));
    let params = CallbackParams {
        payment_id: Some("PAY-FAKE123".to_string()),
        ..CallbackParams::new("QYR5Z8XDVJNXQ", "EC-FAKE")
    };
    let outcome = callback.resolve_callback(&params).await.unwrap();

    assert!(outcome.is_captured());
    assert!(store.is_empty());
    assert_eq!(paypal.state.token_requests(), 1);
}
