// Integration tests for the two-phase checkout flow
//
// Drives PaymentSessionCoordinator against a recording gateway double and
// the in-memory session store:
// 1. create → token stored → callback → captured
// 2. preconditions (return URL, empty cart) never reach the gateway
// 3. callbacks that must not capture (missing params, replay, stray)
// 4. gateway failures on either phase

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use helpers::{MockGateway, TestDataFactory};
use paypal_checkout::checkout::{
    CallbackOutcome, CallbackParams, CheckoutId, CheckoutState, InMemorySessionStore,
    PaymentSessionCoordinator, SessionStore,
};
use paypal_checkout::cart::NewItem;
use paypal_checkout::core::{AppError, Currency};
use rust_decimal_macros::dec;

const RETURN_URL: &str = "https://shop.example/paypal/return";

fn coordinator(
    gateway: &Arc<MockGateway>,
    store: &InMemorySessionStore,
    checkout_id: &str,
) -> PaymentSessionCoordinator<InMemorySessionStore> {
    PaymentSessionCoordinator::new(gateway.clone(), store.clone(), CheckoutId::from(checkout_id))
}

fn ready_coordinator(
    gateway: &Arc<MockGateway>,
    store: &InMemorySessionStore,
    checkout_id: &str,
) -> PaymentSessionCoordinator<InMemorySessionStore> {
    let mut checkout = coordinator(gateway, store, checkout_id);
    checkout.add_items(TestDataFactory::widget_gadget()).unwrap();
    checkout.set_return_url(RETURN_URL);
    checkout
}

#[tokio::test]
async fn test_widget_gadget_request_fields() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let mut checkout = ready_coordinator(&gateway, &store, "order-1");

    let created = checkout.create_payment("Order #1001").await.unwrap();
    assert_eq!(created.intent_id, "PAY-1");
    assert!(created.approval_url.contains("token=EC-1"));

    let requests = gateway.create_requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.currency, Currency::USD);
    assert_eq!(request.total, dec!(24.98));
    assert_eq!(request.description, "Order #1001");
    assert_eq!(request.return_url, RETURN_URL);
    assert_eq!(request.cancel_url, RETURN_URL);
    assert_eq!(request.line_items.len(), 2);
    assert_eq!(request.line_items[0].name(), "Widget");
    assert_eq!(request.line_items[0].quantity(), 2);
    assert_eq!(request.line_items[0].unit_price(), dec!(9.99));
    assert_eq!(request.line_items[1].sku(), "G1");
}

#[tokio::test]
async fn test_explicit_cancel_url_used() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let mut checkout = ready_coordinator(&gateway, &store, "order-1");
    checkout.set_cancel_url("https://shop.example/cart");

    checkout.create_payment("Order").await.unwrap();

    let request = &gateway.create_requests()[0];
    assert_eq!(request.return_url, RETURN_URL);
    assert_eq!(request.cancel_url, "https://shop.example/cart");
}

#[tokio::test]
async fn test_missing_return_url_never_calls_gateway() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let mut checkout = coordinator(&gateway, &store, "order-1");
    checkout.add_items(TestDataFactory::widget_gadget()).unwrap();

    let err = checkout.create_payment("Order").await.unwrap_err();

    assert!(matches!(err, AppError::Configuration(_)));
    assert_eq!(gateway.create_calls(), 0);
    assert!(store.is_empty());
    assert_eq!(checkout.state(), CheckoutState::Idle);
}

#[tokio::test]
async fn test_empty_cart_rejected() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let mut checkout = coordinator(&gateway, &store, "order-1");
    checkout.set_return_url(RETURN_URL);

    let err = checkout.create_payment("Order").await.unwrap_err();

    assert!(matches!(err, AppError::EmptyCart));
    assert_eq!(gateway.create_calls(), 0);
}

#[tokio::test]
async fn test_create_stores_exactly_one_token() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let mut checkout = ready_coordinator(&gateway, &store, "order-1");

    checkout.create_payment("Order").await.unwrap();

    assert_eq!(store.len(), 1);
    let pending = store.get("paypal_payment_id:order-1").unwrap().unwrap();
    assert_eq!(pending.intent_id, "PAY-1");
    assert_eq!(checkout.state(), CheckoutState::PendingApproval);
}

#[tokio::test]
async fn test_second_create_overwrites_token() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let mut checkout = ready_coordinator(&gateway, &store, "order-1");

    checkout.create_payment("Order").await.unwrap();
    checkout.create_payment("Order").await.unwrap();

    assert_eq!(gateway.create_calls(), 2);
    assert_eq!(store.len(), 1);
    assert_eq!(checkout.pending_payment().unwrap().unwrap().intent_id, "PAY-2");

    // The first intent can no longer be captured through this checkout
    let outcome = checkout
        .resolve_callback(&CallbackParams::new("PAYER-1", "EC-2"))
        .await
        .unwrap();
    assert!(outcome.is_captured());
    assert_eq!(gateway.executions(), vec![("PAY-2".to_string(), "PAYER-1".to_string())]);
}

#[tokio::test]
async fn test_callback_handled_by_fresh_coordinator() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();

    let mut checkout = ready_coordinator(&gateway, &store, "order-1");
    checkout.create_payment("Order").await.unwrap();
    drop(checkout);

    // The redirect arrives as a new request with nothing but the checkout id
    let mut callback = coordinator(&gateway, &store, "order-1");
    let outcome = callback
        .resolve_callback(&CallbackParams::new("PAYER-1", "EC-1"))
        .await
        .unwrap();

    match outcome {
        CallbackOutcome::Captured(details) => {
            assert_eq!(details.id, "PAY-1");
            assert!(details.is_approved());
        }
        other => panic!("expected capture, got {:?}", other),
    }
    assert_eq!(callback.state(), CheckoutState::Captured);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_missing_params_leave_token_in_place() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let mut checkout = ready_coordinator(&gateway, &store, "order-1");
    checkout.create_payment("Order").await.unwrap();

    let cancelled = CallbackParams {
        token: Some("EC-1".to_string()),
        ..CallbackParams::default()
    };
    let outcome = checkout.resolve_callback(&cancelled).await.unwrap();
    assert_eq!(outcome, CallbackOutcome::NoPendingPayment);

    let blank_token = CallbackParams::new("PAYER-1", "");
    let outcome = checkout.resolve_callback(&blank_token).await.unwrap();
    assert_eq!(outcome, CallbackOutcome::NoPendingPayment);

    assert_eq!(gateway.execute_calls(), 0);
    assert_eq!(store.len(), 1);

    // The buyer can still complete the original approval
    let outcome = checkout
        .resolve_callback(&CallbackParams::new("PAYER-1", "EC-1"))
        .await
        .unwrap();
    assert!(outcome.is_captured());
}

#[tokio::test]
async fn test_replayed_callback_is_not_executed_twice() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let mut checkout = ready_coordinator(&gateway, &store, "order-1");
    checkout.create_payment("Order").await.unwrap();

    let params = CallbackParams::new("PAYER-1", "EC-1");
    assert!(checkout.resolve_callback(&params).await.unwrap().is_captured());

    let replay = checkout.resolve_callback(&params).await.unwrap();
    assert_eq!(replay, CallbackOutcome::NoPendingPayment);
    assert_eq!(gateway.execute_calls(), 1);
}

#[tokio::test]
async fn test_stray_callback_without_create() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let mut checkout = coordinator(&gateway, &store, "never-created");

    let outcome = checkout
        .resolve_callback(&CallbackParams::new("PAYER-1", "EC-1"))
        .await
        .unwrap();

    assert_eq!(outcome, CallbackOutcome::NoPendingPayment);
    assert_eq!(gateway.execute_calls(), 0);
}

#[tokio::test]
async fn test_mismatched_payment_id_not_executed() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let mut checkout = ready_coordinator(&gateway, &store, "order-1");
    checkout.create_payment("Order").await.unwrap();

    let params = CallbackParams {
        payment_id: Some("PAY-SOMEONE-ELSE".to_string()),
        ..CallbackParams::new("PAYER-1", "EC-1")
    };
    let outcome = checkout.resolve_callback(&params).await.unwrap();

    assert_eq!(outcome, CallbackOutcome::NoPendingPayment);
    assert_eq!(gateway.execute_calls(), 0);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_concurrent_checkouts_do_not_share_tokens() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();

    let mut first = ready_coordinator(&gateway, &store, "tab-1");
    let mut second = ready_coordinator(&gateway, &store, "tab-2");
    first.create_payment("First").await.unwrap();
    second.create_payment("Second").await.unwrap();
    assert_eq!(store.len(), 2);

    second
        .resolve_callback(&CallbackParams::new("PAYER-1", "EC-2"))
        .await
        .unwrap();
    first
        .resolve_callback(&CallbackParams::new("PAYER-1", "EC-1"))
        .await
        .unwrap();

    assert_eq!(
        gateway.executions(),
        vec![
            ("PAY-2".to_string(), "PAYER-1".to_string()),
            ("PAY-1".to_string(), "PAYER-1".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_gateway_failure_on_create() {
    let gateway = Arc::new(MockGateway::failing_create());
    let store = InMemorySessionStore::new();
    let mut checkout = ready_coordinator(&gateway, &store, "order-1");

    let err = checkout.create_payment("Order").await.unwrap_err();

    match err {
        AppError::Gateway { operation, code, .. } => {
            assert_eq!(operation, "create_intent");
            assert_eq!(code, "VALIDATION_ERROR");
        }
        other => panic!("expected gateway error, got {:?}", other),
    }
    assert_eq!(checkout.state(), CheckoutState::Failed);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_gateway_failure_on_execute_consumes_token() {
    let gateway = Arc::new(MockGateway::failing_execute());
    let store = InMemorySessionStore::new();
    let mut checkout = ready_coordinator(&gateway, &store, "order-1");
    checkout.create_payment("Order").await.unwrap();

    let params = CallbackParams::new("PAYER-1", "EC-1");
    let err = checkout.resolve_callback(&params).await.unwrap_err();

    match err {
        AppError::Gateway {
            code,
            correlation_id,
            ..
        } => {
            assert_eq!(code, "INSTRUMENT_DECLINED");
            assert_eq!(correlation_id.as_deref(), Some("PAY-1"));
        }
        other => panic!("expected gateway error, got {:?}", other),
    }
    assert_eq!(checkout.state(), CheckoutState::Failed);
    assert!(store.is_empty());

    let retry = checkout.resolve_callback(&params).await.unwrap();
    assert_eq!(retry, CallbackOutcome::NoPendingPayment);
    assert_eq!(gateway.execute_calls(), 1);
}

#[tokio::test]
async fn test_items_added_in_a_rejected_batch_are_not_sent() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let mut checkout = ready_coordinator(&gateway, &store, "order-1");

    let err = checkout
        .add_items(vec![
            NewItem::new("Extra", "E1", 1, dec!(1.00)),
            NewItem::new("Broken", "B1", 0, dec!(1.00)),
        ])
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidItem(_)));

    checkout.create_payment("Order").await.unwrap();
    let request = &gateway.create_requests()[0];
    assert_eq!(request.line_items.len(), 2);
    assert_eq!(request.total, dec!(24.98));
}
