// Integration tests for pending payment expiry
//
// A pending payment older than the configured ttl must behave as if it was
// never stored: the callback reports no pending payment, the gateway is not
// called, and the stale entry is purged (by the callback or the sweeper).

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use helpers::{MockGateway, TestDataFactory};
use paypal_checkout::checkout::{
    CallbackOutcome, CallbackParams, CheckoutId, ExpirySweeper, InMemorySessionStore,
    PaymentSessionCoordinator, PendingPayment, SessionStore,
};

fn backdate(store: &InMemorySessionStore, key: &str, age: Duration) {
    let mut pending = store.get(key).unwrap().unwrap();
    pending.created_at = Utc::now() - age;
    store.put(key, &pending).unwrap();
}

#[tokio::test]
async fn test_expired_token_is_treated_as_absent() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let checkout_id = CheckoutId::from("order-1");

    let mut checkout =
        PaymentSessionCoordinator::new(gateway.clone(), store.clone(), checkout_id.clone())
            .with_token_ttl(Some(Duration::minutes(60)));
    checkout.add_items(TestDataFactory::widget_gadget()).unwrap();
    checkout.set_return_url("https://shop.example/return");
    checkout.create_payment("Order").await.unwrap();

    backdate(&store, &checkout_id.session_key(), Duration::minutes(61));

    let outcome = checkout
        .resolve_callback(&CallbackParams::new("PAYER-1", "EC-1"))
        .await
        .unwrap();

    assert_eq!(outcome, CallbackOutcome::NoPendingPayment);
    assert_eq!(gateway.execute_calls(), 0);
    assert!(store.is_empty(), "expired token should be purged");
}

#[tokio::test]
async fn test_token_within_ttl_is_captured() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let checkout_id = CheckoutId::from("order-1");

    let mut checkout =
        PaymentSessionCoordinator::new(gateway.clone(), store.clone(), checkout_id.clone())
            .with_token_ttl(Some(Duration::minutes(60)));
    checkout.add_items(TestDataFactory::widget_gadget()).unwrap();
    checkout.set_return_url("https://shop.example/return");
    checkout.create_payment("Order").await.unwrap();

    backdate(&store, &checkout_id.session_key(), Duration::minutes(59));

    let outcome = checkout
        .resolve_callback(&CallbackParams::new("PAYER-1", "EC-1"))
        .await
        .unwrap();
    assert!(outcome.is_captured());
}

#[tokio::test]
async fn test_no_ttl_never_expires() {
    let gateway = Arc::new(MockGateway::new());
    let store = InMemorySessionStore::new();
    let checkout_id = CheckoutId::from("order-1");

    store
        .put(
            &checkout_id.session_key(),
            &PendingPayment {
                intent_id: "PAY-ANCIENT".to_string(),
                created_at: Utc::now() - Duration::days(365),
            },
        )
        .unwrap();

    let mut checkout = PaymentSessionCoordinator::new(gateway.clone(), store.clone(), checkout_id)
        .with_token_ttl(None);
    let outcome = checkout
        .resolve_callback(&CallbackParams::new("PAYER-1", "EC-1"))
        .await
        .unwrap();

    assert!(outcome.is_captured());
    assert_eq!(gateway.executions()[0].0, "PAY-ANCIENT");
}

#[test]
fn test_sweeper_purges_only_stale_tokens() {
    let store = InMemorySessionStore::new();
    store
        .put("paypal_payment_id:fresh", &PendingPayment::new("PAY-FRESH"))
        .unwrap();
    store
        .put(
            "paypal_payment_id:stale",
            &PendingPayment {
                intent_id: "PAY-STALE".to_string(),
                created_at: Utc::now() - Duration::hours(3),
            },
        )
        .unwrap();

    let sweeper = ExpirySweeper::new(store.clone(), Duration::hours(1), StdDuration::from_secs(60));

    assert_eq!(sweeper.sweep().unwrap(), 1);
    assert_eq!(sweeper.sweep().unwrap(), 0);
    assert!(store.get("paypal_payment_id:fresh").unwrap().is_some());
    assert!(store.get("paypal_payment_id:stale").unwrap().is_none());
}

#[tokio::test]
async fn test_sweeper_task_runs_on_interval() {
    let store = InMemorySessionStore::new();
    store
        .put(
            "paypal_payment_id:stale",
            &PendingPayment {
                intent_id: "PAY-STALE".to_string(),
                created_at: Utc::now() - Duration::hours(3),
            },
        )
        .unwrap();

    let sweeper = Arc::new(ExpirySweeper::new(
        store.clone(),
        Duration::hours(1),
        StdDuration::from_millis(10),
    ));
    let handle = tokio::spawn(sweeper.start());

    // The first tick fires immediately
    tokio::time::sleep(StdDuration::from_millis(100)).await;
    handle.abort();

    assert!(store.is_empty());
}
