mod common;

use common::{fixture, fixture_with_registry, initiate_request, Declining};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use zarinpal_gateway::domain::transaction::TransactionStatus;
use zarinpal_gateway::gateways::mock::MockZarinpal;
use zarinpal_gateway::repo::transactions_repo::TransactionStore;
use zarinpal_gateway::service::delivery::ComponentRegistry;

#[tokio::test]
async fn verified_payment_completes_and_delivers() {
    let f = fixture(MockZarinpal::approving("A1").with_verify(100, Some("R1")));
    f.service.initiate(initiate_request()).await.unwrap();

    let resp = f.service.verify("A1", "OK").await.unwrap();

    assert!(resp.success);
    assert_eq!(resp.url, "https://shop.example/success/mod_x/a/5");

    let tx = f.store.find_by_authority("A1").await.unwrap().unwrap();
    assert_eq!(tx.status, TransactionStatus::Completed);
    assert_eq!(tx.ref_id.as_deref(), Some("R1"));
    assert_eq!(tx.code, Some(100));
    assert_eq!(tx.payment_id, Some(900));

    assert_eq!(f.platform.saved_payments.load(Ordering::SeqCst), 1);
    assert_eq!(f.platform.deliveries.load(Ordering::SeqCst), 1);

    // The verify call went out with the recorded amount and authority.
    let body = f.gateway.last_verify.lock().unwrap().clone().unwrap();
    assert_eq!(body.amount, 10000);
    assert_eq!(body.authority, "A1");
}

#[tokio::test]
async fn non_ok_status_fails_without_spending_a_verify_call() {
    let f = fixture(MockZarinpal::approving("A1").with_verify(100, Some("R1")));
    f.service.initiate(initiate_request()).await.unwrap();

    let resp = f.service.verify("A1", "NOK").await.unwrap();

    assert!(!resp.success);
    let tx = f.store.find_by_authority("A1").await.unwrap().unwrap();
    assert!(resp.message.contains(&tx.id.to_string()));

    assert_eq!(tx.status, TransactionStatus::Error);
    assert_eq!(tx.payment_id, None);
    assert_eq!(tx.data.unwrap(), serde_json::json!({"status": "NOK"}));
    assert_eq!(f.gateway.verify_calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.platform.saved_payments.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rejected_verification_marks_error_with_gateway_code() {
    let f = fixture(MockZarinpal::approving("A1").with_verify(101, None));
    f.service.initiate(initiate_request()).await.unwrap();

    let resp = f.service.verify("A1", "OK").await.unwrap();

    assert!(!resp.success);
    let tx = f.store.find_by_authority("A1").await.unwrap().unwrap();
    assert!(resp.message.contains(&tx.id.to_string()));
    assert_eq!(tx.status, TransactionStatus::Error);
    assert_eq!(tx.code, Some(101));
    assert_eq!(tx.payment_id, None);
    assert_eq!(f.platform.saved_payments.load(Ordering::SeqCst), 0);
    assert_eq!(f.platform.deliveries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_authority_is_reported_not_fatal() {
    let f = fixture(MockZarinpal::approving("A1"));

    let resp = f.service.verify("A404", "OK").await.unwrap();

    assert!(!resp.success);
    assert!(f.store.is_empty());
    assert_eq!(f.gateway.verify_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn delivery_decline_leaves_transaction_pending() {
    let mut registry = ComponentRegistry::new();
    registry.register("mod_x", Arc::new(Declining("Course enrolment is closed.".to_string())));

    let f = fixture_with_registry(
        MockZarinpal::approving("A1").with_verify(100, Some("R1")),
        registry,
    );
    f.service.initiate(initiate_request()).await.unwrap();

    let resp = f.service.verify("A1", "OK").await.unwrap();

    assert!(!resp.success);
    assert_eq!(resp.message, "Course enrolment is closed.");

    // Cause is external and possibly transient: the attempt stays pending and
    // no verify call was spent.
    let tx = f.store.find_by_authority("A1").await.unwrap().unwrap();
    assert_eq!(tx.status, TransactionStatus::Pending);
    assert_eq!(f.gateway.verify_calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.platform.saved_payments.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn verifying_a_settled_transaction_changes_nothing() {
    let f = fixture(MockZarinpal::approving("A1").with_verify(100, Some("R1")));
    f.service.initiate(initiate_request()).await.unwrap();

    assert!(f.service.verify("A1", "OK").await.unwrap().success);
    let second = f.service.verify("A1", "OK").await.unwrap();

    assert!(!second.success);
    assert_eq!(f.gateway.verify_calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.platform.saved_payments.load(Ordering::SeqCst), 1);
    assert_eq!(f.platform.deliveries.load(Ordering::SeqCst), 1);

    let tx = f.store.find_by_authority("A1").await.unwrap().unwrap();
    assert_eq!(tx.status, TransactionStatus::Completed);
    assert_eq!(tx.payment_id, Some(900));
}
