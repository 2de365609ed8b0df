use actix_web::{http::StatusCode, test::TestRequest};
use chrono::{TimeZone, Utc};
use loyalty_engine::{
    db_types::{Balance, Withdrawal},
    traits::{LedgerApiError, WithdrawalResult},
    LedgerApi,
};
use lps_common::Points;

use super::{
    helpers::{send, with_session},
    mocks::MockBackend,
};

fn withdraw(order: &str, sum: f64) -> TestRequest {
    let req = TestRequest::post().uri("/api/user/balance/withdraw");
    with_session(req, "alice-session").set_json(serde_json::json!({ "order": order, "sum": sum }))
}

#[actix_web::test]
async fn my_balance() {
    let mut backend = MockBackend::with_alice();
    backend.expect_fetch_balance().withf(|owner| owner == "alice").returning(|_| {
        Ok(Balance { available: Points::from_hundredths(50050), withdrawn: Points::from_points(42) })
    });
    let req = with_session(TestRequest::get().uri("/api/user/balance"), "alice-session");
    let res = send::<MockBackend, _>(LedgerApi::new(backend), req).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, r#"{"current":500.5,"withdrawn":42.0}"#);
}

#[actix_web::test]
async fn balance_needs_a_session() {
    let req = TestRequest::get().uri("/api/user/balance");
    let res = send::<MockBackend, _>(LedgerApi::new(MockBackend::with_alice()), req).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn successful_withdrawal() {
    let mut backend = MockBackend::with_alice();
    backend
        .expect_process_withdrawal()
        .withf(|w| w.order_id.as_str() == "2377225624" && w.owner == "alice" && w.sum == Points::from_points(751))
        .times(1)
        .returning(|w| {
            Ok(WithdrawalResult::Processed(Withdrawal {
                order_id: w.order_id,
                owner: w.owner,
                sum: w.sum,
                processed_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
            }))
        });
    let res = send::<MockBackend, _>(LedgerApi::new(backend), withdraw("2377225624", 751.0)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&res.body).unwrap();
    assert_eq!(body["order"], "2377225624");
    assert_eq!(body["sum"], 751.0);
}

#[actix_web::test]
async fn withdrawal_with_insufficient_funds() {
    let mut backend = MockBackend::with_alice();
    backend.expect_process_withdrawal().returning(|w| {
        Err(LedgerApiError::InsufficientFunds { available: Points::from_points(100), requested: w.sum })
    });
    let res = send::<MockBackend, _>(LedgerApi::new(backend), withdraw("2377225624", 751.0)).await;
    assert_eq!(res.status, StatusCode::PAYMENT_REQUIRED);
}

#[actix_web::test]
async fn withdrawal_with_a_used_order_id() {
    let mut backend = MockBackend::with_alice();
    backend.expect_process_withdrawal().returning(|w| Err(LedgerApiError::Used(w.order_id.as_str().to_string())));
    let res = send::<MockBackend, _>(LedgerApi::new(backend), withdraw("2377225624", 10.0)).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn invalid_withdrawals() {
    // Neither request reaches the ledger
    let res = send::<MockBackend, _>(LedgerApi::new(MockBackend::with_alice()), withdraw("23772-25624", 10.0)).await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    let res = send::<MockBackend, _>(LedgerApi::new(MockBackend::with_alice()), withdraw("2377225624", -5.0)).await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    let req = with_session(TestRequest::post().uri("/api/user/balance/withdraw"), "alice-session")
        .set_json(serde_json::json!({ "order": "2377225624" }));
    let res = send::<MockBackend, _>(LedgerApi::new(MockBackend::with_alice()), req).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn no_withdrawals_is_no_content() {
    let mut backend = MockBackend::with_alice();
    backend.expect_fetch_withdrawals().returning(|_| Ok(vec![]));
    let req = with_session(TestRequest::get().uri("/api/user/withdrawals"), "alice-session");
    let res = send::<MockBackend, _>(LedgerApi::new(backend), req).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
}
