use actix_web::{http::StatusCode, test::TestRequest};
use chrono::{TimeZone, Utc};
use loyalty_engine::{
    db_types::{Order, OrderStatusType},
    traits::InsertOrderResult,
    OrderFlowApi,
    ReconciliationQueue,
};
use lps_common::Points;

use super::{
    helpers::{send, with_session},
    mocks::MockBackend,
};

fn order(number: &str, status: OrderStatusType, accrual: Option<Points>, day: u32) -> Order {
    let timestamp = Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap();
    Order {
        number: number.into(),
        owner: "alice".into(),
        status,
        accrual,
        submitted_at: timestamp,
        updated_at: timestamp,
    }
}

fn submit(number: &str) -> TestRequest {
    let req = TestRequest::post().uri("/api/user/orders").insert_header(("content-type", "text/plain"));
    with_session(req, "alice-session").set_payload(number.to_string())
}

#[actix_web::test]
async fn new_orders_are_accepted_and_queued() {
    let mut backend = MockBackend::with_alice();
    backend
        .expect_insert_order()
        .withf(|o| o.number.as_str() == "12345678903" && o.owner == "alice")
        .times(1)
        .returning(|o| Ok(InsertOrderResult::Inserted(order(o.number.as_str(), OrderStatusType::New, None, 1))));
    let queue = ReconciliationQueue::new();
    let res = send::<MockBackend, _>(OrderFlowApi::new(backend, queue.clone()), submit("12345678903")).await;
    assert_eq!(res.status, StatusCode::ACCEPTED);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.try_pop().map(|n| n.0), Some("12345678903".to_string()));
}

#[actix_web::test]
async fn resubmitting_your_own_order_is_ok() {
    let mut backend = MockBackend::with_alice();
    backend.expect_insert_order().returning(|_| Ok(InsertOrderResult::AlreadyExists { owner: "alice".into() }));
    let queue = ReconciliationQueue::new();
    let res = send::<MockBackend, _>(OrderFlowApi::new(backend, queue.clone()), submit("12345678903")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(queue.is_empty());
}

#[actix_web::test]
async fn someone_elses_order_is_a_conflict() {
    let mut backend = MockBackend::with_alice();
    backend.expect_insert_order().returning(|_| Ok(InsertOrderResult::AlreadyExists { owner: "bob".into() }));
    let queue = ReconciliationQueue::new();
    let res = send::<MockBackend, _>(OrderFlowApi::new(backend, queue.clone()), submit("12345678903")).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert!(queue.is_empty());
}

#[actix_web::test]
async fn badly_formed_order_numbers() {
    let queue = ReconciliationQueue::new();
    let res = send::<MockBackend, _>(OrderFlowApi::new(MockBackend::with_alice(), queue.clone()), submit("12ab")).await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    let res = send::<MockBackend, _>(OrderFlowApi::new(MockBackend::with_alice(), queue.clone()), submit("  ")).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(queue.is_empty());
}

#[actix_web::test]
async fn orders_need_a_session() {
    let queue = ReconciliationQueue::new();
    let req = TestRequest::post().uri("/api/user/orders").set_payload("12345678903");
    let res = send::<MockBackend, _>(OrderFlowApi::new(MockBackend::with_alice(), queue.clone()), req).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    let req = with_session(TestRequest::get().uri("/api/user/orders"), "mallory-session");
    let res = send::<MockBackend, _>(OrderFlowApi::new(MockBackend::with_alice(), queue.clone()), req).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn list_my_orders() {
    let mut backend = MockBackend::with_alice();
    backend.expect_fetch_orders_for_owner().withf(|owner| owner == "alice").returning(|_| {
        Ok(vec![
            order("9278923470", OrderStatusType::Processed, Some(Points::from_points(500)), 3),
            order("12345678903", OrderStatusType::Processing, None, 2),
            order("346436439", OrderStatusType::Invalid, None, 1),
        ])
    });
    let req = with_session(TestRequest::get().uri("/api/user/orders"), "alice-session");
    let res = send::<MockBackend, _>(OrderFlowApi::new(backend, ReconciliationQueue::new()), req).await;
    assert_eq!(res.status, StatusCode::OK);
    let orders: serde_json::Value = serde_json::from_str(&res.body).unwrap();
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0]["number"], "9278923470");
    assert_eq!(orders[0]["status"], "PROCESSED");
    assert_eq!(orders[0]["accrual"], 500.0);
    assert!(orders[0]["uploaded_at"].as_str().unwrap().starts_with("2024-06-03T12:00:00"));
    assert!(orders[1].get("accrual").is_none());
    assert_eq!(orders[2]["status"], "INVALID");
}

#[actix_web::test]
async fn no_orders_is_no_content() {
    let mut backend = MockBackend::with_alice();
    backend.expect_fetch_orders_for_owner().returning(|_| Ok(vec![]));
    let req = with_session(TestRequest::get().uri("/api/user/orders"), "alice-session");
    let res = send::<MockBackend, _>(OrderFlowApi::new(backend, ReconciliationQueue::new()), req).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(res.body.is_empty());
}
