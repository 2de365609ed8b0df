//! Runs a user's whole journey against a real SQLite store, with every API mounted at once.
use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use loyalty_engine::{
    test_utils::{prepare_test_env, random_db_url},
    traits::LedgerManagement,
    AuthApi,
    LedgerApi,
    OrderFlowApi,
    ReconciliationQueue,
};
use lps_common::Points;

use super::helpers::SESSION_COOKIE;
use crate::{server::api_scope, session::SessionCookie};

#[actix_web::test]
async fn register_submit_and_withdraw() {
    let _ = env_logger::try_init();
    let db = prepare_test_env(&random_db_url()).await;
    let queue = ReconciliationQueue::new();
    let app = App::new()
        .app_data(web::Data::new(OrderFlowApi::new(db.clone(), queue.clone())))
        .app_data(web::Data::new(LedgerApi::new(db.clone())))
        .app_data(web::Data::new(AuthApi::new(db.clone())))
        .app_data(web::Data::new(SessionCookie::default()))
        .service(api_scope::<loyalty_engine::SqliteDatabase>());
    let service = test::init_service(app).await;

    let req = TestRequest::post()
        .uri("/api/user/register")
        .set_json(serde_json::json!({ "login": "carol", "password": "correct horse" }))
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.response().cookies().find(|c| c.name() == SESSION_COOKIE).expect("No session cookie").into_owned();

    // A second registration with the same login fails
    let req = TestRequest::post()
        .uri("/api/user/register")
        .set_json(serde_json::json!({ "login": "carol", "password": "something else" }))
        .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::CONFLICT);

    let req = TestRequest::get().uri("/api/user/orders").cookie(cookie.clone()).to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::NO_CONTENT);

    let req = TestRequest::post().uri("/api/user/orders").cookie(cookie.clone()).set_payload("79927398713").to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::ACCEPTED);
    let req = TestRequest::post().uri("/api/user/orders").cookie(cookie.clone()).set_payload("79927398713").to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);
    assert_eq!(queue.len(), 1);

    let req = TestRequest::get().uri("/api/user/orders").cookie(cookie.clone()).to_request();
    let orders: serde_json::Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(orders[0]["number"], "79927398713");
    assert_eq!(orders[0]["status"], "NEW");

    let req = TestRequest::get().uri("/api/user/balance").cookie(cookie.clone()).to_request();
    let balance: serde_json::Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(balance, serde_json::json!({ "current": 0.0, "withdrawn": 0.0 }));

    let req = TestRequest::post()
        .uri("/api/user/balance/withdraw")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "order": "2377225624", "sum": 10 }))
        .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::PAYMENT_REQUIRED);

    db.credit("carol", Points::from_points(25)).await.unwrap();
    let req = TestRequest::post()
        .uri("/api/user/balance/withdraw")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "order": "2377225624", "sum": 10 }))
        .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);

    let req = TestRequest::get().uri("/api/user/balance").cookie(cookie.clone()).to_request();
    let balance: serde_json::Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(balance, serde_json::json!({ "current": 15.0, "withdrawn": 10.0 }));

    let req = TestRequest::get().uri("/api/user/withdrawals").cookie(cookie.clone()).to_request();
    let withdrawals: serde_json::Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(withdrawals[0]["order"], "2377225624");
    assert_eq!(withdrawals[0]["sum"], 10.0);

    // Logging in from another client moves the session
    let req = TestRequest::post()
        .uri("/api/user/login")
        .set_json(serde_json::json!({ "login": "carol", "password": "correct horse" }))
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let second = res.response().cookies().find(|c| c.name() == SESSION_COOKIE).expect("No session cookie").into_owned();
    assert_ne!(second.value(), cookie.value());
    let req = TestRequest::get().uri("/api/user/balance").cookie(second).to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);
    db.close().await;
}
