use actix_web::{http::StatusCode, test::TestRequest};
use loyalty_engine::{traits::AuthApiError, AuthApi};

use super::{
    helpers::{send, with_session},
    mocks::MockBackend,
};

fn credentials(login: &str, password: &str) -> serde_json::Value {
    serde_json::json!({ "login": login, "password": password })
}

#[actix_web::test]
async fn health_check() {
    let req = TestRequest::get().uri("/health");
    let res = send::<MockBackend, _>(AuthApi::new(MockBackend::new()), req).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[actix_web::test]
async fn register_issues_a_session_cookie() {
    let mut backend = MockBackend::new();
    backend
        .expect_register_user()
        .withf(|login, password, token| login == "alice" && password.reveal() == "hunter2" && token.len() == 32)
        .times(1)
        .returning(|_, _, _| Ok(()));
    let req = TestRequest::post().uri("/api/user/register").set_json(credentials("alice", "hunter2"));
    let res = send::<MockBackend, _>(AuthApi::new(backend), req).await;
    assert_eq!(res.status, StatusCode::OK);
    let session = res.session.expect("No session cookie was set");
    assert_eq!(session.len(), 32);
}

#[actix_web::test]
async fn register_reuses_the_callers_session() {
    let mut backend = MockBackend::new();
    backend
        .expect_register_user()
        .withf(|login, _, token| login == "bob" && token == "existing-token")
        .times(1)
        .returning(|_, _, _| Ok(()));
    let req = TestRequest::post().uri("/api/user/register").set_json(credentials("bob", "pa55word"));
    let res = send::<MockBackend, _>(AuthApi::new(backend), with_session(req, "existing-token")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.session.as_deref(), Some("existing-token"));
}

#[actix_web::test]
async fn register_with_a_taken_login() {
    let mut backend = MockBackend::new();
    backend.expect_register_user().returning(|login, _, _| Err(AuthApiError::LoginTaken(login.to_string())));
    let req = TestRequest::post().uri("/api/user/register").set_json(credentials("alice", "hunter2"));
    let res = send::<MockBackend, _>(AuthApi::new(backend), req).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert!(res.session.is_none());
    assert!(res.body.contains("alice"));
}

#[actix_web::test]
async fn register_with_malformed_requests() {
    // Empty passwords are rejected before the backend is consulted
    let req = TestRequest::post().uri("/api/user/register").set_json(credentials("alice", ""));
    let res = send::<MockBackend, _>(AuthApi::new(MockBackend::new()), req).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let req = TestRequest::post().uri("/api/user/register").set_json(serde_json::json!({ "login": "alice" }));
    let res = send::<MockBackend, _>(AuthApi::new(MockBackend::new()), req).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let req = TestRequest::post()
        .uri("/api/user/register")
        .insert_header(("content-type", "application/json"))
        .set_payload("{login: alice");
    let res = send::<MockBackend, _>(AuthApi::new(MockBackend::new()), req).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn login() {
    let mut backend = MockBackend::new();
    backend
        .expect_login_user()
        .withf(|login, _, token| login == "alice" && token == "alice-session")
        .times(1)
        .returning(|_, _, _| Ok(()));
    let req = TestRequest::post().uri("/api/user/login").set_json(credentials("alice", "hunter2"));
    let res = send::<MockBackend, _>(AuthApi::new(backend), with_session(req, "alice-session")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.session.as_deref(), Some("alice-session"));
}

#[actix_web::test]
async fn login_with_the_wrong_password() {
    let mut backend = MockBackend::new();
    backend.expect_login_user().returning(|_, _, _| Err(AuthApiError::WrongData));
    let req = TestRequest::post().uri("/api/user/login").set_json(credentials("alice", "letmein"));
    let res = send::<MockBackend, _>(AuthApi::new(backend), req).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.session.is_none());
    assert_eq!(res.body, r#"{"error":"Login and password do not match"}"#);
}
