use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use loyalty_engine::traits::{AuthManagement, LedgerManagement, OrderManagement};

use crate::{routes::health, server::api_scope, session::SessionCookie};

pub const SESSION_COOKIE: &str = "user_identification";

pub struct TestResponse {
    pub status: StatusCode,
    /// The value of the session cookie, if the response set one
    pub session: Option<String>,
    pub body: String,
}

/// Sends `req` to an app serving every route for backend type `B`. `api` is registered as app data, so only the routes
/// of that API can be served successfully.
pub async fn send<B, T>(api: T, req: TestRequest) -> TestResponse
where
    B: OrderManagement + LedgerManagement + AuthManagement + 'static,
    T: 'static,
{
    let _ = env_logger::try_init();
    let app = App::new()
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(SessionCookie::default()))
        .service(health)
        .service(api_scope::<B>());
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let session = res.response().cookies().find(|c| c.name() == SESSION_COOKIE).map(|c| c.value().to_string());
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    TestResponse { status, session, body }
}

/// A request that carries `token` in the session cookie.
pub fn with_session(req: TestRequest, token: &str) -> TestRequest {
    req.cookie(SessionCookie::default().issue(token))
}
