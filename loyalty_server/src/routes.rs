//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution:
//!
//! ```nocompile
//!     async fn my_handler() -> impl Responder {
//!         tokio::time::sleep(Duration::from_secs(5)).await; // <-- Ok. Worker thread will handle other requests here
//!     }
//! ```
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use loyalty_engine::{
    helpers::new_session_token,
    traits::{AuthManagement, LedgerApiError, LedgerManagement, OrderFlowError, OrderManagement},
    AuthApi,
    LedgerApi,
    OrderFlowApi,
};

use crate::{
    data_objects::{Credentials, WithdrawalRequest},
    errors::ServerError,
    session::{SessionCookie, SessionToken},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro.
// Every bound applies to the single backend type parameter, `B`.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            $(B: $bounds,)+
            B: 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Users  ----------------------------------------------------
route!(register => Post "/user/register" impl AuthManagement);
/// Route handler for user registration
///
/// Creates the account and logs the new user in. The session token in the request's cookie is reused if there is one,
/// otherwise a new one is issued. Either way, the response sets the session cookie.
pub async fn register<B: AuthManagement>(
    session: SessionToken,
    cookie: web::Data<SessionCookie>,
    body: web::Json<Credentials>,
    api: web::Data<AuthApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let Credentials { login, password } = body.into_inner();
    debug!("💻️ Registration request for {login}");
    let token = token_for_login(session);
    api.register(&login, &password, &token).await?;
    Ok(HttpResponse::Ok().cookie(cookie.issue(&token)).finish())
}

route!(login => Post "/user/login" impl AuthManagement);
pub async fn login<B: AuthManagement>(
    session: SessionToken,
    cookie: web::Data<SessionCookie>,
    body: web::Json<Credentials>,
    api: web::Data<AuthApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let Credentials { login, password } = body.into_inner();
    debug!("💻️ Login request for {login}");
    let token = token_for_login(session);
    api.login(&login, &password, &token).await?;
    Ok(HttpResponse::Ok().cookie(cookie.issue(&token)).finish())
}

fn token_for_login(session: SessionToken) -> String {
    if session.is_empty() {
        new_session_token()
    } else {
        session.as_str().to_string()
    }
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(submit_order => Post "/user/orders" impl OrderManagement, AuthManagement);
/// Route handler for order submission
///
/// The body is the order number as plain text. A new order is accepted with `202 Accepted` and queued for
/// reconciliation. Resubmitting one of your own orders is harmless, and answered with `200 OK`.
pub async fn submit_order<B>(
    session: SessionToken,
    body: String,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + AuthManagement,
{
    let number = body.trim();
    if number.is_empty() {
        return Err(ServerError::InvalidRequestBody("The order number is missing".into()));
    }
    trace!("💻️ Received order {number}");
    match api.submit_order(session.as_str(), number).await {
        Ok(order) => Ok(HttpResponse::Accepted().json(order)),
        Err(OrderFlowError::Duplicate(_)) => Ok(HttpResponse::Ok().finish()),
        Err(e) => Err(e.into()),
    }
}

route!(my_orders => Get "/user/orders" impl OrderManagement, AuthManagement);
pub async fn my_orders<B>(session: SessionToken, api: web::Data<OrderFlowApi<B>>) -> Result<HttpResponse, ServerError>
where B: OrderManagement + AuthManagement {
    match api.orders_for_session(session.as_str()).await {
        Ok(orders) => Ok(HttpResponse::Ok().json(orders)),
        Err(OrderFlowError::Empty) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Err(e.into()),
    }
}

//----------------------------------------------   Balance  ----------------------------------------------------
route!(my_balance => Get "/user/balance" impl LedgerManagement, AuthManagement);
pub async fn my_balance<B>(session: SessionToken, api: web::Data<LedgerApi<B>>) -> Result<HttpResponse, ServerError>
where B: LedgerManagement + AuthManagement {
    let balance = api.balance_for_session(session.as_str()).await?;
    Ok(HttpResponse::Ok().json(balance))
}

route!(withdraw => Post "/user/balance/withdraw" impl LedgerManagement, AuthManagement);
/// Route handler for withdrawals
///
/// Spends `sum` points towards the order `order`. Replaying a withdrawal that already went through succeeds without
/// spending the points again.
pub async fn withdraw<B>(
    session: SessionToken,
    body: web::Json<WithdrawalRequest>,
    api: web::Data<LedgerApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: LedgerManagement + AuthManagement,
{
    let WithdrawalRequest { order, sum } = body.into_inner();
    debug!("💻️ Withdrawal request of {sum} towards order {order}");
    let withdrawal = api.withdraw(session.as_str(), &order, sum).await?;
    Ok(HttpResponse::Ok().json(withdrawal))
}

route!(my_withdrawals => Get "/user/withdrawals" impl LedgerManagement, AuthManagement);
pub async fn my_withdrawals<B>(
    session: SessionToken,
    api: web::Data<LedgerApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: LedgerManagement + AuthManagement,
{
    match api.withdrawals_for_session(session.as_str()).await {
        Ok(withdrawals) => Ok(HttpResponse::Ok().json(withdrawals)),
        Err(LedgerApiError::Empty) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Err(e.into()),
    }
}
