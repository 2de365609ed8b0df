use std::{future::Future, pin::Pin, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer, Scope};
use log::*;
use loyalty_engine::{
    events::{EventHandlers, EventHooks, OrderSettledEvent},
    traits::{AuthManagement, LedgerManagement, OrderManagement},
    AccrualClient,
    AuthApi,
    LedgerApi,
    OrderFlowApi,
    ReconciliationPool,
    ReconciliationQueue,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        LoginRoute,
        MyBalanceRoute,
        MyOrdersRoute,
        MyWithdrawalsRoute,
        RegisterRoute,
        SubmitOrderRoute,
        WithdrawRoute,
    },
    session::SessionCookie,
};

const EVENT_BUFFER_SIZE: usize = 128;

/// Starts the whole service: the store, the reconciliation pool, and the HTTP server. Returns when the HTTP server
/// stops.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;

    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, settlement_hooks());
    let producers = handlers.producers();
    handlers.start_handlers();

    let queue = ReconciliationQueue::new();
    let accrual = AccrualClient::new(config.accrual.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let pool =
        ReconciliationPool::new(db.clone(), accrual, queue.clone(), config.reconciliation.clone(), producers).start();
    info!("🚀️ Reconciliation pool started with {} workers", pool.size());

    let resumed = OrderFlowApi::new(db.clone(), queue.clone())
        .resume_unsettled_orders()
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if resumed > 0 {
        info!("🚀️ Resuming reconciliation of {resumed} orders");
    }

    let srv = create_server_instance(config, db.clone(), queue)?;
    let result = srv.await.map_err(ServerError::from);
    pool.shutdown().await;
    db.close().await;
    result
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    queue: ReconciliationQueue,
) -> Result<Server, ServerError> {
    let session_cookie = SessionCookie::new(config.session_cookie.clone());
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), queue.clone());
        let ledger_api = LedgerApi::new(db.clone());
        let auth_api = AuthApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("lps::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(ledger_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(session_cookie.clone()))
            .service(health)
            .service(api_scope::<SqliteDatabase>())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Every user-facing route, for a backend of type `B`.
pub fn api_scope<B>() -> Scope
where B: OrderManagement + LedgerManagement + AuthManagement + 'static {
    web::scope("/api")
        .service(RegisterRoute::<B>::new())
        .service(LoginRoute::<B>::new())
        .service(SubmitOrderRoute::<B>::new())
        .service(MyOrdersRoute::<B>::new())
        .service(MyBalanceRoute::<B>::new())
        .service(WithdrawRoute::<B>::new())
        .service(MyWithdrawalsRoute::<B>::new())
}

fn settlement_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_order_settled(log_settlement);
    hooks
}

fn log_settlement(event: OrderSettledEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        let order = event.order;
        match order.accrual {
            Some(points) => info!("📬️ Order {} of {} settled as {}, earning {points}", order.number, order.owner, order.status),
            None => info!("📬️ Order {} of {} settled as {}", order.number, order.owner, order.status),
        }
    })
}
