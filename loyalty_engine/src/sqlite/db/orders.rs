use chrono::Utc;
use log::{debug, trace};
use lps_common::Points;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderNumber, OrderStatusType},
    traits::{InsertOrderResult, OrderFlowError},
};

/// Inserts the order with status `NEW`. The primary key on `number` makes this atomic: if two submissions race, only
/// one of them inserts, and the other is told who owns the number.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<InsertOrderResult, OrderFlowError> {
    let inserted: Option<Order> = sqlx::query_as(
        r#"
            INSERT INTO orders (number, owner, status, submitted_at, updated_at)
            VALUES ($1, $2, 'NEW', $3, $3)
            ON CONFLICT (number) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(&order.number)
    .bind(&order.owner)
    .bind(order.submitted_at)
    .fetch_optional(&mut *conn)
    .await?;
    if let Some(order) = inserted {
        debug!("🗃️ Order {} inserted for {}", order.number, order.owner);
        return Ok(InsertOrderResult::Inserted(order));
    }
    let owner: Option<String> = sqlx::query_scalar("SELECT owner FROM orders WHERE number = $1")
        .bind(&order.number)
        .fetch_optional(&mut *conn)
        .await?;
    match owner {
        Some(owner) => {
            trace!("🗃️ Order {} already exists and belongs to {owner}", order.number);
            Ok(InsertOrderResult::AlreadyExists { owner })
        },
        None => Err(OrderFlowError::DatabaseError(format!(
            "Order {} conflicted on insert, but could not be found afterwards",
            order.number
        ))),
    }
}

/// Moves the order into `status`, provided its current status is a legal predecessor. The check and the write are a
/// single statement, so concurrent workers can never regress an order.
///
/// Returns the updated order, or `None` if no row qualified.
pub async fn update_status(
    number: &OrderNumber,
    status: OrderStatusType,
    accrual: Option<Points>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderFlowError> {
    let predecessors = status.predecessors();
    if predecessors.is_empty() {
        return Ok(None);
    }
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE orders SET status = ");
    builder
        .push_bind(status)
        .push(", accrual = COALESCE(")
        .push_bind(accrual)
        .push(", accrual), updated_at = ")
        .push_bind(Utc::now())
        .push(" WHERE number = ")
        .push_bind(number.clone())
        .push(" AND status IN (");
    let mut separated = builder.separated(", ");
    for s in predecessors {
        separated.push_bind(*s);
    }
    separated.push_unseparated(") RETURNING *");
    let order: Option<Order> = builder.build_query_as().fetch_optional(conn).await?;
    match &order {
        Some(o) => debug!("🗃️ Order {number} is now {}", o.status),
        None => trace!("🗃️ Order {number} was not moved to {status}"),
    }
    Ok(order)
}

pub async fn fetch_order(number: &OrderNumber, conn: &mut SqliteConnection) -> Result<Option<Order>, OrderFlowError> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE number = $1").bind(number).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_orders_for_owner(owner: &str, conn: &mut SqliteConnection) -> Result<Vec<Order>, OrderFlowError> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE owner = $1 ORDER BY submitted_at DESC, rowid DESC")
        .bind(owner)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

pub async fn fetch_unsettled_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, OrderFlowError> {
    let orders = sqlx::query_as(
        "SELECT * FROM orders WHERE status IN ('NEW', 'PROCESSING') ORDER BY submitted_at ASC, rowid ASC",
    )
    .fetch_all(conn)
    .await?;
    Ok(orders)
}
