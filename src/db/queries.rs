//! Database queries for order persistence
//!
//! The queries take any Postgres executor so the order store can compose
//! them inside a single transaction.

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{OrderRequest, PackageLine};

/// Count existing orders whose identifying fields exactly match the
/// submission. Any hit means the submission is a duplicate.
pub async fn count_matching_orders<'e, E>(executor: E, order: &OrderRequest) -> Result<i64>
where
    E: Executor<'e, Database = Postgres>,
{
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM orders
        WHERE from_region_id = $1
          AND to_region_id = $2
          AND customer_name = $3
          AND tel = $4
          AND email = $5
          AND from_address = $6
          AND to_address = $7
          AND scheduled_date = $8
        "#,
    )
    .bind(order.from_region_id)
    .bind(order.to_region_id)
    .bind(&order.customer_name)
    .bind(&order.tel)
    .bind(&order.email)
    .bind(&order.from_address)
    .bind(&order.to_address)
    .bind(order.scheduled_date)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

/// Insert the order row and return its generated id
pub async fn insert_order<'e, E>(executor: E, order: &OrderRequest) -> Result<Uuid>
where
    E: Executor<'e, Database = Postgres>,
{
    let order_id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO orders (
            id, from_region_id, to_region_id, customer_name, tel, email,
            from_address, to_address, scheduled_date
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(order_id)
    .bind(order.from_region_id)
    .bind(order.to_region_id)
    .bind(&order.customer_name)
    .bind(&order.tel)
    .bind(&order.email)
    .bind(&order.from_address)
    .bind(&order.to_address)
    .bind(order.scheduled_date)
    .execute(executor)
    .await?;

    Ok(order_id)
}

/// Insert one package line for an order
pub async fn insert_order_package<'e, E>(
    executor: E,
    order_id: Uuid,
    line: &PackageLine,
) -> Result<()>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO order_packages (order_id, package_id, quantity)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(order_id)
    .bind(line.package_id)
    .bind(line.quantity)
    .execute(executor)
    .await?;

    Ok(())
}

/// Insert one requested optional service for an order
pub async fn insert_order_service<'e, E>(
    executor: E,
    order_id: Uuid,
    service_id: i32,
) -> Result<()>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO order_optional_services (order_id, service_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(order_id)
    .bind(service_id)
    .execute(executor)
    .await?;

    Ok(())
}
