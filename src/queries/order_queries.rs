use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    error::Result,
    models::{CartItem, Order, OrderItem, OrderStatus, OrderWithBuyer},
};

const ORDER_WITH_BUYER: &str =
    "SELECT o.id, o.buyer_id, u.name AS buyer_name, o.payment, o.status, o.created_at, o.updated_at
     FROM orders o
     INNER JOIN users u ON u.id = o.buyer_id";

/// Atomically decrements stock for every demanded product. All-or-nothing:
/// any product without enough stock rolls the whole reservation back and
/// returns false.
pub async fn reserve_stock(pool: &PgPool, demand: &HashMap<i32, i32>) -> Result<bool> {
    let mut tx = pool.begin().await?;

    // Stable id order so two concurrent reservations cannot deadlock on
    // each other's row locks.
    let mut products: Vec<(i32, i32)> = demand.iter().map(|(&id, &qty)| (id, qty)).collect();
    products.sort_unstable();

    for (product_id, quantity) in products {
        let result = sqlx::query(
            "UPDATE products SET quantity = quantity - $1, updated_at = NOW()
             WHERE id = $2 AND quantity >= $1",
        )
        .bind(quantity)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }
    }

    tx.commit().await?;
    Ok(true)
}

/// Returns previously reserved stock after a failed charge.
pub async fn release_stock(pool: &PgPool, demand: &HashMap<i32, i32>) -> Result<()> {
    let mut tx = pool.begin().await?;

    let mut products: Vec<(i32, i32)> = demand.iter().map(|(&id, &qty)| (id, qty)).collect();
    products.sort_unstable();

    for (product_id, quantity) in products {
        sqlx::query(
            "UPDATE products SET quantity = quantity + $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(quantity)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Persists the order and its item snapshots in one transaction. Item rows
/// capture name and price as submitted, never re-resolved from the
/// products table.
pub async fn create_order_with_items(
    pool: &PgPool,
    buyer_id: i32,
    payment: &serde_json::Value,
    cart: &[CartItem],
) -> Result<Order> {
    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (buyer_id, payment) VALUES ($1, $2) RETURNING *",
    )
    .bind(buyer_id)
    .bind(payment)
    .fetch_one(&mut *tx)
    .await?;

    let product_ids: Vec<Option<i32>> = cart.iter().map(|item| item.product_id).collect();
    let names: Vec<&str> = cart
        .iter()
        .map(|item| item.name.as_deref().unwrap_or("Item"))
        .collect();
    let prices: Vec<Decimal> = cart
        .iter()
        .map(|item| Decimal::new((item.price * 100.0).round() as i64, 2))
        .collect();

    sqlx::query(
        "INSERT INTO order_items (order_id, product_id, name, price)
         SELECT $1, unnest($2::int[]), unnest($3::varchar[]), unnest($4::decimal[])",
    )
    .bind(order.id)
    .bind(&product_ids)
    .bind(&names)
    .bind(&prices)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(order)
}

pub async fn get_user_orders(pool: &PgPool, buyer_id: i32) -> Result<Vec<OrderWithBuyer>> {
    let orders = sqlx::query_as::<_, OrderWithBuyer>(&format!(
        "{} WHERE o.buyer_id = $1 ORDER BY o.created_at DESC",
        ORDER_WITH_BUYER
    ))
    .bind(buyer_id)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn get_all_orders(pool: &PgPool) -> Result<Vec<OrderWithBuyer>> {
    let orders = sqlx::query_as::<_, OrderWithBuyer>(&format!(
        "{} ORDER BY o.created_at DESC",
        ORDER_WITH_BUYER
    ))
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn get_items_for_orders(pool: &PgPool, order_ids: &[i32]) -> Result<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = ANY($1)")
        .bind(order_ids)
        .fetch_all(pool)
        .await?;

    Ok(items)
}

pub async fn update_status(
    pool: &PgPool,
    order_id: i32,
    status: OrderStatus,
) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(order_id)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}
