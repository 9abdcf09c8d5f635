use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use sqlx::PgPool;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        BuyerSummary, Order, OrderResponse, OrderStatus, OrderWithBuyer, UpdateOrderStatusRequest,
    },
    queries::order_queries,
    utils::{extractors::extract_user_id, jwt::Claims},
};

pub async fn get_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<OrderResponse>>> {
    let buyer_id = extract_user_id(&claims)?;
    let orders = order_queries::get_user_orders(&state.db, buyer_id).await?;

    Ok(Json(build_order_responses(&state.db, orders).await?))
}

pub async fn get_all_orders(State(state): State<AppState>) -> Result<Json<Vec<OrderResponse>>> {
    let orders = order_queries::get_all_orders(&state.db).await?;

    Ok(Json(build_order_responses(&state.db, orders).await?))
}

async fn build_order_responses(
    db: &PgPool,
    orders: Vec<OrderWithBuyer>,
) -> Result<Vec<OrderResponse>> {
    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let all_items = order_queries::get_items_for_orders(db, &order_ids).await?;

    let mut items_map: HashMap<i32, Vec<_>> = HashMap::new();
    for item in all_items {
        items_map.entry(item.order_id).or_default().push(item);
    }

    let response = orders
        .into_iter()
        .map(|order| OrderResponse {
            items: items_map.remove(&order.id).unwrap_or_default(),
            id: order.id,
            status: order.status,
            payment: order.payment,
            buyer: BuyerSummary {
                id: order.buyer_id,
                name: order.buyer_name,
            },
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
        .collect();

    Ok(response)
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<Order>> {
    // Reject anything outside the closed enumeration before touching the row.
    let status = payload
        .status
        .parse::<OrderStatus>()
        .map_err(|_| AppError::BadRequest(format!("Unknown order status: {}", payload.status)))?;

    let order = order_queries::update_status(&state.db, order_id, status)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(Json(order))
}
