use std::collections::HashMap;

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CartItem, ClientTokenResponse, OrderCreatedResponse, PaymentRequest},
    queries::order_queries,
    utils::{extractors::extract_user_id, jwt::Claims},
};

pub async fn braintree_token(State(state): State<AppState>) -> Result<Json<ClientTokenResponse>> {
    let client_token = state.gateway.client_token().await?;

    Ok(Json(ClientTokenResponse { client_token }))
}

/// Checkout pipeline: validate, reserve stock, charge, persist. Each step is
/// a hard stop; a failed charge releases the reservation, and a failed write
/// after a successful charge surfaces as the distinct partial-failure error.
pub async fn braintree_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>)> {
    let buyer_id = extract_user_id(&claims)?;

    validate_payment(&payload)?;

    let amount = format_cents(cart_total_cents(&payload.cart)?);

    let demand = stock_demand(&payload.cart);
    if !demand.is_empty() && !order_queries::reserve_stock(&state.db, &demand).await? {
        return Err(AppError::Conflict(
            "Insufficient stock for one or more products".to_string(),
        ));
    }

    let receipt = match state.gateway.sale(&amount, &payload.nonce).await {
        Ok(receipt) => receipt,
        Err(err) => {
            if !demand.is_empty() {
                if let Err(release_err) = order_queries::release_stock(&state.db, &demand).await {
                    tracing::error!("Failed to release reserved stock: {}", release_err);
                }
            }
            return Err(err);
        }
    };

    tracing::info!(
        transaction_id = %receipt.transaction_id,
        amount = %amount,
        "Payment captured"
    );

    let order =
        match order_queries::create_order_with_items(&state.db, buyer_id, &receipt.raw, &payload.cart)
            .await
        {
            Ok(order) => order,
            Err(err) => {
                // Money has moved; the error variant logs the transaction id
                // for manual reconciliation.
                tracing::error!("Order persistence failed after capture: {}", err);
                return Err(AppError::PaymentUnrecorded {
                    transaction_id: receipt.transaction_id,
                });
            }
        };

    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedResponse {
            order_id: order.id,
            status: order.status,
            amount,
        }),
    ))
}

/// Ordered hard stops: missing nonce and empty cart are plain validation
/// failures; a malformed price is its own class (422).
pub fn validate_payment(payload: &PaymentRequest) -> Result<()> {
    if payload.nonce.trim().is_empty() {
        return Err(AppError::BadRequest("Payment nonce is required".to_string()));
    }

    if payload.cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    for item in &payload.cart {
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(AppError::UnprocessableEntity(format!(
                "Invalid price in cart: {}",
                item.price
            )));
        }
    }

    Ok(())
}

/// Sums each line as integer cents, rounding per item, so the total carries
/// no floating-point drift regardless of cart size.
pub fn cart_total_cents(cart: &[CartItem]) -> Result<i64> {
    let mut total: i64 = 0;

    for item in cart {
        let cents = (item.price * 100.0).round() as i64;
        total = total
            .checked_add(cents)
            .ok_or_else(|| AppError::UnprocessableEntity("Cart total out of range".to_string()))?;
    }

    Ok(total)
}

pub fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Total units demanded per identified product; anonymous lines carry no
/// stock to reserve.
pub fn stock_demand(cart: &[CartItem]) -> HashMap<i32, i32> {
    let mut demand: HashMap<i32, i32> = HashMap::new();

    for item in cart {
        if let Some(product_id) = item.product_id {
            *demand.entry(product_id).or_insert(0) += 1;
        }
    }

    demand
}
