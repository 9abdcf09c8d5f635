use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Closed order lifecycle: Not Processed → Processing → Shipped → Delivered,
/// with Cancelled as a side terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status")]
pub enum OrderStatus {
    #[serde(rename = "Not Processed")]
    #[sqlx(rename = "Not Processed")]
    NotProcessed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::NotProcessed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::NotProcessed => "Not Processed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: i32,
    pub buyer_id: i32,
    pub payment: serde_json::Value,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderWithBuyer {
    pub id: i32,
    pub buyer_id: i32,
    pub buyer_name: String,
    pub payment: serde_json::Value,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One line of the submitted cart. Only the price is required; identified
/// items additionally carry the product id and display name snapshotted
/// into the order.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub product_id: Option<i32>,
    pub name: Option<String>,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub nonce: String,
    pub cart: Vec<CartItem>,
}

#[derive(Debug, Serialize)]
pub struct ClientTokenResponse {
    pub client_token: String,
}

#[derive(Debug, Serialize)]
pub struct OrderCreatedResponse {
    pub order_id: i32,
    pub status: OrderStatus,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i32,
    pub status: OrderStatus,
    pub payment: serde_json::Value,
    pub buyer: BuyerSummary,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BuyerSummary {
    pub id: i32,
    pub name: String,
}
