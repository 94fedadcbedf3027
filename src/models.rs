use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Account record as exposed to clients. The argon2 hash stays in the
/// storage layer and never crosses this boundary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Currency minor units.
    pub price: i64,
    pub image: String,
    /// Plain reference; the category may have been deleted since.
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
}

/// One line-item purchase intent. A row with status `cart` is a cart entry;
/// checkout moves it into the fulfillment pipeline and freezes `total_price`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: i64,
    pub status: String,
    pub qty: i32,
    /// Set exactly when the order leaves `cart`; a snapshot of
    /// `product.price * qty` at checkout time, never recomputed.
    pub total_price: Option<i64>,
    pub product_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
