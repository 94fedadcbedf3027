use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: i64,
    pub qty: i32,
}

/// The two quantity steppers the cart exposes.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QtyOp {
    Plus,
    Minus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQtyRequest {
    pub op: QtyOp,
}

/// Cart entry with the joined product; `product` is None when the product
/// row has been deleted out from under the cart.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemDto {
    pub id: i64,
    pub qty: i32,
    pub product: Option<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartItemDto>,
}
