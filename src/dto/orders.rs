use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Order, Product};

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

/// Order plus the product it references. `product` is None when the product
/// was deleted after the order was placed; the order row itself is intact.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetail {
    pub order: Order,
    pub product: Option<Product>,
}
