use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::cart::{AddToCartRequest, CartItemDto, CartList, QtyOp},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, Product},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
};

#[derive(FromRow)]
struct CartWithProductRow {
    order_id: i64,
    qty: i32,
    // LEFT JOIN side: all absent when the product was deleted.
    product_id: Option<i64>,
    name: Option<String>,
    price: Option<i64>,
    image: Option<String>,
    category_id: Option<i64>,
    product_created_at: Option<DateTime<Utc>>,
}

impl CartWithProductRow {
    fn into_dto(self) -> CartItemDto {
        let product = match (
            self.product_id,
            self.name,
            self.price,
            self.image,
            self.category_id,
            self.product_created_at,
        ) {
            (Some(id), Some(name), Some(price), Some(image), Some(category_id), Some(created_at)) => {
                Some(Product {
                    id,
                    name,
                    price,
                    image,
                    category_id,
                    created_at,
                })
            }
            _ => None,
        };
        CartItemDto {
            id: self.order_id,
            qty: self.qty,
            product,
        }
    }
}

pub async fn list_cart(
    pool: &DbPool,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<CartList>> {
    let (page, limit, offset) = pagination.normalize();
    let rows = sqlx::query_as::<_, CartWithProductRow>(
        r#"
        SELECT o.id AS order_id, o.qty,
               p.id AS product_id, p.name, p.price, p.image, p.category_id,
               p.created_at AS product_created_at
        FROM orders o
        LEFT JOIN products p ON p.id = o.product_id
        WHERE o.user_id = $1 AND o.status = 'cart'
        ORDER BY o.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND status = 'cart'",
    )
    .bind(user.user_id)
    .fetch_one(pool)
    .await?;

    let items = rows.into_iter().map(CartWithProductRow::into_dto).collect();

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("OK", CartList { items }, Some(meta)))
}

pub async fn add_to_cart(
    pool: &DbPool,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<Order>> {
    if payload.qty < 1 {
        return Err(AppError::BadRequest(
            "qty must be greater than 0".to_string(),
        ));
    }

    let product_exist: Option<(i64,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(payload.product_id)
        .fetch_optional(pool)
        .await?;
    if product_exist.is_none() {
        return Err(AppError::BadRequest("product not found".to_string()));
    }

    // One cart row per (product, user); the partial unique index makes the
    // upsert atomic. On conflict the existing row comes back untouched.
    let order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders (status, qty, product_id, user_id)
        VALUES ('cart', $3, $1, $2)
        ON CONFLICT (product_id, user_id) WHERE status = 'cart'
        DO UPDATE SET qty = orders.qty
        RETURNING *
        "#,
    )
    .bind(payload.product_id)
    .bind(user.user_id)
    .bind(payload.qty)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "cart_add",
        Some("orders"),
        Some(serde_json::json!({ "product_id": payload.product_id, "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", order, None))
}

/// Step a cart entry's quantity. `minus` at qty 1 is a no-op, as is an
/// unknown or foreign order id; the response carries the row as it stands,
/// or nothing when there is no such cart entry.
pub async fn update_qty(
    pool: &DbPool,
    user: &AuthUser,
    order_id: i64,
    op: QtyOp,
) -> AppResult<ApiResponse<Order>> {
    let updated: Option<Order> = match op {
        QtyOp::Plus => {
            sqlx::query_as(
                r#"
                UPDATE orders
                SET qty = qty + 1, updated_at = now()
                WHERE id = $1 AND user_id = $2 AND status = 'cart'
                RETURNING *
                "#,
            )
            .bind(order_id)
            .bind(user.user_id)
            .fetch_optional(pool)
            .await?
        }
        QtyOp::Minus => {
            sqlx::query_as(
                r#"
                UPDATE orders
                SET qty = qty - 1, updated_at = now()
                WHERE id = $1 AND user_id = $2 AND status = 'cart' AND qty > 1
                RETURNING *
                "#,
            )
            .bind(order_id)
            .bind(user.user_id)
            .fetch_optional(pool)
            .await?
        }
    };

    let order = match updated {
        Some(o) => Some(o),
        None => {
            sqlx::query_as(
                "SELECT * FROM orders WHERE id = $1 AND user_id = $2 AND status = 'cart'",
            )
            .bind(order_id)
            .bind(user.user_id)
            .fetch_optional(pool)
            .await?
        }
    };

    Ok(ApiResponse::maybe("OK", order, None))
}

pub async fn remove_from_cart(
    pool: &DbPool,
    user: &AuthUser,
    order_id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query(
        "DELETE FROM orders WHERE id = $1 AND user_id = $2 AND status = 'cart'",
    )
    .bind(order_id)
    .bind(user.user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "cart_remove",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
