use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Order fulfillment states. Stored as the lowercase strings `cart`,
/// `pending`, `confirmed`, `shipping`, `completed`, `cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Cart,
    Pending,
    Confirmed,
    Shipping,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Cart,
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipping,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// The statuses an admin may assign: everything except `cart`.
    pub const ASSIGNABLE: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipping,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Cart => "cart",
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Case-insensitive parse of the stored/wire form.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cart" => Some(OrderStatus::Cart),
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "shipping" => Some(OrderStatus::Shipping),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Position along the fulfillment pipeline. `cancelled` sits off the
    /// forward axis and is handled separately in `can_transition`.
    fn stage(self) -> u8 {
        match self {
            OrderStatus::Cart => 0,
            OrderStatus::Pending => 1,
            OrderStatus::Confirmed => 2,
            OrderStatus::Shipping => 3,
            OrderStatus::Completed => 4,
            OrderStatus::Cancelled => 5,
        }
    }

    /// Whether `self -> to` is a legal move.
    ///
    /// Rules: `cart` only ever becomes `pending` (checkout); fulfillment
    /// statuses move forward only, skips allowed; `cancelled` is reachable
    /// from `pending` and `confirmed` only; terminal states never move.
    pub fn can_transition(self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, to) {
            (Cart, Pending) => true,
            (Cart, _) | (_, Cart) => false,
            (Pending | Confirmed, Cancelled) => true,
            (_, Cancelled) => false,
            (Completed | Cancelled, _) => false,
            (from, to) => to.stage() > from.stage(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
