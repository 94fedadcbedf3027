use storefront_api::lifecycle::OrderStatus;

#[test]
fn cart_only_moves_to_pending() {
    assert!(OrderStatus::Cart.can_transition(OrderStatus::Pending));
    for to in [
        OrderStatus::Cart,
        OrderStatus::Confirmed,
        OrderStatus::Shipping,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ] {
        assert!(!OrderStatus::Cart.can_transition(to), "cart -> {to} must be rejected");
    }
}

#[test]
fn forward_moves_allowed_including_skips() {
    assert!(OrderStatus::Pending.can_transition(OrderStatus::Confirmed));
    assert!(OrderStatus::Pending.can_transition(OrderStatus::Shipping));
    assert!(OrderStatus::Pending.can_transition(OrderStatus::Completed));
    assert!(OrderStatus::Confirmed.can_transition(OrderStatus::Shipping));
    assert!(OrderStatus::Confirmed.can_transition(OrderStatus::Completed));
    assert!(OrderStatus::Shipping.can_transition(OrderStatus::Completed));
}

#[test]
fn backward_moves_rejected() {
    assert!(!OrderStatus::Completed.can_transition(OrderStatus::Pending));
    assert!(!OrderStatus::Shipping.can_transition(OrderStatus::Pending));
    assert!(!OrderStatus::Shipping.can_transition(OrderStatus::Confirmed));
    assert!(!OrderStatus::Confirmed.can_transition(OrderStatus::Pending));
    for s in OrderStatus::ALL {
        assert!(!s.can_transition(s), "{s} -> {s} must be rejected");
        assert!(!s.can_transition(OrderStatus::Cart), "{s} -> cart must be rejected");
    }
}

#[test]
fn cancellation_only_from_pending_or_confirmed() {
    assert!(OrderStatus::Pending.can_transition(OrderStatus::Cancelled));
    assert!(OrderStatus::Confirmed.can_transition(OrderStatus::Cancelled));
    assert!(!OrderStatus::Shipping.can_transition(OrderStatus::Cancelled));
    assert!(!OrderStatus::Completed.can_transition(OrderStatus::Cancelled));
    assert!(!OrderStatus::Cancelled.can_transition(OrderStatus::Cancelled));
}

#[test]
fn terminal_states_never_move() {
    for terminal in [OrderStatus::Completed, OrderStatus::Cancelled] {
        assert!(terminal.is_terminal());
        for to in OrderStatus::ALL {
            assert!(!terminal.can_transition(to), "{terminal} -> {to} must be rejected");
        }
    }
}

#[test]
fn parse_is_case_insensitive_and_round_trips() {
    for s in OrderStatus::ALL {
        assert_eq!(OrderStatus::parse(s.as_str()), Some(s));
        assert_eq!(OrderStatus::parse(&s.as_str().to_uppercase()), Some(s));
    }
    assert_eq!(OrderStatus::parse("Pending"), Some(OrderStatus::Pending));
    assert_eq!(OrderStatus::parse("paid"), None);
    assert_eq!(OrderStatus::parse(""), None);
}

#[test]
fn assignable_excludes_cart() {
    assert_eq!(OrderStatus::ASSIGNABLE.len(), 5);
    assert!(!OrderStatus::ASSIGNABLE.contains(&OrderStatus::Cart));
}
