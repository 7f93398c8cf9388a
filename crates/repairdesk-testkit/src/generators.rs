//! Proptest generators for property-based testing.
//!
//! Phones are never blank because a blank phone is stored as absent.

use proptest::prelude::*;

use repairdesk_core::{Order, OrderDraft, OrderId, Part, PartId, Region, Status};

use crate::fixtures::at;

/// Generate a Status.
pub fn status() -> impl Strategy<Value = Status> {
    prop::sample::select(Status::ALL.to_vec())
}

/// Generate a Region.
pub fn region() -> impl Strategy<Value = Region> {
    prop::sample::select(Region::ALL.to_vec())
}

/// Generate a non-negative price: mostly arbitrary full-precision values,
/// sometimes whole rubles or zero.
pub fn price() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => 0.0f64..1e7,
        1 => (0u32..=100_000u32).prop_map(f64::from),
        1 => Just(0.0),
    ]
}

/// Generate a valid quantity.
pub fn quantity() -> impl Strategy<Value = u32> {
    1u32..=50
}

/// Generate a short human-ish name (Latin or Cyrillic words).
pub fn name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][a-z]{2,10}( [A-Z0-9][a-z0-9-]{1,6}){0,2}",
        "[А-Я][а-я]{2,10}( [а-я]{2,8}){0,1}",
    ]
}

/// Generate a phone number.
pub fn phone() -> impl Strategy<Value = String> {
    "\\+7 \\([0-9]{3}\\) [0-9]{3}-[0-9]{2}-[0-9]{2}"
}

/// Generate a part with a given index-based id.
pub fn part(index: usize) -> impl Strategy<Value = Part> {
    (name(), price(), quantity()).prop_map(move |(name, price, quantity)| Part {
        id: PartId::new(format!("p{index}")),
        name,
        price,
        quantity,
    })
}

/// Generate up to `max` parts with distinct ids.
pub fn parts(max: usize) -> impl Strategy<Value = Vec<Part>> {
    (0..=max).prop_flat_map(|n| (0..n).map(part).collect::<Vec<_>>())
}

/// Generate a valid draft.
pub fn draft() -> impl Strategy<Value = OrderDraft> {
    (
        name(),
        name(),
        proptest::option::of(phone()),
        proptest::option::of(region()),
        status(),
        "[a-z ]{0,40}",
        parts(4),
        price(),
    )
        .prop_map(
            |(tool_name, client_name, client_phone, region, status, comment, parts, labor_price)| {
                OrderDraft {
                    tool_name,
                    client_name,
                    client_phone,
                    region,
                    status,
                    comment,
                    parts,
                    labor_price,
                }
            },
        )
}

/// Generate an order with the given id. Timestamps are whole seconds drawn
/// from a narrow range so that ties are common.
pub fn order(id: String) -> impl Strategy<Value = Order> {
    (draft(), 0i64..20, 0i64..5).prop_map(move |(draft, created, edited)| {
        let mut order = Order::from_draft(OrderId::new(id.clone()), draft, at(1_700_000_000 + created));
        order.updated_at = order.created_at + chrono::Duration::seconds(edited);
        order
    })
}

/// Generate a collection of up to `max` orders with distinct ids.
pub fn orders(max: usize) -> impl Strategy<Value = Vec<Order>> {
    (0..=max).prop_flat_map(|n| {
        (0..n)
            .map(|i| order(format!("o{i}")))
            .collect::<Vec<_>>()
    })
}
