//! Derived views over an order collection.
//!
//! Everything here is a pure function of its inputs and is recomputed on
//! every call; there is no cache to invalidate.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::order::{Order, Status};

/// Status selection for [`view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    /// Whether an order with `status` passes the filter.
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    /// Select `status`, or go back to `All` if it is already selected.
    pub fn toggle(self, status: Status) -> Self {
        if self == StatusFilter::Only(status) {
            StatusFilter::All
        } else {
            StatusFilter::Only(status)
        }
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        StatusFilter::Only(status)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => f.write_str(status.key()),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<Status>()
            .map(StatusFilter::Only)
            .map_err(|_| CoreError::InvalidFilter(s.to_string()))
    }
}

/// Newest-first, filtered subset of `orders`.
///
/// 1. Sort by `created_at` descending. The sort is stable, so orders created
///    at the same instant keep their relative order.
/// 2. Keep only orders that pass `filter`.
/// 3. If `query` is not blank, keep only orders whose tool name, client name,
///    phone or region contains the lowercased query.
pub fn view<'a>(orders: &'a [Order], query: &str, filter: StatusFilter) -> Vec<&'a Order> {
    let mut result: Vec<&Order> = orders.iter().collect();
    result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    if filter != StatusFilter::All {
        result.retain(|o| filter.matches(o.status));
    }

    if !query.trim().is_empty() {
        let needle = query.to_lowercase();
        result.retain(|o| o.matches(&needle));
    }

    result
}

/// Aggregate figures over a collection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub received: usize,
    pub in_progress: usize,
    pub done: usize,
    pub returned: usize,
    /// Sum of every order's derived total.
    pub revenue: f64,
}

impl Stats {
    /// Number of orders with the given status.
    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Received => self.received,
            Status::InProgress => self.in_progress,
            Status::Done => self.done,
            Status::Returned => self.returned,
        }
    }
}

/// Counts by status and total revenue.
pub fn stats(orders: &[Order]) -> Stats {
    orders.iter().fold(Stats::default(), |mut acc, order| {
        acc.total += 1;
        match order.status {
            Status::Received => acc.received += 1,
            Status::InProgress => acc.in_progress += 1,
            Status::Done => acc.done += 1,
            Status::Returned => acc.returned += 1,
        }
        acc.revenue += order.total();
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{OrderDraft, Region};
    use crate::types::OrderId;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn order(id: &str, created: i64, draft: OrderDraft) -> Order {
        Order::from_draft(OrderId::new(id), draft, at(created))
    }

    fn ids(orders: &[&Order]) -> Vec<String> {
        orders.iter().map(|o| o.id.to_string()).collect()
    }

    fn sample() -> Vec<Order> {
        vec![
            order("a", 100, OrderDraft::new("Drill", "Ivanov").status(Status::InProgress)),
            order(
                "b",
                300,
                OrderDraft::new("Saw", "Petrov")
                    .phone("+7 912 000")
                    .status(Status::Done),
            ),
            order(
                "c",
                200,
                OrderDraft::new("Grinder", "Sidorova").region(Region::Tatarstan),
            ),
            order("d", 300, OrderDraft::new("Hammer drill", "Kuznetsov")),
        ]
    }

    #[test]
    fn test_view_sorts_newest_first_and_is_stable() {
        let orders = sample();
        let all = view(&orders, "", StatusFilter::All);
        // b and d share a timestamp; b comes first in the input.
        assert_eq!(ids(&all), ["b", "d", "c", "a"]);
    }

    #[test]
    fn test_view_status_filter() {
        let orders = sample();
        let done = view(&orders, "", StatusFilter::Only(Status::Done));
        assert_eq!(ids(&done), ["b"]);

        let received = view(&orders, "", Status::Received.into());
        assert_eq!(ids(&received), ["d", "c"]);

        let returned = view(&orders, "", Status::Returned.into());
        assert!(returned.is_empty());
    }

    #[test]
    fn test_view_query_is_case_insensitive_over_fields() {
        let orders = sample();
        assert_eq!(ids(&view(&orders, "DRILL", StatusFilter::All)), ["d", "a"]);
        assert_eq!(ids(&view(&orders, "petr", StatusFilter::All)), ["b"]);
        assert_eq!(ids(&view(&orders, "912", StatusFilter::All)), ["b"]);
        assert_eq!(ids(&view(&orders, "татар", StatusFilter::All)), ["c"]);
        assert!(view(&orders, "chainsaw", StatusFilter::All).is_empty());
    }

    #[test]
    fn test_view_blank_query_is_ignored() {
        let orders = sample();
        assert_eq!(view(&orders, "   ", StatusFilter::All).len(), 4);
    }

    #[test]
    fn test_view_combines_filter_and_query() {
        let orders = sample();
        let hits = view(&orders, "drill", Status::InProgress.into());
        assert_eq!(ids(&hits), ["a"]);
    }

    #[test]
    fn test_stats_example() {
        let orders = vec![order(
            "x",
            1,
            OrderDraft::new("Drill", "Ivanov")
                .labor_price(500.0)
                .part("Brush", 100.0, 2),
        )];
        let s = stats(&orders);
        assert_eq!(s.total, 1);
        assert_eq!(s.revenue, 700.0);

        assert_eq!(view(&orders, "ivan", StatusFilter::All).len(), 1);
        assert!(view(&orders, "saw", StatusFilter::All).is_empty());
    }

    #[test]
    fn test_stats_counts() {
        let s = stats(&sample());
        assert_eq!(s.total, 4);
        assert_eq!(s.in_progress, 1);
        assert_eq!(s.done, 1);
        assert_eq!(s.count(Status::Received), 2);
        assert_eq!(s.count(Status::Returned), 0);
        assert_eq!(s.revenue, 0.0);
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(stats(&[]), Stats::default());
    }

    #[test]
    fn test_filter_parse_and_toggle() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "done".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(Status::Done)
        );
        assert!(matches!(
            "lost".parse::<StatusFilter>(),
            Err(CoreError::InvalidFilter(_))
        ));

        let f = StatusFilter::All.toggle(Status::Done);
        assert_eq!(f, StatusFilter::Only(Status::Done));
        assert_eq!(f.toggle(Status::Done), StatusFilter::All);
        assert_eq!(
            f.toggle(Status::InProgress),
            StatusFilter::Only(Status::InProgress)
        );
        assert_eq!(f.to_string(), "done");
    }
}
