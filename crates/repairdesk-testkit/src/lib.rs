//! # RepairDesk Testkit
//!
//! Testing utilities for RepairDesk.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a ready order book over a memory backend with a manual clock
//! - **Generators**: Proptest strategies for parts, drafts and order collections
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use repairdesk_testkit::generators::orders;
//!
//! proptest! {
//!     #[test]
//!     fn revenue_is_sum_of_totals(orders in orders(10)) {
//!         let expected: f64 = orders.iter().map(|o| o.total()).sum();
//!         prop_assert_eq!(repairdesk_core::stats(&orders).revenue, expected);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use repairdesk_testkit::fixtures::{drill_for_ivanov, TestFixture};
//!
//! let mut fixture = TestFixture::new();
//! let order = fixture.add(drill_for_ivanov());
//! assert_eq!(order.total(), 700.0);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{at, drill_for_ivanov, order_at, workshop_drafts, ManualClock, TestFixture};
