//! # RepairDesk Core
//!
//! Pure data model for a repair-shop order tracker: orders, parts, derived
//! totals, and the filtered/sorted views and statistics built from them.
//!
//! This crate contains no I/O and no storage. Persistence lives in
//! `repairdesk-store`; the mutation service lives in `repairdesk`.
//!
//! ## Key Types
//!
//! - [`Order`] - One repair job: tool, client, status, parts, labor price
//! - [`Part`] - A billable component with unit price and quantity
//! - [`OrderDraft`] - The user-editable fields of an order
//! - [`Status`] / [`Region`] - Fixed enumerations
//! - [`StatusFilter`] / [`Stats`] - Inputs and outputs of the derived views
//!
//! ## Derived values
//!
//! An order's total is `labor_price + Σ(part.price * part.quantity)`. It is
//! computed on demand and never stored.

pub mod clock;
pub mod error;
pub mod id;
pub mod order;
pub mod types;
pub mod validation;
pub mod view;

pub use clock::{Clock, SystemClock};
pub use error::{CoreError, ValidationError};
pub use id::generate_id;
pub use order::{Order, OrderDraft, Part, PartField, Region, Status};
pub use types::{OrderId, PartId};
pub use validation::{normalize_draft, validate_draft};
pub use view::{stats, view, Stats, StatusFilter};
