//! Error types for RepairDesk Core.

use thiserror::Error;

use crate::types::PartId;

/// Errors raised while parsing user-facing values into model types.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("unknown status: {0:?} (expected received, in_progress, done or returned)")]
    InvalidStatus(String),

    #[error("unknown region: {0:?}")]
    InvalidRegion(String),

    #[error("unknown status filter: {0:?}")]
    InvalidFilter(String),

    #[error("malformed part: {0}")]
    InvalidPart(String),
}

/// Validation errors for order drafts.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("tool name is required")]
    MissingToolName,

    #[error("client name is required")]
    MissingClientName,

    #[error("labor price must be a non-negative number, got {0}")]
    NegativeLaborPrice(f64),

    #[error("part {part} has invalid price {price}")]
    NegativePartPrice { part: PartId, price: f64 },

    #[error("part {0} must have a quantity of at least 1")]
    ZeroQuantity(PartId),

    #[error("part {0} does not belong to this order")]
    UnknownPart(PartId),
}
