//! Error types for the order book.

use repairdesk_core::ValidationError;
use repairdesk_store::StoreError;
use thiserror::Error;

/// Errors that can occur during order book operations.
#[derive(Debug, Error)]
pub enum BookError {
    /// The draft failed validation; nothing was changed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Writing the collection failed; memory and storage keep the previous state.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Every generated identifier collided with an existing order.
    #[error("could not generate a unique order id after {0} attempts")]
    IdExhausted(u32),
}

/// Result type for order book operations.
pub type Result<T> = std::result::Result<T, BookError>;
