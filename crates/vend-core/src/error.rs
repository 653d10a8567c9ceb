//! # Error Types
//!
//! Domain-specific error types for vend-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vend-core errors (this file)                                           │
//! │  ├── CoreError        - Rejected place / purchase / undo / coin         │
//! │  └── ValidationError  - Malformed input values                          │
//! │                                                                         │
//! │  vend-cli errors (app crate)                                            │
//! │  ├── ConfigError      - Bad configuration (fatal)                       │
//! │  └── SessionError     - Terminal I/O failures (fatal)                   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → printed message → next command     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CoreError` is recoverable: the operation is rejected, state is left
//! untouched, and the session goes back to waiting for input.

use thiserror::Error;

use crate::types::{ChannelId, ItemCode};

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by inventory, undo and payment operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Channel number outside `[1, max]`.
    #[error("Invalid channel {channel}: must be between 1 and {max}")]
    InvalidChannel { channel: i64, max: usize },

    /// Quantity outside `[1, max]`.
    #[error("Invalid quantity {quantity}: must be between 1 and {max}")]
    InvalidQuantity { quantity: i64, max: u32 },

    /// Not enough units in the channel to complete the purchase.
    ///
    /// ## User Workflow
    /// ```text
    /// buy A 1 5
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { channel: 1, available: 3, requested: 5 }
    /// ```
    #[error("Insufficient stock in channel {channel}: available {available}, requested {requested}")]
    InsufficientStock {
        channel: ChannelId,
        available: u32,
        requested: u32,
    },

    /// The requested item is not what the channel holds.
    #[error("Channel {channel} does not hold item {requested}")]
    ItemMismatch {
        channel: ChannelId,
        requested: ItemCode,
    },

    /// Placing would push the channel above its capacity.
    #[error("Channel {channel} would hold {would_hold} units, capacity is {max}")]
    CapacityExceeded {
        channel: ChannelId,
        would_hold: u32,
        max: u32,
    },

    /// A channel still holding one item kind cannot be loaded with another.
    #[error("Channel {channel} still holds item {current}, cannot load {requested}")]
    ChannelOccupied {
        channel: ChannelId,
        current: ItemCode,
        requested: ItemCode,
    },

    /// Coin denomination is not in the accepted set.
    #[error("Invalid coin: {coin}")]
    InvalidCoin { coin: i64 },

    /// The bill is already covered; no more coins are taken.
    #[error("Payment already complete")]
    PaymentComplete,

    /// A line total or bill would not fit in the money type.
    #[error("Amount too large: {context} exceeds what the machine can count")]
    AmountOverflow { context: String },

    /// The undo log is empty.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Reversing the operation would violate a channel invariant.
    ///
    /// ## When This Occurs
    /// - Undoing a placement whose units were already sold by an operation
    ///   that has since been evicted from the undo log
    /// - Undoing a purchase into a channel that was refilled to capacity
    ///   or reloaded with another item
    #[error("Cannot undo operation on channel {channel}: {reason}")]
    UndoConflict { channel: ChannelId, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a value is malformed independently of machine
/// state (a multi-character item code, a negative price, an empty coin set).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., more than one character for an item code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., a coin listed twice).
    #[error("{field} '{value}' listed more than once")]
    Duplicate { field: String, value: String },
}

impl CoreError {
    /// Builds an `InsufficientStock` error for a channel.
    pub(crate) fn insufficient(channel: ChannelId, available: u32, requested: u32) -> Self {
        CoreError::InsufficientStock {
            channel,
            available,
            requested,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
