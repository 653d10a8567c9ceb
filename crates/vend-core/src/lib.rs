//! # vend-core: Pure Business Logic for the Vending Machine
//!
//! This crate is the **heart** of the vending machine. It owns the channel
//! table, the bounded undo history and the coin acceptance rules, with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vend Architecture                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    vend-cli (terminal)                          │   │
//! │  │    token reader ──► command parser ──► session ──► renderer     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ place / purchase / undo / pay          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vend-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │   undo    │  │  payment  │  │  basket   │  │   │
//! │  │   │  Channel  │  │  UndoLog  │  │  CoinSet  │  │  Basket   │  │   │
//! │  │   │ place/buy │  │ push/pop  │  │  Session  │  │  totals   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBALS • ONE OWNED VendingMachine VALUE         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ItemCode, ChannelId, Channel, Operation, Limits)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input and configuration validation
//! - [`inventory`] - The channel table and its mutations
//! - [`undo`] - Bounded undo history
//! - [`payment`] - Coin acceptance loop state
//! - [`basket`] - Running bill of a shopping session
//! - [`machine`] - Facade tying inventory and undo together
//!
//! ## Example Usage
//!
//! ```rust
//! use vend_core::{ItemCode, Limits, Money, VendingMachine};
//!
//! let mut machine = VendingMachine::new(Limits::default());
//! let item = ItemCode::new('A').unwrap();
//!
//! machine.place(item, 1, Money::from_units(3), 5).unwrap();
//! let purchase = machine.purchase(item, 1, 2).unwrap();
//! assert_eq!(purchase.total.units(), 6);
//!
//! machine.undo().unwrap();
//! assert_eq!(machine.inventory().channel_quantity(1), Some(5));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod error;
pub mod inventory;
pub mod machine;
pub mod money;
pub mod payment;
pub mod types;
pub mod undo;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use basket::Basket;
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::Inventory;
pub use machine::{Purchase, VendingMachine};
pub use money::Money;
pub use payment::{CoinSet, PaymentSession, PaymentStatus};
pub use types::*;
pub use undo::UndoLog;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of channels in a stock machine.
pub const MAX_CHANNELS: usize = 5;

/// Maximum number of units a single channel can hold.
pub const MAX_CAPACITY: u32 = 50;

/// How many recent operations the undo log keeps.
pub const UNDO_DEPTH: usize = 3;

/// Coin denominations accepted by a stock machine.
pub const ACCEPTED_COINS: [i64; 3] = [1, 2, 5];
