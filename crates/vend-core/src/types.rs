//! # Domain Types
//!
//! Core domain types used throughout the vending machine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Channel      │   │   Operation     │   │     Limits      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  item (glyph)   │   │  seq            │   │  max_channels   │       │
//! │  │  price          │   │  kind           │   │  max_capacity   │       │
//! │  │  quantity       │   │  item, channel  │   │  undo_depth     │       │
//! │  └─────────────────┘   │  quantity/price │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    ItemCode     │   │   ChannelId     │                              │
//! │  │  one glyph      │   │  1-based slot   │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::{MAX_CAPACITY, MAX_CHANNELS, UNDO_DEPTH};

// =============================================================================
// Item Code
// =============================================================================

/// The single glyph that identifies a kind of goods (`A`, `b`, `7`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct ItemCode(char);

impl ItemCode {
    /// Creates an item code, rejecting whitespace and control characters.
    ///
    /// ## Example
    /// ```rust
    /// use vend_core::ItemCode;
    ///
    /// assert!(ItemCode::new('A').is_ok());
    /// assert!(ItemCode::new(' ').is_err());
    /// ```
    pub fn new(glyph: char) -> Result<Self, ValidationError> {
        if glyph.is_whitespace() || glyph.is_control() {
            return Err(ValidationError::InvalidFormat {
                field: "item".to_string(),
                reason: "must be a visible character".to_string(),
            });
        }
        Ok(ItemCode(glyph))
    }

    /// Returns the glyph.
    #[inline]
    pub const fn glyph(&self) -> char {
        self.0
    }
}

impl TryFrom<char> for ItemCode {
    type Error = ValidationError;

    fn try_from(glyph: char) -> Result<Self, Self::Error> {
        ItemCode::new(glyph)
    }
}

impl From<ItemCode> for char {
    fn from(code: ItemCode) -> char {
        code.0
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Channel Id
// =============================================================================

/// A channel slot, shown to people as 1-based and stored as a 0-based index.
///
/// Only the inventory hands these out after range-checking the number the
/// user typed, so a `ChannelId` always points at an existing slot of the
/// machine that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(usize);

impl ChannelId {
    /// Creates an id from a 0-based index.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        ChannelId(index)
    }

    /// 0-based index into the channel table.
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// 1-based channel number as printed on the machine.
    #[inline]
    pub const fn number(&self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl Serialize for ChannelId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.number() as u64)
    }
}

// =============================================================================
// Channel
// =============================================================================

/// One vending slot: a single kind of goods, its unit price, and the stock.
///
/// ## Invariants
/// - `quantity` never exceeds the machine's `max_capacity`
/// - `item` is `None` only while the channel is empty and has been cleared
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Channel {
    /// Kind of goods loaded, if any.
    pub item: Option<ItemCode>,

    /// Unit price.
    pub price: Money,

    /// Units currently in the channel.
    pub quantity: u32,
}

impl Channel {
    /// An empty, never-loaded channel.
    pub fn empty() -> Self {
        Channel::default()
    }

    /// True when there is nothing to sell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    /// The item currently on sale (empty channels sell nothing).
    pub fn stocked_item(&self) -> Option<ItemCode> {
        if self.is_empty() {
            None
        } else {
            self.item
        }
    }
}

// =============================================================================
// Operation
// =============================================================================

/// Kind of a recorded, reversible mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Operator loaded goods into a channel.
    Place,
    /// Customer bought goods from a channel.
    Purchase,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Place => write!(f, "place"),
            OperationKind::Purchase => write!(f, "purchase"),
        }
    }
}

/// An immutable record of a successful place or purchase.
///
/// `price` is the unit price in effect when the operation happened: the new
/// price for a placement, the price charged for a purchase. A placement also
/// keeps the price it replaced so undo can put it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    seq: u64,
    kind: OperationKind,
    item: ItemCode,
    channel: ChannelId,
    quantity: u32,
    price: Money,
    replaced_price: Money,
    recorded_at: DateTime<Utc>,
}

impl Operation {
    pub(crate) fn new(
        kind: OperationKind,
        item: ItemCode,
        channel: ChannelId,
        quantity: u32,
        price: Money,
    ) -> Self {
        Operation {
            seq: 0,
            kind,
            item,
            channel,
            quantity,
            price,
            replaced_price: price,
            recorded_at: Utc::now(),
        }
    }

    /// Records the channel price a placement overwrote.
    pub(crate) fn replacing(mut self, previous: Money) -> Self {
        self.replaced_price = previous;
        self
    }

    /// Stamps the machine-wide sequence number.
    pub(crate) fn sequenced(mut self, seq: u64) -> Self {
        self.seq = seq;
        self
    }

    /// Monotonic number assigned by the machine (0 for bare inventory use).
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn item(&self) -> ItemCode {
        self.item
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn price(&self) -> Money {
        self.price
    }

    /// Channel price before this operation (equal to `price` for purchases).
    pub fn replaced_price(&self) -> Money {
        self.replaced_price
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// `price × quantity`: the amount charged for a purchase.
    pub fn line_total(&self) -> CoreResult<Money> {
        self.price
            .multiply_quantity(self.quantity)
            .ok_or_else(|| CoreError::AmountOverflow {
                context: format!("{} x {}", self.quantity, self.price),
            })
    }
}

// =============================================================================
// Limits
// =============================================================================

/// Size limits of one machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Number of channels.
    pub max_channels: usize,

    /// Units one channel can hold.
    pub max_capacity: u32,

    /// Operations kept for undo.
    pub undo_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_channels: MAX_CHANNELS,
            max_capacity: MAX_CAPACITY,
            undo_depth: UNDO_DEPTH,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_code_rejects_blank_glyphs() {
        assert!(ItemCode::new('A').is_ok());
        assert!(ItemCode::new('7').is_ok());
        assert!(ItemCode::new(' ').is_err());
        assert!(ItemCode::new('\n').is_err());
        assert!(ItemCode::new('\u{7}').is_err());
    }

    #[test]
    fn test_channel_id_is_one_based_for_people() {
        let id = ChannelId::from_index(0);
        assert_eq!(id.number(), 1);
        assert_eq!(id.to_string(), "1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "1");
    }

    #[test]
    fn test_empty_channel_sells_nothing() {
        let mut channel = Channel::empty();
        assert!(channel.is_empty());
        assert_eq!(channel.stocked_item(), None);

        channel.item = Some(ItemCode::new('A').unwrap());
        assert_eq!(channel.stocked_item(), None);

        channel.quantity = 2;
        assert_eq!(channel.stocked_item(), channel.item);
    }

    #[test]
    fn test_operation_line_total() {
        let op = Operation::new(
            OperationKind::Purchase,
            ItemCode::new('A').unwrap(),
            ChannelId::from_index(0),
            2,
            Money::from_units(3),
        )
        .sequenced(4);
        assert_eq!(op.seq(), 4);
        assert_eq!(op.line_total().unwrap().units(), 6);
    }

    #[test]
    fn test_line_total_overflow_is_an_error() {
        let op = Operation::new(
            OperationKind::Purchase,
            ItemCode::new('A').unwrap(),
            ChannelId::from_index(0),
            2,
            Money::from_units(i64::MAX),
        );
        assert!(matches!(
            op.line_total(),
            Err(CoreError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_item_code_serde_validates() {
        let ok: ItemCode = serde_json::from_str("\"A\"").unwrap();
        assert_eq!(ok.glyph(), 'A');
        assert!(serde_json::from_str::<ItemCode>("\" \"").is_err());
    }

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_channels, 5);
        assert_eq!(limits.max_capacity, 50);
        assert_eq!(limits.undo_depth, 3);
    }
}
