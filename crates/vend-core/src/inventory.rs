//! # Inventory
//!
//! The fixed-size channel table and the two mutations that change it.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place(item, channel, price, qty)      purchase(item, channel, qty)     │
//! │        │                                     │                          │
//! │        ├── channel in [1, N]?                ├── channel in [1, N]?      │
//! │        ├── qty in [1, capacity]?             ├── qty in [1, capacity]?   │
//! │        ├── price >= 0?                       ├── qty <= stock?           │
//! │        ├── same item (or empty)?             ├── item matches?           │
//! │        ├── stock + qty <= capacity?          │                          │
//! │        ▼                                     ▼                          │
//! │  stock += qty, price set              stock -= qty                      │
//! │  Operation { Place }                  Operation { Purchase, price }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Placements accumulate: loading more of the same item adds to the stock and
//! replaces the unit price. Every rejection leaves the table untouched.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Channel, ChannelId, ItemCode, Limits, Operation, OperationKind};
use crate::validation::validate_price;

/// The channel table of one machine.
#[derive(Debug, Clone)]
pub struct Inventory {
    channels: Vec<Channel>,
    max_capacity: u32,
}

impl Inventory {
    /// Creates an inventory with every channel empty.
    pub fn new(max_channels: usize, max_capacity: u32) -> Self {
        Inventory {
            channels: vec![Channel::empty(); max_channels],
            max_capacity,
        }
    }

    /// Creates an inventory sized by `limits`.
    pub fn with_limits(limits: &Limits) -> Self {
        Inventory::new(limits.max_channels, limits.max_capacity)
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True for a machine without channels.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Units one channel can hold.
    pub fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    /// Range-checks a 1-based channel number typed by a person.
    pub fn channel_id(&self, number: i64) -> CoreResult<ChannelId> {
        if number < 1 || number > self.channels.len() as i64 {
            return Err(CoreError::InvalidChannel {
                channel: number,
                max: self.channels.len(),
            });
        }
        Ok(ChannelId::from_index((number - 1) as usize))
    }

    /// Looks up a channel by its 1-based number.
    pub fn get(&self, number: i64) -> Option<&Channel> {
        let id = self.channel_id(number).ok()?;
        self.channels.get(id.index())
    }

    /// Stock of a channel by its 1-based number.
    pub fn channel_quantity(&self, number: i64) -> Option<u32> {
        self.get(number).map(|ch| ch.quantity)
    }

    /// Every channel in order, loaded or not.
    pub fn channels(&self) -> impl Iterator<Item = (ChannelId, &Channel)> {
        self.channels
            .iter()
            .enumerate()
            .map(|(i, ch)| (ChannelId::from_index(i), ch))
    }

    /// Channels with at least one unit on sale.
    pub fn stocked(&self) -> impl Iterator<Item = (ChannelId, &Channel)> {
        self.channels().filter(|(_, ch)| !ch.is_empty())
    }

    /// Total units across all channels.
    pub fn total_units(&self) -> u32 {
        self.channels.iter().map(|ch| ch.quantity).sum()
    }

    /// Loads `quantity` units of `item` into a channel at `price` each.
    ///
    /// ## Errors
    /// - `InvalidChannel`, `InvalidQuantity` for out-of-range input
    /// - `Validation` for a negative price
    /// - `ChannelOccupied` when the channel still holds a different item
    /// - `CapacityExceeded` when the accumulated stock would not fit
    pub fn place(
        &mut self,
        item: ItemCode,
        channel: i64,
        price: Money,
        quantity: i64,
    ) -> CoreResult<Operation> {
        let id = self.channel_id(channel)?;
        let quantity = self.checked_quantity(quantity)?;
        let price = validate_price(price.units())?;
        let max = self.max_capacity;

        let slot = &mut self.channels[id.index()];

        if let Some(current) = slot.stocked_item() {
            if current != item {
                return Err(CoreError::ChannelOccupied {
                    channel: id,
                    current,
                    requested: item,
                });
            }
        }

        let would_hold = slot.quantity.saturating_add(quantity);
        if would_hold > max {
            return Err(CoreError::CapacityExceeded {
                channel: id,
                would_hold,
                max,
            });
        }

        let previous = slot.price;
        slot.item = Some(item);
        slot.price = price;
        slot.quantity = would_hold;

        Ok(Operation::new(OperationKind::Place, item, id, quantity, price).replacing(previous))
    }

    /// Sells `quantity` units of `item` from a channel.
    ///
    /// The returned record carries the unit price charged; the amount owed is
    /// [`Operation::line_total`].
    ///
    /// ## Errors
    /// - `InvalidChannel`, `InvalidQuantity` for out-of-range input
    /// - `InsufficientStock` when the channel holds fewer units
    /// - `ItemMismatch` when the channel holds another item (or nothing)
    pub fn purchase(&mut self, item: ItemCode, channel: i64, quantity: i64) -> CoreResult<Operation> {
        let id = self.channel_id(channel)?;
        let quantity = self.checked_quantity(quantity)?;

        let slot = &mut self.channels[id.index()];

        if slot.quantity < quantity {
            return Err(CoreError::insufficient(id, slot.quantity, quantity));
        }

        if slot.item != Some(item) {
            return Err(CoreError::ItemMismatch {
                channel: id,
                requested: item,
            });
        }

        slot.quantity -= quantity;

        Ok(Operation::new(
            OperationKind::Purchase,
            item,
            id,
            quantity,
            slot.price,
        ))
    }

    /// Applies the inverse of a recorded operation.
    ///
    /// - Place: removes the placed units and restores the replaced price; a
    ///   channel emptied this way is cleared
    /// - Purchase: puts the sold units back at the price they were sold for
    ///
    /// ## Errors
    /// `UndoConflict` when the inverse would break a channel invariant. The
    /// table is left untouched in that case.
    pub fn revert(&mut self, op: &Operation) -> CoreResult<()> {
        let id = op.channel();
        let max = self.max_capacity;
        let slot = self
            .channels
            .get_mut(id.index())
            .ok_or_else(|| CoreError::UndoConflict {
                channel: id,
                reason: "channel does not exist".to_string(),
            })?;

        match op.kind() {
            OperationKind::Place => {
                if slot.item != Some(op.item()) || slot.quantity < op.quantity() {
                    return Err(CoreError::UndoConflict {
                        channel: id,
                        reason: format!(
                            "{} of the {} placed units are no longer in the channel",
                            op.quantity().saturating_sub(slot.quantity),
                            op.quantity()
                        ),
                    });
                }
                slot.quantity -= op.quantity();
                if slot.quantity == 0 {
                    *slot = Channel::empty();
                } else {
                    slot.price = op.replaced_price();
                }
            }
            OperationKind::Purchase => {
                if let Some(current) = slot.stocked_item() {
                    if current != op.item() {
                        return Err(CoreError::UndoConflict {
                            channel: id,
                            reason: format!("channel now holds item {current}"),
                        });
                    }
                }
                let would_hold = slot.quantity.saturating_add(op.quantity());
                if would_hold > max {
                    return Err(CoreError::UndoConflict {
                        channel: id,
                        reason: format!("returning units would exceed capacity {max}"),
                    });
                }
                if slot.is_empty() {
                    slot.item = Some(op.item());
                    slot.price = op.price();
                }
                slot.quantity = would_hold;
            }
        }

        Ok(())
    }

    fn checked_quantity(&self, quantity: i64) -> CoreResult<u32> {
        if quantity < 1 || quantity > self.max_capacity as i64 {
            return Err(CoreError::InvalidQuantity {
                quantity,
                max: self.max_capacity,
            });
        }
        Ok(quantity as u32)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Inventory::with_limits(&Limits::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
