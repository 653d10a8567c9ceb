//! # Vending Machine
//!
//! Facade owning the inventory and the undo log.
//!
//! ## Undo Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place / purchase ──► Inventory ──► Operation ──► UndoLog.push          │
//! │                                        (seq stamped)    │               │
//! │                                                         └─► evicted #1  │
//! │                                                                         │
//! │  undo ──► UndoLog.pop ──► Inventory.revert                              │
//! │                               │                                         │
//! │                               ├── ok       ──► Operation returned       │
//! │                               └── conflict ──► entry pushed back        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, warn};

use crate::basket::Basket;
use crate::error::{CoreError, CoreResult};
use crate::inventory::Inventory;
use crate::money::Money;
use crate::types::{Channel, ChannelId, ItemCode, Limits, Operation};
use crate::undo::UndoLog;

/// A successful sale: the record plus what the customer owes for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub operation: Operation,
    pub total: Money,
}

/// One vending machine: channels plus a bounded history of changes.
#[derive(Debug, Clone)]
pub struct VendingMachine {
    inventory: Inventory,
    history: UndoLog,
    limits: Limits,
    next_seq: u64,
}

impl VendingMachine {
    /// Creates a machine with every channel empty.
    pub fn new(limits: Limits) -> Self {
        VendingMachine {
            inventory: Inventory::with_limits(&limits),
            history: UndoLog::new(limits.undo_depth),
            limits,
            next_seq: 1,
        }
    }

    /// Loads goods into a channel and records the placement.
    pub fn place(
        &mut self,
        item: ItemCode,
        channel: i64,
        price: Money,
        quantity: i64,
    ) -> CoreResult<Operation> {
        let op = self
            .inventory
            .place(item, channel, price, quantity)
            .inspect_err(|e| debug!(%item, channel, quantity, error = %e, "placement rejected"))?;
        let op = self.record(op);
        debug!(
            seq = op.seq(),
            channel = %op.channel(),
            %item,
            quantity = op.quantity(),
            price = %op.price(),
            "goods placed"
        );
        Ok(op)
    }

    /// Sells goods from a channel and records the purchase.
    pub fn purchase(&mut self, item: ItemCode, channel: i64, quantity: i64) -> CoreResult<Purchase> {
        self.sell(item, channel, quantity, None)
    }

    /// Sells goods and charges them into `basket`.
    ///
    /// A sale the basket cannot count is refused with `AmountOverflow`; the
    /// stock is put back and nothing is recorded.
    pub fn purchase_into(
        &mut self,
        basket: &mut Basket,
        item: ItemCode,
        channel: i64,
        quantity: i64,
    ) -> CoreResult<Purchase> {
        self.sell(item, channel, quantity, Some(basket))
    }

    fn sell(
        &mut self,
        item: ItemCode,
        channel: i64,
        quantity: i64,
        basket: Option<&mut Basket>,
    ) -> CoreResult<Purchase> {
        let op = self
            .inventory
            .purchase(item, channel, quantity)
            .inspect_err(|e| debug!(%item, channel, quantity, error = %e, "purchase rejected"))?;

        let charged = op
            .line_total()
            .and_then(|total| match &basket {
                Some(basket) => basket.room_for(total).map(|_| total),
                None => Ok(total),
            });
        let total = match charged {
            Ok(total) => total,
            Err(e) => {
                warn!(%item, channel = %op.channel(), quantity = op.quantity(), error = %e, "sale refused");
                self.inventory.revert(&op)?;
                return Err(e);
            }
        };

        let op = self.record(op);
        if let Some(basket) = basket {
            basket.add(&op)?;
        }
        debug!(
            seq = op.seq(),
            channel = %op.channel(),
            %item,
            quantity = op.quantity(),
            total = %total,
            "goods purchased"
        );
        Ok(Purchase {
            operation: op,
            total,
        })
    }

    /// Reverses the most recent recorded operation.
    ///
    /// ## Errors
    /// - `NothingToUndo` when the log is empty
    /// - `UndoConflict` when the inverse no longer applies; the entry stays
    ///   on the log
    pub fn undo(&mut self) -> CoreResult<Operation> {
        let op = self.history.pop().ok_or(CoreError::NothingToUndo)?;

        if let Err(e) = self.inventory.revert(&op) {
            warn!(seq = op.seq(), error = %e, "undo refused");
            self.history.push(op);
            return Err(e);
        }

        debug!(seq = op.seq(), kind = %op.kind(), channel = %op.channel(), "operation undone");
        Ok(op)
    }

    /// Takes back a purchase that was never paid for.
    ///
    /// The stock is returned and the entry, if still on the undo log, is
    /// dropped from it. Operations must be cancelled newest first.
    pub fn cancel(&mut self, op: &Operation) -> CoreResult<()> {
        self.inventory
            .revert(op)
            .inspect_err(|e| warn!(seq = op.seq(), channel = %op.channel(), error = %e, "cancel refused"))?;
        let forgotten = self.history.remove(op.seq()).is_some();
        debug!(seq = op.seq(), channel = %op.channel(), forgotten, "operation cancelled");
        Ok(())
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Channels with stock, in channel order.
    pub fn stocked(&self) -> impl Iterator<Item = (ChannelId, &Channel)> {
        self.inventory.stocked()
    }

    /// Every channel, in channel order.
    pub fn channels(&self) -> impl Iterator<Item = (ChannelId, &Channel)> {
        self.inventory.channels()
    }

    pub fn history(&self) -> &UndoLog {
        &self.history
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    fn record(&mut self, op: Operation) -> Operation {
        let op = op.sequenced(self.next_seq);
        self.next_seq += 1;
        if let Some(evicted) = self.history.push(op.clone()) {
            debug!(seq = evicted.seq(), "oldest operation dropped from undo log");
        }
        op
    }
}

impl Default for VendingMachine {
    fn default() -> Self {
        VendingMachine::new(Limits::default())
    }
}
