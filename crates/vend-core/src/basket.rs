//! # Basket
//!
//! The running bill of one shopping session.
//!
//! Purchases are charged into the basket as they happen; the customer pays
//! the whole basket at checkout. Undoing a purchase that is still in the
//! basket takes its line total back out, at the price that was charged.
//!
//! The total is kept alongside the lines and never wraps: a purchase whose
//! charge would push it past `i64::MAX` is refused with
//! [`CoreError::AmountOverflow`].

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::payment::{CoinSet, PaymentSession};
use crate::types::{Operation, OperationKind};

#[derive(Debug, Clone)]
struct Line {
    op: Operation,
    amount: Money,
}

/// Open bill for the current customer.
#[derive(Debug, Clone, Default)]
pub struct Basket {
    lines: Vec<Line>,
    total: Money,
}

impl Basket {
    pub fn new() -> Self {
        Basket::default()
    }

    /// Adds a purchase to the bill and returns the new total. Placements are
    /// ignored.
    ///
    /// ## Errors
    /// - `AmountOverflow` when the line or the new total cannot be counted;
    ///   the basket is left unchanged
    pub fn add(&mut self, purchase: &Operation) -> CoreResult<Money> {
        if purchase.kind() != OperationKind::Purchase {
            return Ok(self.total);
        }
        let amount = purchase.line_total()?;
        self.total = self.room_for(amount)?;
        self.lines.push(Line {
            op: purchase.clone(),
            amount,
        });
        Ok(self.total)
    }

    /// The total after charging `amount`, without changing the basket.
    pub fn room_for(&self, amount: Money) -> CoreResult<Money> {
        self.total
            .checked_add(amount)
            .ok_or_else(|| CoreError::AmountOverflow {
                context: "basket total".to_string(),
            })
    }

    /// Takes an undone purchase back out of the bill.
    ///
    /// Returns the amount removed. Purchases from an earlier, already paid
    /// basket are not refunded: undo only restores inventory.
    pub fn reverse(&mut self, op: &Operation) -> Money {
        if op.kind() != OperationKind::Purchase {
            return Money::zero();
        }
        match self.lines.iter().position(|line| line.op.seq() == op.seq()) {
            Some(pos) => {
                let line = self.lines.remove(pos);
                self.total -= line.amount;
                line.amount
            }
            None => Money::zero(),
        }
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Purchases currently on the bill, oldest first.
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &Operation> + ExactSizeIterator {
        self.lines.iter().map(|line| &line.op)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Closes the bill and starts collecting coins for it.
    pub fn checkout(&mut self, coins: CoinSet) -> PaymentSession {
        let owed = std::mem::take(&mut self.total);
        self.lines.clear();
        PaymentSession::new(owed, coins)
    }
}
