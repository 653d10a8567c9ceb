//! # Rendering
//!
//! Turns machine state and operation records into terminal text.
//!
//! ## Display Styles
//! ```text
//! compact   1: AAAAA 3
//! table     Channel 1: A, quantity 5, price 3
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use vend_core::{Channel, ChannelId, Money, Operation, OperationKind, Purchase, VendingMachine};

/// How stocked channels are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStyle {
    /// One glyph per unit followed by the price
    Compact,
    /// One labelled row per channel
    #[default]
    Table,
}

/// Line printed when no channel holds stock.
pub const EMPTY_MACHINE: &str = "(machine is empty)";

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: DisplayStyle,
    currency_symbol: String,
}

impl Renderer {
    pub fn new(style: DisplayStyle, currency_symbol: impl Into<String>) -> Self {
        Renderer {
            style,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn money(&self, amount: Money) -> String {
        format!("{}{}", self.currency_symbol, amount)
    }

    /// One row for a stocked channel.
    pub fn channel_row(&self, id: ChannelId, channel: &Channel) -> String {
        let glyph = channel.item.map(|item| item.glyph()).unwrap_or('-');
        match self.style {
            DisplayStyle::Compact => {
                let units: String = std::iter::repeat(glyph)
                    .take(channel.quantity as usize)
                    .collect();
                format!("{}: {} {}", id, units, self.money(channel.price))
            }
            DisplayStyle::Table => format!(
                "Channel {}: {}, quantity {}, price {}",
                id,
                glyph,
                channel.quantity,
                self.money(channel.price)
            ),
        }
    }

    /// Rows for every stocked channel, or the empty marker.
    pub fn machine(&self, machine: &VendingMachine) -> Vec<String> {
        let rows: Vec<String> = machine
            .stocked()
            .map(|(id, channel)| self.channel_row(id, channel))
            .collect();
        if rows.is_empty() {
            vec![EMPTY_MACHINE.to_string()]
        } else {
            rows
        }
    }

    /// History line: sequence, time, and what happened.
    pub fn history_entry(&self, op: &Operation) -> String {
        let preposition = match op.kind() {
            OperationKind::Place => "into",
            OperationKind::Purchase => "from",
        };
        format!(
            "#{} {} {} {} x {} {} channel {} at {}",
            op.seq(),
            op.recorded_at().format("%H:%M:%S"),
            op.kind(),
            op.quantity(),
            op.item(),
            preposition,
            op.channel(),
            self.money(op.price())
        )
    }

    pub fn placed(&self, op: &Operation) -> String {
        format!(
            "Placed {} x {} in channel {} at {} each.",
            op.quantity(),
            op.item(),
            op.channel(),
            self.money(op.price())
        )
    }

    pub fn purchased(&self, purchase: &Purchase, basket_total: Money) -> String {
        let op = &purchase.operation;
        format!(
            "Bought {} x {} from channel {} for {}. Basket total: {}.",
            op.quantity(),
            op.item(),
            op.channel(),
            self.money(purchase.total),
            self.money(basket_total)
        )
    }

    pub fn undone(&self, op: &Operation) -> String {
        match op.kind() {
            OperationKind::Place => format!(
                "Undid placement of {} x {} in channel {}.",
                op.quantity(),
                op.item(),
                op.channel()
            ),
            OperationKind::Purchase => format!(
                "Undid purchase of {} x {} from channel {}.",
                op.quantity(),
                op.item(),
                op.channel()
            ),
        }
    }

    /// Accepted denominations, e.g. `1, 2, 5`.
    pub fn coin_list(&self, coins: &[Money]) -> String {
        coins
            .iter()
            .map(|coin| self.money(*coin))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Serialize)]
struct ChannelRow<'a> {
    channel: ChannelId,
    #[serde(flatten)]
    slot: &'a Channel,
}

/// Stocked channels as pretty-printed JSON.
pub fn machine_json(machine: &VendingMachine) -> serde_json::Result<String> {
    let rows: Vec<ChannelRow<'_>> = machine
        .stocked()
        .map(|(channel, slot)| ChannelRow { channel, slot })
        .collect();
    serde_json::to_string_pretty(&rows)
}

/// Undo log, oldest first, as pretty-printed JSON.
pub fn history_json(machine: &VendingMachine) -> serde_json::Result<String> {
    let entries: Vec<&Operation> = machine.history().iter().collect();
    serde_json::to_string_pretty(&entries)
}
