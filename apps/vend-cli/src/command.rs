//! # Commands
//!
//! Command keywords and argument parsing for the interactive session.
//!
//! ## Command Set
//! ```text
//! ┌──────────────────────────────────────┬──────────────────────────────────┐
//! │  place <item> <channel> <price> <n>  │  load n units into a channel     │
//! │  buy <item> <channel> <n>            │  add n units to the basket       │
//! │  undo | back                         │  reverse the latest operation    │
//! │  pay | end | 0                       │  pay the basket with coins       │
//! │  show [json]                         │  list stocked channels           │
//! │  history [json]                      │  list the undo log               │
//! │  help                                │  list commands                   │
//! │  exit | quit                         │  pay any open basket, then stop  │
//! └──────────────────────────────────────┴──────────────────────────────────┘
//! ```

use std::str::FromStr;

use thiserror::Error;
use vend_core::validation::validate_item_token;
use vend_core::{ItemCode, ValidationError};

/// Problems with what was typed, before the machine is involved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    Unknown(String),

    #[error("{field} must be a whole number, got '{token}'")]
    NotANumber { field: &'static str, token: String },

    #[error("Invalid item: {0}")]
    Item(#[from] ValidationError),
}

/// Top-level command keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Place,
    Buy,
    Undo,
    Pay,
    Show,
    History,
    Help,
    Exit,
}

impl FromStr for Verb {
    type Err = CommandError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.to_ascii_lowercase().as_str() {
            "place" => Ok(Verb::Place),
            "buy" | "purchase" => Ok(Verb::Buy),
            "undo" | "back" => Ok(Verb::Undo),
            "pay" | "end" | "0" => Ok(Verb::Pay),
            "show" | "display" => Ok(Verb::Show),
            "history" => Ok(Verb::History),
            "help" | "?" => Ok(Verb::Help),
            "exit" | "quit" => Ok(Verb::Exit),
            _ => Err(CommandError::Unknown(token.to_string())),
        }
    }
}

/// Output format of `show` and `history`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
}

impl Format {
    /// Recognizes the optional trailing `json` argument.
    pub fn from_token(token: Option<&str>) -> Option<Format> {
        match token {
            Some(t) if t.eq_ignore_ascii_case("json") => Some(Format::Json),
            _ => None,
        }
    }
}

/// One argument the session asks for.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const PLACE_FIELDS: [Field; 4] = [
    Field {
        name: "item",
        prompt: "Item: ",
    },
    Field {
        name: "channel",
        prompt: "Channel: ",
    },
    Field {
        name: "price",
        prompt: "Unit price: ",
    },
    Field {
        name: "quantity",
        prompt: "Quantity: ",
    },
];

pub const BUY_FIELDS: [Field; 3] = [
    Field {
        name: "item",
        prompt: "Item: ",
    },
    Field {
        name: "channel",
        prompt: "Channel: ",
    },
    Field {
        name: "quantity",
        prompt: "Quantity: ",
    },
];

/// Arguments of `place`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceArgs {
    pub item: ItemCode,
    pub channel: i64,
    pub price: i64,
    pub quantity: i64,
}

impl PlaceArgs {
    /// Parses tokens in `PLACE_FIELDS` order.
    pub fn parse(tokens: &[String]) -> Result<Self, CommandError> {
        Ok(PlaceArgs {
            item: parse_item(&tokens[0])?,
            channel: parse_number("channel", &tokens[1])?,
            price: parse_number("price", &tokens[2])?,
            quantity: parse_number("quantity", &tokens[3])?,
        })
    }
}

/// Arguments of `buy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyArgs {
    pub item: ItemCode,
    pub channel: i64,
    pub quantity: i64,
}

impl BuyArgs {
    /// Parses tokens in `BUY_FIELDS` order.
    pub fn parse(tokens: &[String]) -> Result<Self, CommandError> {
        Ok(BuyArgs {
            item: parse_item(&tokens[0])?,
            channel: parse_number("channel", &tokens[1])?,
            quantity: parse_number("quantity", &tokens[2])?,
        })
    }
}

pub fn parse_item(token: &str) -> Result<ItemCode, CommandError> {
    Ok(validate_item_token(token)?)
}

pub fn parse_number(field: &'static str, token: &str) -> Result<i64, CommandError> {
    token.parse::<i64>().map_err(|_| CommandError::NotANumber {
        field,
        token: token.to_string(),
    })
}

/// Text printed by `help`.
pub const HELP: &str = "\
Commands:
  place <item> <channel> <price> <quantity>  load goods into a channel
  buy <item> <channel> <quantity>            add goods to your basket
  undo (or back)                             reverse the latest operation
  pay (or end)                               pay for the basket with coins
  show [json]                                list stocked channels
  history [json]                             list operations that can be undone
  help                                       show this list
  exit                                       pay any open basket and quit";
