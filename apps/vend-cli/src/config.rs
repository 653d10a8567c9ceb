//! # Configuration
//!
//! Machine limits, coins, and display settings.
//!
//! ## Layering
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  built-in defaults  ◄──  TOML file (--config)  ◄──  VEND_* env   │
//! │  (lowest)                                            (highest)   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Key               | Env                    | Default   |
//! |-------------------|------------------------|-----------|
//! | `max_channels`    | `VEND_MAX_CHANNELS`    | 5         |
//! | `max_capacity`    | `VEND_MAX_CAPACITY`    | 50        |
//! | `undo_depth`      | `VEND_UNDO_DEPTH`      | 3         |
//! | `coins`           | `VEND_COINS=1,2,5`     | 1, 2, 5   |
//! | `currency_symbol` | `VEND_CURRENCY_SYMBOL` | (none)    |
//! | `style`           | `VEND_STYLE`           | table     |
//! | `prompts`         | `VEND_PROMPTS`         | true      |

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vend_core::validation::validate_limits;
use vend_core::{CoinSet, Limits, ValidationError, ACCEPTED_COINS, MAX_CAPACITY, MAX_CHANNELS, UNDO_DEPTH};

use crate::render::{DisplayStyle, Renderer};

/// Prefix of every configuration environment variable.
pub const ENV_PREFIX: &str = "VEND";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// Runtime settings of the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendConfig {
    /// Number of channels in the machine
    pub max_channels: usize,

    /// Units one channel can hold
    pub max_capacity: u32,

    /// Operations that can be undone
    pub undo_depth: usize,

    /// Accepted coin denominations
    pub coins: Vec<i64>,

    /// Printed in front of every amount
    pub currency_symbol: String,

    /// Channel listing style
    pub style: DisplayStyle,

    /// Print input prompts
    pub prompts: bool,
}

impl Default for VendConfig {
    fn default() -> Self {
        VendConfig {
            max_channels: MAX_CHANNELS,
            max_capacity: MAX_CAPACITY,
            undo_depth: UNDO_DEPTH,
            coins: ACCEPTED_COINS.to_vec(),
            currency_symbol: String::new(),
            style: DisplayStyle::default(),
            prompts: true,
        }
    }
}

impl VendConfig {
    /// Loads defaults, then the optional file, then `VEND_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, environment())
    }

    fn load_from(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: VendConfig = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks limits and coin denominations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_limits(&self.limits())?;
        CoinSet::new(&self.coins)?;
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_channels: self.max_channels,
            max_capacity: self.max_capacity,
            undo_depth: self.undo_depth,
        }
    }

    pub fn coin_set(&self) -> Result<CoinSet, ConfigError> {
        Ok(CoinSet::new(&self.coins)?)
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.style, self.currency_symbol.clone())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("coins")
}
