//! # Validation Module
//!
//! Input validation utilities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Token parsing (vend-cli)                                      │
//! │  └── Is the token an integer at all?                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Item glyph, price sign                                             │
//! │  └── Limits and coin sets coming from configuration                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Inventory / payment                                           │
//! │  └── Channel range, quantity range, stock, capacity, coin acceptance    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vend_core::validation::{validate_item_token, validate_price};
//!
//! let item = validate_item_token("A").unwrap();
//! let price = validate_price(3).unwrap();
//! assert_eq!(item.glyph(), 'A');
//! assert_eq!(price.units(), 3);
//! ```

use std::collections::BTreeSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ItemCode, Limits};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest channel count a machine may be configured with.
pub const CHANNEL_LIMIT: usize = 99;

/// Largest per-channel capacity a machine may be configured with.
pub const CAPACITY_LIMIT: u32 = 999;

/// Largest undo depth a machine may be configured with.
pub const UNDO_LIMIT: usize = 100;

/// Largest unit price. Times any `u32` quantity it still fits in an `i64`.
pub const PRICE_LIMIT: i64 = 1_000_000_000;

// =============================================================================
// Input Validators
// =============================================================================

/// Validates an item token typed by the user.
///
/// ## Rules
/// - Must not be empty
/// - Must be exactly one character
/// - Must be visible (no whitespace or control characters)
///
/// ## Example
/// ```rust
/// use vend_core::validation::validate_item_token;
///
/// assert!(validate_item_token("A").is_ok());
/// assert!(validate_item_token("").is_err());
/// assert!(validate_item_token("AB").is_err());
/// ```
pub fn validate_item_token(token: &str) -> ValidationResult<ItemCode> {
    let token = token.trim();
    let mut chars = token.chars();

    let Some(glyph) = chars.next() else {
        return Err(ValidationError::Required {
            field: "item".to_string(),
        });
    };

    if chars.next().is_some() {
        return Err(ValidationError::InvalidFormat {
            field: "item".to_string(),
            reason: format!("'{token}' must be a single character"),
        });
    }

    ItemCode::new(glyph)
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be in `[0, PRICE_LIMIT]`
/// - Zero is allowed (free items)
pub fn validate_price(units: i64) -> ValidationResult<Money> {
    if !(0..=PRICE_LIMIT).contains(&units) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: PRICE_LIMIT,
        });
    }

    Ok(Money::from_units(units))
}

// =============================================================================
// Configuration Validators
// =============================================================================

/// Validates machine size limits.
///
/// ## Rules
/// - `max_channels` in `[1, 99]`
/// - `max_capacity` in `[1, 999]`
/// - `undo_depth` in `[1, 100]`
pub fn validate_limits(limits: &Limits) -> ValidationResult<()> {
    if limits.max_channels == 0 || limits.max_channels > CHANNEL_LIMIT {
        return Err(ValidationError::OutOfRange {
            field: "max_channels".to_string(),
            min: 1,
            max: CHANNEL_LIMIT as i64,
        });
    }

    if limits.max_capacity == 0 || limits.max_capacity > CAPACITY_LIMIT {
        return Err(ValidationError::OutOfRange {
            field: "max_capacity".to_string(),
            min: 1,
            max: CAPACITY_LIMIT as i64,
        });
    }

    if limits.undo_depth == 0 || limits.undo_depth > UNDO_LIMIT {
        return Err(ValidationError::OutOfRange {
            field: "undo_depth".to_string(),
            min: 1,
            max: UNDO_LIMIT as i64,
        });
    }

    Ok(())
}

/// Validates a list of coin denominations and returns them sorted.
///
/// ## Rules
/// - At least one denomination
/// - Every denomination positive
/// - No denomination listed twice
///
/// ## Example
/// ```rust
/// use vend_core::validation::validate_denominations;
///
/// assert!(validate_denominations(&[5, 1, 2]).is_ok());
/// assert!(validate_denominations(&[]).is_err());
/// assert!(validate_denominations(&[1, 1]).is_err());
/// assert!(validate_denominations(&[0, 2]).is_err());
/// ```
pub fn validate_denominations(coins: &[i64]) -> ValidationResult<Vec<Money>> {
    if coins.is_empty() {
        return Err(ValidationError::Required {
            field: "coins".to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    for &coin in coins {
        if coin <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "coin".to_string(),
            });
        }
        if !seen.insert(coin) {
            return Err(ValidationError::Duplicate {
                field: "coin".to_string(),
                value: coin.to_string(),
            });
        }
    }

    Ok(seen.into_iter().map(Money::from_units).collect())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_token() {
        assert_eq!(validate_item_token("A").unwrap().glyph(), 'A');
        assert_eq!(validate_item_token(" z ").unwrap().glyph(), 'z');

        assert!(matches!(
            validate_item_token(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_item_token("AB"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_price() {
        assert_eq!(validate_price(0).unwrap(), Money::zero());
        assert_eq!(validate_price(3).unwrap().units(), 3);
        assert!(validate_price(-1).is_err());
        assert_eq!(validate_price(PRICE_LIMIT).unwrap().units(), PRICE_LIMIT);
        assert_eq!(
            validate_price(i64::MAX),
            Err(ValidationError::OutOfRange {
                field: "price".to_string(),
                min: 0,
                max: PRICE_LIMIT,
            })
        );
    }

    #[test]
    fn test_validate_limits() {
        assert!(validate_limits(&Limits::default()).is_ok());

        let no_channels = Limits {
            max_channels: 0,
            ..Limits::default()
        };
        assert!(validate_limits(&no_channels).is_err());

        let no_capacity = Limits {
            max_capacity: 0,
            ..Limits::default()
        };
        assert!(validate_limits(&no_capacity).is_err());

        let no_undo = Limits {
            undo_depth: 0,
            ..Limits::default()
        };
        assert!(validate_limits(&no_undo).is_err());
    }

    #[test]
    fn test_validate_denominations_sorts() {
        let coins = validate_denominations(&[5, 1, 2]).unwrap();
        let units: Vec<i64> = coins.iter().map(Money::units).collect();
        assert_eq!(units, vec![1, 2, 5]);
    }

    #[test]
    fn test_validate_denominations_rejects_bad_sets() {
        assert!(matches!(
            validate_denominations(&[]),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_denominations(&[-2]),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_denominations(&[2, 2]),
            Err(ValidationError::Duplicate { .. })
        ));
    }
}
