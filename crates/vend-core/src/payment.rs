//! # Payment
//!
//! Coin acceptance for one bill.
//!
//! ## Coin Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  owed = 7                                                               │
//! │                                                                         │
//! │  insert(5) ──► accepted ──► inserted 5  ──► Pending { remaining: 2 }    │
//! │  insert(3) ──► InvalidCoin (ignored, inserted stays 5)                  │
//! │  insert(5) ──► accepted ──► inserted 10 ──► Complete { change: 3 }      │
//! │  insert(1) ──► PaymentComplete                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session only tracks the running total; reading coins is up to the
//! caller.

use serde::Serialize;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::validate_denominations;
use crate::ACCEPTED_COINS;

// =============================================================================
// Coin Set
// =============================================================================

/// The denominations a machine accepts, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinSet(Vec<Money>);

impl CoinSet {
    /// Builds a coin set from raw denominations.
    ///
    /// ## Example
    /// ```rust
    /// use vend_core::CoinSet;
    ///
    /// let coins = CoinSet::new(&[5, 1, 2]).unwrap();
    /// assert!(coins.accepts(2));
    /// assert!(!coins.accepts(3));
    /// ```
    pub fn new(denominations: &[i64]) -> Result<Self, ValidationError> {
        validate_denominations(denominations).map(CoinSet)
    }

    /// True when `coin` is one of the accepted denominations.
    pub fn accepts(&self, coin: i64) -> bool {
        self.0.iter().any(|d| d.units() == coin)
    }

    /// Denominations in ascending order.
    pub fn denominations(&self) -> &[Money] {
        &self.0
    }
}

impl Default for CoinSet {
    fn default() -> Self {
        CoinSet(ACCEPTED_COINS.iter().copied().map(Money::from_units).collect())
    }
}

// =============================================================================
// Payment Session
// =============================================================================

/// Where a payment stands after a coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// More coins are needed.
    Pending { remaining: Money },
    /// The bill is covered. `change` is zero for an exact payment.
    Complete { change: Money },
}

/// Running total of coins inserted against an amount owed.
#[derive(Debug, Clone)]
pub struct PaymentSession {
    owed: Money,
    inserted: Money,
    coins: CoinSet,
    accepted: usize,
    rejected: usize,
}

impl PaymentSession {
    /// Starts collecting `owed`. A zero bill is complete immediately.
    pub fn new(owed: Money, coins: CoinSet) -> Self {
        PaymentSession {
            owed,
            inserted: Money::zero(),
            coins,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Accepts one coin.
    ///
    /// ## Errors
    /// - `PaymentComplete` once the bill is covered
    /// - `InvalidCoin` for a denomination outside the coin set; the coin is
    ///   ignored and the session keeps waiting
    pub fn insert(&mut self, coin: i64) -> CoreResult<PaymentStatus> {
        if self.is_complete() {
            return Err(CoreError::PaymentComplete);
        }

        if !self.coins.accepts(coin) {
            self.rejected += 1;
            return Err(CoreError::InvalidCoin { coin });
        }

        self.accepted += 1;
        self.inserted = self.inserted.saturating_add(Money::from_units(coin));
        Ok(self.status())
    }

    /// Current standing of the bill.
    pub fn status(&self) -> PaymentStatus {
        if self.is_complete() {
            PaymentStatus::Complete {
                change: self.change(),
            }
        } else {
            PaymentStatus::Pending {
                remaining: self.owed - self.inserted,
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.inserted >= self.owed
    }

    /// `inserted − owed`, or zero while the bill is still open.
    pub fn change(&self) -> Money {
        self.inserted.saturating_sub(self.owed)
    }

    pub fn owed(&self) -> Money {
        self.owed
    }

    pub fn inserted(&self) -> Money {
        self.inserted
    }

    /// Number of coins taken.
    pub fn accepted_coins(&self) -> usize {
        self.accepted
    }

    /// Number of coins refused.
    pub fn rejected_coins(&self) -> usize {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn session(owed: i64) -> PaymentSession {
        PaymentSession::new(Money::from_units(owed), CoinSet::default())
    }

    #[test]
    fn test_overpayment_returns_change() {
        let mut pay = session(7);
        assert_eq!(
            pay.insert(5),
            Ok(PaymentStatus::Pending {
                remaining: Money::from_units(2)
            })
        );
        assert_eq!(
            pay.insert(5),
            Ok(PaymentStatus::Complete {
                change: Money::from_units(3)
            })
        );
        assert_eq!(pay.inserted().units(), 10);
        assert_eq!(pay.accepted_coins(), 2);
    }

    #[test]
    fn test_exact_payment_has_no_change() {
        let mut pay = session(3);
        pay.insert(1).unwrap();
        let status = pay.insert(2).unwrap();
        assert_eq!(
            status,
            PaymentStatus::Complete {
                change: Money::zero()
            }
        );
    }

    #[test]
    fn test_invalid_coin_is_ignored() {
        let mut pay = session(4);
        assert_eq!(pay.insert(3), Err(CoreError::InvalidCoin { coin: 3 }));
        assert_eq!(pay.insert(-5), Err(CoreError::InvalidCoin { coin: -5 }));
        assert_eq!(pay.inserted(), Money::zero());
        assert_eq!(pay.rejected_coins(), 2);
        assert!(!pay.is_complete());
    }

    #[test]
    fn test_zero_bill_is_complete() {
        let mut pay = session(0);
        assert!(pay.is_complete());
        assert_eq!(pay.insert(1), Err(CoreError::PaymentComplete));
    }

    #[test]
    fn test_custom_coin_set() {
        let coins = CoinSet::new(&[10, 20]).unwrap();
        let mut pay = PaymentSession::new(Money::from_units(15), coins);
        assert!(pay.insert(5).is_err());
        assert!(matches!(
            pay.insert(20),
            Ok(PaymentStatus::Complete { change }) if change.units() == 5
        ));
    }

    proptest! {
        /// Property: the session completes exactly when accepted coins cover
        /// the bill, and change is the overpayment.
        #[test]
        fn completes_iff_covered(
            owed in 1i64..60,
            coins in prop::collection::vec(prop::sample::select(vec![1i64, 2, 3, 5, 7]), 0..40),
        ) {
            let mut pay = session(owed);
            let mut valid_total = 0i64;
            for coin in coins {
                if pay.is_complete() {
                    break;
                }
                if pay.insert(coin).is_ok() {
                    valid_total += coin;
                }
            }
            prop_assert_eq!(pay.inserted().units(), valid_total);
            prop_assert_eq!(pay.is_complete(), valid_total >= owed);
            if pay.is_complete() {
                prop_assert_eq!(pay.change().units(), valid_total - owed);
            }
        }
    }
}
