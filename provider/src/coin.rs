// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// An amount of a ledger-defined denomination.
///
/// The amount is carried as a base-10 integer string. The ledger signs and
/// verifies over these strings verbatim, so they must never pass through a
/// native floating type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub amount: String,
    pub denom: String,
}

impl Coin {
    /// Create a coin from an amount string, validating the integer-string
    /// invariant.
    pub fn new(amount: &str, denom: &str) -> Result<Self, ProviderError> {
        if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProviderError::InvalidCoin(format!(
                "amount must be a non-negative base-10 integer string, got {:?}",
                amount
            )));
        }
        if denom.is_empty() {
            return Err(ProviderError::InvalidCoin(
                "denomination must not be empty".into(),
            ));
        }
        Ok(Coin {
            amount: amount.to_string(),
            denom: denom.to_string(),
        })
    }

    /// The amount as an integer, for balance arithmetic.
    pub fn units(&self) -> Result<u128, ProviderError> {
        self.amount
            .parse::<u128>()
            .map_err(|e| ProviderError::InvalidCoin(format!("amount {:?}: {e}", self.amount)))
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Convenience constructor for a single coin.
pub fn coin(amount: u128, denom: &str) -> Coin {
    Coin {
        amount: amount.to_string(),
        denom: denom.to_string(),
    }
}

/// Convenience constructor for a one-coin list, the common case for fees and
/// transfer amounts.
pub fn coins(amount: u128, denom: &str) -> Vec<Coin> {
    vec![coin(amount, denom)]
}

/// The fee attached to a transaction: the coins paid and the gas limit.
/// The ratio yields an effective gas price which must be above the ledger
/// minimum to be accepted into the mempool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

impl StdFee {
    pub fn new(amount: Vec<Coin>, gas_limit: u64) -> Self {
        StdFee {
            amount,
            gas: gas_limit.to_string(),
        }
    }

    pub fn gas_limit(&self) -> Result<u64, ProviderError> {
        self.gas
            .parse::<u64>()
            .map_err(|e| ProviderError::InvalidCoin(format!("gas {:?}: {e}", self.gas)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_integer_strings() {
        let c = Coin::new("1230000", "urill").unwrap();
        assert_eq!(c.units().unwrap(), 1_230_000);
        assert_eq!(c.to_string(), "1230000urill");
    }

    #[test]
    fn rejects_non_integer_amounts() {
        for bad in ["", "-1", "1.5", "1e6", " 7", "0x10"] {
            assert!(Coin::new(bad, "urill").is_err(), "accepted {:?}", bad);
        }
        assert!(Coin::new("1", "").is_err());
    }

    #[test]
    fn coin_helpers() {
        assert_eq!(coin(10, "atom"), Coin::new("10", "atom").unwrap());
        assert_eq!(coins(10, "atom").len(), 1);
    }

    #[test]
    fn fee_carries_gas_as_string() {
        let fee = StdFee::new(coins(2000, "urill"), 80_000);
        assert_eq!(fee.gas, "80000");
        assert_eq!(fee.gas_limit().unwrap(), 80_000);
    }
}
