// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use rill_provider::coin::{coins, StdFee};

use crate::error::ClientError;
use crate::network::NATIVE_DENOM;

/// Decimal digits a gas price can carry.
pub const GAS_PRICE_FRACTIONAL_DIGITS: u32 = 18;

const SCALE: u128 = 10u128.pow(GAS_PRICE_FRACTIONAL_DIGITS);

/// Default gas limit for a bank send.
pub const DEFAULT_SEND_GAS_LIMIT: u64 = 80_000;

/// The price paid per unit of gas, as a fixed-point decimal.
///
/// No floating point: the amount is held as integer atomics at 10^-18
/// precision, and fees are computed with integer arithmetic only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GasPrice {
    atomics: u128,
    denom: String,
}

impl GasPrice {
    pub fn new(atomics: u128, denom: &str) -> Self {
        GasPrice {
            atomics,
            denom: denom.to_string(),
        }
    }

    pub fn denom(&self) -> &str {
        &self.denom
    }

    pub fn atomics(&self) -> u128 {
        self.atomics
    }

    /// The fee amount for a gas limit: `ceil(price × limit)`. Rounding up
    /// keeps the effective gas price at or above the configured one, so the
    /// mempool minimum-price check cannot reject the fee by a rounding hair.
    pub fn fee_amount(&self, gas_limit: u64) -> Result<u128, ClientError> {
        let product = self
            .atomics
            .checked_mul(gas_limit as u128)
            .ok_or(ClientError::FeeOverflow)?;
        Ok(product.div_ceil(SCALE))
    }

    /// A full [`StdFee`] for a gas limit.
    pub fn fee_for(&self, gas_limit: u64) -> Result<StdFee, ClientError> {
        Ok(StdFee::new(
            coins(self.fee_amount(gas_limit)?, &self.denom),
            gas_limit,
        ))
    }
}

impl Default for GasPrice {
    /// 0.025 of the native denom per gas unit.
    fn default() -> Self {
        GasPrice::new(25 * 10u128.pow(15), NATIVE_DENOM)
    }
}

impl FromStr for GasPrice {
    type Err = ClientError;

    /// Parse strings like `"0.025urill"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .ok_or_else(|| ClientError::InvalidGasPrice(format!("{s:?}: missing denomination")))?;
        let (number, denom) = s.split_at(split);
        if denom.is_empty() || !denom.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(ClientError::InvalidGasPrice(format!(
                "{s:?}: denomination must start with a letter"
            )));
        }

        let (whole, frac) = match number.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (number, ""),
        };
        if whole.is_empty() || frac.contains('.') {
            return Err(ClientError::InvalidGasPrice(format!(
                "{s:?}: amount must be a plain decimal number"
            )));
        }
        if frac.len() as u32 > GAS_PRICE_FRACTIONAL_DIGITS {
            return Err(ClientError::InvalidGasPrice(format!(
                "{s:?}: more than {GAS_PRICE_FRACTIONAL_DIGITS} fractional digits"
            )));
        }

        let parse = |digits: &str| {
            digits
                .parse::<u128>()
                .map_err(|e| ClientError::InvalidGasPrice(format!("{s:?}: {e}")))
        };
        let whole = parse(whole)?;
        let frac_atomics = if frac.is_empty() {
            0
        } else {
            parse(frac)? * 10u128.pow(GAS_PRICE_FRACTIONAL_DIGITS - frac.len() as u32)
        };
        let atomics = whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(frac_atomics))
            .ok_or(ClientError::FeeOverflow)?;
        Ok(GasPrice::new(atomics, denom))
    }
}

impl Display for GasPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.atomics / SCALE;
        let frac = self.atomics % SCALE;
        if frac == 0 {
            return write!(f, "{}{}", whole, self.denom);
        }
        let frac = format!("{frac:0>18}");
        write!(f, "{}.{}{}", whole, frac.trim_end_matches('0'), self.denom)
    }
}

/// Default per-operation gas limits.
pub fn default_gas_limits() -> BTreeMap<String, u64> {
    BTreeMap::from([("send".to_string(), DEFAULT_SEND_GAS_LIMIT)])
}

/// The fees charged per operation kind. Built once at client construction;
/// immutable afterwards.
#[derive(Clone, Debug)]
pub struct FeeTable {
    fees: BTreeMap<String, StdFee>,
}

impl FeeTable {
    /// Build from a gas price and gas-limit overrides merged over the
    /// defaults.
    pub fn build(
        gas_price: &GasPrice,
        overrides: &BTreeMap<String, u64>,
    ) -> Result<Self, ClientError> {
        let mut limits = default_gas_limits();
        for (kind, limit) in overrides {
            limits.insert(kind.clone(), *limit);
        }
        let mut fees = BTreeMap::new();
        for (kind, limit) in limits {
            fees.insert(kind, gas_price.fee_for(limit)?);
        }
        Ok(FeeTable { fees })
    }

    pub fn get(&self, kind: &str) -> Option<&StdFee> {
        self.fees.get(kind)
    }
}
