// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! Well-known deployment endpoints and chain parameters.

pub const TESTNET_CHAIN_ID: &str = "rill-testnet-1";
pub const DEVNET_CHAIN_ID: &str = "rill-devnet";

pub const TESTNET_API_URL: &str = "http://34.118.12.33:1317";
pub const DEVNET_API_URL: &str = "http://127.0.0.1:1317";

/// Bech32 prefix for account addresses.
pub const ADDRESS_PREFIX: &str = "rill";

/// The smallest unit of the native token.
pub const NATIVE_DENOM: &str = "urill";
