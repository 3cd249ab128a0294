// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};

use crate::coin::StdFee;
use crate::error::ProviderError;
use crate::msg::Msg;

/// The canonical structure a signer signs over, binding a set of messages to
/// a fee, chain id, memo, account number and sequence.
///
/// Field layout is fixed and alphabetical; the ledger's verifier re-derives
/// the exact same bytes from the broadcast transaction, so the ordering is
/// part of the signature contract. Account number and sequence travel as
/// decimal strings to avoid precision loss on large values.
///
/// A sign document is constructed, signed and discarded; it is never
/// persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StdSignDoc {
    pub account_number: String,
    pub chain_id: String,
    pub fee: StdFee,
    pub memo: String,
    pub msgs: Vec<Msg>,
    pub sequence: String,
}

impl StdSignDoc {
    /// Build a sign document. Pure; performs no I/O.
    pub fn new(
        msgs: Vec<Msg>,
        fee: StdFee,
        chain_id: &str,
        memo: &str,
        account_number: u64,
        sequence: u64,
    ) -> Self {
        StdSignDoc {
            account_number: account_number.to_string(),
            chain_id: chain_id.to_string(),
            fee,
            memo: memo.to_string(),
            msgs,
            sequence: sequence.to_string(),
        }
    }

    /// The exact bytes to sign: compact JSON with every object's keys
    /// sorted. Identical logical input yields byte-identical output
    /// regardless of how nested values were assembled.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, ProviderError> {
        // serde_json::Value keeps objects in BTreeMaps (preserve_order is
        // off), so converting through Value sorts all keys.
        Ok(serde_json::to_value(self)?.to_string().into_bytes())
    }
}
