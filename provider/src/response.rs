// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! Wire payloads of the ledger's REST daemon and their conversion into
//! domain types. The daemon reports integers as decimal strings; parsing
//! happens here, once, so the rest of the crate works with numbers.

use base64::Engine;
use serde::Deserialize;

use crate::coin::Coin;
use crate::error::ProviderError;
use crate::query::{Block, BlockHeader, IndexedTx};
use crate::tx::{PubKey, StdTx};

/// On-chain state of an account.
#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    pub address: String,
    pub account_number: u64,
    /// Strictly-increasing per-account nonce; one signed transaction
    /// consumes exactly one value.
    pub sequence: u64,
    pub balance: Vec<Coin>,
    pub pubkey: Option<PubKey>,
}

/// Account number and sequence, the two inputs the sign document needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceInfo {
    pub account_number: u64,
    pub sequence: u64,
}

#[derive(Debug, Deserialize)]
pub struct AuthAccountsResponse {
    pub result: WrappedAccount,
}

#[derive(Debug, Deserialize)]
pub struct WrappedAccount {
    #[serde(rename = "type")]
    pub account_type: String,
    pub value: BaseAccount,
}

#[derive(Debug, Deserialize)]
pub struct BaseAccount {
    pub address: String,
    #[serde(default)]
    pub coins: Vec<Coin>,
    pub public_key: Option<PubKey>,
    pub account_number: String,
    pub sequence: String,
}

impl BaseAccount {
    pub fn into_account(self) -> Result<Account, ProviderError> {
        Ok(Account {
            account_number: parse_u64(&self.account_number, "account_number")?,
            sequence: parse_u64(&self.sequence, "sequence")?,
            address: self.address,
            balance: self.coins,
            pubkey: self.public_key,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct NodeInfoResponse {
    pub node_info: NodeInfo,
}

#[derive(Debug, Deserialize)]
pub struct NodeInfo {
    /// The chain id.
    pub network: String,
}

#[derive(Debug, Deserialize)]
pub struct BlockResponse {
    pub block_id: BlockId,
    pub block: WireBlock,
}

#[derive(Debug, Deserialize)]
pub struct BlockId {
    pub hash: String,
}

#[derive(Debug, Deserialize)]
pub struct WireBlock {
    pub header: WireBlockHeader,
    pub data: WireBlockData,
}

#[derive(Debug, Deserialize)]
pub struct WireBlockHeader {
    pub chain_id: String,
    pub height: String,
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct WireBlockData {
    /// Base64-encoded raw transactions; null when the block is empty.
    pub txs: Option<Vec<String>>,
}

impl BlockResponse {
    pub fn into_block(self) -> Result<Block, ProviderError> {
        let txs = self
            .block
            .data
            .txs
            .unwrap_or_default()
            .iter()
            .map(|encoded| {
                base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(|e| ProviderError::BadResponse(format!("block tx is not base64: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Block {
            id: self.block_id.hash,
            header: BlockHeader {
                height: parse_u64(&self.block.header.height, "block height")?,
                chain_id: self.block.header.chain_id,
                time: self.block.header.time,
            },
            txs,
        })
    }
}

/// Raw response to a broadcast, before interpretation.
#[derive(Clone, Debug, Deserialize)]
pub struct BroadcastTxResponse {
    pub height: Option<String>,
    pub txhash: String,
    pub code: Option<u32>,
    pub raw_log: Option<String>,
    pub gas_wanted: Option<String>,
    pub gas_used: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchTxsResponse {
    pub page_number: String,
    pub page_total: String,
    pub txs: Vec<TxResponse>,
}

#[derive(Debug, Deserialize)]
pub struct TxResponse {
    pub height: String,
    pub txhash: String,
    pub code: Option<u32>,
    pub raw_log: Option<String>,
    pub tx: WrappedStdTx,
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WrappedStdTx {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub value: StdTx,
}

impl TxResponse {
    pub fn into_indexed_tx(self) -> Result<IndexedTx, ProviderError> {
        Ok(IndexedTx {
            height: parse_u64(&self.height, "tx height")?,
            hash: self.txhash,
            code: self.code.unwrap_or(0),
            raw_log: self.raw_log.unwrap_or_default(),
            tx: self.tx.value,
            timestamp: self.timestamp,
        })
    }
}

pub(crate) fn parse_u64(value: &str, field: &str) -> Result<u64, ProviderError> {
    value
        .parse::<u64>()
        .map_err(|e| ProviderError::BadResponse(format!("{field} {value:?}: {e}")))
}
