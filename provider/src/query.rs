// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::Serialize;

use crate::tx::StdTx;

/// Ways to search for transactions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchTxQuery {
    /// All transactions in the block at the given height.
    Height(u64),
    /// A single transaction by hash.
    Id(String),
    /// Transactions that moved funds from or to the given address.
    SentFromOrTo(String),
    /// Raw event tags, matched as key=value pairs.
    Tags(Vec<(String, String)>),
}

impl SearchTxQuery {
    /// The query parameters the REST search endpoint understands.
    pub fn to_params(&self) -> Vec<(String, String)> {
        match self {
            SearchTxQuery::Height(height) => {
                vec![("tx.height".to_string(), height.to_string())]
            }
            SearchTxQuery::Id(id) => vec![("tx.hash".to_string(), id.clone())],
            SearchTxQuery::SentFromOrTo(address) => vec![
                ("message.sender".to_string(), address.clone()),
                ("transfer.recipient".to_string(), address.clone()),
            ],
            SearchTxQuery::Tags(tags) => tags.clone(),
        }
    }
}

/// Height bounds applied on top of a [`SearchTxQuery`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchTxFilter {
    pub min_height: Option<u64>,
    pub max_height: Option<u64>,
}

impl SearchTxFilter {
    pub fn matches(&self, height: u64) -> bool {
        self.min_height.map_or(true, |min| height >= min)
            && self.max_height.map_or(true, |max| height <= max)
    }
}

/// A transaction found on chain, with its execution outcome.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndexedTx {
    pub height: u64,
    pub hash: String,
    /// Execution result code; zero means success.
    pub code: u32,
    pub raw_log: String,
    pub tx: StdTx,
    pub timestamp: Option<String>,
}

/// Block header fields this client exposes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockHeader {
    pub chain_id: String,
    pub height: u64,
    /// RFC 3339 timestamp as reported by the ledger.
    pub time: String,
}

/// A block with its raw transaction payloads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Block hash.
    pub id: String,
    pub header: BlockHeader,
    pub txs: Vec<Vec<u8>>,
}
