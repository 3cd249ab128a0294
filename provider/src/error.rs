// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;

/// Errors surfaced by providers and the wire data model.
///
/// Nothing here is retried internally. A nonce race or a transient network
/// failure needs fresh state this crate does not cache, and a blind retry of
/// a broadcast could double-submit.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The ledger has no record for the queried address, usually because the
    /// account has never received funds.
    #[error("account {address} does not exist on chain; send some tokens there before trying to query it")]
    AccountNotFound { address: String },

    /// A message type the codec registry has no entry for.
    #[error("unregistered type URL: {type_url}")]
    UnknownTypeUrl { type_url: String },

    /// A second registration for an already registered type URL.
    #[error("type URL registered twice: {type_url}")]
    DuplicateTypeUrl { type_url: String },

    /// The transaction was rejected before execution (invalid signature,
    /// insufficient fee, stale sequence). No block height exists for it.
    #[error("transaction {hash} rejected by checks (code {code}): {log}")]
    BroadcastCheckFailed { code: u32, hash: String, log: String },

    /// The transaction was included in a block but execution failed. The
    /// sequence nonce is consumed; resubmitting the same bytes cannot
    /// succeed.
    #[error("transaction {hash} failed in block {height} (code {code}): {log}")]
    BroadcastDeliverFailed {
        code: u32,
        hash: String,
        height: u64,
        log: String,
    },

    #[error("invalid coin: {0}")]
    InvalidCoin(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// A response the ledger returned that does not match its documented
    /// shape.
    #[error("malformed ledger response: {0}")]
    BadResponse(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
