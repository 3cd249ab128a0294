// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::query::{Block, IndexedTx, SearchTxFilter, SearchTxQuery};
use crate::response::{Account, SequenceInfo};
use crate::tx::{BroadcastMode, BroadcastTxResult};

/// Provider capable of both queries and transaction submission.
pub trait Provider: QueryProvider + TxProvider {}

/// Read-only access to ledger state. No signing capability.
#[async_trait]
pub trait QueryProvider: Send + Sync {
    /// Look up an account. `None` when the ledger has no record for the
    /// address.
    async fn account(&self, address: &str) -> Result<Option<Account>, ProviderError>;

    /// Account number and sequence for an address; fails with
    /// [`ProviderError::AccountNotFound`] when there is no on-chain record.
    async fn sequence(&self, address: &str) -> Result<SequenceInfo, ProviderError> {
        match self.account(address).await? {
            Some(account) => Ok(SequenceInfo {
                account_number: account.account_number,
                sequence: account.sequence,
            }),
            None => Err(ProviderError::AccountNotFound {
                address: address.to_string(),
            }),
        }
    }

    /// The chain id. Fetched per call; this client caches nothing.
    async fn chain_id(&self) -> Result<String, ProviderError>;

    /// A block by height, or the latest block when `height` is `None`.
    async fn block(&self, height: Option<u64>) -> Result<Block, ProviderError>;

    /// Search committed transactions.
    async fn search_txs(
        &self,
        query: SearchTxQuery,
        filter: SearchTxFilter,
    ) -> Result<Vec<IndexedTx>, ProviderError>;
}

/// Submission of serialized transactions.
#[async_trait]
pub trait TxProvider: Send + Sync {
    /// Broadcast raw transaction bytes and interpret the response for the
    /// given mode. No retry on any failure: the caller owns retry policy,
    /// since resubmission needs a fresh sequence and possibly new content.
    async fn broadcast_raw_tx(
        &self,
        tx_bytes: &[u8],
        mode: BroadcastMode,
    ) -> Result<BroadcastTxResult, ProviderError>;
}

// Shared references delegate, so one provider can back several clients.

impl<P: Provider> Provider for &P {}

#[async_trait]
impl<P: QueryProvider> QueryProvider for &P {
    async fn account(&self, address: &str) -> Result<Option<Account>, ProviderError> {
        (**self).account(address).await
    }

    async fn sequence(&self, address: &str) -> Result<SequenceInfo, ProviderError> {
        (**self).sequence(address).await
    }

    async fn chain_id(&self) -> Result<String, ProviderError> {
        (**self).chain_id().await
    }

    async fn block(&self, height: Option<u64>) -> Result<Block, ProviderError> {
        (**self).block(height).await
    }

    async fn search_txs(
        &self,
        query: SearchTxQuery,
        filter: SearchTxFilter,
    ) -> Result<Vec<IndexedTx>, ProviderError> {
        (**self).search_txs(query, filter).await
    }
}

#[async_trait]
impl<P: TxProvider> TxProvider for &P {
    async fn broadcast_raw_tx(
        &self,
        tx_bytes: &[u8],
        mode: BroadcastMode,
    ) -> Result<BroadcastTxResult, ProviderError> {
        (**self).broadcast_raw_tx(tx_bytes, mode).await
    }
}
