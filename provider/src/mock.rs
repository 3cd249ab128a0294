// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! An in-memory ledger for tests. It verifies every signature against the
//! sign document it re-derives from the broadcast envelope and the
//! account's current sequence, so a transaction signed over a stale
//! sequence is rejected the same way a real node rejects it. Blocks commit
//! instantly: checks and delivery happen inside the broadcast call for
//! every mode. Tag events are not indexed; a tag search matches nothing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use k256::ecdsa::{signature::Verifier, Signature, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::coin::{Coin, StdFee};
use crate::error::ProviderError;
use crate::msg::Msg;
use crate::provider::{Provider, QueryProvider, TxProvider};
use crate::query::{Block, BlockHeader, IndexedTx, SearchTxFilter, SearchTxQuery};
use crate::response::{Account, BroadcastTxResponse};
use crate::signdoc::StdSignDoc;
use crate::tx::{interpret_broadcast, BroadcastMode, BroadcastTxResult, StdTx};
use crate::util::pubkey_to_address;

/// One broadcast the mock observed, with the sequence the first signer was
/// at when it was accepted.
#[derive(Clone, Debug)]
pub struct RecordedBroadcast {
    pub height: u64,
    pub hash: String,
    pub sequence: u64,
    pub mode: BroadcastMode,
    pub code: u32,
    pub raw_log: String,
    pub tx: StdTx,
}

#[derive(Clone, Debug)]
struct AccountState {
    account_number: u64,
    sequence: u64,
    balance: HashMap<String, u128>,
}

struct LedgerState {
    height: u64,
    next_account_number: u64,
    accounts: HashMap<String, AccountState>,
    broadcasts: Vec<RecordedBroadcast>,
}

/// The mock ledger. Clone-free; share it by reference or `Arc`.
pub struct MockLedger {
    chain_id: String,
    prefix: String,
    state: Mutex<LedgerState>,
}

impl MockLedger {
    pub fn new(chain_id: &str, prefix: &str) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            prefix: prefix.to_string(),
            state: Mutex::new(LedgerState {
                height: 1,
                next_account_number: 1,
                accounts: HashMap::new(),
                broadcasts: Vec::new(),
            }),
        }
    }

    /// Create or replace an account.
    pub fn seed_account(
        &self,
        address: &str,
        account_number: u64,
        sequence: u64,
        balance: Vec<Coin>,
    ) -> Result<(), ProviderError> {
        let mut state = self.lock()?;
        let mut funds = HashMap::new();
        for coin in balance {
            *funds.entry(coin.denom.clone()).or_insert(0) += coin.units()?;
        }
        state.next_account_number = state.next_account_number.max(account_number + 1);
        state.accounts.insert(
            address.to_string(),
            AccountState {
                account_number,
                sequence,
                balance: funds,
            },
        );
        Ok(())
    }

    /// Advance an account's sequence out of band, as if another client had
    /// broadcast for the same address.
    pub fn advance_sequence(&self, address: &str) -> Result<(), ProviderError> {
        let mut state = self.lock()?;
        match state.accounts.get_mut(address) {
            Some(account) => {
                account.sequence += 1;
                Ok(())
            }
            None => Err(ProviderError::AccountNotFound {
                address: address.to_string(),
            }),
        }
    }

    /// Every broadcast the ledger has observed, in order.
    pub fn broadcasts(&self) -> Result<Vec<RecordedBroadcast>, ProviderError> {
        Ok(self.lock()?.broadcasts.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, LedgerState>, ProviderError> {
        self.state
            .lock()
            .map_err(|_| ProviderError::BadResponse("mock ledger lock poisoned".into()))
    }

    fn account_of(state: &LedgerState, address: &str) -> Option<Account> {
        state.accounts.get(address).map(|account| {
            let mut balance: Vec<Coin> = account
                .balance
                .iter()
                .filter(|(_, units)| **units > 0)
                .map(|(denom, units)| crate::coin::coin(*units, denom))
                .collect();
            balance.sort_by(|a, b| a.denom.cmp(&b.denom));
            Account {
                address: address.to_string(),
                account_number: account.account_number,
                sequence: account.sequence,
                balance,
                pubkey: None,
            }
        })
    }

    /// Verify one signature over the document re-derived at the signer's
    /// current sequence. Any divergence (wrong key, stale sequence, altered
    /// content) fails verification.
    fn check_signature(
        state: &LedgerState,
        chain_id: &str,
        prefix: &str,
        tx: &StdTx,
        signature: &crate::tx::StdSignature,
    ) -> Result<String, String> {
        let address = pubkey_to_address(&signature.pub_key, prefix)
            .map_err(|e| format!("invalid public key: {e}"))?;
        let account = state
            .accounts
            .get(&address)
            .ok_or_else(|| format!("unknown signer account {address}"))?;
        let doc = StdSignDoc::new(
            tx.msg.clone(),
            tx.fee.clone(),
            chain_id,
            &tx.memo,
            account.account_number,
            account.sequence,
        );
        let bytes = doc.sign_bytes().map_err(|e| e.to_string())?;
        let raw_key = signature.pub_key.raw_bytes().map_err(|e| e.to_string())?;
        let key = VerifyingKey::from_sec1_bytes(&raw_key)
            .map_err(|e| format!("invalid public key: {e}"))?;
        let raw_sig = signature.raw_bytes().map_err(|e| e.to_string())?;
        let sig = Signature::from_slice(&raw_sig)
            .map_err(|e| format!("malformed signature: {e}"))?;
        key.verify(&bytes, &sig).map_err(|_| {
            format!("signature verification failed for {address}; wrong key or sequence")
        })?;
        Ok(address)
    }

    /// Execute the messages. Returns a non-zero code and log on execution
    /// failure; state changes before the failing message stick, as on a
    /// real chain.
    fn deliver(state: &mut LedgerState, tx: &StdTx) -> (u32, String) {
        for msg in &tx.msg {
            if let Msg::Send(send) = msg {
                if let Err(log) = Self::transfer(state, send) {
                    return (5, log);
                }
            }
        }
        (0, String::new())
    }

    fn transfer(state: &mut LedgerState, send: &crate::msg::MsgSend) -> Result<(), String> {
        // Aggregate per denomination first: a send may list one denom more
        // than once, and every listing counts against the same balance.
        let mut amounts: HashMap<String, u128> = HashMap::new();
        for coin in &send.amount {
            let units = coin.units().map_err(|e| e.to_string())?;
            let total = amounts.entry(coin.denom.clone()).or_insert(0);
            *total = total
                .checked_add(units)
                .ok_or_else(|| format!("amount overflow for {}", coin.denom))?;
        }
        let sender = state
            .accounts
            .get(&send.from_address)
            .ok_or_else(|| format!("unknown sender {}", send.from_address))?;
        for (denom, units) in &amounts {
            let held = sender.balance.get(denom).copied().unwrap_or(0);
            if held < *units {
                return Err(format!(
                    "insufficient funds: {held}{denom} < {units}{denom}"
                ));
            }
        }
        if let Some(sender) = state.accounts.get_mut(&send.from_address) {
            for (denom, units) in &amounts {
                let held = sender.balance.entry(denom.clone()).or_insert(0);
                *held = held.saturating_sub(*units);
            }
        }
        if !state.accounts.contains_key(&send.to_address) {
            // Receiving funds brings an account into existence.
            let account_number = state.next_account_number;
            state.next_account_number += 1;
            state.accounts.insert(
                send.to_address.clone(),
                AccountState {
                    account_number,
                    sequence: 0,
                    balance: HashMap::new(),
                },
            );
        }
        if let Some(recipient) = state.accounts.get_mut(&send.to_address) {
            for (denom, units) in &amounts {
                let held = recipient.balance.entry(denom.clone()).or_insert(0);
                *held = held.saturating_add(*units);
            }
        }
        Ok(())
    }

    fn check_failure(hash: String, log: String, mode: BroadcastMode) -> Result<BroadcastTxResult, ProviderError> {
        interpret_broadcast(
            BroadcastTxResponse {
                height: Some("0".to_string()),
                txhash: hash,
                code: Some(4),
                raw_log: Some(log),
                gas_wanted: None,
                gas_used: None,
            },
            mode,
        )
    }
}

impl Provider for MockLedger {}

#[async_trait]
impl QueryProvider for MockLedger {
    async fn account(&self, address: &str) -> Result<Option<Account>, ProviderError> {
        let state = self.lock()?;
        Ok(Self::account_of(&state, address))
    }

    async fn chain_id(&self) -> Result<String, ProviderError> {
        Ok(self.chain_id.clone())
    }

    async fn block(&self, height: Option<u64>) -> Result<Block, ProviderError> {
        let state = self.lock()?;
        let height = height.unwrap_or(state.height);
        let txs = state
            .broadcasts
            .iter()
            .filter(|b| b.height == height)
            .map(|b| b.tx.to_bytes())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Block {
            id: hex::encode_upper(Sha256::digest(height.to_be_bytes())),
            header: BlockHeader {
                chain_id: self.chain_id.clone(),
                height,
                time: "2026-01-01T00:00:00Z".to_string(),
            },
            txs,
        })
    }

    async fn search_txs(
        &self,
        query: SearchTxQuery,
        filter: SearchTxFilter,
    ) -> Result<Vec<IndexedTx>, ProviderError> {
        let state = self.lock()?;
        let matches = |b: &RecordedBroadcast| match &query {
            SearchTxQuery::Height(h) => b.height == *h,
            SearchTxQuery::Id(id) => b.hash == *id,
            SearchTxQuery::SentFromOrTo(address) => b.tx.msg.iter().any(|m| {
                matches!(m, Msg::Send(s) if s.from_address == *address || s.to_address == *address)
            }),
            // The mock derives no events from messages, so there are no
            // tags to match against.
            SearchTxQuery::Tags(_) => false,
        };
        Ok(state
            .broadcasts
            .iter()
            .filter(|b| matches(b) && filter.matches(b.height))
            .map(|b| IndexedTx {
                height: b.height,
                hash: b.hash.clone(),
                code: b.code,
                raw_log: b.raw_log.clone(),
                tx: b.tx.clone(),
                timestamp: None,
            })
            .collect())
    }
}

#[async_trait]
impl TxProvider for MockLedger {
    async fn broadcast_raw_tx(
        &self,
        tx_bytes: &[u8],
        mode: BroadcastMode,
    ) -> Result<BroadcastTxResult, ProviderError> {
        let tx = StdTx::from_bytes(tx_bytes)?;
        let hash = hex::encode_upper(Sha256::digest(tx_bytes));
        let mut state = self.lock()?;

        if tx.signatures.is_empty() {
            return Self::check_failure(hash, "no signatures supplied".to_string(), mode);
        }
        let mut signers = Vec::with_capacity(tx.signatures.len());
        for signature in &tx.signatures {
            match Self::check_signature(&state, &self.chain_id, &self.prefix, &tx, signature) {
                Ok(address) => signers.push(address),
                Err(log) => return Self::check_failure(hash, log, mode),
            }
        }

        // Checks passed: the nonce is consumed no matter how delivery goes.
        let first_sequence = state
            .accounts
            .get(&signers[0])
            .map(|a| a.sequence)
            .unwrap_or(0);
        for address in &signers {
            if let Some(account) = state.accounts.get_mut(address) {
                account.sequence += 1;
            }
        }
        state.height += 1;
        let height = state.height;
        let (code, log) = Self::deliver(&mut state, &tx);

        state.broadcasts.push(RecordedBroadcast {
            height,
            hash: hash.clone(),
            sequence: first_sequence,
            mode,
            code,
            raw_log: log.clone(),
            tx: tx.clone(),
        });

        let gas_wanted = tx.fee.gas_limit().unwrap_or(0);
        let response = match mode {
            // Async and sync return before delivery; the caller only ever
            // sees the mempool/check outcome.
            BroadcastMode::Async | BroadcastMode::Sync => BroadcastTxResponse {
                height: Some("0".to_string()),
                txhash: hash,
                code: None,
                raw_log: None,
                gas_wanted: None,
                gas_used: None,
            },
            BroadcastMode::Block => BroadcastTxResponse {
                height: Some(height.to_string()),
                txhash: hash,
                code: if code != 0 { Some(code) } else { None },
                raw_log: Some(log),
                gas_wanted: Some(gas_wanted.to_string()),
                gas_used: Some(gas_wanted.to_string()),
            },
        };
        interpret_broadcast(response, mode)
    }
}

/// Fee helper shared by tests: the mock does not meter gas, but envelopes
/// still need a well-formed fee.
pub fn test_fee() -> StdFee {
    StdFee::new(crate::coin::coins(2000, "urill"), 80_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::coins;

    #[tokio::test]
    async fn seeded_accounts_are_queryable() {
        let ledger = MockLedger::new("rill-testnet-1", "rill");
        ledger
            .seed_account("rill1sender", 42, 3, coins(100, "atom"))
            .unwrap();

        let account = ledger.account("rill1sender").await.unwrap().unwrap();
        assert_eq!(account.account_number, 42);
        assert_eq!(account.sequence, 3);
        assert_eq!(account.balance, coins(100, "atom"));
        assert!(ledger.account("rill1stranger").await.unwrap().is_none());

        let info = ledger.sequence("rill1sender").await.unwrap();
        assert_eq!(info.sequence, 3);
        let err = ledger.sequence("rill1stranger").await.unwrap_err();
        assert!(matches!(err, ProviderError::AccountNotFound { .. }));
    }

    #[tokio::test]
    async fn unsigned_broadcasts_fail_checks() {
        let ledger = MockLedger::new("rill-testnet-1", "rill");
        let tx = StdTx {
            msg: vec![],
            fee: test_fee(),
            memo: String::new(),
            signatures: vec![],
        };
        let err = ledger
            .broadcast_raw_tx(&tx.to_bytes().unwrap(), BroadcastMode::Block)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::BroadcastCheckFailed { code: 4, .. }
        ));
        assert!(ledger.broadcasts().unwrap().is_empty());
    }

    #[test]
    fn advancing_an_unknown_sequence_fails() {
        let ledger = MockLedger::new("rill-testnet-1", "rill");
        assert!(ledger.advance_sequence("rill1stranger").is_err());
    }
}
