// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::Display;
use std::str::FromStr;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::coin::StdFee;
use crate::error::ProviderError;
use crate::msg::Msg;
use crate::response::BroadcastTxResponse;
use crate::signdoc::StdSignDoc;

pub const SECP256K1_PUBKEY_TYPE: &str = "tendermint/PubKeySecp256k1";

/// An account public key in the ledger's tagged envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub value: String,
}

impl PubKey {
    /// Wrap a compressed (33-byte SEC1) secp256k1 public key.
    pub fn secp256k1(raw: &[u8]) -> Self {
        PubKey {
            key_type: SECP256K1_PUBKEY_TYPE.to_string(),
            value: base64::engine::general_purpose::STANDARD.encode(raw),
        }
    }

    pub fn raw_bytes(&self) -> Result<Vec<u8>, ProviderError> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.value)
            .map_err(|e| ProviderError::BadResponse(format!("public key is not base64: {e}")))
    }
}

/// One signature over a fully-specified sign document. Immutable once
/// appended to a transaction; changing the signed content means re-signing,
/// not patching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: PubKey,
    pub signature: String,
}

impl StdSignature {
    /// Wrap a fixed-length (64-byte R||S) secp256k1 signature.
    pub fn new(pub_key: PubKey, raw_signature: &[u8]) -> Self {
        StdSignature {
            pub_key,
            signature: base64::engine::general_purpose::STANDARD.encode(raw_signature),
        }
    }

    pub fn raw_bytes(&self) -> Result<Vec<u8>, ProviderError> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.signature)
            .map_err(|e| ProviderError::BadResponse(format!("signature is not base64: {e}")))
    }
}

/// A signed transaction envelope: ordered messages, the fee, a memo and the
/// signatures in the order they were appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StdTx {
    pub msg: Vec<Msg>,
    pub fee: StdFee,
    pub memo: String,
    pub signatures: Vec<StdSignature>,
}

impl StdTx {
    /// Assemble a single-signature transaction from the document the signer
    /// reports having signed. Using the signer-returned document (not the
    /// one we asked it to sign) keeps any signer-side normalization bound to
    /// the signature.
    pub fn from_signed(signed: StdSignDoc, signature: StdSignature) -> Self {
        StdTx {
            msg: signed.msgs,
            fee: signed.fee,
            memo: signed.memo,
            signatures: vec![signature],
        }
    }

    /// A copy of this transaction with one more signature. Append-only:
    /// existing signatures are never reordered or deduplicated.
    pub fn with_appended_signature(&self, signature: StdSignature) -> Self {
        let mut tx = self.clone();
        tx.signatures.push(signature);
        tx
    }

    /// Serialize to the raw bytes the ledger expects on broadcast.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProviderError> {
        Ok(serde_json::to_value(self)?.to_string().into_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProviderError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Controls how far into ledger processing a broadcast waits before
/// returning.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum BroadcastMode {
    /// Return immediately after mempool acceptance without waiting for
    /// check results.
    Async,
    /// Wait for the pre-execution checks before returning.
    Sync,
    /// Wait until the transaction is included in a block.
    #[default]
    Block,
}

impl BroadcastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastMode::Async => "async",
            BroadcastMode::Sync => "sync",
            BroadcastMode::Block => "block",
        }
    }
}

impl FromStr for BroadcastMode {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "async" => Self::Async,
            "sync" => Self::Sync,
            "block" => Self::Block,
            _ => {
                return Err(ProviderError::BadResponse(format!(
                    "invalid broadcast mode {s:?}"
                )))
            }
        })
    }
}

impl Display for BroadcastMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successfully processed broadcast, as far as the chosen mode can tell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BroadcastTxResult {
    /// Block height the transaction was included at; zero when the mode
    /// returned before inclusion.
    pub height: u64,
    pub transaction_hash: String,
    pub raw_log: String,
    pub gas_wanted: u64,
    pub gas_used: u64,
}

/// Classify a raw broadcast response.
///
/// A non-zero code before any block height exists means the transaction was
/// rejected by checks and never executed. A non-zero code at a height (block
/// mode) means it was included but execution failed; the sequence nonce is
/// consumed either way, so the caller must build a fresh transaction to
/// retry.
pub fn interpret_broadcast(
    response: BroadcastTxResponse,
    mode: BroadcastMode,
) -> Result<BroadcastTxResult, ProviderError> {
    let height = match &response.height {
        Some(h) if !h.is_empty() => h
            .parse::<u64>()
            .map_err(|e| ProviderError::BadResponse(format!("height {h:?}: {e}")))?,
        _ => 0,
    };
    let code = response.code.unwrap_or(0);
    let log = response.raw_log.clone().unwrap_or_default();

    if code != 0 {
        if mode == BroadcastMode::Block && height > 0 {
            return Err(ProviderError::BroadcastDeliverFailed {
                code,
                hash: response.txhash,
                height,
                log,
            });
        }
        return Err(ProviderError::BroadcastCheckFailed {
            code,
            hash: response.txhash,
            log,
        });
    }

    Ok(BroadcastTxResult {
        height,
        transaction_hash: response.txhash,
        raw_log: log,
        gas_wanted: parse_gas(response.gas_wanted)?,
        gas_used: parse_gas(response.gas_used)?,
    })
}

fn parse_gas(value: Option<String>) -> Result<u64, ProviderError> {
    match value {
        Some(v) if !v.is_empty() => v
            .parse::<u64>()
            .map_err(|e| ProviderError::BadResponse(format!("gas counter {v:?}: {e}"))),
        _ => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::{coins, StdFee};
    use crate::msg::MsgSend;

    fn response(height: &str, code: Option<u32>, log: &str) -> BroadcastTxResponse {
        BroadcastTxResponse {
            height: Some(height.to_string()),
            txhash: "AB12".to_string(),
            code,
            raw_log: Some(log.to_string()),
            gas_wanted: Some("80000".to_string()),
            gas_used: Some("52000".to_string()),
        }
    }

    #[test]
    fn success_in_block_mode() {
        let res = interpret_broadcast(response("57", None, ""), BroadcastMode::Block).unwrap();
        assert_eq!(res.height, 57);
        assert_eq!(res.transaction_hash, "AB12");
        assert_eq!(res.gas_used, 52000);
    }

    #[test]
    fn check_failure_has_no_height() {
        let err = interpret_broadcast(
            response("0", Some(4), "signature verification failed"),
            BroadcastMode::Block,
        )
        .unwrap_err();
        match err {
            ProviderError::BroadcastCheckFailed { code, log, .. } => {
                assert_eq!(code, 4);
                assert!(log.contains("signature"));
            }
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn deliver_failure_carries_height() {
        let err = interpret_broadcast(
            response("58", Some(5), "insufficient funds"),
            BroadcastMode::Block,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::BroadcastDeliverFailed { height: 58, code: 5, .. }
        ));
    }

    #[test]
    fn sync_mode_failures_are_check_failures() {
        let err = interpret_broadcast(response("0", Some(13), "insufficient fee"), BroadcastMode::Sync)
            .unwrap_err();
        assert!(matches!(err, ProviderError::BroadcastCheckFailed { code: 13, .. }));
    }

    #[test]
    fn broadcast_mode_parses() {
        assert_eq!("block".parse::<BroadcastMode>().unwrap(), BroadcastMode::Block);
        assert_eq!("sync".parse::<BroadcastMode>().unwrap(), BroadcastMode::Sync);
        assert_eq!("async".parse::<BroadcastMode>().unwrap(), BroadcastMode::Async);
        assert!("commit".parse::<BroadcastMode>().is_err());
    }

    #[test]
    fn appending_preserves_signature_order() {
        let doc = crate::signdoc::StdSignDoc::new(
            vec![Msg::Send(MsgSend {
                amount: coins(1, "atom"),
                from_address: "rill1a".into(),
                to_address: "rill1b".into(),
            })],
            StdFee::new(coins(2000, "urill"), 80_000),
            "chain",
            "",
            1,
            1,
        );
        let first = StdSignature::new(PubKey::secp256k1(&[2u8; 33]), &[1u8; 64]);
        let second = StdSignature::new(PubKey::secp256k1(&[3u8; 33]), &[2u8; 64]);
        let tx = StdTx::from_signed(doc, first.clone());
        let tx2 = tx.with_appended_signature(second.clone());
        assert_eq!(tx.signatures.len(), 1);
        assert_eq!(tx2.signatures, vec![first, second]);
    }
}
