// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use k256::ecdsa::{signature::Verifier, Signature, VerifyingKey};

use rill_provider::signdoc::StdSignDoc;
use rill_provider::tx::{StdSignature, StdTx};

use crate::error::ClientError;

/// Whether a signature covers the given canonical bytes.
pub fn signature_covers(signature: &StdSignature, bytes: &[u8]) -> Result<bool, ClientError> {
    let key = VerifyingKey::from_sec1_bytes(&signature.pub_key.raw_bytes()?)
        .map_err(|e| ClientError::InvalidSignature(format!("public key: {e}")))?;
    let sig = Signature::from_slice(&signature.raw_bytes()?)
        .map_err(|e| ClientError::InvalidSignature(format!("signature: {e}")))?;
    Ok(key.verify(bytes, &sig).is_ok())
}

/// Recover the sequence a signed transaction was made at by scanning
/// candidates below `upper_bound` and checking the first signature against
/// the re-derived sign document.
///
/// Useful when a transaction was exported, held offline, and its nonce
/// forgotten. Linear in `upper_bound`; keep the bound close to the
/// account's current sequence.
pub fn find_sequence_for_signed_tx(
    tx: &StdTx,
    chain_id: &str,
    account_number: u64,
    upper_bound: u64,
) -> Result<Option<u64>, ClientError> {
    let signature = tx.signatures.first().ok_or(ClientError::UnsignedTransaction)?;
    for sequence in 0..upper_bound {
        let doc = StdSignDoc::new(
            tx.msg.clone(),
            tx.fee.clone(),
            chain_id,
            &tx.memo,
            account_number,
            sequence,
        );
        if signature_covers(signature, &doc.sign_bytes()?)? {
            return Ok(Some(sequence));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_provider::coin::{coins, StdFee};
    use rill_provider::msg::{Msg, MsgSend};
    use rill_provider::tx::StdTx;
    use rill_signer::{OfflineSigner, Wallet};

    #[tokio::test]
    async fn recovers_the_signing_sequence() {
        let wallet = Wallet::random("rill").unwrap();
        let doc = StdSignDoc::new(
            vec![Msg::Send(MsgSend {
                amount: coins(10, "atom"),
                from_address: wallet.address().to_string(),
                to_address: "rill1recipient".into(),
            })],
            StdFee::new(coins(2000, "urill"), 80_000),
            "rill-testnet-1",
            "",
            42,
            7,
        );
        let response = wallet.sign_amino(wallet.address(), doc).await.unwrap();
        let tx = StdTx::from_signed(response.signed, response.signature);

        let found = find_sequence_for_signed_tx(&tx, "rill-testnet-1", 42, 20).unwrap();
        assert_eq!(found, Some(7));

        // Wrong chain id: nothing in range matches.
        let miss = find_sequence_for_signed_tx(&tx, "rill-devnet", 42, 20).unwrap();
        assert_eq!(miss, None);
    }

    #[test]
    fn unsigned_tx_is_an_error() {
        let tx = StdTx {
            msg: vec![],
            fee: StdFee::new(vec![], 0),
            memo: String::new(),
            signatures: vec![],
        };
        assert!(matches!(
            find_sequence_for_signed_tx(&tx, "chain", 0, 5),
            Err(ClientError::UnsignedTransaction)
        ));
    }
}
