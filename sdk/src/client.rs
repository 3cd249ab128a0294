// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::collections::BTreeMap;

use rill_provider::coin::{Coin, StdFee};
use rill_provider::msg::{Msg, MsgSend};
use rill_provider::response::{Account, SequenceInfo};
use rill_provider::signdoc::StdSignDoc;
use rill_provider::util::{decode_address, pubkey_to_address};
use rill_provider::tx::{BroadcastMode, BroadcastTxResult, StdTx};
use rill_provider::{Provider, QueryProvider, TxProvider};
use rill_signer::{AminoSignResponse, OfflineSigner};

use crate::error::ClientError;
use crate::gas::{FeeTable, GasPrice};
use crate::sequence::signature_covers;

/// Configuration resolved once at construction time.
#[derive(Clone, Debug, Default)]
pub struct SigningOptions {
    pub gas_price: GasPrice,
    /// Per-operation gas-limit overrides, merged over the defaults.
    pub gas_limits: BTreeMap<String, u64>,
    pub broadcast_mode: BroadcastMode,
}

/// A client that can sign and broadcast transactions for one signer
/// address.
///
/// Read access is delegated to the held [`Provider`]; the read/write
/// capability split is explicit in the type, not inherited.
///
/// Every signing operation fetches the account sequence fresh; no
/// sequence state is cached between calls. Callers issuing several
/// transactions back-to-back without waiting for inclusion must track
/// sequence increments themselves, and concurrent calls through one client
/// for the same signer address can race on the nonce — serialize per
/// signer address.
pub struct SigningClient<P, S> {
    provider: P,
    signer: S,
    signer_address: String,
    fees: FeeTable,
    broadcast_mode: BroadcastMode,
}

impl<P, S> SigningClient<P, S>
where
    P: Provider,
    S: OfflineSigner,
{
    /// A client with default gas price, gas limits and broadcast mode.
    pub fn new(provider: P, signer: S) -> Result<Self, ClientError> {
        Self::with_options(provider, signer, SigningOptions::default())
    }

    pub fn with_options(
        provider: P,
        signer: S,
        options: SigningOptions,
    ) -> Result<Self, ClientError> {
        let fees = FeeTable::build(&options.gas_price, &options.gas_limits)?;
        let signer_address = signer.address().to_string();
        Ok(SigningClient {
            provider,
            signer,
            signer_address,
            fees,
            broadcast_mode: options.broadcast_mode,
        })
    }

    pub fn signer_address(&self) -> &str {
        &self.signer_address
    }

    pub fn broadcast_mode(&self) -> BroadcastMode {
        self.broadcast_mode
    }

    pub fn fees(&self) -> &FeeTable {
        &self.fees
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Look up an account; defaults to the signer's own address.
    pub async fn get_account(&self, address: Option<&str>) -> Result<Option<Account>, ClientError> {
        let address = address.unwrap_or(&self.signer_address);
        Ok(self.provider.account(address).await?)
    }

    /// Account number and sequence; defaults to the signer's own address.
    pub async fn get_sequence(&self, address: Option<&str>) -> Result<SequenceInfo, ClientError> {
        let address = address.unwrap_or(&self.signer_address);
        Ok(self.provider.sequence(address).await?)
    }

    pub async fn get_chain_id(&self) -> Result<String, ClientError> {
        Ok(self.provider.chain_id().await?)
    }

    /// Send coins to a recipient, with the fee resolved from the fee table.
    pub async fn send_tokens(
        &self,
        recipient: &str,
        amount: Vec<Coin>,
        memo: &str,
    ) -> Result<BroadcastTxResult, ClientError> {
        let msg = Msg::Send(MsgSend {
            amount,
            from_address: self.signer_address.clone(),
            to_address: recipient.to_string(),
        });
        let fee = self
            .fees
            .get("send")
            .cloned()
            .ok_or_else(|| ClientError::MissingFee {
                kind: "send".to_string(),
            })?;
        self.sign_and_broadcast(vec![msg], fee, memo).await
    }

    /// Fetch the current account number and sequence, build the sign
    /// document, obtain one signature and assemble the transaction.
    pub async fn sign(
        &self,
        msgs: Vec<Msg>,
        fee: StdFee,
        memo: &str,
    ) -> Result<StdTx, ClientError> {
        let SequenceInfo {
            account_number,
            sequence,
        } = self.get_sequence(None).await?;
        let chain_id = self.provider.chain_id().await?;
        tracing::debug!(
            account_number,
            sequence,
            %chain_id,
            "signing {} message(s)",
            msgs.len()
        );
        let sign_doc = StdSignDoc::new(msgs, fee, &chain_id, memo, account_number, sequence);
        let AminoSignResponse { signed, signature } = self
            .signer
            .sign_amino(&self.signer_address, sign_doc)
            .await?;
        Ok(StdTx::from_signed(signed, signature))
    }

    /// `sign` followed by `broadcast_tx`.
    pub async fn sign_and_broadcast(
        &self,
        msgs: Vec<Msg>,
        fee: StdFee,
        memo: &str,
    ) -> Result<BroadcastTxResult, ClientError> {
        let tx = self.sign(msgs, fee, memo).await?;
        self.broadcast_tx(&tx).await
    }

    /// Serialize and submit a signed transaction under the client's
    /// broadcast mode.
    pub async fn broadcast_tx(&self, tx: &StdTx) -> Result<BroadcastTxResult, ClientError> {
        let bytes = tx.to_bytes()?;
        Ok(self
            .provider
            .broadcast_raw_tx(&bytes, self.broadcast_mode)
            .await?)
    }

    /// Re-sign the content of an existing transaction at this signer's
    /// current sequence and append the signature.
    ///
    /// Every signature binds to a document carrying its own signer's
    /// account number and sequence, so each existing signature is
    /// re-verified against the document rebuilt for that signer's current
    /// on-chain state, with the signer address derived from the embedded
    /// public key. If any signer's sequence advanced since it signed, or
    /// the appender's signer altered the document it was handed, the
    /// append fails with [`ClientError::SignatureMismatch`]; `tx` is
    /// returned to the caller untouched in that case (it is never
    /// mutated).
    pub async fn append_signature(&self, tx: &StdTx) -> Result<StdTx, ClientError> {
        let SequenceInfo {
            account_number,
            sequence,
        } = self.get_sequence(None).await?;
        let chain_id = self.provider.chain_id().await?;
        let sign_doc = StdSignDoc::new(
            tx.msg.clone(),
            tx.fee.clone(),
            &chain_id,
            &tx.memo,
            account_number,
            sequence,
        );
        let AminoSignResponse { signed, signature } = self
            .signer
            .sign_amino(&self.signer_address, sign_doc.clone())
            .await?;
        if signed != sign_doc {
            return Err(ClientError::SignatureMismatch);
        }
        let (prefix, _) = decode_address(&self.signer_address)?;
        for existing in &tx.signatures {
            let address = pubkey_to_address(&existing.pub_key, &prefix)?;
            let SequenceInfo {
                account_number,
                sequence,
            } = self.provider.sequence(&address).await?;
            let doc = StdSignDoc::new(
                tx.msg.clone(),
                tx.fee.clone(),
                &chain_id,
                &tx.memo,
                account_number,
                sequence,
            );
            if !signature_covers(existing, &doc.sign_bytes()?)? {
                return Err(ClientError::SignatureMismatch);
            }
        }
        Ok(tx.with_appended_signature(signature))
    }
}
