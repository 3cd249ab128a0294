// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;

use rill_provider::error::ProviderError;
use rill_signer::SignerError;

/// Errors surfaced by the signing client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    /// The document the signer signed over is not the document the existing
    /// signatures cover, typically because the account sequence advanced
    /// between the original signing and a signature append. Broadcasting
    /// the result would produce an invalid transaction, so the append is
    /// refused instead.
    #[error("the signed document differs from the one of the original transaction; the resulting transaction would be invalid")]
    SignatureMismatch,

    #[error("no fee configured for operation kind {kind:?}")]
    MissingFee { kind: String },

    #[error("invalid gas price: {0}")]
    InvalidGasPrice(String),

    #[error("fee amount overflows for the configured gas price and limit")]
    FeeOverflow,

    #[error("transaction carries no signatures")]
    UnsignedTransaction,

    #[error("malformed signature material: {0}")]
    InvalidSignature(String),
}
