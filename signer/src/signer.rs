// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use async_trait::async_trait;
use thiserror::Error;

use rill_provider::error::ProviderError;
use rill_provider::signdoc::StdSignDoc;
use rill_provider::tx::StdSignature;

/// Errors a signer can produce.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The signer does not hold a key for the requested address.
    #[error("signer holds no key for {address}")]
    UnknownAddress { address: String },

    /// The signing request was refused, for example by a user at an
    /// interactive device.
    #[error("signing request rejected: {0}")]
    Rejected(String),

    #[error("invalid secret key: {0}")]
    InvalidKey(String),

    /// Canonicalization of the sign document failed.
    #[error(transparent)]
    Canonical(#[from] ProviderError),
}

/// What a signer hands back: the document it actually signed over, and the
/// signature. The signed document may differ from the one requested if the
/// signer normalized it; callers compare the two to detect divergence.
#[derive(Clone, Debug)]
pub struct AminoSignResponse {
    pub signed: StdSignDoc,
    pub signature: StdSignature,
}

/// The capability to sign a canonical sign document.
///
/// Implementations may hold keys in memory or delegate to external
/// hardware or UI; callers never inspect which. Signing may suspend
/// indefinitely while an interactive signer awaits approval, so treat it
/// as a cancellable, potentially slow operation with no inherent timeout.
#[async_trait]
pub trait OfflineSigner: Send + Sync {
    /// The account address this signer signs for.
    fn address(&self) -> &str;

    /// Sign the canonical bytes of `sign_doc` with the key for
    /// `signer_address`.
    async fn sign_amino(
        &self,
        signer_address: &str,
        sign_doc: StdSignDoc,
    ) -> Result<AminoSignResponse, SignerError>;
}
