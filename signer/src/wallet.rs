// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use async_trait::async_trait;
use k256::ecdsa::{signature::Signer as _, Signature, SigningKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;

use rill_provider::signdoc::StdSignDoc;
use rill_provider::tx::{PubKey, StdSignature};
use rill_provider::util::raw_secp256k1_pubkey_to_address;

use crate::key::parse_secret_key;
use crate::signer::{AminoSignResponse, OfflineSigner, SignerError};

/// An in-memory secp256k1 key holder.
///
/// Signatures are deterministic (RFC 6979) with low-S normalization, over
/// the SHA-256 digest of the canonical sign bytes. The wallet signs the
/// document exactly as given; it performs no normalization of its own.
#[derive(Clone)]
pub struct Wallet {
    address: String,
    pub_key: PubKey,
    signing_key: SigningKey,
}

impl Wallet {
    /// Build a wallet from a secret key, deriving the account address under
    /// the given bech32 prefix.
    pub fn new_secp256k1(signing_key: SigningKey, prefix: &str) -> Result<Self, SignerError> {
        let point = signing_key.verifying_key().to_encoded_point(true);
        let raw_pubkey = point.as_bytes();
        let address = raw_secp256k1_pubkey_to_address(raw_pubkey, prefix)
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(Wallet {
            address,
            pub_key: PubKey::secp256k1(raw_pubkey),
            signing_key,
        })
    }

    /// Build a wallet from a hex-encoded secret key.
    pub fn from_hex(hex_str: &str, prefix: &str) -> Result<Self, SignerError> {
        Self::new_secp256k1(parse_secret_key(hex_str)?, prefix)
    }

    /// A wallet over a freshly generated key.
    pub fn random(prefix: &str) -> Result<Self, SignerError> {
        Self::new_secp256k1(crate::key::random_secret_key(), prefix)
    }

    pub fn public_key(&self) -> &PubKey {
        &self.pub_key
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OfflineSigner for Wallet {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_amino(
        &self,
        signer_address: &str,
        sign_doc: StdSignDoc,
    ) -> Result<AminoSignResponse, SignerError> {
        if signer_address != self.address {
            return Err(SignerError::UnknownAddress {
                address: signer_address.to_string(),
            });
        }
        let bytes = sign_doc.sign_bytes()?;
        let signature: Signature = self.signing_key.sign(&bytes);
        Ok(AminoSignResponse {
            signature: StdSignature::new(self.pub_key.clone(), &signature.to_bytes()),
            signed: sign_doc,
        })
    }
}
