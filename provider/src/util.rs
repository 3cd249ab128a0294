// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use bech32::{FromBase32, ToBase32, Variant};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::error::ProviderError;
use crate::tx::{PubKey, SECP256K1_PUBKEY_TYPE};

/// Length of a compressed SEC1 secp256k1 public key.
pub const COMPRESSED_PUBKEY_LEN: usize = 33;

/// Derive the bech32 account address for a compressed secp256k1 public key:
/// ripemd160(sha256(pubkey)) under the given prefix.
pub fn raw_secp256k1_pubkey_to_address(
    raw_pubkey: &[u8],
    prefix: &str,
) -> Result<String, ProviderError> {
    if raw_pubkey.len() != COMPRESSED_PUBKEY_LEN {
        return Err(ProviderError::InvalidAddress(format!(
            "expected a {COMPRESSED_PUBKEY_LEN}-byte compressed public key, got {} bytes",
            raw_pubkey.len()
        )));
    }
    let sha = Sha256::digest(raw_pubkey);
    let hash = Ripemd160::digest(sha);
    bech32::encode(prefix, hash.to_base32(), Variant::Bech32)
        .map_err(|e| ProviderError::InvalidAddress(format!("bech32 encoding failed: {e}")))
}

/// Derive the account address for a wrapped [`PubKey`].
pub fn pubkey_to_address(pubkey: &PubKey, prefix: &str) -> Result<String, ProviderError> {
    if pubkey.key_type != SECP256K1_PUBKEY_TYPE {
        return Err(ProviderError::InvalidAddress(format!(
            "unsupported public key type {:?}",
            pubkey.key_type
        )));
    }
    raw_secp256k1_pubkey_to_address(&pubkey.raw_bytes()?, prefix)
}

/// Split a bech32 address into its prefix and 20-byte payload.
pub fn decode_address(address: &str) -> Result<(String, Vec<u8>), ProviderError> {
    let (prefix, data, variant) = bech32::decode(address)
        .map_err(|e| ProviderError::InvalidAddress(format!("{address}: {e}")))?;
    if variant != Variant::Bech32 {
        return Err(ProviderError::InvalidAddress(format!(
            "{address}: not a bech32 (non-m) address"
        )));
    }
    let payload = Vec::<u8>::from_base32(&data)
        .map_err(|e| ProviderError::InvalidAddress(format!("{address}: {e}")))?;
    Ok((prefix, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_round_trippable_addresses() {
        let pubkey = [2u8; 33];
        let address = raw_secp256k1_pubkey_to_address(&pubkey, "rill").unwrap();
        assert!(address.starts_with("rill1"));
        let (prefix, payload) = decode_address(&address).unwrap();
        assert_eq!(prefix, "rill");
        assert_eq!(payload.len(), 20);
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = raw_secp256k1_pubkey_to_address(&[7u8; 33], "rill").unwrap();
        let b = raw_secp256k1_pubkey_to_address(&[7u8; 33], "rill").unwrap();
        assert_eq!(a, b);
        let c = raw_secp256k1_pubkey_to_address(&[8u8; 33], "rill").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn rejects_uncompressed_keys() {
        assert!(raw_secp256k1_pubkey_to_address(&[4u8; 65], "rill").is_err());
    }

    #[test]
    fn wrapped_pubkey_address() {
        let pubkey = PubKey::secp256k1(&[2u8; 33]);
        let address = pubkey_to_address(&pubkey, "rill").unwrap();
        assert_eq!(
            address,
            raw_secp256k1_pubkey_to_address(&[2u8; 33], "rill").unwrap()
        );
    }
}
