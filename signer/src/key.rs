// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;

use crate::signer::SignerError;

/// Parse a hex-encoded (optionally 0x-prefixed) secp256k1 secret key.
pub fn parse_secret_key(hex_str: &str) -> Result<SigningKey, SignerError> {
    let hex_str = hex_str.trim();
    let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    let raw = hex::decode(hex_str)
        .map_err(|e| SignerError::InvalidKey(format!("cannot decode hex private key: {e}")))?;
    SigningKey::from_slice(&raw)
        .map_err(|e| SignerError::InvalidKey(format!("failed to parse secret key: {e}")))
}

/// Generate a fresh secret key from the OS entropy source.
pub fn random_secret_key() -> SigningKey {
    SigningKey::random(&mut OsRng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_prefix() {
        let key = random_secret_key();
        let hex_str = hex::encode(key.to_bytes());
        assert!(parse_secret_key(&hex_str).is_ok());
        assert!(parse_secret_key(&format!("0x{hex_str}")).is_ok());
        assert!(parse_secret_key(&format!("  {hex_str} ")).is_ok());
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(parse_secret_key("zz").is_err());
        assert!(parse_secret_key("00").is_err());
        // All-zero is not a valid scalar.
        assert!(parse_secret_key(&"00".repeat(32)).is_err());
    }
}
