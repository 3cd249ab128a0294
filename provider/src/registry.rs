// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::ProviderError;
use crate::msg::{MsgDelegate, MsgExecuteContract, MsgSend};

/// A message of a kind not necessarily known at compile time, addressed by
/// its type URL.
#[derive(Clone, Debug, PartialEq)]
pub struct AnyMsg {
    pub type_url: String,
    pub value: Value,
}

type EncodeFn = fn(&Value) -> Result<Vec<u8>, ProviderError>;
type DecodeFn = fn(&[u8]) -> Result<Value, ProviderError>;

/// Encode/decode function pair for one type URL. Plain data, registered at
/// startup; no reflection and no registration side effects on load.
#[derive(Clone, Copy)]
pub struct MsgCodec {
    pub encode: EncodeFn,
    pub decode: DecodeFn,
}

/// Maps type URLs to codecs. Initialization is explicit: construct with
/// [`Registry::standard`] for the built-in message kinds and call
/// [`Registry::register`] for ledger-defined extensions. Registering the
/// same type URL twice is an error rather than a silent overwrite.
#[derive(Clone, Default)]
pub struct Registry {
    codecs: HashMap<String, MsgCodec>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in message kinds registered.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        // Infallible: the map starts empty and the built-in tags are distinct.
        let entries: [(&str, MsgCodec); 3] = [
            (MsgSend::TYPE_URL, typed_codec::<MsgSend>()),
            (MsgDelegate::TYPE_URL, typed_codec::<MsgDelegate>()),
            (
                MsgExecuteContract::TYPE_URL,
                typed_codec::<MsgExecuteContract>(),
            ),
        ];
        for (type_url, codec) in entries {
            registry.codecs.insert(type_url.to_string(), codec);
        }
        registry
    }

    pub fn register(&mut self, type_url: &str, codec: MsgCodec) -> Result<(), ProviderError> {
        if self.codecs.contains_key(type_url) {
            return Err(ProviderError::DuplicateTypeUrl {
                type_url: type_url.to_string(),
            });
        }
        self.codecs.insert(type_url.to_string(), codec);
        Ok(())
    }

    pub fn contains(&self, type_url: &str) -> bool {
        self.codecs.contains_key(type_url)
    }

    /// Encode a message to its canonical wire bytes.
    pub fn encode(&self, msg: &AnyMsg) -> Result<Vec<u8>, ProviderError> {
        let codec = self.lookup(&msg.type_url)?;
        (codec.encode)(&msg.value)
    }

    /// Decode wire bytes back into a message of the given kind.
    pub fn decode(&self, type_url: &str, bytes: &[u8]) -> Result<AnyMsg, ProviderError> {
        let codec = self.lookup(type_url)?;
        Ok(AnyMsg {
            type_url: type_url.to_string(),
            value: (codec.decode)(bytes)?,
        })
    }

    fn lookup(&self, type_url: &str) -> Result<&MsgCodec, ProviderError> {
        self.codecs
            .get(type_url)
            .ok_or_else(|| ProviderError::UnknownTypeUrl {
                type_url: type_url.to_string(),
            })
    }
}

/// A codec that validates values against the schema of `T` on both paths.
pub fn typed_codec<T>() -> MsgCodec
where
    T: Serialize + DeserializeOwned,
{
    MsgCodec {
        encode: encode_as::<T>,
        decode: decode_as::<T>,
    }
}

/// A codec for kinds with no compiled-in schema: canonical JSON bytes of the
/// value as given.
pub fn raw_codec() -> MsgCodec {
    MsgCodec {
        encode: encode_raw,
        decode: decode_raw,
    }
}

fn encode_as<T>(value: &Value) -> Result<Vec<u8>, ProviderError>
where
    T: Serialize + DeserializeOwned,
{
    let typed: T = serde_json::from_value(value.clone())?;
    canonical_bytes(&typed)
}

fn decode_as<T>(bytes: &[u8]) -> Result<Value, ProviderError>
where
    T: Serialize + DeserializeOwned,
{
    let typed: T = serde_json::from_slice(bytes)?;
    Ok(serde_json::to_value(typed)?)
}

fn encode_raw(value: &Value) -> Result<Vec<u8>, ProviderError> {
    canonical_bytes(value)
}

fn decode_raw(bytes: &[u8]) -> Result<Value, ProviderError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, ProviderError> {
    // Passing through Value sorts object keys.
    Ok(serde_json::to_value(value)?.to_string().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::coins;
    use serde_json::json;

    fn send_value() -> Value {
        json!({
            "amount": [{"amount": "10", "denom": "atom"}],
            "from_address": "rill1sender",
            "to_address": "rill1recipient",
        })
    }

    #[test]
    fn round_trips_every_builtin_kind() {
        let registry = Registry::standard();
        let msgs = [
            AnyMsg {
                type_url: MsgSend::TYPE_URL.into(),
                value: send_value(),
            },
            AnyMsg {
                type_url: MsgDelegate::TYPE_URL.into(),
                value: json!({
                    "amount": {"amount": "7", "denom": "atom"},
                    "delegator_address": "rill1d",
                    "validator_address": "rillvaloper1v",
                }),
            },
            AnyMsg {
                type_url: MsgExecuteContract::TYPE_URL.into(),
                value: json!({
                    "contract": "rill1contract",
                    "msg": {"release": {"depth": 2}},
                    "sender": "rill1sender",
                    "sent_funds": coins(1, "atom"),
                }),
            },
        ];
        for msg in msgs {
            let bytes = registry.encode(&msg).unwrap();
            let back = registry.decode(&msg.type_url, &bytes).unwrap();
            assert_eq!(back, msg);
        }
    }

    #[test]
    fn unknown_type_url_fails() {
        let registry = Registry::standard();
        let err = registry
            .decode("rill/MsgUnheardOf", b"{}")
            .expect_err("decoded an unregistered kind");
        assert!(matches!(err, ProviderError::UnknownTypeUrl { .. }));
    }

    #[test]
    fn duplicate_registration_fails_loudly() {
        let mut registry = Registry::standard();
        let err = registry
            .register(MsgSend::TYPE_URL, raw_codec())
            .expect_err("overwrote an existing registration");
        assert!(matches!(err, ProviderError::DuplicateTypeUrl { .. }));
        // The extension point itself works.
        registry.register("rill/MsgCustom", raw_codec()).unwrap();
        assert!(registry.contains("rill/MsgCustom"));
    }

    #[test]
    fn encode_validates_against_schema() {
        let registry = Registry::standard();
        let err = registry.encode(&AnyMsg {
            type_url: MsgSend::TYPE_URL.into(),
            value: json!({"nonsense": true}),
        });
        assert!(err.is_err());
    }
}
