// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coin::Coin;

/// A transaction message, serialized in the ledger's tagged envelope
/// `{ "type": <tag>, "value": <fields> }`.
///
/// The union is closed over the operation kinds this client constructs;
/// ledger-defined kinds unknown at compile time travel through the codec
/// registry as [`crate::registry::AnyMsg`] instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Msg {
    #[serde(rename = "cosmos-sdk/MsgSend")]
    Send(MsgSend),
    #[serde(rename = "cosmos-sdk/MsgDelegate")]
    Delegate(MsgDelegate),
    #[serde(rename = "wasm/MsgExecuteContract")]
    ExecuteContract(MsgExecuteContract),
}

impl Msg {
    /// The tag the ledger dispatches on.
    pub fn type_url(&self) -> &'static str {
        match self {
            Msg::Send(_) => MsgSend::TYPE_URL,
            Msg::Delegate(_) => MsgDelegate::TYPE_URL,
            Msg::ExecuteContract(_) => MsgExecuteContract::TYPE_URL,
        }
    }
}

/// A bank transfer between two accounts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MsgSend {
    pub amount: Vec<Coin>,
    pub from_address: String,
    pub to_address: String,
}

impl MsgSend {
    pub const TYPE_URL: &'static str = "cosmos-sdk/MsgSend";
}

/// A staking delegation to a validator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MsgDelegate {
    pub amount: Coin,
    pub delegator_address: String,
    pub validator_address: String,
}

impl MsgDelegate {
    pub const TYPE_URL: &'static str = "cosmos-sdk/MsgDelegate";
}

/// Execution of a deployed contract with an arbitrary JSON payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MsgExecuteContract {
    pub contract: String,
    pub msg: Value,
    pub sender: String,
    pub sent_funds: Vec<Coin>,
}

impl MsgExecuteContract {
    pub const TYPE_URL: &'static str = "wasm/MsgExecuteContract";
}

impl From<MsgSend> for Msg {
    fn from(v: MsgSend) -> Self {
        Msg::Send(v)
    }
}

impl From<MsgDelegate> for Msg {
    fn from(v: MsgDelegate) -> Self {
        Msg::Delegate(v)
    }
}

impl From<MsgExecuteContract> for Msg {
    fn from(v: MsgExecuteContract) -> Self {
        Msg::ExecuteContract(v)
    }
}
