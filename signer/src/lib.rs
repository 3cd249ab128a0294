// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod key;
mod signer;
mod void;
mod wallet;

pub use signer::{AminoSignResponse, OfflineSigner, SignerError};
pub use void::Void;
pub use wallet::Wallet;
