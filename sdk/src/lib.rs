// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

mod client;
mod error;
pub mod gas;
pub mod network;
pub mod sequence;

pub use client::{SigningClient, SigningOptions};
pub use error::ClientError;
