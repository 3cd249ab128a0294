// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod coin;
pub mod error;
pub mod http;
pub mod mock;
pub mod msg;
mod provider;
pub mod query;
pub mod registry;
pub mod response;
pub mod signdoc;
pub mod tx;
pub mod util;

pub use provider::*;
