// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use async_trait::async_trait;

use rill_provider::signdoc::StdSignDoc;

use crate::signer::{AminoSignResponse, OfflineSigner, SignerError};

/// A signer with an address but no key. Useful where an API demands a
/// signer and only read paths will run.
#[derive(Clone, Debug)]
pub struct Void {
    address: String,
}

impl Void {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
        }
    }
}

#[async_trait]
impl OfflineSigner for Void {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_amino(
        &self,
        _signer_address: &str,
        _sign_doc: StdSignDoc,
    ) -> Result<AminoSignResponse, SignerError> {
        Err(SignerError::Rejected(
            "void signer cannot sign documents".to_string(),
        ))
    }
}
