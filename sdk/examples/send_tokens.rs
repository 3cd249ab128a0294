// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::env;

use anyhow::anyhow;

use rill_provider::coin::coins;
use rill_provider::http::HttpProvider;
use rill_sdk::network::{ADDRESS_PREFIX, NATIVE_DENOM, TESTNET_API_URL};
use rill_sdk::SigningClient;
use rill_signer::Wallet;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(anyhow!("usage: send_tokens <hex private key> <recipient> [amount]"));
    }
    let recipient = &args[2];
    let amount: u128 = match args.get(3) {
        Some(raw) => raw.parse()?,
        None => 1_000_000,
    };

    // Setup local wallet using private key from arg
    let signer = Wallet::from_hex(&args[1], ADDRESS_PREFIX)?;

    // Sign and broadcast against the testnet REST endpoint
    let provider = HttpProvider::new(TESTNET_API_URL)?;
    let client = SigningClient::new(provider, signer)?;

    let result = client
        .send_tokens(recipient, coins(amount, NATIVE_DENOM), "sent with rill_sdk")
        .await?;
    println!(
        "Sent {amount}{NATIVE_DENOM} to {recipient} at height {}; transaction hash: {}",
        result.height, result.transaction_hash
    );

    Ok(())
}
