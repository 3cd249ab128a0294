// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::env;

use anyhow::anyhow;

use rill_provider::http::HttpProvider;
use rill_provider::QueryProvider;
use rill_sdk::network::TESTNET_API_URL;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(anyhow!("missing account address"));
    }
    let address = &args[1];

    // Query the testnet REST endpoint
    let provider = HttpProvider::new(TESTNET_API_URL)?;

    match provider.account(address).await? {
        Some(account) => {
            println!("Account {} (number {})", account.address, account.account_number);
            println!("Sequence: {}", account.sequence);
            for coin in account.balance {
                println!("Balance: {}{}", coin.amount, coin.denom);
            }
        }
        None => println!("No on-chain record for {address}"),
    }

    Ok(())
}
