// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! End-to-end signing and broadcasting against the in-memory mock ledger.

use std::collections::BTreeMap;

use rill_provider::coin::{coin, coins};
use rill_provider::error::ProviderError;
use rill_provider::mock::MockLedger;
use rill_provider::msg::{Msg, MsgSend};
use rill_provider::query::{SearchTxFilter, SearchTxQuery};
use rill_provider::tx::BroadcastMode;
use rill_provider::QueryProvider;
use rill_sdk::network::{ADDRESS_PREFIX, TESTNET_CHAIN_ID};
use rill_sdk::{ClientError, SigningClient, SigningOptions};
use rill_signer::{OfflineSigner, Wallet};

fn ledger() -> MockLedger {
    MockLedger::new(TESTNET_CHAIN_ID, ADDRESS_PREFIX)
}

fn funded_client(ledger: &MockLedger) -> SigningClient<&MockLedger, Wallet> {
    let wallet = Wallet::random(ADDRESS_PREFIX).unwrap();
    ledger
        .seed_account(wallet.address(), 42, 3, coins(100, "atom"))
        .unwrap();
    SigningClient::new(ledger, wallet).unwrap()
}

#[tokio::test]
async fn sends_tokens_end_to_end() {
    let ledger = ledger();
    let client = funded_client(&ledger);
    let recipient = "rill1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu";

    let result = client
        .send_tokens(recipient, coins(10, "atom"), "thanks")
        .await
        .unwrap();
    assert!(result.height > 0);
    assert!(!result.transaction_hash.is_empty());

    let broadcasts = ledger.broadcasts().unwrap();
    assert_eq!(broadcasts.len(), 1);
    let recorded = &broadcasts[0];
    // Accepted at the sequence the account was seeded with.
    assert_eq!(recorded.sequence, 3);
    assert_eq!(recorded.code, 0);
    assert_eq!(recorded.tx.memo, "thanks");
    assert_eq!(recorded.tx.signatures.len(), 1);
    assert_eq!(recorded.tx.msg.len(), 1);
    match &recorded.tx.msg[0] {
        Msg::Send(send) => {
            assert_eq!(send.from_address, client.signer_address());
            assert_eq!(send.to_address, recipient);
            assert_eq!(send.amount, coins(10, "atom"));
        }
        other => panic!("unexpected message: {other:?}"),
    }
    // Default fee: 0.025urill/gas at the 80k send limit.
    assert_eq!(recorded.tx.fee.amount, coins(2000, "urill"));
    assert_eq!(recorded.tx.fee.gas, "80000");

    // Funds moved, and the recipient account came into existence.
    let sender = client.get_account(None).await.unwrap().unwrap();
    assert_eq!(sender.balance, coins(90, "atom"));
    let received = client.get_account(Some(recipient)).await.unwrap().unwrap();
    assert_eq!(received.balance, coins(10, "atom"));

    // The next signing observes the consumed nonce.
    let info = client.get_sequence(None).await.unwrap();
    assert_eq!(info.account_number, 42);
    assert_eq!(info.sequence, 4);
    client
        .send_tokens(recipient, coins(5, "atom"), "")
        .await
        .unwrap();
    assert_eq!(ledger.broadcasts().unwrap()[1].sequence, 4);
}

#[tokio::test]
async fn custom_gas_price_and_limits_shape_the_fee() {
    let ledger = ledger();
    let wallet = Wallet::random(ADDRESS_PREFIX).unwrap();
    ledger
        .seed_account(wallet.address(), 1, 0, coins(50, "atom"))
        .unwrap();
    let options = SigningOptions {
        gas_price: "0.05urill".parse().unwrap(),
        gas_limits: BTreeMap::from([("send".to_string(), 120_000u64)]),
        broadcast_mode: BroadcastMode::Block,
    };
    let client = SigningClient::with_options(&ledger, wallet, options).unwrap();

    client
        .send_tokens("rill1recipient", coins(1, "atom"), "")
        .await
        .unwrap();
    let recorded = &ledger.broadcasts().unwrap()[0];
    assert_eq!(recorded.tx.fee.amount, coins(6000, "urill"));
    assert_eq!(recorded.tx.fee.gas, "120000");
}

#[tokio::test]
async fn sync_mode_returns_before_inclusion() {
    let ledger = ledger();
    let wallet = Wallet::random(ADDRESS_PREFIX).unwrap();
    ledger
        .seed_account(wallet.address(), 1, 0, coins(50, "atom"))
        .unwrap();
    let options = SigningOptions {
        broadcast_mode: BroadcastMode::Sync,
        ..SigningOptions::default()
    };
    let client = SigningClient::with_options(&ledger, wallet, options).unwrap();

    let result = client
        .send_tokens("rill1recipient", coins(1, "atom"), "")
        .await
        .unwrap();
    assert_eq!(result.height, 0);
    // The mock still committed it.
    assert_eq!(ledger.broadcasts().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_accounts_query_as_absent() {
    let ledger = ledger();
    let wallet = Wallet::random(ADDRESS_PREFIX).unwrap();
    let client = SigningClient::new(&ledger, wallet).unwrap();

    assert!(client.get_account(None).await.unwrap().is_none());
    let err = client.get_sequence(None).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Provider(ProviderError::AccountNotFound { .. })
    ));
}

#[tokio::test]
async fn appends_a_signature_at_an_unchanged_sequence() {
    let ledger = ledger();
    let client = funded_client(&ledger);
    let fee = client.fees().get("send").cloned().unwrap();
    let msgs = vec![Msg::Send(MsgSend {
        amount: coins(10, "atom"),
        from_address: client.signer_address().to_string(),
        to_address: "rill1recipient".to_string(),
    })];

    let tx = client.sign(msgs, fee, "").await.unwrap();
    let extended = client.append_signature(&tx).await.unwrap();
    assert_eq!(extended.signatures.len(), 2);
    assert_eq!(extended.signatures[0], tx.signatures[0]);
    // The input transaction is untouched.
    assert_eq!(tx.signatures.len(), 1);
}

#[tokio::test]
async fn a_second_signer_can_append_its_signature() {
    let ledger = ledger();
    let first = funded_client(&ledger);
    let second_wallet = Wallet::random(ADDRESS_PREFIX).unwrap();
    // Different account number and sequence than the first signer.
    ledger
        .seed_account(second_wallet.address(), 7, 0, vec![])
        .unwrap();
    let second = SigningClient::new(&ledger, second_wallet).unwrap();

    let fee = first.fees().get("send").cloned().unwrap();
    let msgs = vec![Msg::Send(MsgSend {
        amount: coins(10, "atom"),
        from_address: first.signer_address().to_string(),
        to_address: "rill1recipient".to_string(),
    })];
    let tx = first.sign(msgs, fee, "").await.unwrap();

    let extended = second.append_signature(&tx).await.unwrap();
    assert_eq!(extended.signatures.len(), 2);
    assert_eq!(extended.signatures[0], tx.signatures[0]);
    assert_eq!(tx.signatures.len(), 1);

    // The ledger accepts both signatures and consumes both nonces.
    let result = second.broadcast_tx(&extended).await.unwrap();
    assert!(result.height > 0);
    assert_eq!(first.get_sequence(None).await.unwrap().sequence, 4);
    assert_eq!(second.get_sequence(None).await.unwrap().sequence, 1);
}

#[tokio::test]
async fn a_second_signer_cannot_append_over_a_stale_signature() {
    let ledger = ledger();
    let first = funded_client(&ledger);
    let second_wallet = Wallet::random(ADDRESS_PREFIX).unwrap();
    ledger
        .seed_account(second_wallet.address(), 7, 0, vec![])
        .unwrap();
    let second = SigningClient::new(&ledger, second_wallet).unwrap();

    let fee = first.fees().get("send").cloned().unwrap();
    let msgs = vec![Msg::Send(MsgSend {
        amount: coins(10, "atom"),
        from_address: first.signer_address().to_string(),
        to_address: "rill1recipient".to_string(),
    })];
    let tx = first.sign(msgs, fee, "").await.unwrap();

    // The first signer's nonce moved after it signed.
    ledger.advance_sequence(first.signer_address()).unwrap();

    let err = second.append_signature(&tx).await.unwrap_err();
    assert!(matches!(err, ClientError::SignatureMismatch));
    assert_eq!(tx.signatures.len(), 1);
}

#[tokio::test]
async fn append_fails_after_the_sequence_advanced() {
    let ledger = ledger();
    let client = funded_client(&ledger);
    let fee = client.fees().get("send").cloned().unwrap();
    let msgs = vec![Msg::Send(MsgSend {
        amount: coins(10, "atom"),
        from_address: client.signer_address().to_string(),
        to_address: "rill1recipient".to_string(),
    })];
    let tx = client.sign(msgs, fee, "").await.unwrap();

    // Another client broadcast for this address in the meantime.
    ledger.advance_sequence(client.signer_address()).unwrap();

    let err = client.append_signature(&tx).await.unwrap_err();
    assert!(matches!(err, ClientError::SignatureMismatch));
    assert_eq!(tx.signatures.len(), 1);
}

#[tokio::test]
async fn stale_transactions_are_rejected_by_checks() {
    let ledger = ledger();
    let client = funded_client(&ledger);
    let fee = client.fees().get("send").cloned().unwrap();
    let msgs = vec![Msg::Send(MsgSend {
        amount: coins(10, "atom"),
        from_address: client.signer_address().to_string(),
        to_address: "rill1recipient".to_string(),
    })];

    // Signed at sequence 3, then the nonce is consumed by another send.
    let stale = client.sign(msgs, fee, "").await.unwrap();
    client
        .send_tokens("rill1recipient", coins(1, "atom"), "")
        .await
        .unwrap();

    let err = client.broadcast_tx(&stale).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Provider(ProviderError::BroadcastCheckFailed { code: 4, .. })
    ));
    // A rejected transaction consumes nothing.
    assert_eq!(client.get_sequence(None).await.unwrap().sequence, 4);
    assert_eq!(ledger.broadcasts().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_denominations_count_against_one_balance() {
    let ledger = ledger();
    let client = funded_client(&ledger);
    let fee = client.fees().get("send").cloned().unwrap();

    // 60 + 60 atom against 100 held: together they overdraw.
    let msgs = vec![Msg::Send(MsgSend {
        amount: vec![coin(60, "atom"), coin(60, "atom")],
        from_address: client.signer_address().to_string(),
        to_address: "rill1recipient".to_string(),
    })];
    let err = client.sign_and_broadcast(msgs, fee.clone(), "").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Provider(ProviderError::BroadcastDeliverFailed { code: 5, .. })
    ));
    let account = client.get_account(None).await.unwrap().unwrap();
    assert_eq!(account.balance, coins(100, "atom"));

    // 40 + 40 fits and moves as a single 80.
    let msgs = vec![Msg::Send(MsgSend {
        amount: vec![coin(40, "atom"), coin(40, "atom")],
        from_address: client.signer_address().to_string(),
        to_address: "rill1recipient".to_string(),
    })];
    client.sign_and_broadcast(msgs, fee, "").await.unwrap();
    let account = client.get_account(None).await.unwrap().unwrap();
    assert_eq!(account.balance, coins(20, "atom"));
    let received = client
        .get_account(Some("rill1recipient"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(received.balance, coins(80, "atom"));
}

#[tokio::test]
async fn failed_delivery_still_consumes_the_nonce() {
    let ledger = ledger();
    let client = funded_client(&ledger);

    let err = client
        .send_tokens("rill1recipient", coins(1000, "atom"), "")
        .await
        .unwrap_err();
    match err {
        ClientError::Provider(ProviderError::BroadcastDeliverFailed {
            code, height, log, ..
        }) => {
            assert_eq!(code, 5);
            assert!(height > 0);
            assert!(log.contains("insufficient funds"));
        }
        other => panic!("unexpected: {other}"),
    }

    // Included but failed: the sequence moved on and the balance did not.
    assert_eq!(client.get_sequence(None).await.unwrap().sequence, 4);
    let account = client.get_account(None).await.unwrap().unwrap();
    assert_eq!(account.balance, coins(100, "atom"));
}

#[tokio::test]
async fn committed_transactions_are_searchable() {
    let ledger = ledger();
    let client = funded_client(&ledger);
    let recipient = "rill1recipient";

    let result = client
        .send_tokens(recipient, coins(10, "atom"), "")
        .await
        .unwrap();

    let by_recipient = ledger
        .search_txs(
            SearchTxQuery::SentFromOrTo(recipient.to_string()),
            SearchTxFilter::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_recipient.len(), 1);
    assert_eq!(by_recipient[0].hash, result.transaction_hash);
    assert_eq!(by_recipient[0].code, 0);

    let by_id = ledger
        .search_txs(
            SearchTxQuery::Id(result.transaction_hash.clone()),
            SearchTxFilter::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_id.len(), 1);

    // Out of the height window.
    let none = ledger
        .search_txs(
            SearchTxQuery::SentFromOrTo(recipient.to_string()),
            SearchTxFilter {
                min_height: Some(result.height + 1),
                max_height: None,
            },
        )
        .await
        .unwrap();
    assert!(none.is_empty());

    // The mock indexes no tag events.
    let tags = ledger
        .search_txs(
            SearchTxQuery::Tags(vec![("message.action".to_string(), "send".to_string())]),
            SearchTxFilter::default(),
        )
        .await
        .unwrap();
    assert!(tags.is_empty());

    let block = ledger.block(Some(result.height)).await.unwrap();
    assert_eq!(block.header.height, result.height);
    assert_eq!(block.header.chain_id, TESTNET_CHAIN_ID);
    assert_eq!(block.txs.len(), 1);
}
