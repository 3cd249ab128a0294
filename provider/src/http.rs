// Copyright 2026 Rill Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::ProviderError;
use crate::provider::{Provider, QueryProvider, TxProvider};
use crate::query::{Block, IndexedTx, SearchTxFilter, SearchTxQuery};
use crate::response::{
    Account, AuthAccountsResponse, BlockResponse, BroadcastTxResponse, NodeInfoResponse,
    SearchTxsResponse,
};
use crate::tx::{interpret_broadcast, BroadcastMode, BroadcastTxResult};

/// A provider over the ledger's REST query daemon.
#[derive(Clone)]
pub struct HttpProvider {
    inner: reqwest::Client,
    base_url: Url,
}

impl HttpProvider {
    pub fn new(base_url: &str) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ProviderError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            inner: reqwest::Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, ProviderError> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {} to query the ledger daemon", url);
        let response = self
            .inner
            .get(url)
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, ProviderError> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {} to submit to the ledger daemon", url);
        let response = self
            .inner
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

impl Provider for HttpProvider {}

#[async_trait]
impl QueryProvider for HttpProvider {
    async fn account(&self, address: &str) -> Result<Option<Account>, ProviderError> {
        let response: AuthAccountsResponse = self
            .get(&format!("auth/accounts/{address}"), &[])
            .await?;
        // The daemon answers an empty account record instead of a 404 for
        // unknown addresses.
        if response.result.value.address.is_empty() {
            return Ok(None);
        }
        Ok(Some(response.result.value.into_account()?))
    }

    async fn chain_id(&self) -> Result<String, ProviderError> {
        let response: NodeInfoResponse = self.get("node_info", &[]).await?;
        if response.node_info.network.is_empty() {
            return Err(ProviderError::BadResponse(
                "node reported an empty chain id".into(),
            ));
        }
        Ok(response.node_info.network)
    }

    async fn block(&self, height: Option<u64>) -> Result<Block, ProviderError> {
        let path = match height {
            Some(h) => format!("blocks/{h}"),
            None => "blocks/latest".to_string(),
        };
        let response: BlockResponse = self.get(&path, &[]).await?;
        response.into_block()
    }

    async fn search_txs(
        &self,
        query: SearchTxQuery,
        filter: SearchTxFilter,
    ) -> Result<Vec<IndexedTx>, ProviderError> {
        let mut params = query.to_params();
        if let Some(min) = filter.min_height {
            params.push(("tx.minheight".to_string(), min.to_string()));
        }
        if let Some(max) = filter.max_height {
            params.push(("tx.maxheight".to_string(), max.to_string()));
        }

        // The daemon pages results; walk every page.
        let mut txs = Vec::new();
        let mut page = 1u64;
        loop {
            let mut paged = params.clone();
            paged.push(("page".to_string(), page.to_string()));
            let response: SearchTxsResponse = self.get("txs", &paged).await?;
            for tx in response.txs {
                txs.push(tx.into_indexed_tx()?);
            }
            let page_total = crate::response::parse_u64(&response.page_total, "page_total")?;
            if page >= page_total {
                break;
            }
            page += 1;
        }
        Ok(txs)
    }
}

#[async_trait]
impl TxProvider for HttpProvider {
    async fn broadcast_raw_tx(
        &self,
        tx_bytes: &[u8],
        mode: BroadcastMode,
    ) -> Result<BroadcastTxResult, ProviderError> {
        let tx: Value = serde_json::from_slice(tx_bytes)?;
        let body = json!({ "tx": tx, "mode": mode.as_str() });
        let response: BroadcastTxResponse = self.post("txs", &body).await?;
        interpret_broadcast(response, mode)
    }
}
