//! The remote ledger node the relayer talks to.

use anyhow::Context;
use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Address, BlockId, BlockNumber, Bytes, H256, U256},
};
use url::Url;

/// The three node calls a relay needs. Anything that can answer them can
/// stand in for a real JSON-RPC endpoint.
#[async_trait]
pub trait LedgerNode: Send + Sync {
    /// Transaction count of `address` including the node's pending pool.
    async fn pending_nonce(&self, address: Address) -> anyhow::Result<U256>;

    async fn gas_price(&self) -> anyhow::Result<U256>;

    /// Broadcast an RLP-encoded signed transaction and return its hash.
    async fn send_raw_transaction(&self, raw: Bytes) -> anyhow::Result<H256>;
}

/// JSON-RPC node reached over HTTP.
#[derive(Debug, Clone)]
pub struct RpcNode {
    provider: Provider<Http>,
}

impl RpcNode {
    pub fn new(url: Url) -> Self {
        Self {
            provider: Provider::new(Http::new(url)),
        }
    }
}

#[async_trait]
impl LedgerNode for RpcNode {
    async fn pending_nonce(&self, address: Address) -> anyhow::Result<U256> {
        self.provider
            .get_transaction_count(address, Some(BlockId::Number(BlockNumber::Pending)))
            .await
            .context("eth_getTransactionCount")
    }

    async fn gas_price(&self) -> anyhow::Result<U256> {
        self.provider.get_gas_price().await.context("eth_gasPrice")
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> anyhow::Result<H256> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .context("eth_sendRawTransaction")?;
        Ok(pending.tx_hash())
    }
}
