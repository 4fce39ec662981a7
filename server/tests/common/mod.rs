//! In-process ledger node used by the integration tests.
#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use anyhow::anyhow;
use async_trait::async_trait;
use burn_relay::chain::{
    ContractTarget, InputPolicy, LedgerNode, Relayer, SigningIdentity, TxParams,
};
use ethers::{
    types::{Address, Bytes, H256, U256},
    utils::keccak256,
};

/// Secret key 1 and its address.
pub const DEV_KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";
pub const DEV_ADDRESS: &str = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf";

pub const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

pub const EMIT_BURN_ABI: &str = r#"[{"type":"function","name":"emitBurn","inputs":[{"name":"ephemeralPublicKey","type":"bytes32"},{"name":"burnAddress","type":"address"}],"outputs":[],"stateMutability":"nonpayable"}]"#;

#[derive(Default)]
pub struct StubNode {
    pub nonce: Mutex<u64>,
    pub gas_price: U256,
    pub fail_nonce: bool,
    pub fail_gas_price: bool,
    pub fail_send: bool,
    /// Returned from `send_raw_transaction`; defaults to the keccak of the raw tx.
    pub canned_hash: Option<H256>,
    pub nonce_calls: AtomicUsize,
    pub gas_price_calls: AtomicUsize,
    pub send_calls: AtomicUsize,
    pub sent: Mutex<Vec<Bytes>>,
}

impl StubNode {
    pub fn with_nonce(nonce: u64) -> Self {
        Self {
            nonce: Mutex::new(nonce),
            gas_price: U256::from(1_000_000_000u64),
            ..Default::default()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.nonce_calls.load(Ordering::SeqCst)
            + self.gas_price_calls.load(Ordering::SeqCst)
            + self.send_calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Bytes> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerNode for StubNode {
    async fn pending_nonce(&self, _address: Address) -> anyhow::Result<U256> {
        self.nonce_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_nonce {
            return Err(anyhow!("connection refused"));
        }
        let nonce = *self.nonce.lock().unwrap();
        // Give a concurrent caller the chance to read the same nonce.
        tokio::task::yield_now().await;
        Ok(U256::from(nonce))
    }

    async fn gas_price(&self) -> anyhow::Result<U256> {
        self.gas_price_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_gas_price {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.gas_price)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> anyhow::Result<H256> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_send {
            return Err(anyhow!("nonce too low"));
        }
        let hash = self
            .canned_hash
            .unwrap_or_else(|| H256::from(keccak256(&raw)));
        self.sent.lock().unwrap().push(raw);
        *self.nonce.lock().unwrap() += 1;
        Ok(hash)
    }
}

pub fn target() -> ContractTarget {
    ContractTarget::from_json_abi(CONTRACT.parse().unwrap(), EMIT_BURN_ABI).unwrap()
}

pub fn relayer(node: Arc<StubNode>) -> Relayer {
    relayer_with(node, target(), InputPolicy::ZeroFill)
}

pub fn relayer_with(node: Arc<StubNode>, target: ContractTarget, policy: InputPolicy) -> Relayer {
    Relayer::new(
        node,
        SigningIdentity::from_hex(DEV_KEY).unwrap(),
        target,
        TxParams::default(),
        policy,
    )
}
