use std::sync::Arc;

use ethers::{
    abi::{Abi, Token},
    signers::{LocalWallet, Signer, WalletError},
    types::{
        transaction::eip2718::TypedTransaction, Address, Bytes, TransactionRequest, H256, U256,
    },
};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

use super::encoder::{parse_address, parse_bytes32, EncodeError, InputPolicy};
use super::node::LedgerNode;

/// Contract function every relay calls: `emitBurn(bytes32,address)`.
pub const EMIT_BURN: &str = "emitBurn";

/// Sepolia.
pub const DEFAULT_CHAIN_ID: u64 = 11_155_111;

/// Gas budget sized for one `emitBurn` call.
pub const DEFAULT_GAS_LIMIT: u64 = 100_000;

/// JSON body accepted by the relay endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnRequest {
    #[serde(default)]
    pub ephemeral_public_key: String,
    #[serde(default)]
    pub burn_address: String,
}

impl BurnRequest {
    pub fn is_complete(&self) -> bool {
        !self.ephemeral_public_key.is_empty() && !self.burn_address.is_empty()
    }
}

/// First failing step of a relay. Nothing local is mutated before the final
/// submission, so each variant is terminal for its call.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to get nonce: {0:#}")]
    NonceFetch(anyhow::Error),
    #[error("failed to get gas price: {0:#}")]
    GasPriceFetch(anyhow::Error),
    #[error("invalid input: {0}")]
    InvalidInput(#[from] EncodeError),
    #[error("failed to pack contract call: {0}")]
    Encoding(#[from] ethers::abi::Error),
    #[error("failed to sign transaction: {0}")]
    Signing(#[from] WalletError),
    #[error("failed to send transaction: {0:#}")]
    Submission(anyhow::Error),
}

impl RelayError {
    /// Short stable label, used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::NonceFetch(_) => "nonce_fetch",
            RelayError::GasPriceFetch(_) => "gas_price_fetch",
            RelayError::InvalidInput(_) => "invalid_input",
            RelayError::Encoding(_) => "encoding",
            RelayError::Signing(_) => "signing",
            RelayError::Submission(_) => "submission",
        }
    }
}

/// The relayer's private key and the address derived from it.
#[derive(Debug, Clone)]
pub struct SigningIdentity {
    wallet: LocalWallet,
}

impl SigningIdentity {
    /// Hex secp256k1 key, with or without `0x`.
    pub fn from_hex(key: &str) -> Result<Self, WalletError> {
        Ok(Self {
            wallet: key.parse::<LocalWallet>()?,
        })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

/// Deployed contract plus the interface used to pack calls to it.
#[derive(Debug, Clone)]
pub struct ContractTarget {
    pub address: Address,
    pub abi: Abi,
}

impl ContractTarget {
    pub fn from_json_abi(address: Address, abi_json: &str) -> serde_json::Result<Self> {
        Ok(Self {
            address,
            abi: serde_json::from_str(abi_json)?,
        })
    }
}

/// Fixed transaction parameters. Never inferred from the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxParams {
    pub chain_id: u64,
    pub gas_limit: u64,
}

impl Default for TxParams {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}

/// A signed, network-ready transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCall {
    pub raw: Bytes,
    pub hash: H256,
}

/// Builds, signs and submits `emitBurn` calls on behalf of callers.
///
/// Everything but the submission lock is immutable after construction, so a
/// single instance is shared by every HTTP worker.
pub struct Relayer {
    node: Arc<dyn LedgerNode>,
    identity: SigningIdentity,
    target: ContractTarget,
    params: TxParams,
    policy: InputPolicy,
    // Held from nonce fetch through submission.
    submit_lock: Mutex<()>,
}

impl Relayer {
    pub fn new(
        node: Arc<dyn LedgerNode>,
        identity: SigningIdentity,
        target: ContractTarget,
        params: TxParams,
        policy: InputPolicy,
    ) -> Self {
        Self {
            node,
            identity,
            target,
            params,
            policy,
            submit_lock: Mutex::new(()),
        }
    }

    pub fn sender(&self) -> Address {
        self.identity.address()
    }

    pub fn target(&self) -> &ContractTarget {
        &self.target
    }

    pub fn params(&self) -> TxParams {
        self.params
    }

    /// Relay one burn and return the node-reported transaction hash.
    pub async fn emit_burn(&self, req: &BurnRequest) -> Result<String, RelayError> {
        let from = self.identity.address();

        // Concurrent relays would otherwise observe the same pending nonce.
        // Node calls carry no timeout, so a hung call stalls every queued relay.
        let _guard = self.submit_lock.lock().await;

        let nonce = self
            .node
            .pending_nonce(from)
            .await
            .map_err(RelayError::NonceFetch)?;
        let gas_price = self
            .node
            .gas_price()
            .await
            .map_err(RelayError::GasPriceFetch)?;

        let payload = self.build_payload(&req.ephemeral_public_key, &req.burn_address)?;
        let signed = self.sign_call(nonce, gas_price, payload)?;

        log::debug!(
            "sending emitBurn from {from:?} nonce={nonce} gas_price={gas_price} hash={:#x}",
            signed.hash
        );

        let hash = self
            .node
            .send_raw_transaction(signed.raw)
            .await
            .map_err(RelayError::Submission)?;

        if hash != signed.hash {
            log::warn!(
                "node reported hash {hash:#x}, locally computed {:#x}",
                signed.hash
            );
        }
        log::info!("transaction sent with hash: {hash:#x}");
        Ok(format!("{hash:#x}"))
    }

    /// Pack `emitBurn(ephemeralPublicKey, burnAddress)` against the loaded ABI.
    pub fn build_payload(
        &self,
        ephemeral_public_key: &str,
        burn_address: &str,
    ) -> Result<Bytes, RelayError> {
        let key = parse_bytes32(ephemeral_public_key, self.policy)?;
        let burn = parse_address(burn_address, self.policy)?;

        let data = self
            .target
            .abi
            .function(EMIT_BURN)?
            .encode_input(&[Token::FixedBytes(key.to_vec()), Token::Address(burn)])?;

        log::info!(
            "packed emitBurn: ephemeralPublicKey=0x{}, burnAddress={burn:?}",
            hex::encode(key)
        );
        Ok(data.into())
    }

    /// Build and sign the legacy EIP-155 transaction for `payload`.
    ///
    /// Deterministic: identical inputs give identical bytes and hash.
    pub fn sign_call(
        &self,
        nonce: U256,
        gas_price: U256,
        payload: Bytes,
    ) -> Result<SignedCall, RelayError> {
        let tx: TypedTransaction = TransactionRequest::new()
            .from(self.identity.address())
            .to(self.target.address)
            .nonce(nonce)
            .gas_price(gas_price)
            .gas(self.params.gas_limit)
            .value(U256::zero())
            .data(payload)
            .chain_id(self.params.chain_id)
            .into();

        let signature = self
            .identity
            .wallet
            .clone()
            .with_chain_id(self.params.chain_id)
            .sign_transaction_sync(&tx)?;

        Ok(SignedCall {
            raw: tx.rlp_signed(&signature),
            hash: tx.hash(&signature),
        })
    }
}
