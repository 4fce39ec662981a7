//! Runtime configuration for the burn relay.

use std::env;

use ethers::types::Address;
use thiserror::Error;
use url::Url;

use crate::chain::{
    relay::{DEFAULT_CHAIN_ID, DEFAULT_GAS_LIMIT, EMIT_BURN},
    ContractTarget, InputPolicy, SigningIdentity, TxParams,
};

const DEFAULT_RPC: &str = "https://sepolia.infura.io/v3/YOUR_INFURA_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

fn invalid(key: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_string(),
    }
}

/// Validated startup configuration. Nothing here changes while the process runs.
#[derive(Debug)]
pub struct Settings {
    /// Address the HTTP server binds to.
    pub server_addr: String,
    pub ethereum_rpc: Url,
    pub identity: SigningIdentity,
    pub contract: ContractTarget,
    pub tx_params: TxParams,
    pub input_policy: InputPolicy,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key → value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let server_addr = get("SERVER_ADDR").unwrap_or_else(|| {
            let port = get("PORT").unwrap_or_else(|| "8080".into());
            format!("0.0.0.0:{port}")
        });

        let rpc = get("ETHEREUM_RPC").unwrap_or_else(|| DEFAULT_RPC.into());
        let ethereum_rpc = Url::parse(&rpc).map_err(|e| invalid("ETHEREUM_RPC", e))?;

        let contract_address = require("CONTRACT_ADDRESS")?;
        let private_key = require("PRIVATE_KEY")?;
        let contract_abi = require("CONTRACT_ABI")?;

        let address = contract_address
            .parse::<Address>()
            .map_err(|e| invalid("CONTRACT_ADDRESS", e))?;
        let contract = ContractTarget::from_json_abi(address, &contract_abi)
            .map_err(|e| invalid("CONTRACT_ABI", e))?;
        if contract.abi.function(EMIT_BURN).is_err() {
            return Err(invalid("CONTRACT_ABI", format!("no `{EMIT_BURN}` function")));
        }

        let identity = SigningIdentity::from_hex(&private_key)
            .map_err(|e| invalid("PRIVATE_KEY", e))?;

        // Unset falls back to the default; set but unparsable halts startup.
        let parse_u64 = |key: &'static str, default: u64| match get(key) {
            Some(v) => v.parse::<u64>().map_err(|e| invalid(key, e)),
            None => Ok(default),
        };
        let chain_id = parse_u64("CHAIN_ID", DEFAULT_CHAIN_ID)?;
        let gas_limit = parse_u64("GAS_LIMIT", DEFAULT_GAS_LIMIT)?;

        let input_policy = match get("STRICT_INPUT").as_deref() {
            Some("1" | "true" | "yes") => InputPolicy::Strict,
            _ => InputPolicy::ZeroFill,
        };

        Ok(Settings {
            server_addr,
            ethereum_rpc,
            identity,
            contract,
            tx_params: TxParams {
                chain_id,
                gas_limit,
            },
            input_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const ABI: &str = r#"[{"type":"function","name":"emitBurn","inputs":[{"name":"ephemeralPublicKey","type":"bytes32"},{"name":"burnAddress","type":"address"}],"outputs":[],"stateMutability":"nonpayable"}]"#;
    const KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    fn base() -> HashMap<&'static str, String> {
        HashMap::from([
            ("CONTRACT_ADDRESS", "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string()),
            ("PRIVATE_KEY", KEY.to_string()),
            ("CONTRACT_ABI", ABI.to_string()),
        ])
    }

    fn load(vars: &HashMap<&'static str, String>) -> Result<Settings, ConfigError> {
        Settings::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply() {
        let s = load(&base()).unwrap();
        assert_eq!(s.server_addr, "0.0.0.0:8080");
        assert_eq!(s.tx_params, TxParams::default());
        assert_eq!(s.input_policy, InputPolicy::ZeroFill);
        assert_eq!(s.ethereum_rpc.as_str(), DEFAULT_RPC);
    }

    #[test]
    fn required_fields_are_reported() {
        for key in ["CONTRACT_ADDRESS", "PRIVATE_KEY", "CONTRACT_ABI"] {
            let mut vars = base();
            vars.insert(key, String::new());
            match load(&vars) {
                Err(ConfigError::Missing(k)) => assert_eq!(k, key),
                other => panic!("expected missing {key}, got {other:?}"),
            }
        }
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = base();
        vars.insert("PORT", "9000".into());
        vars.insert("CHAIN_ID", "31337".into());
        vars.insert("GAS_LIMIT", "250000".into());
        vars.insert("STRICT_INPUT", "true".into());
        let s = load(&vars).unwrap();
        assert_eq!(s.server_addr, "0.0.0.0:9000");
        assert_eq!(s.tx_params.chain_id, 31337);
        assert_eq!(s.tx_params.gas_limit, 250_000);
        assert_eq!(s.input_policy, InputPolicy::Strict);
    }

    #[test]
    fn unparsable_chain_id_is_rejected() {
        let mut vars = base();
        vars.insert("CHAIN_ID", "31337x".into());
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "CHAIN_ID", .. })
        ));
    }

    #[test]
    fn unparsable_gas_limit_is_rejected() {
        let mut vars = base();
        vars.insert("GAS_LIMIT", "-5".into());
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "GAS_LIMIT", .. })
        ));
    }

    #[test]
    fn abi_without_emit_burn_is_rejected() {
        let mut vars = base();
        vars.insert("CONTRACT_ABI", "[]".into());
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "CONTRACT_ABI", .. })
        ));
    }
}
