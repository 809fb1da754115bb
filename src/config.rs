//! Configuration loaded from the environment
//!
//! Reads an optional `.env` file, then environment variables. Every address is
//! validated (and bech32 forms converted to hex) at load time so a bad value
//! fails before any calldata is built.

use std::env;
use std::path::Path;

use eyre::{eyre, Result, WrapErr};

use crate::address::normalize_address;
use crate::builders::DEFAULT_STAKE_DENOM;

/// Sepolia
pub const DEFAULT_BRIDGE_DEST_CHAIN_ID: u64 = 11155111;

pub const DEFAULT_GAS_LIMIT: u64 = 1_500_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Wallet used as delegator, claimer and voter
    pub wallet_address: Option<String>,
    pub bridge_contract: Option<String>,
    pub staking_contract: Option<String>,
    pub governance_contract: Option<String>,
    pub stake_denom: String,
    pub bridge_dest_chain_id: u64,
    pub gas_limit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wallet_address: None,
            bridge_contract: None,
            staking_contract: None,
            governance_contract: None,
            stake_denom: DEFAULT_STAKE_DENOM.to_string(),
            bridge_dest_chain_id: DEFAULT_BRIDGE_DEST_CHAIN_ID,
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    /// Loads .env file if present, then reads from environment
    pub fn load() -> Result<Self> {
        Self::load_from_file(".env")
    }

    /// Load from a specific .env file path
    pub fn load_from_file(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            dotenvy::from_filename(path)
                .wrap_err_with(|| format!("Failed to load .env file from {}", path))?;
        }
        Self::load_from_env()
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let address = |key: &str| -> Result<Option<String>> {
            get(key)
                .map(|raw| {
                    normalize_address(raw.trim())
                        .map_err(|e| eyre!("{} is not a valid address: {}", key, e))
                })
                .transpose()
        };

        let number = |key: &str, default: u64| -> Result<u64> {
            match get(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .wrap_err_with(|| format!("{} must be a valid u64", key)),
                None => Ok(default),
            }
        };

        let config = Config {
            wallet_address: address("WALLET_ADDRESS")?,
            bridge_contract: address("BRIDGE_CONTRACT")?,
            staking_contract: address("STAKING_CONTRACT")?,
            governance_contract: address("GOVERNANCE_CONTRACT")?,
            stake_denom: get("STAKE_DENOM").unwrap_or_else(|| DEFAULT_STAKE_DENOM.to_string()),
            bridge_dest_chain_id: number("BRIDGE_DEST_CHAIN_ID", DEFAULT_BRIDGE_DEST_CHAIN_ID)?,
            gas_limit: number("GAS_LIMIT", DEFAULT_GAS_LIMIT)?,
        };

        if config.bridge_dest_chain_id == 0 {
            return Err(eyre!("BRIDGE_DEST_CHAIN_ID must be positive"));
        }

        tracing::debug!(
            wallet = ?config.wallet_address,
            dest_chain_id = config.bridge_dest_chain_id,
            denom = %config.stake_denom,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// The wallet, or an error naming the variable to set
    pub fn require_wallet(&self) -> Result<&str> {
        self.wallet_address
            .as_deref()
            .ok_or_else(|| eyre!("WALLET_ADDRESS is required (or pass an explicit address)"))
    }
}
