use anyhow::{Context, Result, bail};
use mint_types::ChainId;
use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "MINTR_ETHERSCAN_API_KEY";
pub const CONFIG_JSON_ENV: &str = "MINTR_CONFIG_JSON";

/// Fixed deployment parameters of the mint page.
///
/// Defaults describe the Rinkeby deployment. A JSON override document and the
/// Etherscan key are read from the environment, either at runtime or baked in
/// at build time for the browser bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MintConfig {
    pub contract_address: String,
    pub required_chain_id: String,
    pub network_name: String,
    pub capacity: u64,
    pub explorer_tx_base: String,
    pub marketplace_token_base: String,
    pub collection_base: String,
    pub etherscan_api_base: String,
    pub etherscan_api_key: Option<String>,
    /// Refuse to submit a mint while the wallet is on another network.
    /// Off by default: the mismatch is only reported.
    pub require_network_match: bool,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            contract_address: "0x6a1942C7402440B8Fb276f5E2dc017FF1a6EB9DC".to_owned(),
            required_chain_id: "0x4".to_owned(),
            network_name: "Rinkeby".to_owned(),
            capacity: 50,
            explorer_tx_base: "https://rinkeby.etherscan.io/tx/".to_owned(),
            marketplace_token_base: "https://rinkeby.rarible.com/token/".to_owned(),
            collection_base: "https://rinkeby.rarible.com/collection/".to_owned(),
            etherscan_api_base: "https://api-rinkeby.etherscan.io/api".to_owned(),
            etherscan_api_key: None,
            require_network_match: false,
        }
    }
}

fn env_or_baked(name: &str, baked: Option<&'static str>) -> Option<String> {
    std::env::var(name)
        .ok()
        .or_else(|| baked.map(ToOwned::to_owned))
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl MintConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_sources(
            env_or_baked(CONFIG_JSON_ENV, option_env!("MINTR_CONFIG_JSON")),
            env_or_baked(API_KEY_ENV, option_env!("MINTR_ETHERSCAN_API_KEY")),
        )
    }

    /// Defaults, overlaid by the optional document, then the optional key.
    fn from_sources(document: Option<String>, api_key: Option<String>) -> Result<Self> {
        let mut config = match document {
            Some(raw) => Self::from_json(&raw).with_context(|| format!("invalid {CONFIG_JSON_ENV}"))?,
            None => Self::default(),
        };
        if api_key.is_some() {
            config.etherscan_api_key = api_key;
        }
        Ok(config)
    }

    /// Parse an override document; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("failed to parse mint config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            bail!("capacity must be greater than 0");
        }
        let address = self.contract_address.trim();
        if address.len() != 42 || !address.starts_with("0x") {
            bail!("contract_address must be a 0x-prefixed 20-byte hex address");
        }
        if self.required_chain_id.trim().is_empty() {
            bail!("required_chain_id is required");
        }
        Ok(())
    }

    pub fn required_chain(&self) -> ChainId {
        ChainId(self.required_chain_id.clone())
    }
}
