use async_trait::async_trait;
use mint_chain_client::{ChainError, MintCountReader, abi};
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://api-rinkeby.etherscan.io/api";

/// Read-only counter client over the Etherscan proxy API.
///
/// Needs an API key and no wallet; used to show the mint counter before the
/// user connects.
#[derive(Clone)]
pub struct EtherscanCountReader {
    api_base: String,
    api_key: String,
    contract: String,
    http: reqwest::Client,
}

impl EtherscanCountReader {
    pub fn new(api_base: Option<String>, api_key: impl Into<String>, contract: impl Into<String>) -> Self {
        let api_base = api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_owned());
        Self {
            api_base: api_base.trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            contract: contract.into(),
            http: reqwest::Client::new(),
        }
    }

    /// `None` for a blank key, so callers can skip the read path entirely.
    pub fn with_optional_key(
        api_base: Option<String>,
        api_key: Option<&str>,
        contract: impl Into<String>,
    ) -> Option<Self> {
        let key = api_key.map(str::trim).filter(|key| !key.is_empty())?;
        Some(Self::new(api_base, key, contract))
    }

    fn call_url(&self, data: &str) -> String {
        format!(
            "{}?module=proxy&action=eth_call&to={}&data={}&tag=latest&apikey={}",
            self.api_base, self.contract, data, self.api_key
        )
    }
}

// ── Etherscan proxy response ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ProxyResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<ProxyError>,
    // Non-proxy failures ("Invalid API Key") come back as status/message.
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProxyError {
    #[serde(default)]
    code: i64,
    message: String,
}

fn parse_call_result(body: &str) -> Result<u64, ChainError> {
    let response: ProxyResponse =
        serde_json::from_str(body).map_err(|err| ChainError::Decode(format!("etherscan body: {err}")))?;

    if let Some(err) = response.error {
        if err.message.contains("revert") {
            return Err(ChainError::Reverted(err.message));
        }
        return Err(ChainError::Rpc(format!("{}: {}", err.code, err.message)));
    }

    match response.result {
        Some(serde_json::Value::String(word)) if word.starts_with("0x") => abi::decode_uint_word(&word),
        Some(other) => {
            let detail = response.message.unwrap_or_default();
            Err(ChainError::Rpc(format!("etherscan: {detail} {other}").trim().to_owned()))
        }
        None => Err(ChainError::Decode("etherscan response has no result".to_owned())),
    }
}

#[async_trait(?Send)]
impl MintCountReader for EtherscanCountReader {
    async fn total_minted_count(&self) -> Result<u64, ChainError> {
        let selector = abi::function_selector(abi::TOTAL_MINTED_FUNCTION);
        let url = self.call_url(&selector);
        debug!("etherscan eth_call {} on {}", abi::TOTAL_MINTED_FUNCTION, self.contract);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| ChainError::Rpc(format!("etherscan transport: {err}")))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!("etherscan eth_call HTTP {}: {}", status, text);
            return Err(ChainError::Rpc(format!("etherscan HTTP {status}")));
        }

        parse_call_result(&text)
    }
}
