//! Injected EIP-1193 provider (`window.ethereum`).
//!
//! Implements the collaborator traits of `mint-chain-client` on top of the
//! provider's `request({ method, params })`. `window.ethereum` is read again
//! on every lookup since extensions may inject it after the page has loaded.

use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use mint_chain_client::{
    ChainError, ContractFactory, MintContract, MintCountReader, MintedEventSink, PendingTransaction,
    ProviderLookup, WalletProvider, abi,
};
use mint_chain_etherscan::EtherscanCountReader;
use mint_types::{ChainId, MintedEvent, TokenId, TxHash, WalletAddress};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::rc::Rc;
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

const RECEIPT_POLL_MS: u32 = 2_000;
/// Fifteen minutes of receipt polling before the mint is reported as timed out.
const RECEIPT_MAX_POLLS: u32 = 450;
const LOG_POLL_MS: u32 = 4_000;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type Eip1193;

    #[wasm_bindgen(method, catch)]
    fn request(this: &Eip1193, args: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

#[derive(Serialize)]
struct RequestArguments<'a> {
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

fn detect() -> Option<Eip1193> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    Some(value.unchecked_into())
}

fn provider_error(err: JsValue) -> ChainError {
    let code = js_sys::Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_f64())
        .map(|code| code as i64);
    let message = js_sys::Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{err:?}"));

    match code {
        Some(code) => ChainError::from_provider_code(code, &message),
        None => ChainError::Rpc(message),
    }
}

#[derive(Clone)]
pub struct InjectedProvider {
    ethereum: Eip1193,
}

impl InjectedProvider {
    pub fn detect() -> Option<Self> {
        detect().map(|ethereum| Self { ethereum })
    }

    async fn call<T>(&self, method: &str, params: Option<Value>) -> Result<T, ChainError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let args = RequestArguments { method, params }
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| ChainError::Decode(err.to_string()))?;
        let promise = self.ethereum.request(&args).map_err(provider_error)?;
        let value = JsFuture::from(promise).await.map_err(provider_error)?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|err| ChainError::Decode(format!("{method}: {err}")))
    }
}

fn addresses(raw: Vec<String>) -> Vec<WalletAddress> {
    raw.iter().map(|account| WalletAddress::normalized(account)).collect()
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ChainError> {
        self.call::<Vec<String>>("eth_requestAccounts", None).await.map(addresses)
    }

    async fn accounts(&self) -> Result<Vec<WalletAddress>, ChainError> {
        self.call::<Vec<String>>("eth_accounts", None).await.map(addresses)
    }

    async fn chain_id(&self) -> Result<ChainId, ChainError> {
        self.call::<String>("eth_chainId", None).await.map(ChainId)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InjectedProviderLookup;

impl ProviderLookup for InjectedProviderLookup {
    fn provider(&self) -> Option<Rc<dyn WalletProvider>> {
        InjectedProvider::detect().map(|provider| Rc::new(provider) as Rc<dyn WalletProvider>)
    }
}

// ── Signer-backed contract over the injected provider ────────────────

pub struct InjectedContract {
    provider: InjectedProvider,
    contract: String,
}

#[derive(Debug, Deserialize)]
struct Receipt {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Log {
    data: String,
    #[serde(default)]
    block_number: Option<String>,
}

fn parse_quantity(raw: &str) -> Option<u64> {
    u64::from_str_radix(raw.trim_start_matches("0x"), 16).ok()
}

/// First block the next `eth_getLogs` poll should cover after seeing `log`.
fn next_from_block(current: u64, log: &Log) -> u64 {
    match log.block_number.as_deref().and_then(parse_quantity) {
        Some(block) => current.max(block.saturating_add(1)),
        None => current,
    }
}

fn decode_minted_log(log: &Log) -> Result<MintedEvent, ChainError> {
    let words = abi::data_words(&log.data)?;
    let [from, token_id] = words.as_slice() else {
        return Err(ChainError::Decode(format!("minted event data: {}", log.data)));
    };
    Ok(MintedEvent {
        from: WalletAddress(abi::decode_address_word(from)?),
        token_id: TokenId(abi::decode_uint_word(token_id)?),
    })
}

#[async_trait(?Send)]
impl MintContract for InjectedContract {
    async fn total_minted_count(&self) -> Result<u64, ChainError> {
        let data = abi::function_selector(abi::TOTAL_MINTED_FUNCTION);
        let word: String = self
            .provider
            .call("eth_call", Some(json!([{ "to": self.contract, "data": data }, "latest"])))
            .await?;
        abi::decode_uint_word(&word)
    }

    async fn mint(&self) -> Result<Box<dyn PendingTransaction>, ChainError> {
        let from = self
            .provider
            .accounts()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ChainError::Rpc("wallet has no authorized account".to_owned()))?;

        debug!("going to pop wallet now to pay gas");
        let data = abi::function_selector(abi::MINT_FUNCTION);
        let hash: String = self
            .provider
            .call(
                "eth_sendTransaction",
                Some(json!([{ "from": from.as_str(), "to": self.contract, "data": data }])),
            )
            .await?;

        Ok(Box::new(InjectedPending {
            provider: self.provider.clone(),
            hash: TxHash(hash),
        }))
    }

    fn subscribe_minted(&self, sink: MintedEventSink) -> Result<(), ChainError> {
        let provider = self.provider.clone();
        let contract = self.contract.clone();
        wasm_bindgen_futures::spawn_local(async move {
            poll_minted_logs(provider, contract, sink).await;
        });
        Ok(())
    }
}

async fn poll_minted_logs(provider: InjectedProvider, contract: String, sink: MintedEventSink) {
    let topic = abi::event_topic(abi::MINTED_EVENT);
    let mut next_block = match provider.call::<String>("eth_blockNumber", None).await {
        Ok(raw) => parse_quantity(&raw).unwrap_or(0),
        Err(err) => {
            warn!("minted listener could not read block number: {}", err);
            return;
        }
    };
    info!(from_block = next_block, "minted listener started");

    while !sink.is_closed() {
        TimeoutFuture::new(LOG_POLL_MS).await;

        let filter = json!([{
            "address": contract,
            "topics": [topic],
            "fromBlock": format!("0x{next_block:x}"),
            "toBlock": "latest",
        }]);
        let logs = match provider.call::<Vec<Log>>("eth_getLogs", Some(filter)).await {
            Ok(logs) => logs,
            Err(err) => {
                warn!("minted listener poll failed: {}", err);
                continue;
            }
        };

        for log in &logs {
            next_block = next_from_block(next_block, log);
            match decode_minted_log(log) {
                Ok(event) => {
                    sink.push(event);
                }
                Err(err) => warn!("skipping minted log: {}", err),
            }
        }
    }
    debug!("minted listener stopped");
}

pub struct InjectedPending {
    provider: InjectedProvider,
    hash: TxHash,
}

#[async_trait(?Send)]
impl PendingTransaction for InjectedPending {
    fn hash(&self) -> &TxHash {
        &self.hash
    }

    async fn wait(&self) -> Result<(), ChainError> {
        for _ in 0..RECEIPT_MAX_POLLS {
            let polled = self
                .provider
                .call("eth_getTransactionReceipt", Some(json!([self.hash.0])))
                .await;
            if let Some(outcome) = receipt_outcome(&self.hash, polled) {
                return outcome;
            }
            TimeoutFuture::new(RECEIPT_POLL_MS).await;
        }
        Err(ChainError::Timeout(format!("receipt of {}", self.hash)))
    }
}

/// `None` while the transaction is still pending. A transport error says
/// nothing about the transaction, so it is retried on the next poll.
fn receipt_outcome(
    hash: &TxHash,
    polled: Result<Option<Receipt>, ChainError>,
) -> Option<Result<(), ChainError>> {
    match polled {
        Ok(receipt) => match receipt.and_then(|receipt| receipt.status) {
            Some(status) if status == "0x1" => Some(Ok(())),
            Some(status) => Some(Err(ChainError::Reverted(format!("{hash} status {status}")))),
            None => None,
        },
        Err(ChainError::Rpc(message)) => {
            warn!(%hash, "receipt poll failed, retrying: {}", message);
            None
        }
        Err(err) => Some(Err(err)),
    }
}

// ── Factory ──────────────────────────────────────────────────────────

pub struct InjectedContractFactory {
    contract: String,
    read_only: Option<EtherscanCountReader>,
}

impl InjectedContractFactory {
    pub fn new(contract: String, read_only: Option<EtherscanCountReader>) -> Self {
        Self { contract, read_only }
    }
}

impl ContractFactory for InjectedContractFactory {
    fn signer_backed(&self) -> Result<Rc<dyn MintContract>, ChainError> {
        let provider = InjectedProvider::detect().ok_or(ChainError::ProviderMissing)?;
        Ok(Rc::new(InjectedContract {
            provider,
            contract: self.contract.clone(),
        }))
    }

    fn read_only(&self) -> Option<Rc<dyn MintCountReader>> {
        self.read_only
            .clone()
            .map(|reader| Rc::new(reader) as Rc<dyn MintCountReader>)
    }
}
