//! Narrow interfaces to the wallet provider and the mint contract.
//!
//! All calls are suspension points. Implementations live in the browser
//! front-end (injected provider) and in `mint-chain-etherscan` (read-only
//! counter); the session only ever sees these traits.

pub mod abi;
mod error;
mod events;

pub use error::{ChainError, USER_REJECTED_CODE};
pub use events::{MintedEventQueue, MintedEventSink, minted_channel};

use async_trait::async_trait;
use mint_types::{ChainId, TxHash, WalletAddress};
use std::rc::Rc;

#[async_trait(?Send)]
pub trait WalletProvider {
    /// May prompt the user; a dismissed prompt is `ChainError::UserRejected`.
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ChainError>;
    /// Already-authorized accounts, never prompts.
    async fn accounts(&self) -> Result<Vec<WalletAddress>, ChainError>;
    async fn chain_id(&self) -> Result<ChainId, ChainError>;
}

/// Detects an externally injected wallet provider.
///
/// Looked up at the start of every operation; absence is never cached since
/// the provider can be injected later in the page lifecycle.
pub trait ProviderLookup {
    fn provider(&self) -> Option<Rc<dyn WalletProvider>>;
}

#[async_trait(?Send)]
pub trait MintCountReader {
    async fn total_minted_count(&self) -> Result<u64, ChainError>;
}

#[async_trait(?Send)]
pub trait PendingTransaction {
    fn hash(&self) -> &TxHash;
    /// Resolves once the transaction is included on chain.
    async fn wait(&self) -> Result<(), ChainError>;
}

/// Contract client bound to the wallet's signer.
#[async_trait(?Send)]
pub trait MintContract {
    async fn total_minted_count(&self) -> Result<u64, ChainError>;
    async fn mint(&self) -> Result<Box<dyn PendingTransaction>, ChainError>;
    /// Standing subscription to every mint on the contract, not only ours.
    fn subscribe_minted(&self, sink: MintedEventSink) -> Result<(), ChainError>;
}

/// Builds contract clients. The signer-backed client binds to whichever
/// provider the page currently exposes.
pub trait ContractFactory {
    fn signer_backed(&self) -> Result<Rc<dyn MintContract>, ChainError>;
    /// `None` when no read credential is configured.
    fn read_only(&self) -> Option<Rc<dyn MintCountReader>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderKind {
    SignerBacked,
    ReadOnly,
}

/// Counter reader picked per call by [`count_reader`].
#[derive(Clone)]
pub enum CountReader {
    SignerBacked(Rc<dyn MintContract>),
    ReadOnly(Rc<dyn MintCountReader>),
}

impl CountReader {
    pub fn kind(&self) -> ReaderKind {
        match self {
            Self::SignerBacked(_) => ReaderKind::SignerBacked,
            Self::ReadOnly(_) => ReaderKind::ReadOnly,
        }
    }
}

#[async_trait(?Send)]
impl MintCountReader for CountReader {
    async fn total_minted_count(&self) -> Result<u64, ChainError> {
        match self {
            Self::SignerBacked(contract) => contract.total_minted_count().await,
            Self::ReadOnly(reader) => reader.total_minted_count().await,
        }
    }
}

/// Signer-backed when an account is connected, read-only otherwise.
pub fn count_reader(
    factory: &dyn ContractFactory,
    provider_present: bool,
    connected: bool,
) -> Result<CountReader, ChainError> {
    if !provider_present {
        return Err(ChainError::ProviderMissing);
    }

    if connected {
        return factory.signer_backed().map(CountReader::SignerBacked);
    }

    factory
        .read_only()
        .map(CountReader::ReadOnly)
        .ok_or_else(|| ChainError::ReaderUnavailable("no read API key configured".to_owned()))
}
