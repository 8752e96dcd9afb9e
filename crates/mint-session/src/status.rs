//! The message centre.
//!
//! One string, last write wins. Every write goes through [`StatusBoard::post`]
//! so the order of competing writers shows up in the log.

use mint_types::{ChainId, WalletAddress};
use tracing::info;

pub const GREETING: &str = "Well hello there";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOrigin {
    Connection,
    Network,
    Mint,
    MintedEvent,
}

#[derive(Debug, Clone)]
pub struct StatusBoard {
    message: String,
    revision: u64,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self {
            message: GREETING.to_owned(),
            revision: 0,
        }
    }
}

impl StatusBoard {
    pub fn post(&mut self, origin: StatusOrigin, message: impl Into<String>) {
        self.message = message.into();
        self.revision += 1;
        info!(?origin, revision = self.revision, "status: {}", self.message);
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Number of writes so far; lets a renderer skip unchanged frames.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

pub fn wallet_missing() -> String {
    "Get MetaMask! This app requires it!".to_owned()
}

pub fn found_account(account: &WalletAddress) -> String {
    format!("Found an authorized account: {account}")
}

pub fn connected(account: &WalletAddress) -> String {
    format!("Connected: {account}")
}

pub fn wrong_network(network_name: &str, required: &ChainId, actual: &ChainId) -> String {
    format!(
        "You are not connected to the {network_name} Test Network (wallet is on {actual}, expected {required})"
    )
}

pub fn awaiting_signature() -> String {
    "Gotta get that gas...".to_owned()
}

pub fn mining() -> String {
    "We are mining! Please wait...".to_owned()
}

pub fn mined(explorer_link: &str) -> String {
    format!("Lets GOOOO - transaction mined! Check it out: {explorer_link}")
}

pub fn minted_event(marketplace_link: &str) -> String {
    format!(
        "Hey there! We've minted your NFT and sent it to your wallet. It may be blank right now. \
         It can take a max of 10 min to show up on Rarible. Here's the link: {marketplace_link}"
    )
}
