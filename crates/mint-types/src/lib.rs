use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// Wallets report checksummed or lowercase hex depending on the vendor;
    /// the session always stores the lowercase form.
    pub fn normalized(raw: &str) -> Self {
        Self(raw.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainId(pub String);

impl ChainId {
    /// Chain ids are hex quantities; `0x04` and `0x4` name the same network.
    pub fn matches(&self, other: &ChainId) -> bool {
        match (parse_quantity(&self.0), parse_quantity(&other.0)) {
            (Some(a), Some(b)) => a == b,
            _ => self.0.eq_ignore_ascii_case(&other.0),
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_quantity(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected,
}

/// Lifecycle of a single mint request.
///
/// `Idle -> AwaitingSignature -> Mining -> Confirmed`, with `Failed` reachable
/// from either waiting stage. A terminal operation is replaced, never resumed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MintStatus {
    #[default]
    Idle,
    AwaitingSignature,
    Mining,
    Confirmed,
    Failed,
}

impl MintStatus {
    /// Waiting on the wallet or on inclusion.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::AwaitingSignature | Self::Mining)
    }

    pub fn can_advance_to(self, next: MintStatus) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::AwaitingSignature)
                | (Self::AwaitingSignature, Self::Mining)
                | (Self::AwaitingSignature, Self::Failed)
                | (Self::Mining, Self::Confirmed)
                | (Self::Mining, Self::Failed)
        )
    }
}

/// Contract-level notification that a token was minted by anyone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MintedEvent {
    pub from: WalletAddress,
    pub token_id: TokenId,
}

/// Read-only view of the session handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub connection: ConnectionStatus,
    pub account: Option<WalletAddress>,
    pub chain_id: Option<ChainId>,
    pub minted_count: u64,
    pub capacity: u64,
    pub busy: bool,
    pub status_message: String,
    pub transaction_link: Option<String>,
    pub mint_status: MintStatus,
    pub sold_out: bool,
    pub can_mint: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_status_follows_lifecycle() {
        use MintStatus::*;

        assert!(Idle.can_advance_to(AwaitingSignature));
        assert!(AwaitingSignature.can_advance_to(Mining));
        assert!(Mining.can_advance_to(Confirmed));
        assert!(AwaitingSignature.can_advance_to(Failed));
        assert!(Mining.can_advance_to(Failed));

        assert!(!Idle.can_advance_to(Mining));
        assert!(!AwaitingSignature.can_advance_to(Confirmed));
        assert!(!Confirmed.can_advance_to(Mining));
        assert!(!Failed.can_advance_to(AwaitingSignature));
        assert!(!Idle.can_advance_to(Failed));
    }

    #[test]
    fn only_waiting_stages_are_in_flight() {
        assert!(MintStatus::AwaitingSignature.is_in_flight());
        assert!(MintStatus::Mining.is_in_flight());
        for status in [MintStatus::Idle, MintStatus::Confirmed, MintStatus::Failed] {
            assert!(!status.is_in_flight());
        }
    }

    #[test]
    fn chain_ids_compare_by_quantity() {
        let required = ChainId("0x4".to_owned());
        assert!(required.matches(&ChainId("0x04".to_owned())));
        assert!(required.matches(&ChainId("4".to_owned())));
        assert!(!required.matches(&ChainId("0x1".to_owned())));
    }

    #[test]
    fn wallet_address_is_lowercased() {
        let address = WalletAddress::normalized(" 0xAbCDEF0000000000000000000000000000001234 ");
        assert_eq!(address.as_str(), "0xabcdef0000000000000000000000000000001234");
        assert_eq!(address.as_str().len(), 42);
    }

    #[test]
    fn statuses_serialize_snake_case() {
        let raw = serde_json::to_string(&MintStatus::AwaitingSignature).unwrap();
        assert_eq!(raw, "\"awaiting_signature\"");
        let raw = serde_json::to_string(&ConnectionStatus::Connected).unwrap();
        assert_eq!(raw, "\"connected\"");
    }
}
