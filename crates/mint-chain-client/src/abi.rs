//! Minimal ABI helpers for the mint contract.
//!
//! Only what the session needs: selectors for two zero-argument functions,
//! the topic of the minted event, and decoding of single 32-byte words.

use crate::ChainError;
use sha3::{Digest, Keccak256};

pub const MINT_FUNCTION: &str = "makeAnEpicNFT()";
pub const TOTAL_MINTED_FUNCTION: &str = "getTotalNFTsMintedCount()";
pub const MINTED_EVENT: &str = "NewEpicNFTMinted(address,uint256)";

/// First four bytes of the Keccak-256 of the signature, `0x`-prefixed.
pub fn function_selector(signature: &str) -> String {
    let hash = Keccak256::digest(signature.as_bytes());
    format!("0x{}", hex_lower(&hash[..4]))
}

/// Full Keccak-256 of the event signature, `0x`-prefixed.
pub fn event_topic(signature: &str) -> String {
    let hash = Keccak256::digest(signature.as_bytes());
    format!("0x{}", hex_lower(&hash))
}

/// Decode a 32-byte big-endian word into a `u64`.
pub fn decode_uint_word(raw: &str) -> Result<u64, ChainError> {
    let hex = strip_hex_prefix(raw);
    if hex.is_empty() {
        return Err(ChainError::Decode("empty return data".to_owned()));
    }
    if hex.len() > 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ChainError::Decode(format!("not a uint256 word: {raw}")));
    }

    let significant = hex.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 16 {
        return Err(ChainError::Decode(format!("value exceeds u64: {raw}")));
    }

    u64::from_str_radix(significant, 16).map_err(|err| ChainError::Decode(err.to_string()))
}

/// Recover the address from an indexed or word-encoded address argument.
pub fn decode_address_word(raw: &str) -> Result<String, ChainError> {
    let hex = strip_hex_prefix(raw);
    if hex.len() < 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ChainError::Decode(format!("not an address word: {raw}")));
    }
    Ok(format!("0x{}", hex[hex.len() - 40..].to_ascii_lowercase()))
}

/// Split non-indexed event data into 32-byte words.
pub fn data_words(raw: &str) -> Result<Vec<&str>, ChainError> {
    let hex = strip_hex_prefix(raw);
    if hex.len() % 64 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ChainError::Decode(format!("not word-aligned event data: {raw}")));
    }
    Ok((0..hex.len() / 64).map(|i| &hex[i * 64..(i + 1) * 64]).collect())
}

fn strip_hex_prefix(raw: &str) -> &str {
    let raw = raw.trim();
    raw.strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw)
}

fn hex_lower(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        output.push_str(&format!("{byte:02x}"));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erc20_transfer_selector_matches_known_value() {
        assert_eq!(function_selector("transfer(address,uint256)"), "0xa9059cbb");
    }

    #[test]
    fn transfer_event_topic_matches_known_value() {
        assert_eq!(
            event_topic("Transfer(address,address,uint256)"),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn decodes_padded_words() {
        let word = format!("0x{:0>64}", "31");
        assert_eq!(decode_uint_word(&word).unwrap(), 49);
        assert_eq!(decode_uint_word(&format!("0x{}", "0".repeat(64))).unwrap(), 0);
        assert_eq!(decode_uint_word("0x32").unwrap(), 50);
    }

    #[test]
    fn rejects_empty_and_oversized_words() {
        assert!(matches!(decode_uint_word("0x"), Err(ChainError::Decode(_))));
        assert!(matches!(decode_uint_word("0xzz"), Err(ChainError::Decode(_))));
        let huge = format!("0x{:0>64}", "1".repeat(17));
        assert!(matches!(decode_uint_word(&huge), Err(ChainError::Decode(_))));
    }

    #[test]
    fn decodes_indexed_address() {
        let topic = "0x000000000000000000000000AbC0000000000000000000000000000000000001";
        assert_eq!(
            decode_address_word(topic).unwrap(),
            "0xabc0000000000000000000000000000000000001"
        );
    }

    #[test]
    fn splits_event_data_words() {
        let data = format!("0x{:0>64}{:0>64}", "aa", "07");
        let words = data_words(&data).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(decode_uint_word(words[1]).unwrap(), 7);
        assert!(data_words("0x").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_event_data() {
        let multibyte = format!("0x{}", "€".repeat(22));
        assert!(matches!(data_words(&multibyte), Err(ChainError::Decode(_))));
        let truncated = format!("0x{:0>64}ab", "01");
        assert!(matches!(data_words(&truncated), Err(ChainError::Decode(_))));
        let non_hex = format!("0x{}", "g".repeat(64));
        assert!(matches!(data_words(&non_hex), Err(ChainError::Decode(_))));
    }
}
