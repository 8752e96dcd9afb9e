use mint_types::{TokenId, TxHash};

use crate::MintConfig;

pub fn explorer_tx_url(config: &MintConfig, tx_hash: &TxHash) -> String {
    format!("{}{}", config.explorer_tx_base, tx_hash.0)
}

pub fn marketplace_token_url(config: &MintConfig, token_id: TokenId) -> String {
    format!(
        "{}{}:{}",
        config.marketplace_token_base, config.contract_address, token_id.0
    )
}

pub fn collection_url(config: &MintConfig) -> String {
    format!("{}{}", config.collection_base, config.contract_address)
}
