//! Wallet connection and mint lifecycle for the gmMintr page.
//!
//! [`MintSessionController`] owns all session state; the presentation layer
//! only calls its operations and renders [`mint_types::SessionSnapshot`].

mod config;
mod controller;
pub mod links;
pub mod status;

#[cfg(test)]
mod testing;

pub use config::{API_KEY_ENV, CONFIG_JSON_ENV, MintConfig};
pub use controller::{MintOperation, MintOutcome, MintRejection, MintSessionController};
