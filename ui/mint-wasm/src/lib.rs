//! gmMintr WASM front-end.
//!
//! Thin presentation over `mint-session`: binds the page buttons to the
//! controller operations and renders its snapshot. Wallet and contract access
//! go through the injected `window.ethereum` provider.

pub mod actions;
pub mod dom;
pub mod ethereum;
pub mod events;
pub mod logging;
pub mod render;
pub mod state;

use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use mint_chain_etherscan::EtherscanCountReader;
use mint_session::{MintConfig, MintSessionController};
use wasm_bindgen::prelude::*;

/// How often delivered minted events are applied and the page re-rendered.
const EVENT_PUMP_MS: u32 = 250;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init("info");

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    let config = MintConfig::from_env().map_err(|err| {
        tracing::error!("invalid mint configuration: {:#}", err);
        JsValue::from_str(&format!("{err:#}"))
    })?;
    let read_only = EtherscanCountReader::with_optional_key(
        Some(config.etherscan_api_base.clone()),
        config.etherscan_api_key.as_deref(),
        config.contract_address.clone(),
    );
    if read_only.is_none() {
        tracing::info!("no Etherscan key configured; counter shows after connecting");
    }
    let factory = ethereum::InjectedContractFactory::new(config.contract_address.clone(), read_only);
    let controller = Rc::new(MintSessionController::new(
        config,
        ethereum::InjectedProviderLookup,
        factory,
    ));
    state::set_controller(controller.clone());

    events::bind_events(&els);
    render::refresh(&els);

    controller.start().await;
    render::refresh(&els);

    wasm_bindgen_futures::spawn_local(pump_events(els));
    Ok(())
}

async fn pump_events(els: dom::Elements) {
    loop {
        TimeoutFuture::new(EVENT_PUMP_MS).await;
        if let Some(controller) = state::controller() {
            controller.apply_pending_events();
        }
        render::refresh(&els);
    }
}
