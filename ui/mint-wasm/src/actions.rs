//! Button handlers. Each runs one controller operation and re-renders.

use mint_session::{MintOutcome, links};
use tracing::{info, warn};

use crate::dom::{self, Elements};
use crate::render;
use crate::state;

pub async fn on_connect(els: &Elements) {
    let Some(controller) = state::controller() else {
        return;
    };
    controller.connect_wallet().await;
    render::refresh(els);
}

pub async fn on_mint(els: &Elements) {
    let Some(controller) = state::controller() else {
        return;
    };

    // Intermediate stages are picked up by the render pump while this waits.
    let outcome = controller.submit_mint().await;

    match &outcome {
        MintOutcome::Confirmed(hash) => info!(%hash, "mint confirmed"),
        MintOutcome::Failed(err) => warn!("mint failed: {}", err),
        MintOutcome::Rejected(reason) => info!(?reason, "mint not submitted"),
    }
    render::refresh(els);
}

pub fn on_view_collection() {
    let Some(controller) = state::controller() else {
        return;
    };
    let url = links::collection_url(controller.config());
    if let Err(err) = dom::window().open_with_url(&url) {
        warn!("failed to open collection: {:?}", err);
    }
}
