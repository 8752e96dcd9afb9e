//! Snapshot → DOM.

use mint_types::{ConnectionStatus, SessionSnapshot};

use crate::dom::{self, Elements};
use crate::state;

/// Re-render if the session changed since the last frame.
pub fn refresh(els: &Elements) {
    let Some(controller) = state::controller() else {
        return;
    };
    let snapshot = controller.snapshot();
    if state::mark_rendered(&snapshot) {
        render(els, &snapshot);
    }
}

pub fn render(els: &Elements, snapshot: &SessionSnapshot) {
    let connected = snapshot.connection == ConnectionStatus::Connected;

    dom::set_visible(&els.connect_btn, !connected);
    els.connect_btn.set_disabled(snapshot.sold_out);

    dom::set_visible(&els.mint_btn, connected);
    els.mint_btn.set_disabled(!snapshot.can_mint);
    dom::toggle_class(&els.mint_btn, "loading", snapshot.busy);
    dom::toggle_class(&els.mint_btn_text, "loading", snapshot.busy);

    dom::set_text(&els.message_text, &snapshot.status_message);

    match snapshot.transaction_link.as_deref() {
        Some(link) => {
            els.transaction_link.set_href(link);
            dom::set_visible(&els.transaction_link, true);
        }
        None => dom::set_visible(&els.transaction_link, false),
    }

    dom::set_text(&els.mint_count, &count_label(snapshot));
}

pub fn count_label(snapshot: &SessionSnapshot) -> String {
    if snapshot.sold_out {
        format!("NFT's SOLD OUT {}/{}", snapshot.minted_count, snapshot.capacity)
    } else {
        format!("{}/{} NFT's minted", snapshot.minted_count, snapshot.capacity)
    }
}
