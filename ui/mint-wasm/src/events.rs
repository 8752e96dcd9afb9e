//! Event binding.
//!
//! Wires the page buttons to `actions`. Async handlers are spawned via
//! `wasm_bindgen_futures::spawn_local`.

use crate::actions;
use crate::dom::Elements;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Helper: attach async click handler to an HtmlElement.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        if let Err(err) = $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref()) {
            tracing::warn!("failed to bind click handler: {:?}", err);
        }
        cb.forget();
    }};
}

/// Helper: attach sync click handler.
macro_rules! on_click {
    ($el:expr, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::MouseEvent)>);
        if let Err(err) = $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref()) {
            tracing::warn!("failed to bind click handler: {:?}", err);
        }
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // Wallet prompts must come from a direct user gesture.
    on_click_async!(els.connect_btn, els, actions::on_connect);
    on_click_async!(els.mint_btn, els, actions::on_mint);

    on_click!(els.collection_btn, move |_: web_sys::MouseEvent| {
        actions::on_view_collection();
    });
}
