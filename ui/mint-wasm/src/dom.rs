//! DOM element bindings.
//!
//! Resolved once at startup. The page must provide elements with the ids
//! used in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlAnchorElement, HtmlButtonElement, Window};

pub fn window() -> Window {
    web_sys::window().expect("no global `window`")
}

fn doc() -> Result<Document, JsValue> {
    window()
        .document()
        .ok_or_else(|| JsValue::from_str("no document on window"))
}

fn required<T: JsCast>(doc: &Document, id: &str) -> Result<T, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{id} has unexpected type")))
}

#[derive(Clone)]
pub struct Elements {
    pub connect_btn: HtmlButtonElement,
    pub mint_btn: HtmlButtonElement,
    pub mint_btn_text: Element,
    pub collection_btn: HtmlButtonElement,
    pub message_text: Element,
    pub transaction_link: HtmlAnchorElement,
    pub mint_count: Element,
}

impl Elements {
    pub fn bind() -> Result<Self, JsValue> {
        let doc = doc()?;
        Ok(Self {
            connect_btn: required(&doc, "connectWalletBtn")?,
            mint_btn: required(&doc, "mintBtn")?,
            mint_btn_text: required(&doc, "mintBtnText")?,
            collection_btn: required(&doc, "viewCollectionBtn")?,
            message_text: required(&doc, "messageText")?,
            transaction_link: required(&doc, "transactionLink")?,
            mint_count: required(&doc, "mintCount")?,
        })
    }
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn toggle_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub fn set_visible(el: &Element, visible: bool) {
    toggle_class(el, "hidden", !visible);
}
