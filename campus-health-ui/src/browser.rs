//! Browser Bindings
//!
//! [`Host`] and [`KeyValueStore`] over the DOM and Web Storage, plus the
//! console writer used by the log subscriber.

use std::io;

use campus_health::{Host, KeyValueStore, Notice};
use gloo_timers::callback::Timeout;
use tracing::warn;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::state::global::GlobalState;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap, js_name = Modal)]
    type BootstrapModal;

    #[wasm_bindgen(static_method_of = BootstrapModal, js_class = "Modal", js_namespace = bootstrap, js_name = getOrCreateInstance, catch)]
    fn get_or_create(element: &web_sys::Element) -> Result<BootstrapModal, JsValue>;

    #[wasm_bindgen(method)]
    fn show(this: &BootstrapModal);

    #[wasm_bindgen(method)]
    fn hide(this: &BootstrapModal);
}

pub fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

pub fn element(id: &str) -> Option<web_sys::Element> {
    let found = document()?.get_element_by_id(id);
    if found.is_none() {
        warn!(id, "element not found");
    }
    found
}

/// `value` of an input, select or textarea; empty when missing
pub fn field_value(element: &web_sys::Element) -> String {
    js_sys::Reflect::get(element, &JsValue::from_str("value"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

fn set_property(element: &web_sys::Element, name: &str, value: &JsValue) {
    if let Err(err) = js_sys::Reflect::set(element, &JsValue::from_str(name), value) {
        warn!(property = name, error = ?err, "property not set");
    }
}

/// Page side effects on the live document
#[derive(Clone)]
pub struct BrowserHost {
    state: GlobalState,
    toast_delay_ms: u32,
}

impl BrowserHost {
    pub fn new(state: GlobalState, toast_delay_ms: u32) -> Self {
        Self { state, toast_delay_ms }
    }
}

impl Host for BrowserHost {
    fn render(&self, slot: &str, html: String) {
        if let Some(el) = element(slot) {
            el.set_inner_html(&html);
        }
    }

    fn notify(&self, notice: Notice) {
        self.state.push_toast(notice, self.toast_delay_ms);
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn navigate(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.location().set_href(url) {
                warn!(url, error = ?err, "navigation failed");
            }
        }
    }

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        Timeout::new(delay_ms, task).forget();
    }

    fn set_busy(&self, busy: bool) {
        self.state.busy.set(busy);
        if let Some(body) = document().and_then(|d| d.body()) {
            let _ = body.class_list().toggle_with_force("is-busy", busy);
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_value(&self, id: &str, value: &str) {
        if let Some(el) = element(id) {
            set_property(&el, "value", &JsValue::from_str(value));
        }
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        if let Some(el) = element(id) {
            set_property(&el, "disabled", &JsValue::from_bool(disabled));
        }
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(el) = element(id) {
            let _ = el.class_list().toggle_with_force("d-none", hidden);
        }
    }

    fn set_class(&self, id: &str, class: &str) {
        if let Some(el) = element(id) {
            el.set_class_name(class);
        }
    }

    fn show_modal(&self, id: &str, visible: bool) {
        let Some(el) = element(id) else { return };
        match BootstrapModal::get_or_create(&el) {
            Ok(modal) if visible => modal.show(),
            Ok(modal) => modal.hide(),
            Err(err) => warn!(id, error = ?err, "modal unavailable"),
        }
    }
}

/// `localStorage` or `sessionStorage`
#[derive(Clone, Copy, Debug)]
pub enum WebStorage {
    Local,
    Session,
}

impl WebStorage {
    fn storage(&self) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        let storage = match self {
            WebStorage::Local => window.local_storage(),
            WebStorage::Session => window.session_storage(),
        };
        storage.ok().flatten()
    }
}

impl KeyValueStore for WebStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = self.storage() {
            if storage.set_item(key, value).is_err() {
                warn!(key, "storage write refused");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Anti-forgery token from the page's hidden field or its cookie
pub fn page_csrf_token(field: &str, cookie: &str) -> Option<String> {
    let document = document()?;
    let hidden = document
        .query_selector(&format!("input[name=\"{}\"]", field))
        .ok()
        .flatten()
        .map(|el| field_value(&el));
    let cookies = document
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()
        .and_then(|d| d.cookie().ok())
        .unwrap_or_default();
    campus_health::common::csrf_token(hidden.as_deref(), &cookies, cookie)
}

pub fn prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|m| m.matches())
        .unwrap_or(false)
}

// ============ Console logging ============

/// Buffers one formatted event and prints it on drop
pub struct ConsoleWriter {
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if !line.is_empty() {
            web_sys::console::log_1(&JsValue::from_str(line));
        }
    }
}

pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { buffer: Vec::new() }
    }
}
