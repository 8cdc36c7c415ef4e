//! DOM Event Helpers
//!
//! Form reading and click delegation for markup rendered by the controllers.

use std::future::Future;

use campus_health::pages::RowAction;
use campus_health::FormValues;
use leptos::{request_animation_frame, spawn_local};
use wasm_bindgen::JsCast;

use crate::browser::{element, field_value};

/// Snapshot of the named inputs, keyed by element id
pub fn read_form(ids: &[&str]) -> FormValues {
    let mut form = FormValues::new();
    for id in ids {
        if let Some(el) = element(id) {
            form.set(id, &field_value(&el));
        }
    }
    form
}

fn event_element(ev: &web_sys::Event) -> Option<web_sys::Element> {
    ev.target()?.dyn_into::<web_sys::Element>().ok()
}

/// Decode a click on any `[data-action][data-id]` descendant
pub fn row_action(ev: &web_sys::Event) -> Option<RowAction> {
    let button = event_element(ev)?.closest("[data-action]").ok()??;
    RowAction::parse(&button.get_attribute("data-action")?, &button.get_attribute("data-id")?)
}

/// `(id, checked)` for a toggled `.permission-switch`
pub fn switch_change(ev: &web_sys::Event) -> Option<(u64, bool)> {
    let input = event_element(ev)?;
    if !input.class_list().contains("permission-switch") {
        return None;
    }
    let id = input.get_attribute("data-id")?.parse().ok()?;
    let checked = js_sys::Reflect::get(&input, &"checked".into()).ok()?.as_bool()?;
    Some((id, checked))
}

/// Form element that fired a submit event
pub fn submitted_form(ev: &web_sys::Event) -> Option<web_sys::HtmlFormElement> {
    ev.target()?.dyn_into::<web_sys::HtmlFormElement>().ok()
}

/// Run `task` once the route's markup is in the document
pub fn after_mount(task: impl Future<Output = ()> + 'static) {
    request_animation_frame(move || spawn_local(task));
}
