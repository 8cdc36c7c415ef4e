//! Campus Health Web Client
//!
//! Client-side rendered Leptos application compiled to WebAssembly. Each route
//! mounts the page markup and drives it through a controller from the
//! `campus_health` crate.

use leptos::*;

mod app;
mod browser;
mod charts;
mod components;
mod context;
mod dom;
mod pages;
mod state;

fn main() {
    console_error_panic_hook::set_once();

    let logging = context::load_config().map(|c| c.logging).unwrap_or_default();
    if let Err(err) = campus_health::logging::init(&logging, browser::ConsoleMakeWriter) {
        web_sys::console::warn_1(&err.to_string().into());
    }

    mount_to_body(|| view! { <app::App /> });
}
