//! Global Application State
//!
//! Reactive state using Leptos signals. Page data lives in the controllers;
//! only what the chrome around the pages renders is kept here.

use campus_health::common::Theme;
use campus_health::Notice;
use gloo_timers::callback::Timeout;
use leptos::*;

/// One visible toast
#[derive(Clone, Debug, PartialEq)]
pub struct ToastEntry {
    pub id: u64,
    pub notice: Notice,
}

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Toasts currently on screen, oldest first
    pub toasts: RwSignal<Vec<ToastEntry>>,
    next_toast: RwSignal<u64>,
    /// Wait cursor while a dashboard load runs
    pub busy: RwSignal<bool>,
    pub theme: RwSignal<Theme>,
}

/// Provide global state to the component tree
pub fn provide_global_state(theme: Theme) {
    provide_context(GlobalState {
        toasts: create_rw_signal(Vec::new()),
        next_toast: create_rw_signal(0),
        busy: create_rw_signal(false),
        theme: create_rw_signal(theme),
    });
}

impl GlobalState {
    /// Show a toast that removes itself after `delay_ms`
    pub fn push_toast(&self, notice: Notice, delay_ms: u32) {
        let id = self.next_toast.get_untracked() + 1;
        self.next_toast.set(id);
        self.toasts.update(|toasts| toasts.push(ToastEntry { id, notice }));

        let toasts = self.toasts;
        Timeout::new(delay_ms, move || toasts.update(|t| t.retain(|entry| entry.id != id))).forget();
    }

    pub fn dismiss_toast(&self, id: u64) {
        self.toasts.update(|t| t.retain(|entry| entry.id != id));
    }
}
