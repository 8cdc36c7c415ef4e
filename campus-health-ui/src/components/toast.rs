//! Toast Notification Component
//!
//! Stacked Bootstrap toasts fed by [`GlobalState::push_toast`].

use leptos::*;

use crate::state::global::{GlobalState, ToastEntry};

/// Toast container, bottom right
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="toast-container position-fixed bottom-0 end-0 p-3">
            <For
                each=move || state.toasts.get()
                key=|entry| entry.id
                children=move |entry| view! { <ToastMessage entry=entry /> }
            />
        </div>
    }
}

#[component]
fn ToastMessage(entry: ToastEntry) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let id = entry.id;
    let notice = entry.notice;

    view! {
        <div class={format!("toast show align-items-center border-0 {}", notice.css_class())} role="alert" aria-live="assertive" aria-atomic="true">
            <div class="d-flex">
                <div class="toast-body">
                    <i class={format!("bi bi-{} me-2", notice.icon)}></i>
                    {notice.message.clone()}
                </div>
                <button
                    type="button"
                    class="btn-close btn-close-white me-2 m-auto"
                    aria-label="Close"
                    on:click=move |_| state.dismiss_toast(id)
                ></button>
            </div>
        </div>
    }
}
