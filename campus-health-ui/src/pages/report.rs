//! Health Report Page

use std::rc::Rc;

use campus_health::common::dates::today;
use campus_health::pages::report::{ids, ReportPage};
use leptos::*;

use super::page_context;
use crate::dom::after_mount;
use crate::state::global::GlobalState;

#[component]
pub fn Report() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let page = Rc::new(ReportPage::new(page_context(), state.theme.get_untracked()));

    let first = Rc::clone(&page);
    after_mount(async move {
        first.reconcile(today()).await;
    });

    create_effect(move |_| {
        page.set_theme(state.theme.get());
    });

    view! {
        <h2 class="mb-4">"健康报告"</h2>
        <div id={ids::REPORT}>
            <div class="text-center py-5">
                <div class="spinner-border text-primary" role="status"></div>
                <p class="text-muted mt-2">"正在生成报告..."</p>
            </div>
        </div>
    }
}
