//! Navigation Component
//!
//! Bootstrap navbar with the page links, theme switch and logout.

use campus_health::pages::auth;
use leptos::*;
use leptos_router::*;

use crate::app::apply_theme;
use crate::context::Ctx;
use crate::state::global::GlobalState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let ctx = use_context::<Ctx>().expect("page context not provided");

    let toggle_ctx = ctx.clone();
    let toggle_theme = move |_: ev::MouseEvent| {
        let next = state.theme.get_untracked().toggle(toggle_ctx.durable.as_ref());
        apply_theme(next);
        state.theme.set(next);
    };

    let logout = move |ev: ev::MouseEvent| {
        ev.prevent_default();
        let ctx = ctx.clone();
        spawn_local(async move {
            let _ = auth::logout(&ctx).await;
        });
    };

    view! {
        <nav class="navbar navbar-expand-lg bg-body-tertiary border-bottom" class:opacity-75=move || state.busy.get()>
            <div class="container">
                <A href="/dashboard/" class="navbar-brand">
                    <i class="bi bi-heart-pulse-fill text-danger me-2"></i>
                    "校园健康"
                </A>
                <div class="navbar-nav me-auto">
                    <NavLink href="/dashboard/" label="仪表盘" />
                    <NavLink href="/sleep/" label="睡眠" />
                    <NavLink href="/sport/" label="运动" />
                    <NavLink href="/diet/" label="饮食" />
                    <NavLink href="/body-metrics/" label="身体指标" />
                    <NavLink href="/articles/" label="健康知识" />
                    <NavLink href="/friends/" label="好友" />
                    <NavLink href="/report/" label="健康报告" />
                </div>
                <div class="d-flex align-items-center gap-2">
                    <button type="button" class="btn btn-sm btn-outline-secondary" title="切换主题" on:click=toggle_theme>
                        {move || if state.theme.get().is_dark() {
                            view! { <i class="bi bi-sun-fill"></i> }
                        } else {
                            view! { <i class="bi bi-moon-stars-fill"></i> }
                        }}
                    </button>
                    <A href="/profile/" class="btn btn-sm btn-outline-primary">"个人档案"</A>
                    <a href="#" class="btn btn-sm btn-outline-danger" on:click=logout>"注销"</a>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A href=href class="nav-link" active_class="active">
            {label}
        </A>
    }
}
