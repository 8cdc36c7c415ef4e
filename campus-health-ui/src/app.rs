//! App Root Component
//!
//! Routing, global state and the shared page context.

use campus_health::common::{check_health_alerts, CurrentUser, Theme};
use campus_health::Host;
use leptos::*;
use leptos_router::*;
use tracing::error;

use crate::browser::{document, prefers_dark, WebStorage};
use crate::components::{Nav, Toast};
use crate::context::{build_context, load_config, Ctx};
use crate::pages::{
    Articles, BodyMetrics, Dashboard, Diet, Friends, Login, Profile, Register, Report, Sleep, Sport,
};
use crate::state::global::{provide_global_state, GlobalState};

/// Mirror the theme onto `<html data-bs-theme>`
pub fn apply_theme(theme: Theme) {
    if let Some(root) = document().and_then(|d| d.document_element()) {
        let _ = root.set_attribute("data-bs-theme", theme.as_str());
    }
}

/// One alert pass per page load, shortly after the page settles
fn schedule_health_alerts(ctx: &Ctx) {
    if CurrentUser::load(ctx.durable.as_ref()).is_none() {
        return;
    }
    let task = ctx.clone();
    ctx.host.schedule(
        ctx.config.notifications.alert_check_delay_ms,
        Box::new(move || {
            spawn_local(async move {
                check_health_alerts(&task).await;
            })
        }),
    );
}

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let theme = Theme::load(&WebStorage::Local, prefers_dark());
    apply_theme(theme);
    provide_global_state(theme);
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "embedded configuration rejected");
            return view! {
                <div class="container mt-5">
                    <div class="alert alert-danger">"配置加载失败: " {err.to_string()}</div>
                </div>
            }
            .into_view();
        }
    };
    let ctx = build_context(state, config);
    schedule_health_alerts(&ctx);
    provide_context(ctx);

    view! {
        <Router>
            <Nav />
            <main class="container py-4">
                <Routes>
                    <Route path="/" view=|| view! { <Redirect path="/dashboard/" /> } />
                    <Route path="/dashboard" view=Dashboard />
                    <Route path="/sleep" view=Sleep />
                    <Route path="/sport" view=Sport />
                    <Route path="/diet" view=Diet />
                    <Route path="/body-metrics" view=BodyMetrics />
                    <Route path="/articles" view=Articles />
                    <Route path="/friends" view=Friends />
                    <Route path="/report" view=Report />
                    <Route path="/profile" view=Profile />
                    <Route path="/login" view=Login />
                    <Route path="/register" view=Register />
                    <Route path="/*any" view=NotFound />
                </Routes>
            </main>
            <Toast />
        </Router>
    }
    .into_view()
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="text-center py-5">
            <h1 class="display-4">"404"</h1>
            <p class="text-muted">"页面不存在"</p>
            <A href="/dashboard/" class="btn btn-primary">"返回首页"</A>
        </div>
    }
}
