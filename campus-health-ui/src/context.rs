//! Page Context Assembly
//!
//! Builds the one [`PageContext`] shared by the navbar and the routed page.

use std::rc::Rc;

use campus_health::config::Config;
use campus_health::{ApiClient, ConfigError, KeyValueStore, PageContext, ReqwestTransport};

use crate::browser::{page_csrf_token, BrowserHost, WebStorage};
use crate::charts::BrowserCharts;
use crate::state::global::GlobalState;

pub type Ctx = PageContext<ReqwestTransport, BrowserHost>;

const CONFIG_TOML: &str = include_str!("../campus-health.toml");

/// localStorage key overriding the backend origin
const API_BASE_KEY: &str = "api_base_url";

pub fn load_config() -> Result<Config, ConfigError> {
    Config::from_toml_str(CONFIG_TOML)
}

/// Stored override, then the configured origin, then the page's own origin
fn api_base(config: &Config) -> String {
    if let Some(url) = WebStorage::Local.get(API_BASE_KEY).filter(|u| !u.trim().is_empty()) {
        return url;
    }
    if !config.api.base_url.is_empty() {
        return config.api.base_url.clone();
    }
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

pub fn build_context(state: GlobalState, config: Config) -> Ctx {
    let config = {
        let base = api_base(&config);
        config.with_base_url(&base)
    };

    let transport = ReqwestTransport::new(&config.api.base_url, &config.api);
    let (field, cookie) = (config.api.csrf_field.clone(), config.api.csrf_cookie.clone());
    let client = ApiClient::new(transport).with_csrf_source(move || page_csrf_token(&field, &cookie));
    let host = BrowserHost::new(state, config.notifications.toast_delay_ms);

    PageContext::new(
        client,
        host,
        config,
        Rc::new(BrowserCharts::new()),
        Rc::new(WebStorage::Local),
        Rc::new(WebStorage::Session),
    )
}
