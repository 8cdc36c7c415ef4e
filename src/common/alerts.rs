//! Health alert toasts
//!
//! Alerts are fetched once per page load and each alert code is shown at most
//! once per browsing session.

use std::rc::Rc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::host::{Host, KeyValueStore, Notice};
use crate::http::Transport;
use crate::sync::PageContext;

pub const ALERTS_PATH: &str = "/api/alerts/check/";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthAlert {
    pub alert_code: String,
    pub message: String,
}

fn shown_key(code: &str) -> String {
    format!("alert_shown_{}", code)
}

/// Fetch pending alerts and schedule a staggered warning toast for each one not
/// yet shown this session. Returns the number of toasts scheduled. Failures are
/// only logged.
pub async fn check_health_alerts<T: Transport, H: Host>(ctx: &PageContext<T, H>) -> usize {
    let alerts: Vec<HealthAlert> = match ctx.client.get(ALERTS_PATH, &[]).await {
        Ok(alerts) => alerts,
        Err(e) => {
            warn!(error = %e, "health alert check failed");
            return 0;
        }
    };

    let stagger = ctx.config.notifications.alert_stagger_ms;
    let mut scheduled = 0;

    for (index, alert) in alerts.into_iter().enumerate() {
        let key = shown_key(&alert.alert_code);
        if ctx.session.get(&key).is_some() {
            debug!(code = %alert.alert_code, "alert already shown this session");
            continue;
        }

        let host = ctx.host.clone();
        let session: Rc<dyn KeyValueStore> = Rc::clone(&ctx.session);
        ctx.host.schedule(
            stagger * index as u32,
            Box::new(move || {
                host.notify(Notice::warning(alert.message).with_icon("exclamation-triangle-fill"));
                session.set(&key, "true");
            }),
        );
        scheduled += 1;
    }

    scheduled
}
