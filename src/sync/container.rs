//! Container loads
//!
//! A container is one DOM slot whose content mirrors one filtered resource
//! query. Each load replaces the cached view wholesale; nothing is merged.

use std::cell::RefCell;
use std::future::Future;

use tracing::{debug, error, warn};

use super::context::PageContext;
use super::fence::RequestFence;
use super::mutation::escalate_auth;
use crate::error::{ApiError, ApiResult};
use crate::host::Host;
use crate::render;

/// How a failed load affects the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// The page's main collection: failures replace the container with a retry link
    /// and auth failures redirect to login.
    Primary,
    /// Auxiliary data (comments, recommendations, goal rings): failures are logged
    /// and the rest of the page stays usable.
    Secondary,
}

/// Result of [`Container::load`]
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<V> {
    /// The response is current and is now the cached view; the caller renders it.
    Applied(V),
    /// A newer load was issued while this one was in flight; nothing was touched.
    Stale,
    /// The failure has already been surfaced.
    Failed(ApiError),
}

impl<V> LoadOutcome<V> {
    pub fn applied(self) -> Option<V> {
        match self {
            LoadOutcome::Applied(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, LoadOutcome::Stale)
    }
}

/// A DOM slot plus its request fence and last applied view
pub struct Container<V> {
    slot: String,
    fence: RequestFence,
    view: RefCell<Option<V>>,
    error_markup: fn(&str) -> String,
    degraded_markup: Option<String>,
}

impl<V: Clone> Container<V> {
    pub fn new(slot: &str) -> Self {
        Self {
            slot: slot.to_string(),
            fence: RequestFence::new(),
            view: RefCell::new(None),
            error_markup: render::error_state,
            degraded_markup: None,
        }
    }

    /// Markup used when a primary load fails; receives the escaped message
    pub fn with_error_markup(mut self, markup: fn(&str) -> String) -> Self {
        self.error_markup = markup;
        self
    }

    /// Markup rendered when a secondary load fails. Without it the slot is left as is.
    pub fn with_degraded_markup(mut self, html: impl Into<String>) -> Self {
        self.degraded_markup = Some(html.into());
        self
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn fence(&self) -> &RequestFence {
        &self.fence
    }

    /// Copy of the last applied view
    pub fn view(&self) -> Option<V> {
        self.view.borrow().clone()
    }

    pub fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.view.borrow().as_ref().map(f)
    }

    /// In-place patch of the cached view. Returns false when nothing is cached.
    pub fn patch_view(&self, f: impl FnOnce(&mut V)) -> bool {
        match self.view.borrow_mut().as_mut() {
            Some(view) => {
                f(view);
                true
            }
            None => false,
        }
    }

    /// Run `fetch` under a fresh ticket and apply the result if it is still current
    pub async fn load<T, H, F>(&self, ctx: &PageContext<T, H>, kind: LoadKind, fetch: F) -> LoadOutcome<V>
    where
        H: Host,
        F: Future<Output = ApiResult<V>>,
    {
        let ticket = self.fence.issue();
        debug!(slot = %self.slot, ticket = ticket.sequence(), "load issued");

        let result = fetch.await;

        if !self.fence.is_current(ticket) {
            match &result {
                Ok(_) => debug!(slot = %self.slot, ticket = ticket.sequence(), "discarding stale response"),
                Err(err) => warn!(slot = %self.slot, ticket = ticket.sequence(), error = %err, "stale load failed"),
            }
            return LoadOutcome::Stale;
        }

        match result {
            Ok(view) => {
                *self.view.borrow_mut() = Some(view.clone());
                LoadOutcome::Applied(view)
            }
            Err(err) => {
                self.fail(ctx, kind, &err);
                LoadOutcome::Failed(err)
            }
        }
    }

    fn fail<T, H: Host>(&self, ctx: &PageContext<T, H>, kind: LoadKind, err: &ApiError) {
        match kind {
            LoadKind::Primary => {
                *self.view.borrow_mut() = None;
                if err.is_auth() {
                    escalate_auth(ctx, &err.user_message());
                    return;
                }
                error!(slot = %self.slot, error = %err, "load failed");
                let message = render::escape_html(&err.user_message());
                ctx.host.render(&self.slot, (self.error_markup)(&message));
            }
            LoadKind::Secondary => {
                warn!(slot = %self.slot, error = %err, "auxiliary load failed");
                if let Some(html) = &self.degraded_markup {
                    ctx.host.render(&self.slot, html.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::testing::Harness;

    #[tokio::test]
    async fn test_applied_view_is_cached() {
        let harness = Harness::new();
        let container: Container<Vec<u32>> = Container::new("list");

        let outcome = container
            .load(&harness.ctx, LoadKind::Primary, async { Ok(vec![1, 2, 3]) })
            .await;
        assert_eq!(outcome, LoadOutcome::Applied(vec![1, 2, 3]));
        assert_eq!(container.view(), Some(vec![1, 2, 3]));

        container.load(&harness.ctx, LoadKind::Primary, async { Ok(vec![9]) }).await;
        assert_eq!(container.view(), Some(vec![9]));
    }

    #[tokio::test]
    async fn test_superseded_response_is_discarded() {
        let harness = Harness::new();
        let container: Container<&'static str> = Container::new("list");

        // A newer load starts while the first is still in flight.
        let outcome = container
            .load(&harness.ctx, LoadKind::Primary, async {
                container.fence().issue();
                Ok("old date")
            })
            .await;

        assert!(outcome.is_stale());
        assert_eq!(container.view(), None);
        assert!(harness.host.rendered("list").is_none());
    }

    #[tokio::test]
    async fn test_stale_failure_is_not_rendered() {
        let harness = Harness::new();
        let container: Container<u32> = Container::new("list");

        let outcome = container
            .load(&harness.ctx, LoadKind::Primary, async {
                container.fence().issue();
                Err(ApiError::Network("reset".into()))
            })
            .await;

        assert!(outcome.is_stale());
        assert!(harness.host.rendered("list").is_none());
        assert!(harness.host.notices().is_empty());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stale_failure_is_logged() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let harness = Harness::new();
        let container: Container<u32> = Container::new("list");
        let outcome = container
            .load(&harness.ctx, LoadKind::Primary, async {
                container.fence().issue();
                Err(ApiError::Network("reset".into()))
            })
            .await;
        assert!(outcome.is_stale());

        let lines = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(lines.contains("WARN"));
        assert!(lines.contains("stale load failed"));
        assert!(lines.contains("slot=list"));
        assert!(lines.contains("reset"));
    }

    #[tokio::test]
    async fn test_primary_failure_renders_retry() {
        let harness = Harness::new();
        let container: Container<u32> = Container::new("summary");

        let outcome = container
            .load(&harness.ctx, LoadKind::Primary, async {
                Err(ApiError::Server { status: 500, message: "<b>boom</b>".into() })
            })
            .await;

        assert!(matches!(outcome, LoadOutcome::Failed(ApiError::Server { .. })));
        let html = harness.host.rendered("summary").unwrap();
        assert!(html.contains("&lt;b&gt;boom&lt;/b&gt;"));
        assert!(html.contains("刷新页面"));
    }

    #[tokio::test]
    async fn test_secondary_failure_degrades_quietly() {
        let harness = Harness::new();
        let plain: Container<u32> = Container::new("goals");
        let with_fallback: Container<u32> =
            Container::new("comments").with_degraded_markup("<p>评论暂不可用</p>");

        plain
            .load(&harness.ctx, LoadKind::Secondary, async { Err(ApiError::Network("x".into())) })
            .await;
        with_fallback
            .load(&harness.ctx, LoadKind::Secondary, async { Err(ApiError::Network("x".into())) })
            .await;

        assert!(harness.host.rendered("goals").is_none());
        assert_eq!(harness.host.rendered("comments").unwrap(), "<p>评论暂不可用</p>");
        assert!(harness.host.notices().is_empty());
        assert!(harness.host.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_auth_failure_schedules_login() {
        let harness = Harness::new();
        let container: Container<u32> = Container::new("summary");

        container
            .load(&harness.ctx, LoadKind::Primary, async {
                Err(ApiError::AuthRequired { status: 403, message: "请先登录".into() })
            })
            .await;

        assert_eq!(harness.host.notices()[0].message, "请先登录");
        assert!(harness.host.navigations().is_empty());
        assert_eq!(harness.host.scheduled_delays(), vec![3000]);

        harness.host.run_scheduled();
        assert_eq!(harness.host.navigations(), vec!["/login/".to_string()]);
    }
}
