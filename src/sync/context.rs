//! Per-page wiring

use std::rc::Rc;

use crate::charts::{ChartBackend, ChartSlot};
use crate::config::Config;
use crate::host::{Host, KeyValueStore};
use crate::http::ApiClient;

/// Everything a page controller needs from its environment.
///
/// Built once per page by the UI and cloned into each controller.
pub struct PageContext<T, H> {
    pub client: Rc<ApiClient<T>>,
    pub host: H,
    pub config: Rc<Config>,
    pub charts: Rc<dyn ChartBackend>,
    /// Survives browser restarts (theme, signed-in user)
    pub durable: Rc<dyn KeyValueStore>,
    /// Cleared with the browsing session (alert-shown flags)
    pub session: Rc<dyn KeyValueStore>,
}

impl<T, H: Host> PageContext<T, H> {
    pub fn new(
        client: ApiClient<T>,
        host: H,
        config: Config,
        charts: Rc<dyn ChartBackend>,
        durable: Rc<dyn KeyValueStore>,
        session: Rc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            client: Rc::new(client),
            host,
            config: Rc::new(config),
            charts,
            durable,
            session,
        }
    }

    /// A chart slot bound to `canvas_id` using this page's chart backend
    pub fn chart_slot(&self, canvas_id: &str) -> ChartSlot {
        ChartSlot::new(canvas_id, Rc::clone(&self.charts))
    }
}

impl<T, H: Clone> Clone for PageContext<T, H> {
    fn clone(&self) -> Self {
        Self {
            client: Rc::clone(&self.client),
            host: self.host.clone(),
            config: Rc::clone(&self.config),
            charts: Rc::clone(&self.charts),
            durable: Rc::clone(&self.durable),
            session: Rc::clone(&self.session),
        }
    }
}
