//! Chart Adapters
//!
//! Charts are drawn by external libraries (ECharts, Chart.js). This module owns
//! their lifecycle: a [`ChartSlot`] always destroys the instance bound to its
//! canvas before creating the next one, so reloads never stack render contexts.

pub mod builders;

use std::cell::Cell;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

/// Library that interprets a [`ChartConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartLibrary {
    ECharts,
    ChartJs,
}

/// Options object handed verbatim to the chart library
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub library: ChartLibrary,
    pub options: Value,
}

/// Opaque id of a live chart instance, issued by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle(pub u32);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChartError {
    #[error("Canvas not found: {0}")]
    CanvasMissing(String),

    #[error("Chart library error: {0}")]
    Library(String),
}

/// Creates and destroys chart instances on named canvases
pub trait ChartBackend {
    fn create(&self, canvas_id: &str, config: &ChartConfig) -> Result<ChartHandle, ChartError>;
    fn destroy(&self, handle: ChartHandle);
}

/// The single chart instance bound to one canvas, owned by a page controller
pub struct ChartSlot {
    canvas_id: String,
    backend: Rc<dyn ChartBackend>,
    current: Cell<Option<ChartHandle>>,
}

impl ChartSlot {
    pub fn new(canvas_id: &str, backend: Rc<dyn ChartBackend>) -> Self {
        Self {
            canvas_id: canvas_id.to_string(),
            backend,
            current: Cell::new(None),
        }
    }

    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    pub fn is_active(&self) -> bool {
        self.current.get().is_some()
    }

    /// Destroy the previous instance, then draw `config`
    pub fn replace(&self, config: &ChartConfig) -> Result<(), ChartError> {
        self.clear();
        let handle = self.backend.create(&self.canvas_id, config)?;
        debug!(canvas = %self.canvas_id, handle = handle.0, "chart created");
        self.current.set(Some(handle));
        Ok(())
    }

    /// Draw `config` when present, otherwise tear the current chart down
    pub fn show(&self, config: Option<ChartConfig>) -> Result<(), ChartError> {
        match config {
            Some(config) => self.replace(&config),
            None => {
                self.clear();
                Ok(())
            }
        }
    }

    pub fn clear(&self) {
        if let Some(handle) = self.current.take() {
            debug!(canvas = %self.canvas_id, handle = handle.0, "chart destroyed");
            self.backend.destroy(handle);
        }
    }
}

impl Drop for ChartSlot {
    fn drop(&mut self) {
        self.clear();
    }
}
