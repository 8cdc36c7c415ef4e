//! Chart Library Bindings
//!
//! ECharts and Chart.js are loaded by the page; this backend creates and
//! disposes their instances for the core's chart slots.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use campus_health::charts::ChartLibrary;
use campus_health::{ChartBackend, ChartConfig, ChartError, ChartHandle};
use wasm_bindgen::prelude::*;

use crate::browser::document;

#[wasm_bindgen]
extern "C" {
    type EChartsInstance;

    #[wasm_bindgen(js_namespace = echarts, js_name = init, catch)]
    fn echarts_init(element: &web_sys::Element) -> Result<EChartsInstance, JsValue>;

    #[wasm_bindgen(method, js_name = setOption, catch)]
    fn set_option(this: &EChartsInstance, options: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method)]
    fn dispose(this: &EChartsInstance);

    #[wasm_bindgen(js_name = Chart)]
    type ChartJs;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(canvas: &web_sys::Element, config: &JsValue) -> Result<ChartJs, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &ChartJs);
}

enum Instance {
    ECharts(EChartsInstance),
    ChartJs(ChartJs),
}

fn library_error(err: JsValue) -> ChartError {
    ChartError::Library(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// Live chart instances keyed by handle
#[derive(Default)]
pub struct BrowserCharts {
    next: Cell<u32>,
    live: RefCell<HashMap<u32, Instance>>,
}

impl BrowserCharts {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChartBackend for BrowserCharts {
    fn create(&self, canvas_id: &str, config: &ChartConfig) -> Result<ChartHandle, ChartError> {
        let element = document()
            .and_then(|d| d.get_element_by_id(canvas_id))
            .ok_or_else(|| ChartError::CanvasMissing(canvas_id.to_string()))?;
        let options = js_sys::JSON::parse(&config.options.to_string()).map_err(library_error)?;

        let instance = match config.library {
            ChartLibrary::ECharts => {
                let chart = echarts_init(&element).map_err(library_error)?;
                chart.set_option(&options).map_err(library_error)?;
                Instance::ECharts(chart)
            }
            ChartLibrary::ChartJs => Instance::ChartJs(ChartJs::new(&element, &options).map_err(library_error)?),
        };

        let id = self.next.get() + 1;
        self.next.set(id);
        self.live.borrow_mut().insert(id, instance);
        Ok(ChartHandle(id))
    }

    fn destroy(&self, handle: ChartHandle) {
        match self.live.borrow_mut().remove(&handle.0) {
            Some(Instance::ECharts(chart)) => chart.dispose(),
            Some(Instance::ChartJs(chart)) => chart.destroy(),
            None => {}
        }
    }
}
