//! Test doubles
//!
//! An in-memory REST backend, a host that records every side effect, and a
//! chart backend that counts live instances. [`Harness`] wires them into a
//! [`PageContext`] the way the UI does.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::charts::{ChartBackend, ChartConfig, ChartError, ChartHandle};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::host::{Host, KeyValueStore, Notice};
use crate::http::{ApiClient, ApiRequest, ApiResponse, Method, Transport};
use crate::sync::PageContext;

// ============ MockBackend ============

struct Scripted {
    method: Method,
    path: String,
    status: u16,
    body: String,
}

#[derive(Default)]
struct BackendState {
    collections: HashMap<String, Vec<Value>>,
    next_ids: HashMap<String, u64>,
    scripted: Vec<Scripted>,
    log: Vec<ApiRequest>,
    network_down_once: bool,
}

impl BackendState {
    fn next_id(&mut self, collection: &str) -> u64 {
        let id = self.next_ids.entry(collection.to_string()).or_insert(0);
        *id += 1;
        *id
    }

    fn records(&self, collection: &str) -> &[Value] {
        self.collections.get(collection).map(Vec::as_slice).unwrap_or(&[])
    }

    fn find(&self, collection: &str, id: u64) -> Option<usize> {
        self.records(collection)
            .iter()
            .position(|r| r.get("id").and_then(Value::as_u64) == Some(id))
    }

    /// Server-computed fields for meal items
    fn derive(&self, collection: &str, record: &mut Value) {
        if collection != "meal-items" {
            return;
        }
        let food_id = record.get("food_item").and_then(Value::as_u64);
        let food = food_id.and_then(|id| self.find("foods", id).map(|i| &self.records("foods")[i]));
        let portion = record.get("portion").and_then(Value::as_f64).unwrap_or(0.0);
        if let (Some(food), Some(obj)) = (food, record.as_object_mut()) {
            let per_100g = food.get("calories_per_100g").and_then(Value::as_f64).unwrap_or(0.0);
            obj.insert("calories_calculated".into(), Value::from(portion * per_100g / 100.0));
            obj.insert("food_item_name".into(), food.get("name").cloned().unwrap_or(Value::Null));
        }
    }

    /// Meals are served with their nested items and total
    fn present(&self, collection: &str, record: &Value) -> Value {
        let mut record = record.clone();
        if collection == "meals" {
            let id = record.get("id").and_then(Value::as_u64);
            let items: Vec<Value> = self
                .records("meal-items")
                .iter()
                .filter(|item| item.get("meal").and_then(Value::as_u64) == id)
                .cloned()
                .collect();
            let total: f64 = items
                .iter()
                .filter_map(|item| item.get("calories_calculated").and_then(Value::as_f64))
                .fold(0.0, |acc, c| acc + c);
            if let Some(obj) = record.as_object_mut() {
                obj.insert("meal_items".into(), Value::Array(items));
                obj.insert("total_calories".into(), Value::from(total));
            }
        }
        record
    }
}

fn query_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_response(status: u16, value: &Value) -> ApiResponse {
    ApiResponse::new(status, value.to_string())
}

fn not_found() -> ApiResponse {
    ApiResponse::new(404, r#"{"detail": "未找到。"}"#)
}

/// REST collections held in memory, routed as `/api/{collection}/[{id}/[{action}/]]`
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Rc<RefCell<BackendState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record with the next id of its collection, starting at 1
    pub fn seed(&self, collection: &str, record: Value) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id(collection);
        let mut record = record;
        if let Some(obj) = record.as_object_mut() {
            obj.insert("id".into(), Value::from(id));
        }
        state.derive(collection, &mut record);
        state.collections.entry(collection.to_string()).or_default().push(record);
        id
    }

    /// Fixed reply for `method` on `path`, whatever the query. The latest script wins.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) {
        self.state.borrow_mut().scripted.push(Scripted {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
    }

    /// The next request fails before reaching the server
    pub fn fail_next_with_network(&self) {
        self.state.borrow_mut().network_down_once = true;
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.borrow().log.clone()
    }

    pub fn last_request(&self, method: Method) -> Option<ApiRequest> {
        self.state.borrow().log.iter().rev().find(|r| r.method == method).cloned()
    }

    fn route(&self, request: &ApiRequest) -> ApiResponse {
        let mut state = self.state.borrow_mut();

        if let Some(s) = state
            .scripted
            .iter()
            .rev()
            .find(|s| s.method == request.method && s.path == request.path)
        {
            return ApiResponse::new(s.status, s.body.clone());
        }

        let segments: Vec<&str> = request.path.trim_matches('/').split('/').collect();
        let (collection, id, action) = match segments.as_slice() {
            ["api", collection] => (*collection, None, None),
            ["api", collection, id] => (*collection, Some(*id), None),
            ["api", collection, id, action] => (*collection, Some(*id), Some(*action)),
            _ => return not_found(),
        };
        let id = match id.map(str::parse::<u64>) {
            None => None,
            Some(Ok(id)) => Some(id),
            Some(Err(_)) => return not_found(),
        };
        let body = request.body.clone().unwrap_or_else(|| Value::Object(Map::new()));

        match (request.method, id) {
            (Method::Get, None) => {
                let listed: Vec<Value> = state
                    .records(collection)
                    .iter()
                    .filter(|r| {
                        request
                            .query
                            .iter()
                            .all(|(k, v)| r.get(k).map(query_text).as_deref() == Some(v.as_str()))
                    })
                    .map(|r| state.present(collection, r))
                    .collect();
                json_response(200, &Value::Array(listed))
            }
            (Method::Get, Some(id)) => match state.find(collection, id) {
                Some(i) => {
                    let record = state.present(collection, &state.records(collection)[i]);
                    json_response(200, &record)
                }
                None => not_found(),
            },
            (Method::Post, None) => {
                let id = state.next_id(collection);
                let mut record = body;
                if let Some(obj) = record.as_object_mut() {
                    obj.insert("id".into(), Value::from(id));
                }
                state.derive(collection, &mut record);
                let presented = state.present(collection, &record);
                state.collections.entry(collection.to_string()).or_default().push(record);
                json_response(201, &presented)
            }
            (Method::Put | Method::Patch, Some(id)) => {
                let Some(index) = state.find(collection, id) else {
                    return not_found();
                };
                let mut record = state.records(collection)[index].clone();
                match (request.method, action) {
                    (_, Some("accept")) => {
                        record["status"] = Value::from("accepted");
                    }
                    (Method::Put, None) => {
                        record = body;
                        if let Some(obj) = record.as_object_mut() {
                            obj.insert("id".into(), Value::from(id));
                        }
                    }
                    _ => {
                        if let (Some(target), Value::Object(patch)) = (record.as_object_mut(), body) {
                            target.extend(patch);
                        }
                    }
                }
                state.derive(collection, &mut record);
                let presented = state.present(collection, &record);
                if let Some(records) = state.collections.get_mut(collection) {
                    records[index] = record;
                }
                json_response(200, &presented)
            }
            (Method::Delete, Some(id)) => match state.find(collection, id) {
                Some(index) => {
                    if let Some(records) = state.collections.get_mut(collection) {
                        records.remove(index);
                    }
                    ApiResponse::new(204, "")
                }
                None => not_found(),
            },
            _ => ApiResponse::new(405, r#"{"detail": "方法不被允许。"}"#),
        }
    }
}

#[async_trait(?Send)]
impl Transport for MockBackend {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.state.borrow_mut().log.push(request.clone());
        let down = std::mem::take(&mut self.state.borrow_mut().network_down_once);
        if down {
            return Err(ApiError::Network("connection reset".into()));
        }
        Ok(self.route(&request))
    }
}

// ============ RecordingHost ============

#[derive(Default)]
struct HostState {
    rendered: HashMap<String, String>,
    notices: Vec<Notice>,
    confirmations: Vec<String>,
    navigations: Vec<String>,
    scheduled: Vec<(u32, Box<dyn FnOnce()>)>,
    scheduled_delays: Vec<u32>,
    busy: Vec<bool>,
    texts: HashMap<String, String>,
    values: HashMap<String, String>,
    disabled: HashMap<String, bool>,
    hidden: HashMap<String, bool>,
    classes: HashMap<String, String>,
    modals: HashMap<String, bool>,
}

/// Host that records side effects. Scheduled tasks wait for [`RecordingHost::run_scheduled`].
#[derive(Clone)]
pub struct RecordingHost {
    state: Rc<RefCell<HostState>>,
    accept_confirm: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(HostState::default())),
            accept_confirm: true,
        }
    }

    /// Answers "no" to every confirmation
    pub fn declining() -> Self {
        Self {
            accept_confirm: false,
            ..Self::new()
        }
    }

    pub fn rendered(&self, slot: &str) -> Option<String> {
        self.state.borrow().rendered.get(slot).cloned()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.state.borrow().notices.clone()
    }

    pub fn last_notice(&self) -> Option<Notice> {
        self.state.borrow().notices.last().cloned()
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.state.borrow().confirmations.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.borrow().navigations.clone()
    }

    /// Delays of every task scheduled so far, run or not
    pub fn scheduled_delays(&self) -> Vec<u32> {
        self.state.borrow().scheduled_delays.clone()
    }

    /// Run pending tasks in delay order
    pub fn run_scheduled(&self) {
        let mut tasks = std::mem::take(&mut self.state.borrow_mut().scheduled);
        tasks.sort_by_key(|(delay, _)| *delay);
        for (_, task) in tasks {
            task();
        }
    }

    pub fn busy_history(&self) -> Vec<bool> {
        self.state.borrow().busy.clone()
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.state.borrow().texts.get(id).cloned()
    }

    pub fn value(&self, id: &str) -> Option<String> {
        self.state.borrow().values.get(id).cloned()
    }

    pub fn disabled(&self, id: &str) -> Option<bool> {
        self.state.borrow().disabled.get(id).copied()
    }

    pub fn hidden(&self, id: &str) -> Option<bool> {
        self.state.borrow().hidden.get(id).copied()
    }

    pub fn modal(&self, id: &str) -> Option<bool> {
        self.state.borrow().modals.get(id).copied()
    }

    pub fn class(&self, id: &str) -> Option<String> {
        self.state.borrow().classes.get(id).cloned()
    }
}

impl Host for RecordingHost {
    fn render(&self, slot: &str, html: String) {
        self.state.borrow_mut().rendered.insert(slot.to_string(), html);
    }

    fn notify(&self, notice: Notice) {
        self.state.borrow_mut().notices.push(notice);
    }

    fn confirm(&self, message: &str) -> bool {
        self.state.borrow_mut().confirmations.push(message.to_string());
        self.accept_confirm
    }

    fn navigate(&self, url: &str) {
        self.state.borrow_mut().navigations.push(url.to_string());
    }

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let mut state = self.state.borrow_mut();
        state.scheduled_delays.push(delay_ms);
        state.scheduled.push((delay_ms, task));
    }

    fn set_busy(&self, busy: bool) {
        self.state.borrow_mut().busy.push(busy);
    }

    fn set_text(&self, id: &str, text: &str) {
        self.state.borrow_mut().texts.insert(id.to_string(), text.to_string());
    }

    fn set_value(&self, id: &str, value: &str) {
        self.state.borrow_mut().values.insert(id.to_string(), value.to_string());
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        self.state.borrow_mut().disabled.insert(id.to_string(), disabled);
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        self.state.borrow_mut().hidden.insert(id.to_string(), hidden);
    }

    fn set_class(&self, id: &str, class: &str) {
        self.state.borrow_mut().classes.insert(id.to_string(), class.to_string());
    }

    fn show_modal(&self, id: &str, visible: bool) {
        self.state.borrow_mut().modals.insert(id.to_string(), visible);
    }
}

// ============ MemoryStore ============

#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

// ============ RecordingCharts ============

#[derive(Default)]
struct ChartState {
    next: u32,
    live: HashMap<ChartHandle, String>,
    destroyed: usize,
    fail_next: bool,
}

/// Chart backend that tracks which canvases hold a live instance
#[derive(Clone, Default)]
pub struct RecordingCharts {
    state: Rc<RefCell<ChartState>>,
}

impl RecordingCharts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_on(&self, canvas_id: &str) -> usize {
        self.state.borrow().live.values().filter(|c| c.as_str() == canvas_id).count()
    }

    pub fn destroyed_count(&self) -> usize {
        self.state.borrow().destroyed
    }

    /// The next `create` fails as if the canvas were missing
    pub fn fail_next(&self) {
        self.state.borrow_mut().fail_next = true;
    }
}

impl ChartBackend for RecordingCharts {
    fn create(&self, canvas_id: &str, _config: &ChartConfig) -> Result<ChartHandle, ChartError> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_next) {
            return Err(ChartError::CanvasMissing(canvas_id.to_string()));
        }
        state.next += 1;
        let handle = ChartHandle(state.next);
        state.live.insert(handle, canvas_id.to_string());
        Ok(handle)
    }

    fn destroy(&self, handle: ChartHandle) {
        let mut state = self.state.borrow_mut();
        if state.live.remove(&handle).is_some() {
            state.destroyed += 1;
        }
    }
}

// ============ Harness ============

/// A page context over the doubles above, with the default configuration
pub struct Harness {
    pub ctx: PageContext<MockBackend, RecordingHost>,
    pub host: RecordingHost,
    pub backend: MockBackend,
    pub charts: RecordingCharts,
    pub durable: Rc<MemoryStore>,
    pub session: Rc<MemoryStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_host(RecordingHost::new())
    }

    /// Every confirmation is declined
    pub fn declining() -> Self {
        Self::with_host(RecordingHost::declining())
    }

    fn with_host(host: RecordingHost) -> Self {
        let backend = MockBackend::new();
        let charts = RecordingCharts::new();
        let durable = Rc::new(MemoryStore::new());
        let session = Rc::new(MemoryStore::new());
        let client = ApiClient::new(backend.clone()).with_csrf_source(|| Some("test-csrf-token".to_string()));

        let ctx = PageContext::new(
            client,
            host.clone(),
            Config::default(),
            Rc::new(charts.clone()),
            durable.clone(),
            session.clone(),
        );
        Self {
            ctx,
            host,
            backend,
            charts,
            durable,
            session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_meal_items_are_derived_and_nested() {
        let backend = MockBackend::new();
        backend.seed("foods", json!({"name": "米饭", "calories_per_100g": 116.0}));
        let meal = backend.seed("meals", json!({"meal_type": "lunch", "record_date": "2024-05-01"}));
        backend.seed("meal-items", json!({"meal": meal, "food_item": 1, "portion": 200.0}));

        let response = backend
            .send(ApiRequest::new(Method::Get, "/api/meals/").with_query(&[("record_date", "2024-05-01")]))
            .await
            .unwrap();
        let meals: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(meals[0]["total_calories"], json!(232.0));
        assert_eq!(meals[0]["meal_items"][0]["food_item_name"], json!("米饭"));
    }

    #[tokio::test]
    async fn test_unknown_item_and_scripted_override() {
        let backend = MockBackend::new();
        let missing = backend.send(ApiRequest::new(Method::Get, "/api/sports/9/")).await.unwrap();
        assert_eq!(missing.status, 404);

        backend.respond(Method::Get, "/api/sports/", 500, "");
        let scripted = backend
            .send(ApiRequest::new(Method::Get, "/api/sports/").with_query(&[("record_date", "x")]))
            .await
            .unwrap();
        assert_eq!(scripted.status, 500);
        let post = backend.send(ApiRequest::new(Method::Post, "/api/sports/")).await.unwrap();
        assert_eq!(post.status, 201);
    }

    #[test]
    fn test_scheduled_tasks_wait() {
        let host = RecordingHost::new();
        let inner = host.clone();
        host.schedule(3000, Box::new(move || inner.navigate("/login/")));
        assert!(host.navigations().is_empty());
        host.run_scheduled();
        assert_eq!(host.navigations(), vec!["/login/".to_string()]);
        assert_eq!(host.scheduled_delays(), vec![3000]);
    }
}
