//! Request transport
//!
//! One request in, one raw response out. Status codes are not interpreted here.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

/// HTTP verbs used by the pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Mutating requests must carry the anti-forgery token
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

/// A request ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the backend origin, e.g. `/api/sports/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub csrf_token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            csrf_token: None,
        }
    }

    pub fn with_query(mut self, query: &[(&str, &str)]) -> Self {
        self.query = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path plus percent-encoded query string
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }

    /// Look up a query parameter by name
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status plus body text
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Carries one request to the backend.
///
/// Pages run on a single-threaded event loop, so futures are not `Send`.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}

/// Transport backed by `reqwest`; uses `fetch` when compiled to wasm32
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
    csrf_header: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, api: &ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf_header: api.csrf_header.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path_and_query());
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);
        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }
        if let Some(token) = &request.csrf_token {
            builder = builder.header(self.csrf_header.as_str(), token.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(ApiResponse { status, body })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_decode() {
        ApiError::Decode(e.to_string())
    } else {
        ApiError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_and_query_encodes_values() {
        let request = ApiRequest::new(Method::Get, "/api/meals/")
            .with_query(&[("record_date", "2024-05-01"), ("meal_type", "午餐 加餐")]);
        assert_eq!(
            request.path_and_query(),
            "/api/meals/?record_date=2024-05-01&meal_type=%E5%8D%88%E9%A4%90%20%E5%8A%A0%E9%A4%90"
        );
        assert_eq!(request.query_value("record_date"), Some("2024-05-01"));
    }

    #[test]
    fn test_path_without_query() {
        let request = ApiRequest::new(Method::Delete, "/api/sports/3/");
        assert_eq!(request.path_and_query(), "/api/sports/3/");
        assert!(request.method.is_mutating());
        assert!(!Method::Get.is_mutating());
    }

    #[test]
    fn test_success_range() {
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(302, "").is_success());
        assert!(!ApiResponse::new(403, "").is_success());
    }
}
