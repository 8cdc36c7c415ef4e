//! API Client
//!
//! Credentialed JSON requests against the REST backend. One call is one
//! request: no cache, no retry, no timeout.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{ApiError, ApiResult};

/// Supplies the anti-forgery token at request time
pub type TokenSource = Rc<dyn Fn() -> Option<String>>;

/// REST client shared by every controller on a page
pub struct ApiClient<T> {
    transport: T,
    csrf_token: Option<TokenSource>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            csrf_token: None,
        }
    }

    /// Attach the token lookup used on every mutating request
    pub fn with_csrf_source(mut self, source: impl Fn() -> Option<String> + 'static) -> Self {
        self.csrf_token = Some(Rc::new(source));
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Read request; `query` values are sent percent-encoded
    pub async fn get<R: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<R> {
        let request = ApiRequest::new(Method::Get, path).with_query(query);
        let response = self.execute(request).await?;
        decode(&response)
    }

    /// Write request with a JSON body
    pub async fn send<B, R>(&self, method: Method, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let request = ApiRequest::new(method, path).with_body(body);
        let response = self.execute(request).await?;
        decode(&response)
    }

    /// Write request without a body, e.g. accepting a friend request
    pub async fn send_empty<R: DeserializeOwned>(&self, method: Method, path: &str) -> ApiResult<R> {
        let response = self.execute(ApiRequest::new(method, path)).await?;
        decode(&response)
    }

    /// DELETE; any 2xx counts, 204 included
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute(ApiRequest::new(Method::Delete, path)).await?;
        Ok(())
    }

    async fn execute(&self, mut request: ApiRequest) -> ApiResult<ApiResponse> {
        if request.method.is_mutating() {
            request.csrf_token = self.csrf_token.as_ref().and_then(|source| source());
            if request.csrf_token.is_none() {
                debug!(path = %request.path, "no anti-forgery token available");
            }
        }

        let method = request.method;
        let path = request.path_and_query();
        debug!(method = method.as_str(), path = %path, "sending request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(method = method.as_str(), path = %path, error = %e, "transport failure");
                return Err(e);
            }
        };

        if response.is_success() {
            debug!(method = method.as_str(), path = %path, status = response.status, "request succeeded");
            Ok(response)
        } else {
            let err = ApiError::from_status(response.status, &response.body);
            warn!(method = method.as_str(), path = %path, status = response.status, error = %err, "request failed");
            Err(err)
        }
    }
}

fn decode<R: DeserializeOwned>(response: &ApiResponse) -> ApiResult<R> {
    let text = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}
