//! HTTP Layer
//!
//! The [`Transport`] seam carries one request to the backend; [`ApiClient`]
//! layers credentials, status classification and JSON decoding on top of it.

mod client;
mod transport;

pub use client::{ApiClient, TokenSource};
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
