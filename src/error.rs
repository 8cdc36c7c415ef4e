//! Error Types
//!
//! Taxonomy for everything that can go wrong between a page and the backend,
//! plus the rules for turning a server error payload into one readable string.

use serde_json::Value;

/// Fallback shown when a server error body carries nothing readable
pub const GENERIC_FAILURE: &str = "操作失败，请稍后重试。";

/// Fallback for 401/403 responses without a `detail`
pub const AUTH_REQUIRED_MESSAGE: &str = "您需要登录才能访问此页面。";

/// Shown for transport failures
pub const NETWORK_FAILURE: &str = "网络错误，请稍后重试。";

/// Errors produced by the API client
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never reached the server or the response never arrived
    #[error("Network error: {0}")]
    Network(String),

    /// 401 or 403
    #[error("Authentication required ({status}): {message}")]
    AuthRequired { status: u16, message: String },

    /// Any other 4xx, usually a field-level validation payload
    #[error("Request rejected ({status}): {message}")]
    Validation { status: u16, message: String },

    /// 5xx
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A 2xx response whose envelope reports `status != "success"`
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// The body could not be parsed into the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Build the error for a non-2xx status from its raw body
    pub fn from_status(status: u16, body: &str) -> Self {
        let joined = join_error_payload(body);
        match status {
            401 | 403 => ApiError::AuthRequired {
                status,
                message: joined.unwrap_or_else(|| AUTH_REQUIRED_MESSAGE.to_string()),
            },
            400..=499 => ApiError::Validation {
                status,
                message: joined.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            },
            _ => ApiError::Server {
                status,
                message: joined.unwrap_or_else(|| format!("服务器错误 ({})", status)),
            },
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::AuthRequired { .. })
    }

    /// Localized text shown to the user
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => NETWORK_FAILURE.to_string(),
            ApiError::AuthRequired { message, .. }
            | ApiError::Validation { message, .. }
            | ApiError::Server { message, .. } => message.clone(),
            ApiError::Rejected(message) if !message.is_empty() => message.clone(),
            ApiError::Rejected(_) => GENERIC_FAILURE.to_string(),
            ApiError::Decode(_) => "服务器返回了无法解析的数据。".to_string(),
        }
    }
}

/// Flatten a server error body into one string.
///
/// `detail` and `message` win when present; otherwise every field message is
/// joined with newlines, flattening arrays and nested objects. Returns `None`
/// when nothing readable is found.
pub fn join_error_payload(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    if let Value::Object(map) = &value {
        for key in ["detail", "message"] {
            if let Some(Value::String(s)) = map.get(key) {
                if !s.trim().is_empty() {
                    return Some(s.clone());
                }
            }
        }
    }

    let mut parts = Vec::new();
    collect_messages(&value, &mut parts);
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

fn collect_messages(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.trim().is_empty() => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|v| collect_messages(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_messages(v, out)),
        Value::Number(n) => out.push(n.to_string()),
        _ => {}
    }
}
