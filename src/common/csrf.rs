//! Anti-forgery token lookup

/// Token from the hidden form field when the page rendered one, otherwise from
/// the cookie named `cookie_name` in a `document.cookie` style string.
pub fn csrf_token(hidden_field: Option<&str>, cookies: &str, cookie_name: &str) -> Option<String> {
    if let Some(value) = hidden_field.map(str::trim).filter(|v| !v.is_empty()) {
        return Some(value.to_string());
    }

    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| {
            urlencoding::decode(value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
        .filter(|value| !value.is_empty())
}
