//! Markup Helpers
//!
//! Shared building blocks for the page renderers. Renderers are pure functions
//! from a collection view to a markup string; every server string goes through
//! [`escape_html`] before interpolation.

/// Escape text for safe interpolation into element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Fixed decimal places, e.g. `fixed(300.0, 1) == "300.0"`
pub fn fixed(value: f64, places: usize) -> String {
    format!("{:.*}", places, value)
}

/// First `max_chars` characters, counted as chars not bytes
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Muted placeholder item for `<ul class="list-group">` containers
pub fn empty_list_item(message: &str) -> String {
    format!(
        r#"<li class="list-group-item text-center text-muted">{}</li>"#,
        message
    )
}

/// Muted placeholder paragraph for card containers
pub fn empty_paragraph(message: &str) -> String {
    format!(r#"<p class="text-center text-muted">{}</p>"#, message)
}

/// Link back to the current page, reloading it
pub fn retry_link() -> &'static str {
    r#"<a href="" class="alert-link">刷新页面</a>"#
}

/// Full-width error panel with a retry link. `message` must already be escaped.
pub fn error_state(message: &str) -> String {
    format!(
        r#"<div class="alert alert-danger" role="alert"><h4 class="alert-heading">加载失败!</h4><p>{}</p><hr><p class="mb-0">请{}重试。</p></div>"#,
        message,
        retry_link()
    )
}

/// Error row for list containers. `message` must already be escaped.
pub fn error_list_item(message: &str) -> String {
    format!(
        r#"<li class="list-group-item text-danger">数据加载失败: {} {}</li>"#,
        message,
        retry_link()
    )
}

/// Error paragraph for card containers. `message` must already be escaped.
pub fn error_paragraph(message: &str) -> String {
    format!(
        r#"<p class="text-danger">数据加载失败: {} {}</p>"#,
        message,
        retry_link()
    )
}

/// Error row spanning a table. `message` must already be escaped.
pub fn error_table_row(columns: usize, message: &str) -> String {
    format!(
        r#"<tr><td colspan="{}" class="text-center text-danger">加载失败: {} {}</td></tr>"#,
        columns,
        message,
        retry_link()
    )
}
