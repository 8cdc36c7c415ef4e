//! Host Environment
//!
//! Browser side effects a page controller may perform. The UI crate implements
//! [`Host`] on top of the DOM; tests use a recording implementation.

/// Side effects available to page controllers.
///
/// Element ids and container slots are plain strings matching the page markup.
pub trait Host: Clone + 'static {
    /// Replace a container's content wholesale
    fn render(&self, slot: &str, html: String);

    /// Show a transient notification
    fn notify(&self, notice: Notice);

    /// Blocking yes/no question
    fn confirm(&self, message: &str) -> bool;

    /// Leave the current page
    fn navigate(&self, url: &str);

    /// Run `task` once after `delay_ms`
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>);

    /// Wait cursor plus dimmed cards
    fn set_busy(&self, busy: bool);

    fn set_text(&self, id: &str, text: &str);

    fn set_value(&self, id: &str, value: &str);

    fn set_disabled(&self, id: &str, disabled: bool);

    fn set_hidden(&self, id: &str, hidden: bool);

    /// Replace the element's whole class attribute
    fn set_class(&self, id: &str, class: &str);

    fn show_modal(&self, id: &str, visible: bool);
}

/// String key/value storage scoped to the browser.
///
/// Implemented twice by the UI: one durable across sessions, one per session.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Severity of a notification, mapped onto Bootstrap's `text-bg-*` classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Danger,
    Warning,
    Info,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Danger => "danger",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Info => "info",
        }
    }

    fn default_icon(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "check-circle-fill",
            NoticeLevel::Danger => "x-circle-fill",
            NoticeLevel::Warning => "exclamation-triangle-fill",
            NoticeLevel::Info => "info-circle-fill",
        }
    }
}

/// A toast notification
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    /// Bootstrap Icons name without the `bi-` prefix
    pub icon: &'static str,
}

impl Notice {
    pub fn new(message: impl Into<String>, level: NoticeLevel) -> Self {
        Self {
            message: message.into(),
            level,
            icon: level.default_icon(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Success)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Danger)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Warning)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Info)
    }

    pub fn with_icon(mut self, icon: &'static str) -> Self {
        self.icon = icon;
        self
    }

    /// Toast container class, e.g. `text-bg-warning`
    pub fn css_class(&self) -> String {
        format!("text-bg-{}", self.level.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_defaults() {
        let notice = Notice::warning("体重变化较大");
        assert_eq!(notice.css_class(), "text-bg-warning");
        assert_eq!(notice.icon, "exclamation-triangle-fill");

        let notice = Notice::success("ok").with_icon("heart-fill");
        assert_eq!(notice.icon, "heart-fill");
        assert_eq!(notice.level, NoticeLevel::Success);
    }
}
