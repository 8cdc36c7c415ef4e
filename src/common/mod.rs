//! Shared Page Utilities
//!
//! Helpers used by more than one page: date formatting, anti-forgery token
//! lookup, theme preference, the signed-in user and health alert toasts.

pub mod alerts;
pub mod csrf;
pub mod dates;
pub mod session;
pub mod theme;

pub use alerts::{check_health_alerts, HealthAlert};
pub use csrf::csrf_token;
pub use dates::{clock_time, datetime_local, days_ago, format_date, today};
pub use session::CurrentUser;
pub use theme::Theme;
