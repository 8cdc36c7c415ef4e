//! Configuration System
//!
//! Client settings loaded from TOML. Every section falls back to its defaults,
//! so an empty document is a valid configuration.

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend location and anti-forgery token plumbing
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Absolute origin of the REST backend. Empty means "same origin as the page".
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_csrf_header")]
    pub csrf_header: String,

    #[serde(default = "default_csrf_cookie")]
    pub csrf_cookie: String,

    /// Name of the hidden form field that carries the token when rendered server-side
    #[serde(default = "default_csrf_field")]
    pub csrf_field: String,
}

fn default_csrf_header() -> String {
    "X-CSRFToken".to_string()
}

fn default_csrf_cookie() -> String {
    "csrftoken".to_string()
}

fn default_csrf_field() -> String {
    "csrfmiddlewaretoken".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            csrf_header: default_csrf_header(),
            csrf_cookie: default_csrf_cookie(),
            csrf_field: default_csrf_field(),
        }
    }
}

/// Page locations and redirect delays
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,

    /// Delay before an auth failure sends the user to the login page
    #[serde(default = "default_auth_redirect_delay")]
    pub auth_redirect_delay_ms: u32,

    #[serde(default = "default_login_redirect_delay")]
    pub login_redirect_delay_ms: u32,

    #[serde(default = "default_register_redirect_delay")]
    pub register_redirect_delay_ms: u32,
}

fn default_login_path() -> String {
    "/login/".to_string()
}

fn default_dashboard_path() -> String {
    "/dashboard/".to_string()
}

fn default_auth_redirect_delay() -> u32 {
    3000
}

fn default_login_redirect_delay() -> u32 {
    1500
}

fn default_register_redirect_delay() -> u32 {
    2000
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            dashboard_path: default_dashboard_path(),
            auth_redirect_delay_ms: default_auth_redirect_delay(),
            login_redirect_delay_ms: default_login_redirect_delay(),
            register_redirect_delay_ms: default_register_redirect_delay(),
        }
    }
}

/// Toast and health-alert timing
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_toast_delay")]
    pub toast_delay_ms: u32,

    #[serde(default = "default_alert_check_delay")]
    pub alert_check_delay_ms: u32,

    #[serde(default = "default_alert_stagger")]
    pub alert_stagger_ms: u32,
}

fn default_toast_delay() -> u32 {
    5000
}

fn default_alert_check_delay() -> u32 {
    2000
}

fn default_alert_stagger() -> u32 {
    1000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            toast_delay_ms: default_toast_delay(),
            alert_check_delay_ms: default_alert_check_delay(),
            alert_stagger_ms: default_alert_stagger(),
        }
    }
}

/// Dashboard display settings
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Daily calorie goal used by the diet progress bar
    #[serde(default = "default_diet_goal")]
    pub diet_goal_calories: f64,
}

fn default_diet_goal() -> f64 {
    2000.0
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            diet_goal_calories: default_diet_goal(),
        }
    }
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `campus_health=debug`
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Parse a TOML document and validate the result
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            error: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the backend origin, e.g. with the page origin or a stored override
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.api.base_url;
        if !base.is_empty() && !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "api.base_url",
                reason: format!("expected an http(s) origin, got {:?}", base),
            });
        }
        if self.api.csrf_header.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "api.csrf_header",
                reason: "must not be empty".to_string(),
            });
        }
        if !self.navigation.login_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                field: "navigation.login_path",
                reason: "must be an absolute path".to_string(),
            });
        }
        if self.dashboard.diet_goal_calories <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "dashboard.diet_goal_calories",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            navigation: NavigationConfig::default(),
            notifications: NotificationConfig::default(),
            dashboard: DashboardConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {error}")]
    Parse { error: String },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Campus Health client configuration

[api]
# Backend origin. Leave empty to use the page's own origin.
base_url = ""

# Anti-forgery token: request header, cookie name and hidden form field
csrf_header = "X-CSRFToken"
csrf_cookie = "csrftoken"
csrf_field = "csrfmiddlewaretoken"

[navigation]
login_path = "/login/"
dashboard_path = "/dashboard/"

# Delay before an expired session is sent to the login page (ms)
auth_redirect_delay_ms = 3000

# Delays after a successful login / registration (ms)
login_redirect_delay_ms = 1500
register_redirect_delay_ms = 2000

[notifications]
# How long a toast stays visible (ms)
toast_delay_ms = 5000

# Health alert check runs this long after page load (ms)
alert_check_delay_ms = 2000

# Gap between consecutive alert toasts (ms)
alert_stagger_ms = 1000

[dashboard]
# Daily calorie goal for the diet progress bar
diet_goal_calories = 2000.0

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty, json
format = "pretty"
"#
    .to_string()
}
