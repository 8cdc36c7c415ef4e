//! # Campus Health
//!
//! Page controllers for a student health-tracking web client. Every page follows
//! the same cycle: bind DOM handles, load a REST collection, render it into a
//! container, and resynchronize after each write.
//!
//! ## Modules
//!
//! - [`http`]: Transport seam and the credentialed API client
//! - [`sync`]: Request fencing, container loads, mutations and busy state
//! - [`render`]: Markup helpers shared by every page renderer
//! - [`charts`]: Chart lifecycle and chart configuration builders
//! - [`forms`]: Form validation and the create/edit mode switch
//! - [`pages`]: One controller per page
//! - [`common`]: Dates, CSRF lookup, theme, session user and health alerts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use campus_health::http::{ApiClient, ReqwestTransport};
//! use campus_health::config::Config;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_toml_str(&campus_health::config::generate_default_config())?;
//! let transport = ReqwestTransport::new("http://localhost:8000", &config.api);
//! let client = ApiClient::new(transport);
//!
//! let sports: Vec<campus_health::models::SportRecord> =
//!     client.get("/api/sports/", &[("record_date", "2024-05-01")]).await?;
//! println!("{} sport records", sports.len());
//! # Ok(())
//! # }
//! ```

pub mod charts;
pub mod common;
pub mod config;
pub mod error;
pub mod forms;
pub mod host;
pub mod http;
pub mod logging;
pub mod models;
pub mod pages;
pub mod render;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, ConfigError, LogFormat, LoggingConfig};
pub use error::{ApiError, ApiResult};
pub use host::{Host, KeyValueStore, Notice, NoticeLevel};
pub use http::{ApiClient, Method, ReqwestTransport, Transport};
pub use sync::{Container, LoadKind, LoadOutcome, PageContext, RequestFence};
pub use charts::{ChartBackend, ChartConfig, ChartError, ChartHandle, ChartSlot};
pub use forms::{EditMode, FormValues, ValidationError};
