//! Pages
//!
//! One route component per page controller. Each renders the static page
//! skeleton and hands every event to its controller.

pub mod articles;
pub mod auth;
pub mod body_metrics;
pub mod dashboard;
pub mod diet;
pub mod friends;
pub mod profile;
pub mod report;
pub mod sleep;
pub mod sport;

pub use articles::Articles;
pub use auth::{Login, Register};
pub use body_metrics::BodyMetrics;
pub use dashboard::Dashboard;
pub use diet::Diet;
pub use friends::Friends;
pub use profile::Profile;
pub use report::Report;
pub use sleep::Sleep;
pub use sport::Sport;

use leptos::use_context;

use crate::context::Ctx;

pub(crate) fn page_context() -> Ctx {
    use_context::<Ctx>().expect("page context not provided")
}
