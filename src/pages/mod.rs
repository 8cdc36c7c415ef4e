//! Page Controllers
//!
//! One controller per page, constructed once with a [`PageContext`]. Each owns
//! its containers, edit mode and chart slots, exposes a `reconcile(scope)`
//! that reloads what a mutation may have changed, and typed handlers the UI
//! wires to DOM events.
//!
//! [`PageContext`]: crate::sync::PageContext

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

use tracing::{debug, warn};

use crate::charts::{ChartConfig, ChartSlot};
use crate::error::ApiError;
use crate::forms::ValidationError;
use crate::host::{Host, Notice};

/// Why a user action did not complete
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Cancelled by user")]
    Cancelled,

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type ActionResult<T = ()> = Result<T, ActionError>;

/// Show a local validation failure and turn it into an [`ActionError`]
pub(crate) fn reject_invalid<H: Host>(host: &H, err: ValidationError) -> ActionError {
    debug!(reason = %err, "form rejected before submit");
    host.notify(Notice::warning(err.0.clone()));
    ActionError::Invalid(err)
}

/// Blank the given inputs after a successful submit
pub(crate) fn clear_fields<H: Host>(host: &H, ids: &[&str]) {
    for id in ids {
        host.set_value(id, "");
    }
}

/// Draw or clear a chart. A chart failure never takes the page down.
pub(crate) fn draw_chart(slot: &ChartSlot, config: Option<ChartConfig>) {
    if let Err(err) = slot.show(config) {
        warn!(canvas = slot.canvas_id(), error = %err, "chart not drawn");
    }
}

/// Button click inside a rendered list, decoded from `data-action` / `data-id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit(u64),
    Delete(u64),
    View(u64),
    Accept(u64),
    Reject(u64),
}

impl RowAction {
    pub fn parse(action: &str, id: &str) -> Option<Self> {
        let id: u64 = id.parse().ok()?;
        match action {
            "edit" => Some(RowAction::Edit(id)),
            "delete" => Some(RowAction::Delete(id)),
            "view" => Some(RowAction::View(id)),
            "accept" => Some(RowAction::Accept(id)),
            "reject" => Some(RowAction::Reject(id)),
            _ => None,
        }
    }
}

/// Edit/delete button pair used by list rows
pub(crate) fn row_buttons(id: u64) -> String {
    format!(
        r#"<button type="button" class="btn btn-sm btn-outline-primary edit-btn me-1" data-action="edit" data-id="{id}"><i class="bi bi-pencil"></i></button><button type="button" class="btn btn-sm btn-outline-danger delete-btn" data-action="delete" data-id="{id}"><i class="bi bi-trash"></i></button>"#,
        id = id
    )
}
