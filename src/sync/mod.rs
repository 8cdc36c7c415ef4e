//! Load → Render → Mutate Engine
//!
//! The shared cycle every page controller runs:
//!
//! - [`RequestFence`] hands out monotonically increasing tickets per container
//!   so a late response for an older request is discarded instead of rendered.
//! - [`Container`] owns a slot, its fence and the last applied collection view.
//! - [`run_mutation`] issues one write and reports the outcome to the user.
//! - [`BusyGuard`] keeps the wait cursor up for exactly as long as it lives.

mod container;
mod context;
mod fence;
mod mutation;

pub use container::{Container, LoadKind, LoadOutcome};
pub use context::PageContext;
pub use fence::{RequestFence, Ticket};
pub use mutation::{confirmed, escalate_auth, report_failure, run_mutation, run_mutation_with, BusyGuard};
