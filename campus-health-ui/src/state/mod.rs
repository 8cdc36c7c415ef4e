//! State Management
//!
//! Reactive state shared by every page: toasts, busy flag and theme.

pub mod global;
