//! UI Components
//!
//! Chrome shared by every route.

pub mod nav;
pub mod toast;

pub use nav::Nav;
pub use toast::Toast;
