//! Maud HTML template components for the web UI.
//!
//! Reusable building blocks for the blog pages:
//!
//! - `layout`: Base page layout with header and footer
//! - `card`: Post summary cards and the empty listing state
//! - `button`: The load-more control
//! - `alert`: Error and info banners

pub mod alert;
pub mod button;
pub mod card;
pub mod layout;

pub use alert::{Alert, AlertVariant};
pub use button::LoadMoreButton;
pub use card::{EmptyState, PostCard};
pub use layout::BaseLayout;

/// Re-export maud for convenience
pub use maud::{html, Markup, PreEscaped, DOCTYPE};
