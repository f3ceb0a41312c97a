//! Rendered page templates.

pub mod home;
pub mod post;
