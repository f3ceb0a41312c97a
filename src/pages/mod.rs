//! Static-generation entry points per page type.
//!
//! Each page type exposes `list_paths` / `load_props` in the driver contract
//! from [`crate::ssg`]: props are built from a content query and carry the
//! revalidation window for that page type.

pub mod home;
pub mod post;
