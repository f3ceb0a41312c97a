//! spacetraveling library.
//!
//! A server-rendered blog front-end that queries a headless CMS for post
//! documents, statically generates the listing and post pages, and serves
//! them over a public web UI with incremental "load more" pagination.

pub mod components;
pub mod config;
pub mod content;
pub mod feed;
pub mod pages;
pub mod ssg;
pub mod web;
