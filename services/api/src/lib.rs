//! services/api/src/lib.rs
//!
//! Library crate backing the `api` and `openapi` binaries: configuration,
//! the file-backed adapters for the core's ports, and the web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
