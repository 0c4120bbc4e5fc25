//! services/api/src/lib.rs
//!
//! Library crate for the API service: configuration, the Postgres adapter,
//! and the axum web layer. The `api` and `openapi` binaries sit on top.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
