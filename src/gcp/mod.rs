//! GCP API interaction module
//!
//! Authentication, HTTP plumbing and REST clients for the APIs enumeration
//! reads from.
//!
//! # Module Structure
//!
//! - [`auth`] - Token sources (Application Default Credentials) and default project lookup
//! - [`client`] - REST client and the per-API traits repositories depend on
//! - [`http`] - HTTP wrapper and [`http::ApiError`]
//! - [`model`] - Response payloads
//! - [`paging`] - Cursor-based pagination

pub mod auth;
pub mod client;
pub mod http;
pub mod model;
pub mod paging;
