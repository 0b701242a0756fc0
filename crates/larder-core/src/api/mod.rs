//! REST API client module for the larder service.
//!
//! This module provides the `ApiClient` for communicating with the remote
//! service that persists the ingredient catalog, measurement units, user
//! lists and recipes.
//!
//! Every request carries the caller's bearer token. Responses are checked
//! against the status each operation expects; failures are reported as an
//! `ApiError` whose `ErrorKind` tells transport, status and decode problems
//! apart.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, ErrorKind, Expected};
