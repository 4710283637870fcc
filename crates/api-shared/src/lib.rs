//! # API Shared
//!
//! Shared utilities and definitions for the notification APIs.
//!
//! Contains:
//! - Wire types with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//! - API key checking
//!
//! Used by `api-rest` and the `notify-run` binary.

pub mod auth;
pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
