//! # API Shared
//!
//! Shared definitions for the dishcheck APIs.
//!
//! Contains:
//! - JSON request/response types with OpenAPI schemas (`models`)
//! - `HealthService`
//!
//! Used by `api-rest` and the workspace binary.

pub mod health;
pub mod models;

pub use health::HealthService;
pub use models::*;
