//! HTTP interface for progress evaluation.
//!
//! Authenticated callers submit course duration, progress and the
//! assignment/due window; requests are validated field by field before the
//! evaluator runs.

#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod validation;

pub use auth::{AuthError, BearerAuth};
pub use config::ServerConfig;
pub use error::{ApiError, ErrorBody};
pub use server::{router, AppState, ProgressServer, ServerError, HEALTH_PATH, PROGRESS_STATUS_PATH};
pub use validation::{validate_fields, FieldErrors, RequestFields};
