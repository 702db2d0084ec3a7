//! JSON-over-HTTP transport for the exploration engine.

mod error;
mod http;
pub mod validate;

pub use error::{ApiError, ApiFailure, FieldError};
pub use http::{create_router, HttpServer};
