//! API module for shared HTTP API functionality
//!
//! Contains only framework-independent types; the service crate wraps them
//! with axum responses.

pub mod types;

pub use types::ApiResponse;
