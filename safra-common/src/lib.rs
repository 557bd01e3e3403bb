//! # Safra Common Library
//!
//! Shared code for the Safra dashboard services:
//! - Error type
//! - Configuration loading and data folder resolution
//! - API response envelope types

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
