//! # Scribe Shared
//!
//! Serializable view contexts - the data each page hands to its template -
//! and the standard error body.

pub mod response;
pub mod views;

pub use response::{ApiResponse, ErrorResponse};
