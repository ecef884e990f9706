//! # Scribe Core
//!
//! The domain layer of the Scribe blog server.
//! This crate contains entities, form validation and the ports that
//! infrastructure implements. It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod text;

pub use error::DomainError;
