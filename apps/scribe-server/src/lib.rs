//! # Scribe Server
//!
//! actix-web application serving the blog: post listing and detail pages,
//! comments, trigram search, email sharing and author-gated editing.
//! Pages are rendered as JSON view contexts.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
