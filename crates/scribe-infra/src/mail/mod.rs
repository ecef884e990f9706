//! Mail transports.

mod log;

#[cfg(feature = "webhook-mail")]
mod webhook;

pub use log::LogMailer;

#[cfg(feature = "webhook-mail")]
pub use webhook::WebhookMailer;
