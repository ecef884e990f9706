//! Text helpers shared by forms, entities and repositories.

mod slug;
mod trigram;

pub use slug::{is_valid_slug, slugify};
pub use trigram::{similarity, trigrams};

/// Mask an email address for logging to avoid PII in logs.
///
/// `alice@example.com` becomes `a***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{}***", first),
                _ => "***".to_string(),
            };
            format!("{}@{}", masked_local, domain)
        }
        None => "***".to_string(),
    }
}
