//! Summary email delivery

pub mod sendgrid;

pub use sendgrid::SendGridNotifier;

use crate::config::NotificationConfig;

/// Subject prefix for summary emails
///
/// The configured prefix wins; otherwise `"{name} on {hostname}: "`.
pub fn subject_prefix(config: &NotificationConfig, app_name: &str) -> String {
    match &config.prefix {
        Some(prefix) => prefix.clone(),
        None => format!("{app_name} on {}: ", hostname()),
    }
}

/// Full subject line for a run summary
pub fn summary_subject(config: &NotificationConfig, app_name: &str) -> String {
    format!("{}{app_name} Update Summary", subject_prefix(config, app_name))
}

/// Host name from the operating system, `unknown-host` if it is unset or
/// not valid UTF-8
fn hostname() -> String {
    gethostname::gethostname()
        .into_string()
        .ok()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "unknown-host".to_string())
}
