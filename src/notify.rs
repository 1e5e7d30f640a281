//! Notification side channel.
//!
//! The store reports outcomes here instead of returning them to the render
//! layer. Hosts supply their own sink (toast queue, status bar); the CLI
//! uses [`TracingNotifier`].

use tracing::{error, info, warn};

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// Receives user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Sink that forwards notifications to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success | Severity::Info => info!(target: "slidedeck::notify", "{message}"),
            Severity::Warning => warn!(target: "slidedeck::notify", "{message}"),
            Severity::Error => error!(target: "slidedeck::notify", "{message}"),
        }
    }
}
