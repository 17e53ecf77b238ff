//! User-facing notification surface.
//!
//! The gateway reports API failures here and the state store reports its own
//! failures and successes. Front ends decide how to render them.

/// Sink for transient user notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, title: &str, message: &str);
    fn error(&self, title: &str, message: &str);
    fn info(&self, title: &str, message: &str);
}

/// Notifier that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, title: &str, message: &str) {
        tracing::info!(title, "{}", message);
    }

    fn error(&self, title: &str, message: &str) {
        tracing::error!(title, "{}", message);
    }

    fn info(&self, title: &str, message: &str) {
        tracing::info!(title, "{}", message);
    }
}
