use crate::core::NotificationSink;

/// Writes user-facing messages to stderr and mirrors them into the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn error(&self, message: &str) {
        tracing::warn!("Notifying user: {}", message);
        eprintln!("❌ {}", message);
    }
}
