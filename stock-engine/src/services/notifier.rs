//! Notification sink
//!
//! Fire-and-forget: a notification that cannot be delivered must never
//! abort the operation that produced it. Implementations swallow their own
//! failures (logging them) and the engine only ever calls `notify`
//! best-effort.

use async_trait::async_trait;
use shared::models::Department;

/// Notification severity, matching the host application's feed types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Order,
    StockMove,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Success => "SUCCESS",
            Severity::Warning => "WARNING",
            Severity::Order => "ORDER",
            Severity::StockMove => "STOCK_MOVE",
        }
    }
}

/// Fire-and-forget notification sink
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str, severity: Severity, target: Department);
}

/// Default sink: notifications go to the structured log
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str, severity: Severity, target: Department) {
        tracing::info!(
            severity = severity.as_str(),
            target = %target,
            "notification: {message}"
        );
    }
}
