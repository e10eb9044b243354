//! Engine services

pub mod notifier;

pub use notifier::{LogNotifier, Notifier, Severity};
