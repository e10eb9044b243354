//! Shared types for the production stock platform
//!
//! Domain models, error codes and utility types used across the
//! workspace crates.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
