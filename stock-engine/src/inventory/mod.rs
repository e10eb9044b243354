//! Inventory & surplus lifecycle
//!
//! - **quantity**: clamped quantity mutation and status derivation
//! - **split**: the disposition transition planner (whole-item vs
//!   new/started quantity split)
//! - **manager**: repository-backed service tying it together with an
//!   optimistic per-project cache
//!
//! # Disposition flow
//!
//! ```text
//! propose_disposition(item, action)
//!     └─ DispositionQuote { suggested price, split choice needed? }
//! commit_disposition(item, action, price?, mode?)
//!     ├─ plan_disposition  → whole update | truncate + spawn
//!     ├─ persist writes (sequential for a split)
//!     └─ notify production (non-fatal)
//! ```

pub mod manager;
pub mod quantity;
pub mod split;

pub use manager::{DispositionQuote, InventoryManager};
pub use split::{DispositionPlan, SplitMode};
