//! Cross-production marketplace
//!
//! Reconciles one production's open purchase requests against the union of
//! every production's marketplace/buy-back listings, and executes matched
//! orders (ledger entry + seller stock decrement + buyer request update).

pub mod matcher;
pub mod service;

pub use matcher::{Opportunity, compute_opportunities};
pub use service::MarketplaceService;
