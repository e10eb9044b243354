//! Stock & Surplus Engine
//!
//! Inventory lifecycle engine for film/TV productions: purchase requests,
//! departmental stock, the surplus disposition state machine, the
//! cross-production marketplace, and the internal buy-back board.
//!
//! # Architecture
//!
//! ```text
//! Caller (UI / host app)
//!     ├─ InventoryManager ──┐      requests, stock, dispositions, splits
//!     ├─ MarketplaceService ┼───►  ItemStore / TransactionLedger (traits)
//!     └─ BuyBackBoard ──────┘      Notifier / PhotoStore (fire-and-forget)
//! ```
//!
//! Every multi-document operation (quantity split, matched order, bulk
//! order) lives behind a single service method. Writes go to the store
//! first or roll the optimistic cache back on failure; a failure after a
//! committed first step surfaces as [`EngineError::PartialWrite`] naming
//! the steps that completed.

pub mod buyback;
pub mod core;
pub mod inventory;
pub mod marketplace;
pub mod pricing;
pub mod services;
pub mod storage;
pub mod utils;

// Re-exports
pub use buyback::BuyBackBoard;
pub use crate::core::config::Config;
pub use crate::core::error::{EngineError, EngineResult};
pub use inventory::{DispositionQuote, InventoryManager, SplitMode};
pub use marketplace::{MarketplaceService, Opportunity};
pub use services::{LogNotifier, Notifier, Severity};
pub use storage::{
    BuyBackStore, ItemStore, MemoryLedger, MemoryPhotoStore, MemoryStore, PhotoStore,
    StorageError, StoreResult, TransactionLedger,
};

// Re-export shared types for convenience
pub use shared::models::{
    ActorContext, BuyBackItem, BuyBackStatus, Department, Item, ItemPatch, ItemStatus, Listing,
    NewBuyBackItem, NewItemRequest, ProjectSettings, SurplusAction, Transaction,
    TransactionStatus,
};
