//! Storage collaborator boundary
//!
//! The engine is storage-agnostic: it talks to the host's document store
//! through these traits. Each write commits independently (no distributed
//! transaction); per-document last-write-wins is the only ordering
//! guarantee, which is why the cross-production stock decrement is exposed
//! as a conditional operation rather than a blind write.

mod memory;

pub use memory::{MemoryLedger, MemoryPhotoStore, MemoryStore};

use async_trait::async_trait;
use shared::models::{
    BuyBackItem, Item, ItemPatch, Listing, Transaction, TransactionCreate, TransactionStatus,
};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("document already exists: {0}")]
    AlreadyExists(String),

    #[error("insufficient stock on {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: String,
        requested: i32,
        available: i32,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StorageError>;

/// Persistent collection of inventory items, scoped per production
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list_items(&self, project_id: &str) -> StoreResult<Vec<Item>>;

    async fn get_item(&self, project_id: &str, item_id: &str) -> StoreResult<Option<Item>>;

    async fn create_item(&self, project_id: &str, item: Item) -> StoreResult<()>;

    /// Partial update; returns the item after the patch
    async fn update_item(
        &self,
        project_id: &str,
        item_id: &str,
        patch: ItemPatch,
    ) -> StoreResult<Item>;

    async fn delete_item(&self, project_id: &str, item_id: &str) -> StoreResult<()>;

    /// Atomic conditional decrement of `quantity_current`.
    ///
    /// Fails with [`StorageError::InsufficientStock`] instead of going
    /// negative. This is the one cross-production write in the system.
    async fn decrement_if_available(
        &self,
        project_id: &str,
        item_id: &str,
        qty: i32,
    ) -> StoreResult<Item>;

    /// Compensating action for a cancelled transaction: put `qty` units
    /// back and park the item in `ReleasedToProd` for re-triage.
    async fn restock(&self, project_id: &str, item_id: &str, qty: i32) -> StoreResult<Item>;

    /// Cross-production read spanning every project's items, filtered to
    /// marketplace/buy-back listings with stock remaining.
    async fn list_global_listings(&self) -> StoreResult<Vec<Listing>>;
}

/// Department-internal resale board collection, scoped per production
#[async_trait]
pub trait BuyBackStore: Send + Sync {
    async fn list_buy_back_items(&self, project_id: &str) -> StoreResult<Vec<BuyBackItem>>;

    async fn get_buy_back_item(
        &self,
        project_id: &str,
        item_id: &str,
    ) -> StoreResult<Option<BuyBackItem>>;

    async fn create_buy_back_item(&self, project_id: &str, item: BuyBackItem) -> StoreResult<()>;

    /// Whole-document replace (the reservation fields travel together)
    async fn update_buy_back_item(&self, project_id: &str, item: BuyBackItem) -> StoreResult<()>;

    async fn delete_buy_back_item(&self, project_id: &str, item_id: &str) -> StoreResult<()>;
}

/// Append-only record of cross-production purchases
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    /// Append a record; the ledger assigns id, `Pending` status and
    /// `created_at`
    async fn create_transaction(&self, draft: TransactionCreate) -> StoreResult<Transaction>;

    async fn get_transaction(&self, id: &str) -> StoreResult<Option<Transaction>>;

    async fn update_status(
        &self,
        id: &str,
        status: TransactionStatus,
        invoiced_at: Option<i64>,
    ) -> StoreResult<Transaction>;
}

/// Stored-image collaborator for buy-back photos
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Upload a raw data-URL payload, returning the stored reference
    async fn upload(&self, project_id: &str, data: &str) -> StoreResult<String>;

    async fn delete(&self, reference: &str) -> StoreResult<()>;
}
