//! In-memory storage backends
//!
//! Reference implementations of the storage traits used by tests and the
//! demo harness. Per-project maps live behind DashMap entries so the
//! conditional decrement really is atomic.

use super::{
    BuyBackStore, ItemStore, PhotoStore, StorageError, StoreResult, TransactionLedger,
};
use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::{
    BuyBackItem, Item, ItemPatch, Listing, SurplusAction, Transaction, TransactionCreate,
    TransactionStatus,
};
use shared::util::now_millis;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory document store for items and buy-back records
#[derive(Default)]
pub struct MemoryStore {
    /// project id -> item id -> item
    items: DashMap<String, HashMap<String, Item>>,
    /// project id -> buy-back item id -> record
    buy_back: DashMap<String, HashMap<String, BuyBackItem>>,
    /// project id -> production display name
    productions: DashMap<String, String>,
    /// When set, every write fails with `Unavailable` (outage simulation)
    fail_writes: AtomicBool,
    /// When set, only document creations fail (partial-write simulation)
    fail_creates: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a production so global listings can carry its name
    pub fn register_project(&self, project_id: &str, production_name: &str) {
        self.productions
            .insert(project_id.to_string(), production_name.to_string());
    }

    /// Toggle simulated storage outage for writes
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Toggle simulated outage for document creations only
    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StorageError::Unavailable("store offline".into()))
        } else {
            Ok(())
        }
    }

    fn check_create_available(&self) -> StoreResult<()> {
        self.check_available()?;
        if self.fail_creates.load(Ordering::SeqCst) {
            Err(StorageError::Unavailable("store offline".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn list_items(&self, project_id: &str) -> StoreResult<Vec<Item>> {
        let mut items: Vec<Item> = self
            .items
            .get(project_id)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn get_item(&self, project_id: &str, item_id: &str) -> StoreResult<Option<Item>> {
        Ok(self
            .items
            .get(project_id)
            .and_then(|m| m.get(item_id).cloned()))
    }

    async fn create_item(&self, project_id: &str, item: Item) -> StoreResult<()> {
        self.check_create_available()?;
        let mut project = self.items.entry(project_id.to_string()).or_default();
        if project.contains_key(&item.id) {
            return Err(StorageError::AlreadyExists(item.id));
        }
        project.insert(item.id.clone(), item);
        Ok(())
    }

    async fn update_item(
        &self,
        project_id: &str,
        item_id: &str,
        patch: ItemPatch,
    ) -> StoreResult<Item> {
        self.check_available()?;
        let mut project = self
            .items
            .get_mut(project_id)
            .ok_or_else(|| StorageError::NotFound(format!("project {project_id}")))?;
        let item = project
            .get_mut(item_id)
            .ok_or_else(|| StorageError::NotFound(item_id.to_string()))?;
        patch.apply(item);
        Ok(item.clone())
    }

    async fn delete_item(&self, project_id: &str, item_id: &str) -> StoreResult<()> {
        self.check_available()?;
        let mut project = self
            .items
            .get_mut(project_id)
            .ok_or_else(|| StorageError::NotFound(format!("project {project_id}")))?;
        project
            .remove(item_id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(item_id.to_string()))
    }

    async fn decrement_if_available(
        &self,
        project_id: &str,
        item_id: &str,
        qty: i32,
    ) -> StoreResult<Item> {
        self.check_available()?;
        let mut project = self
            .items
            .get_mut(project_id)
            .ok_or_else(|| StorageError::NotFound(format!("project {project_id}")))?;
        let item = project
            .get_mut(item_id)
            .ok_or_else(|| StorageError::NotFound(item_id.to_string()))?;
        if item.quantity_current < qty {
            return Err(StorageError::InsufficientStock {
                item_id: item_id.to_string(),
                requested: qty,
                available: item.quantity_current,
            });
        }
        item.quantity_current -= qty;
        item.quantity_started = item.quantity_started.min(item.quantity_current);
        Ok(item.clone())
    }

    async fn restock(&self, project_id: &str, item_id: &str, qty: i32) -> StoreResult<Item> {
        self.check_available()?;
        let mut project = self
            .items
            .get_mut(project_id)
            .ok_or_else(|| StorageError::NotFound(format!("project {project_id}")))?;
        let item = project
            .get_mut(item_id)
            .ok_or_else(|| StorageError::NotFound(item_id.to_string()))?;
        item.quantity_current += qty;
        item.surplus_action = SurplusAction::ReleasedToProd;
        Ok(item.clone())
    }

    async fn list_global_listings(&self) -> StoreResult<Vec<Listing>> {
        let mut listings = Vec::new();
        for project in self.items.iter() {
            let project_id = project.key().clone();
            let production_name = self
                .productions
                .get(&project_id)
                .map(|n| n.value().clone())
                .unwrap_or_else(|| "Production Inconnue".to_string());
            for item in project.value().values() {
                let listed = matches!(
                    item.surplus_action,
                    SurplusAction::Marketplace | SurplusAction::Buyback
                );
                if listed && item.quantity_current > 0 {
                    listings.push(Listing {
                        item: item.clone(),
                        project_id: project_id.clone(),
                        production_name: production_name.clone(),
                    });
                }
            }
        }
        listings.sort_by(|a, b| (&a.project_id, &a.item.id).cmp(&(&b.project_id, &b.item.id)));
        Ok(listings)
    }
}

#[async_trait]
impl BuyBackStore for MemoryStore {
    async fn list_buy_back_items(&self, project_id: &str) -> StoreResult<Vec<BuyBackItem>> {
        let mut items: Vec<BuyBackItem> = self
            .buy_back
            .get(project_id)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        // Newest first, the board's display order
        items.sort_by(|a, b| (b.date, &b.id).cmp(&(a.date, &a.id)));
        Ok(items)
    }

    async fn get_buy_back_item(
        &self,
        project_id: &str,
        item_id: &str,
    ) -> StoreResult<Option<BuyBackItem>> {
        Ok(self
            .buy_back
            .get(project_id)
            .and_then(|m| m.get(item_id).cloned()))
    }

    async fn create_buy_back_item(&self, project_id: &str, item: BuyBackItem) -> StoreResult<()> {
        self.check_available()?;
        let mut project = self.buy_back.entry(project_id.to_string()).or_default();
        if project.contains_key(&item.id) {
            return Err(StorageError::AlreadyExists(item.id));
        }
        project.insert(item.id.clone(), item);
        Ok(())
    }

    async fn update_buy_back_item(&self, project_id: &str, item: BuyBackItem) -> StoreResult<()> {
        self.check_available()?;
        let mut project = self
            .buy_back
            .get_mut(project_id)
            .ok_or_else(|| StorageError::NotFound(format!("project {project_id}")))?;
        if !project.contains_key(&item.id) {
            return Err(StorageError::NotFound(item.id));
        }
        project.insert(item.id.clone(), item);
        Ok(())
    }

    async fn delete_buy_back_item(&self, project_id: &str, item_id: &str) -> StoreResult<()> {
        self.check_available()?;
        let mut project = self
            .buy_back
            .get_mut(project_id)
            .ok_or_else(|| StorageError::NotFound(format!("project {project_id}")))?;
        project
            .remove(item_id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(item_id.to_string()))
    }
}

/// In-memory transaction ledger
#[derive(Default)]
pub struct MemoryLedger {
    transactions: DashMap<String, Transaction>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, oldest first
    pub fn all(&self) -> Vec<Transaction> {
        let mut all: Vec<Transaction> =
            self.transactions.iter().map(|t| t.value().clone()).collect();
        all.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        all
    }
}

#[async_trait]
impl TransactionLedger for MemoryLedger {
    async fn create_transaction(&self, draft: TransactionCreate) -> StoreResult<Transaction> {
        let transaction = Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            seller_id: draft.seller_id,
            seller_name: draft.seller_name,
            buyer_id: draft.buyer_id,
            buyer_name: draft.buyer_name,
            items: draft.items,
            total_amount: draft.total_amount,
            platform_fee: draft.platform_fee,
            status: TransactionStatus::Pending,
            created_at: now_millis(),
            invoiced_at: None,
        };
        self.transactions
            .insert(transaction.id.clone(), transaction.clone());
        Ok(transaction)
    }

    async fn get_transaction(&self, id: &str) -> StoreResult<Option<Transaction>> {
        Ok(self.transactions.get(id).map(|t| t.value().clone()))
    }

    async fn update_status(
        &self,
        id: &str,
        status: TransactionStatus,
        invoiced_at: Option<i64>,
    ) -> StoreResult<Transaction> {
        let mut transaction = self
            .transactions
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        transaction.status = status;
        if invoiced_at.is_some() {
            transaction.invoiced_at = invoiced_at;
        }
        Ok(transaction.value().clone())
    }
}

/// In-memory photo store
#[derive(Default)]
pub struct MemoryPhotoStore {
    photos: DashMap<String, String>,
}

impl MemoryPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.photos.contains_key(reference)
    }
}

#[async_trait]
impl PhotoStore for MemoryPhotoStore {
    async fn upload(&self, project_id: &str, data: &str) -> StoreResult<String> {
        let reference = format!("photos/{project_id}/{}", uuid::Uuid::new_v4());
        self.photos.insert(reference.clone(), data.to_string());
        Ok(reference)
    }

    async fn delete(&self, reference: &str) -> StoreResult<()> {
        self.photos
            .remove(reference)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(reference.to_string()))
    }
}
