//! Marketplace order execution
//!
//! One matched order is three independent remote writes: ledger append,
//! seller stock decrement, buyer request update. None of them share a
//! distributed transaction, so the decrement is conditional
//! (decrement-if-available) and every failure after the first committed
//! step is reported as a partial write. Bulk execution threads the
//! already-decremented quantities through the batch so a listing shared by
//! several opportunities is never oversold.

use crate::core::error::{EngineError, EngineResult};
use crate::marketplace::matcher::{Opportunity, compute_opportunities};
use crate::pricing::PLATFORM_FEE_RATE;
use crate::storage::{ItemStore, TransactionLedger};
use parking_lot::RwLock;
use shared::models::{
    Item, ItemPatch, Listing, ProjectSettings, SurplusAction, Transaction, TransactionCreate,
    TransactionLine, TransactionStatus, known_price,
};
use shared::util::now_millis;
use std::collections::HashMap;
use std::sync::Arc;

/// Seller label shown instead of the production name on buy-back listings
/// (the platform owns them once bought back)
pub const PLATFORM_LABEL: &str = "PLATEFORME";

/// Marketplace service: listing cache + order execution + ledger lifecycle
pub struct MarketplaceService {
    store: Arc<dyn ItemStore>,
    ledger: Arc<dyn TransactionLedger>,
    /// Local mirror of the global listing set, pruned as orders consume it
    listings: RwLock<Vec<Listing>>,
    fee_rate: f64,
}

impl MarketplaceService {
    pub fn new(store: Arc<dyn ItemStore>, ledger: Arc<dyn TransactionLedger>) -> Self {
        Self {
            store,
            ledger,
            listings: RwLock::new(Vec::new()),
            fee_rate: PLATFORM_FEE_RATE,
        }
    }

    /// Override the platform commission (staging environments)
    pub fn with_fee_rate(mut self, fee_rate: f64) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    /// Reload the global listing set. Buy-back listings get the platform
    /// label in place of the selling production's name.
    pub async fn refresh_listings(&self) -> EngineResult<usize> {
        let mut fetched = self.store.list_global_listings().await?;
        for listing in &mut fetched {
            if listing.item.surplus_action == SurplusAction::Buyback {
                listing.production_name = PLATFORM_LABEL.to_string();
            }
        }
        let count = fetched.len();
        *self.listings.write() = fetched;
        tracing::debug!(count, "global listings refreshed");
        Ok(count)
    }

    /// Snapshot of the cached listing set
    pub fn listings(&self) -> Vec<Listing> {
        self.listings.read().clone()
    }

    /// Match open requests against the cached listings
    pub fn opportunities_for(&self, requests: &[Item], my_project_id: &str) -> Vec<Opportunity> {
        compute_opportunities(requests, &self.listings.read(), my_project_id)
    }

    /// Execute a single matched order
    pub async fn execute_order(
        &self,
        buyer: &ProjectSettings,
        opportunity: &Opportunity,
    ) -> EngineResult<Transaction> {
        let mut transactions = self
            .execute_orders(buyer, std::slice::from_ref(opportunity))
            .await?;
        transactions
            .pop()
            .ok_or_else(|| EngineError::validation("listing has no stock left"))
    }

    /// Execute a batch of matched orders sequentially.
    ///
    /// A listing already partially consumed by an earlier opportunity in
    /// the same batch serves later ones from its decremented remainder;
    /// exhausted listings are skipped (and dropped from the cache), never
    /// oversold.
    pub async fn execute_orders(
        &self,
        buyer: &ProjectSettings,
        opportunities: &[Opportunity],
    ) -> EngineResult<Vec<Transaction>> {
        // Running remainders per listing, seeded from the matched snapshots
        let mut remaining: HashMap<(String, String), i32> = HashMap::new();
        let mut transactions = Vec::new();

        for opportunity in opportunities {
            let listing = &opportunity.listing;
            let key = (listing.project_id.clone(), listing.item.id.clone());
            let available = *remaining
                .entry(key.clone())
                .or_insert(listing.item.quantity_current);

            let quantity = opportunity.request.quantity_initial.min(available);
            if quantity <= 0 {
                tracing::warn!(
                    listing_id = %listing.item.id,
                    request_id = %opportunity.request.id,
                    "listing exhausted within batch, skipping opportunity"
                );
                continue;
            }

            let transaction = self.execute_single(buyer, opportunity, quantity).await?;
            *remaining.get_mut(&key).expect("seeded above") -= quantity;
            self.consume_cached_listing(&key.0, &key.1, quantity);
            transactions.push(transaction);
        }

        Ok(transactions)
    }

    async fn execute_single(
        &self,
        buyer: &ProjectSettings,
        opportunity: &Opportunity,
        quantity: i32,
    ) -> EngineResult<Transaction> {
        let listing = &opportunity.listing;
        let request = &opportunity.request;
        let unit_price = known_price(listing.item.price).unwrap_or(0.0);
        let total_amount = unit_price * quantity as f64;

        // 1. Append the receipt
        let transaction = self
            .ledger
            .create_transaction(TransactionCreate {
                seller_id: listing.project_id.clone(),
                seller_name: listing.production_name.clone(),
                buyer_id: buyer.id.clone(),
                buyer_name: buyer.display_name().to_string(),
                items: vec![TransactionLine {
                    id: listing.item.id.clone(),
                    name: listing.item.name.clone(),
                    quantity,
                    price: unit_price,
                }],
                total_amount,
                platform_fee: self.fee_rate * total_amount,
            })
            .await?;

        // 2. Conditional decrement on the seller's document
        if let Err(e) = self
            .store
            .decrement_if_available(&listing.project_id, &listing.item.id, quantity)
            .await
        {
            // Reverse the commenced transaction; if even that fails the
            // ledger keeps an orphaned pending record
            match self
                .ledger
                .update_status(&transaction.id, TransactionStatus::Cancelled, None)
                .await
            {
                Ok(_) => {
                    tracing::warn!(
                        transaction_id = %transaction.id,
                        listing_id = %listing.item.id,
                        error = %e,
                        "stock decrement failed, transaction cancelled"
                    );
                    return Err(e.into());
                }
                Err(cancel_err) => {
                    tracing::error!(
                        transaction_id = %transaction.id,
                        error = %cancel_err,
                        "could not cancel transaction after failed decrement"
                    );
                    return Err(EngineError::partial_write(
                        "execute_order",
                        vec!["create-transaction"],
                        e,
                    ));
                }
            }
        }

        // 3. Mark the buyer's own request as served
        let request_patch = ItemPatch {
            is_bought: Some(true),
            price: Some(unit_price),
            original_price: Some(unit_price),
            quantity_current: Some(quantity),
            ..Default::default()
        };
        if let Err(e) = self
            .store
            .update_item(&buyer.id, &request.id, request_patch)
            .await
        {
            return Err(EngineError::partial_write(
                "execute_order",
                vec!["create-transaction", "decrement-stock"],
                e,
            ));
        }

        tracing::info!(
            transaction_id = %transaction.id,
            seller = %listing.project_id,
            buyer = %buyer.id,
            item = %listing.item.name,
            quantity,
            total_amount,
            "marketplace order executed"
        );
        Ok(transaction)
    }

    /// Mirror a decrement in the listing cache, dropping exhausted entries
    fn consume_cached_listing(&self, project_id: &str, item_id: &str, quantity: i32) {
        let mut listings = self.listings.write();
        for listing in listings.iter_mut() {
            if listing.project_id == project_id && listing.item.id == item_id {
                listing.item.quantity_current -= quantity;
            }
        }
        listings.retain(|l| l.item.quantity_current > 0);
    }

    // ========== Ledger lifecycle ==========

    /// Invoice a pending transaction
    pub async fn validate_transaction(&self, transaction_id: &str) -> EngineResult<Transaction> {
        let transaction = self.require_pending(transaction_id).await?;
        Ok(self
            .ledger
            .update_status(&transaction.id, TransactionStatus::Validated, Some(now_millis()))
            .await?)
    }

    /// Cancel a pending transaction and restore the decremented stock.
    ///
    /// Restored items are parked in `ReleasedToProd` for the seller to
    /// re-triage. Restores run concurrently; individual failures are
    /// logged and do not abort the others.
    pub async fn reject_transaction(&self, transaction_id: &str) -> EngineResult<Transaction> {
        let transaction = self.require_pending(transaction_id).await?;
        let cancelled = self
            .ledger
            .update_status(&transaction.id, TransactionStatus::Cancelled, None)
            .await?;

        let restores = cancelled.items.iter().map(|line| {
            let store = &self.store;
            let seller_id = cancelled.seller_id.clone();
            async move {
                (
                    line.id.clone(),
                    store.restock(&seller_id, &line.id, line.quantity).await,
                )
            }
        });
        for (item_id, result) in futures::future::join_all(restores).await {
            if let Err(e) = result {
                tracing::error!(
                    transaction_id = %cancelled.id,
                    item_id = %item_id,
                    error = %e,
                    "failed to restore stock for cancelled transaction"
                );
            }
        }
        Ok(cancelled)
    }

    async fn require_pending(&self, transaction_id: &str) -> EngineResult<Transaction> {
        let transaction = self
            .ledger
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("transaction {transaction_id}")))?;
        if transaction.status != TransactionStatus::Pending {
            return Err(EngineError::validation(format!(
                "transaction is already {:?}",
                transaction.status
            )));
        }
        Ok(transaction)
    }
}
