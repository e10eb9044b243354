//! InventoryManager - request lifecycle, stock and surplus dispositions
//!
//! Repository-backed service for one production's item collection. Owns an
//! in-memory mirror of the collection: reads come from the mirror as cloned
//! snapshots, writes apply to the mirror optimistically and roll back if
//! the store rejects them. Multi-document operations (quantity splits) run
//! their writes sequentially; a failure after the first committed write
//! surfaces as a `PartialWrite` instead of silently dropping data.

use crate::core::error::{EngineError, EngineResult};
use crate::inventory::quantity;
use crate::inventory::split::{self, DispositionPlan, PlanError, SplitMode};
use crate::pricing;
use crate::services::{Notifier, Severity};
use crate::storage::ItemStore;
use parking_lot::RwLock;
use shared::models::{
    ActorContext, Department, Item, ItemPatch, ItemStatus, NewItemRequest, ProjectSettings,
    SurplusAction,
};
use shared::util::{now_millis, resource_id};
use std::collections::HashMap;
use std::sync::Arc;

/// Quote returned by `propose_disposition`, to be confirmed by the caller
/// before committing
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispositionQuote {
    pub item_id: String,
    pub action: SurplusAction,
    /// Pre-filled price for the confirmation dialog (priced dispositions)
    pub suggested_price: Option<f64>,
    /// The item mixes new and started units: the commit needs a `SplitMode`
    pub requires_split_choice: bool,
    pub quantity_new: i32,
    pub quantity_started: i32,
}

/// Inventory manager for one production
pub struct InventoryManager {
    store: Arc<dyn ItemStore>,
    notifier: Arc<dyn Notifier>,
    project: ProjectSettings,
    /// Mirror of the project's item collection, item id -> item
    cache: RwLock<HashMap<String, Item>>,
}

impl InventoryManager {
    /// Create a manager and load the project's items from the store
    pub async fn load(
        store: Arc<dyn ItemStore>,
        notifier: Arc<dyn Notifier>,
        project: ProjectSettings,
    ) -> EngineResult<Self> {
        let manager = Self {
            store,
            notifier,
            project,
            cache: RwLock::new(HashMap::new()),
        };
        let count = manager.refresh().await?;
        tracing::info!(project_id = %manager.project.id, items = count, "inventory loaded");
        Ok(manager)
    }

    /// Reload the mirror from the store, dropping any stale local state
    pub async fn refresh(&self) -> EngineResult<usize> {
        let items = self.store.list_items(&self.project.id).await?;
        let mut cache = self.cache.write();
        cache.clear();
        for item in items {
            cache.insert(item.id.clone(), item);
        }
        Ok(cache.len())
    }

    pub fn project(&self) -> &ProjectSettings {
        &self.project
    }

    // ========== Queries (immutable snapshots of the mirror) ==========

    pub fn items(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.cache.read().values().cloned().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }

    pub fn get(&self, item_id: &str) -> Option<Item> {
        self.cache.read().get(item_id).cloned()
    }

    /// Open purchase requests visible in the purchase queue.
    ///
    /// When the project requires order validation, requests still awaiting
    /// it are held back (see `unvalidated_requests`).
    pub fn open_requests(&self) -> Vec<Item> {
        self.filtered(|i| {
            !i.purchased
                && !(self.project.require_order_validation && i.is_validated == Some(false))
        })
    }

    /// Requests waiting for production validation
    pub fn unvalidated_requests(&self) -> Vec<Item> {
        self.filtered(|i| !i.purchased && i.is_validated == Some(false))
    }

    /// In-department stock: received, not surplus-flagged, units remaining
    pub fn stock_items(&self) -> Vec<Item> {
        self.filtered(|i| {
            i.purchased && i.surplus_action.is_none() && i.quantity_current > 0
        })
    }

    /// Released items waiting for production triage
    pub fn pending_release(&self) -> Vec<Item> {
        self.filtered(|i| i.surplus_action == SurplusAction::ReleasedToProd)
    }

    /// Items in a given surplus state with units remaining
    pub fn surplus_items(&self, action: SurplusAction) -> Vec<Item> {
        self.filtered(|i| i.surplus_action == action && i.quantity_current > 0)
    }

    fn filtered(&self, pred: impl Fn(&Item) -> bool) -> Vec<Item> {
        let mut items: Vec<Item> = self
            .cache
            .read()
            .values()
            .filter(|i| pred(i))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }

    // ========== Request lifecycle ==========

    /// Create an open purchase request
    pub async fn add_request(
        &self,
        actor: &ActorContext,
        request: NewItemRequest,
    ) -> EngineResult<Item> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(EngineError::validation("item name must not be empty"));
        }
        if request.quantity <= 0 {
            return Err(EngineError::validation("quantity must be positive"));
        }
        if let Some(p) = request.price
            && p < 0.0
            && p != shared::models::PRICE_TBD
        {
            return Err(EngineError::validation("price must be non-negative"));
        }
        if !actor.is_production() && actor.department != request.department {
            return Err(EngineError::forbidden(
                "departments can only order for themselves",
            ));
        }

        let is_validated = if self.project.require_order_validation {
            // Production's own requests skip the validation queue
            Some(actor.is_production())
        } else {
            None
        };
        let item = Item {
            id: resource_id(),
            name: name.to_string(),
            department: request.department,
            quantity_initial: request.quantity,
            quantity_current: request.quantity,
            quantity_started: 0,
            unit: request.unit,
            status: ItemStatus::New,
            purchased: false,
            is_bought: false,
            is_validated,
            surplus_action: SurplusAction::None,
            price: request.price,
            original_price: None,
            created_at: now_millis(),
        };

        self.cache.write().insert(item.id.clone(), item.clone());
        if let Err(e) = self.store.create_item(&self.project.id, item.clone()).await {
            self.cache.write().remove(&item.id);
            tracing::warn!(item_id = %item.id, error = %e, "request creation rolled back");
            return Err(e.into());
        }

        self.notify(
            &format!("Nouvelle demande : {} ({})", item.name, item.department),
            Severity::Order,
            Department::Production,
        )
        .await;
        Ok(item)
    }

    /// Production approval of a request in the validation queue
    pub async fn validate_request(&self, actor: &ActorContext, item_id: &str) -> EngineResult<Item> {
        if !actor.is_production() {
            return Err(EngineError::forbidden("only production validates requests"));
        }
        let item = self.require(item_id)?;
        if item.purchased {
            return Err(EngineError::validation("item is no longer a request"));
        }
        let mut updated = item;
        updated.is_validated = Some(true);
        self.persist(updated, "validate_request").await
    }

    /// Flag a request as ordered, optionally recording the paid price
    pub async fn mark_bought(
        &self,
        actor: &ActorContext,
        item_id: &str,
        price: Option<f64>,
    ) -> EngineResult<Item> {
        let item = self.require(item_id)?;
        self.authorize_item(actor, &item)?;
        if item.purchased {
            return Err(EngineError::validation("item already received"));
        }
        if self.project.require_order_validation && item.is_validated == Some(false) {
            return Err(EngineError::validation(
                "request is awaiting production validation",
            ));
        }
        let mut updated = item;
        updated.is_bought = true;
        record_price(&mut updated, price);
        let saved = self.persist(updated, "mark_bought").await?;

        self.notify(
            &format!("Commande achetée : {}", saved.name),
            Severity::Success,
            saved.department,
        )
        .await;
        Ok(saved)
    }

    /// Confirm reception: the request becomes stock
    pub async fn mark_purchased(
        &self,
        actor: &ActorContext,
        item_id: &str,
        price: Option<f64>,
    ) -> EngineResult<Item> {
        let item = self.require(item_id)?;
        self.authorize_item(actor, &item)?;
        if item.purchased {
            return Err(EngineError::validation("item already received"));
        }
        let mut updated = item;
        updated.purchased = true;
        updated.is_bought = false;
        record_price(&mut updated, price);
        let saved = self.persist(updated, "mark_purchased").await?;

        self.notify(
            &format!("Commande disponible/reçue : {}", saved.name),
            Severity::Success,
            saved.department,
        )
        .await;
        Ok(saved)
    }

    // ========== Quantity primitives ==========

    /// Adjust the live count by `delta`, clamped at zero
    pub async fn adjust_quantity(
        &self,
        actor: &ActorContext,
        item_id: &str,
        delta: i32,
    ) -> EngineResult<Item> {
        let item = self.require(item_id)?;
        self.authorize_item(actor, &item)?;
        let patch = quantity::adjust(&item, delta);
        let mut updated = item;
        patch.apply(&mut updated);
        self.persist(updated, "adjust_quantity").await
    }

    /// Open one sealed unit
    pub async fn mark_started(&self, actor: &ActorContext, item_id: &str) -> EngineResult<Item> {
        let item = self.require(item_id)?;
        self.authorize_item(actor, &item)?;
        let Some(patch) = quantity::mark_started(&item) else {
            return Err(EngineError::validation("every unit is already started"));
        };
        let mut updated = item;
        patch.apply(&mut updated);
        self.persist(updated, "mark_started").await
    }

    // ========== Surplus dispositions ==========

    /// Quote a disposition without committing anything
    pub fn propose_disposition(
        &self,
        item_id: &str,
        action: SurplusAction,
    ) -> EngineResult<DispositionQuote> {
        if action.is_none() {
            return Err(EngineError::validation("not a surplus disposition"));
        }
        let item = self.require(item_id)?;
        Ok(DispositionQuote {
            item_id: item.id.clone(),
            action,
            suggested_price: pricing::suggested_price(action, &item),
            requires_split_choice: item.is_mixed(),
            quantity_new: item.quantity_new(),
            quantity_started: item.quantity_started,
        })
    }

    /// Commit a disposition previously quoted
    ///
    /// For a mixed item the caller chooses a [`SplitMode`]; the split's two
    /// writes run sequentially, and a failure on the second one returns a
    /// `PartialWrite` naming the committed step.
    pub async fn commit_disposition(
        &self,
        actor: &ActorContext,
        item_id: &str,
        action: SurplusAction,
        resale_price: Option<f64>,
        mode: Option<SplitMode>,
    ) -> EngineResult<Vec<Item>> {
        let item = self.require(item_id)?;
        let now = now_millis();
        self.authorize_disposition(actor, &item, action, now)?;

        let plan = split::plan_disposition(&item, action, resale_price, mode, now)
            .map_err(plan_error)?;

        match plan {
            DispositionPlan::Whole(updated) => {
                let saved = self.persist(updated, "commit_disposition").await?;
                self.notify(
                    &format!(
                        "♻️ Surplus : {} ({}) déplacé vers {} par {}",
                        saved.name,
                        saved.department,
                        action_label(action),
                        actor.user_name
                    ),
                    Severity::StockMove,
                    Department::Production,
                )
                .await;
                Ok(vec![saved])
            }
            DispositionPlan::Split { truncated, spawned } => {
                let truncated = self.persist(truncated, "commit_disposition").await?;

                if let Err(e) = self
                    .store
                    .create_item(&self.project.id, spawned.clone())
                    .await
                {
                    // The truncate is committed; the new-portion record is
                    // not. Surface which step completed, keep the mirror on
                    // confirmed state only.
                    return Err(EngineError::partial_write(
                        "commit_disposition",
                        vec!["truncate-original"],
                        e,
                    ));
                }
                self.cache
                    .write()
                    .insert(spawned.id.clone(), spawned.clone());

                self.notify(
                    &format!(
                        "♻️ Surplus (Partiel) : {} ({} unités neuves) déplacé vers {}",
                        spawned.name,
                        spawned.quantity_current,
                        action_label(action)
                    ),
                    Severity::StockMove,
                    Department::Production,
                )
                .await;
                Ok(vec![truncated, spawned])
            }
        }
    }

    /// Return an item to normal stock
    ///
    /// Production can always undo; the originating department only while
    /// the item sits in `ReleasedToProd`.
    pub async fn undo_disposition(&self, actor: &ActorContext, item_id: &str) -> EngineResult<Item> {
        let item = self.require(item_id)?;
        if item.surplus_action.is_none() {
            return Err(EngineError::validation("item is not in a surplus state"));
        }
        let allowed = actor.is_production()
            || (item.surplus_action == SurplusAction::ReleasedToProd
                && actor.department == item.department);
        if !allowed {
            return Err(EngineError::forbidden(
                "only production can undo a committed disposition",
            ));
        }
        let mut updated = item;
        updated.surplus_action = SurplusAction::None;
        self.persist(updated, "undo_disposition").await
    }

    // ========== Internals ==========

    fn require(&self, item_id: &str) -> EngineResult<Item> {
        self.get(item_id)
            .ok_or_else(|| EngineError::not_found(format!("item {item_id}")))
    }

    fn authorize_item(&self, actor: &ActorContext, item: &Item) -> EngineResult<()> {
        if actor.is_production() || actor.department == item.department {
            Ok(())
        } else {
            Err(EngineError::forbidden(format!(
                "item belongs to {}",
                item.department
            )))
        }
    }

    fn authorize_disposition(
        &self,
        actor: &ActorContext,
        item: &Item,
        action: SurplusAction,
        now: i64,
    ) -> EngineResult<()> {
        // Dispositions start from normal stock; production may also re-triage
        // a released item (the validation queue).
        match item.surplus_action {
            SurplusAction::None => {}
            SurplusAction::ReleasedToProd if actor.is_production() => {}
            current => {
                return Err(EngineError::validation(format!(
                    "item is already in {current:?}"
                )));
            }
        }
        if actor.is_production() {
            return Ok(());
        }
        self.authorize_item(actor, item)?;
        match action {
            SurplusAction::Marketplace => Ok(()),
            SurplusAction::ReleasedToProd => {
                if self.project.shooting_finished_at(now) {
                    Ok(())
                } else {
                    Err(EngineError::forbidden(
                        "equipment can only be released after the end of shooting",
                    ))
                }
            }
            _ => Err(EngineError::forbidden(
                "only production can commit this disposition",
            )),
        }
    }

    /// Optimistic write-through: mirror first, store second, mirror restored
    /// if the store rejects the write
    async fn persist(&self, updated: Item, op: &'static str) -> EngineResult<Item> {
        let item_id = updated.id.clone();
        let prior = self.cache.write().insert(item_id.clone(), updated.clone());
        match self
            .store
            .update_item(&self.project.id, &item_id, ItemPatch::from_item(&updated))
            .await
        {
            Ok(saved) => Ok(saved),
            Err(e) => {
                let mut cache = self.cache.write();
                match prior {
                    Some(p) => {
                        cache.insert(item_id.clone(), p);
                    }
                    None => {
                        cache.remove(&item_id);
                    }
                }
                tracing::warn!(item_id = %item_id, op, error = %e, "optimistic update rolled back");
                Err(e.into())
            }
        }
    }

    async fn notify(&self, message: &str, severity: Severity, target: Department) {
        // Delivery failures never abort the operation that produced them
        self.notifier.notify(message, severity, target).await;
    }
}

/// Record a confirmed purchase price: only positive prices are kept, and
/// the first one recorded becomes the immutable acquisition price.
fn record_price(item: &mut Item, price: Option<f64>) {
    if let Some(p) = price
        && p > 0.0
    {
        item.price = Some(p);
        if item.original_price.is_none() {
            item.original_price = Some(p);
        }
    }
}

fn plan_error(err: PlanError) -> EngineError {
    EngineError::validation(err.to_string())
}

/// Display label used by notifications (matches the host UI wording)
fn action_label(action: SurplusAction) -> &'static str {
    match action {
        SurplusAction::Marketplace => "Stock Virtuel",
        SurplusAction::Donation => "Dons",
        SurplusAction::ShortFilm => "Court-Métrage",
        SurplusAction::ReleasedToProd => "Libération Production",
        SurplusAction::Buyback => "Rachat Plateforme",
        SurplusAction::None => "Stock",
    }
}

#[cfg(test)]
mod tests;
