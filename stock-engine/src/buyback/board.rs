//! Buy-Back Board
//!
//! Resale board between a production's departments. Simpler than the
//! inventory state machine: one listing per physical unit, and a linear
//! `Available -> Reserved -> Sold` lifecycle with reservation cancel.

use crate::core::error::{EngineError, EngineResult};
use crate::services::{Notifier, Severity};
use crate::storage::{BuyBackStore, PhotoStore};
use shared::models::{
    ActorContext, BuyBackItem, BuyBackStatus, Department, NewBuyBackItem, PRICE_TBD,
};
use shared::util::{now_millis, resource_id};
use std::sync::Arc;

/// Board rollup for the production dashboard
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub for_sale: usize,
    pub reserved: usize,
    pub sold: usize,
    /// Asking prices of reserved + sold items (TBD prices excluded)
    pub recovered_amount: f64,
}

/// Resale board service for one production
pub struct BuyBackBoard {
    store: Arc<dyn BuyBackStore>,
    photos: Arc<dyn PhotoStore>,
    notifier: Arc<dyn Notifier>,
    project_id: String,
}

impl BuyBackBoard {
    pub fn new(
        store: Arc<dyn BuyBackStore>,
        photos: Arc<dyn PhotoStore>,
        notifier: Arc<dyn Notifier>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            photos,
            notifier,
            project_id: project_id.into(),
        }
    }

    /// Board contents, newest first
    pub async fn items(&self) -> EngineResult<Vec<BuyBackItem>> {
        Ok(self.store.list_buy_back_items(&self.project_id).await?)
    }

    /// Put an article up for sale
    pub async fn list_item(
        &self,
        actor: &ActorContext,
        new_item: NewBuyBackItem,
    ) -> EngineResult<BuyBackItem> {
        let name = new_item.name.trim();
        if name.is_empty() {
            return Err(EngineError::validation("article name must not be empty"));
        }
        if new_item.price < 0.0 && new_item.price != PRICE_TBD {
            return Err(EngineError::validation("price must be non-negative"));
        }

        // Raw payloads go to the photo store; stored references pass through
        let photo = match &new_item.photo {
            Some(data) if data.starts_with("data:image") => {
                Some(self.photos.upload(&self.project_id, data).await?)
            }
            other => other.clone(),
        };

        let item = BuyBackItem {
            id: resource_id(),
            name: name.to_string(),
            description: new_item.description,
            price: new_item.price,
            original_price: new_item.original_price,
            photo,
            seller_department: actor.department,
            reserved_by: None,
            reserved_by_name: None,
            reserved_by_user_id: None,
            status: BuyBackStatus::Available,
            date: now_millis(),
        };
        self.store
            .create_buy_back_item(&self.project_id, item.clone())
            .await?;

        self.notify(
            &format!("À vendre : {} ({})", item.name, item.seller_department),
            Severity::Info,
        )
        .await;
        Ok(item)
    }

    /// Reserve an available article, or cancel one's own reservation.
    ///
    /// Cancelling someone else's reservation takes the production role.
    pub async fn toggle_reservation(
        &self,
        actor: &ActorContext,
        item_id: &str,
        user_id: Option<&str>,
    ) -> EngineResult<BuyBackItem> {
        let mut item = self.require(item_id).await?;
        match item.status {
            BuyBackStatus::Available => {
                item.status = BuyBackStatus::Reserved;
                item.reserved_by = Some(actor.department);
                item.reserved_by_name = Some(actor.user_name.clone());
                item.reserved_by_user_id = user_id.map(str::to_string);
            }
            BuyBackStatus::Reserved => {
                let holder = item.reserved_by;
                if holder != Some(actor.department) && !actor.is_production() {
                    return Err(EngineError::forbidden(format!(
                        "article is reserved by {}",
                        holder.map(|d| d.name()).unwrap_or("?")
                    )));
                }
                item.status = BuyBackStatus::Available;
                item.clear_reservation();
            }
            BuyBackStatus::Sold => {
                return Err(EngineError::validation("article is already sold"));
            }
        }
        self.store
            .update_buy_back_item(&self.project_id, item.clone())
            .await?;
        Ok(item)
    }

    /// Close a reserved sale.
    ///
    /// Allowed to the seller department, the reservation holder, or
    /// production. Reservation fields are kept as the sale record.
    pub async fn confirm_sale(
        &self,
        actor: &ActorContext,
        item_id: &str,
    ) -> EngineResult<BuyBackItem> {
        let mut item = self.require(item_id).await?;
        if item.status != BuyBackStatus::Reserved {
            return Err(EngineError::validation(
                "only a reserved article can be sold",
            ));
        }
        let allowed = actor.is_production()
            || actor.department == item.seller_department
            || Some(actor.department) == item.reserved_by;
        if !allowed {
            return Err(EngineError::forbidden(
                "only the seller, the reservation holder or production confirm a sale",
            ));
        }
        item.status = BuyBackStatus::Sold;
        self.store
            .update_buy_back_item(&self.project_id, item.clone())
            .await?;

        self.notify(
            &format!(
                "Vente conclue : {} ({} → {})",
                item.name,
                item.seller_department,
                item.reserved_by.map(|d| d.name()).unwrap_or("?")
            ),
            Severity::Success,
        )
        .await;
        Ok(item)
    }

    /// Remove an article (seller or production), along with its photo
    pub async fn delete_item(&self, actor: &ActorContext, item_id: &str) -> EngineResult<()> {
        let item = self.require(item_id).await?;
        if !actor.is_production() && actor.department != item.seller_department {
            return Err(EngineError::forbidden("only the seller removes an article"));
        }
        self.store
            .delete_buy_back_item(&self.project_id, item_id)
            .await?;

        // Photo cleanup is best effort, the record is already gone
        if let Some(photo) = &item.photo
            && let Err(e) = self.photos.delete(photo).await
        {
            tracing::warn!(item_id = %item_id, error = %e, "failed to delete buy-back photo");
        }
        Ok(())
    }

    /// Dashboard rollup over the current board
    pub fn stats(items: &[BuyBackItem]) -> BoardStats {
        let mut stats = BoardStats {
            for_sale: items.len(),
            ..Default::default()
        };
        for item in items {
            match item.status {
                BuyBackStatus::Reserved => stats.reserved += 1,
                BuyBackStatus::Sold => stats.sold += 1,
                BuyBackStatus::Available => {}
            }
            if item.status != BuyBackStatus::Available && item.price >= 0.0 {
                stats.recovered_amount += item.price;
            }
        }
        stats
    }

    async fn require(&self, item_id: &str) -> EngineResult<BuyBackItem> {
        self.store
            .get_buy_back_item(&self.project_id, item_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("buy-back article {item_id}")))
    }

    async fn notify(&self, message: &str, severity: Severity) {
        self.notifier
            .notify(message, severity, Department::Production)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LogNotifier;
    use crate::storage::{MemoryPhotoStore, MemoryStore};

    const PROJECT_ID: &str = "prod-a";

    fn actor(department: Department) -> ActorContext {
        ActorContext {
            department,
            is_admin: false,
            project_id: PROJECT_ID.to_string(),
            user_name: "Alex".to_string(),
        }
    }

    fn new_item(name: &str, price: f64) -> NewBuyBackItem {
        NewBuyBackItem {
            name: name.to_string(),
            description: None,
            price,
            original_price: None,
            photo: None,
        }
    }

    fn make_board() -> (BuyBackBoard, Arc<MemoryPhotoStore>) {
        let photos = Arc::new(MemoryPhotoStore::new());
        let board = BuyBackBoard::new(
            Arc::new(MemoryStore::new()),
            photos.clone(),
            Arc::new(LogNotifier),
            PROJECT_ID,
        );
        (board, photos)
    }

    #[tokio::test]
    async fn reservation_cycle() {
        let (board, _) = make_board();
        let camera = actor(Department::Camera);
        let lumiere = actor(Department::Lumiere);

        let item = board
            .list_item(&actor(Department::Son), new_item("Perche micro", 40.0))
            .await
            .unwrap();
        assert_eq!(item.status, BuyBackStatus::Available);

        let item = board
            .toggle_reservation(&camera, &item.id, Some("u-camera"))
            .await
            .unwrap();
        assert_eq!(item.status, BuyBackStatus::Reserved);
        assert_eq!(item.reserved_by, Some(Department::Camera));
        assert_eq!(item.reserved_by_user_id.as_deref(), Some("u-camera"));

        // Another department can neither reserve nor unreserve it
        let err = board
            .toggle_reservation(&lumiere, &item.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Authorization(_)));

        // The holder cancels; all three reservation fields clear together
        let item = board
            .toggle_reservation(&camera, &item.id, None)
            .await
            .unwrap();
        assert_eq!(item.status, BuyBackStatus::Available);
        assert_eq!(item.reserved_by, None);
        assert_eq!(item.reserved_by_name, None);
        assert_eq!(item.reserved_by_user_id, None);
    }

    #[tokio::test]
    async fn production_can_cancel_any_reservation() {
        let (board, _) = make_board();
        let item = board
            .list_item(&actor(Department::Son), new_item("Perche micro", 40.0))
            .await
            .unwrap();
        board
            .toggle_reservation(&actor(Department::Camera), &item.id, None)
            .await
            .unwrap();

        let item = board
            .toggle_reservation(&actor(Department::Production), &item.id, None)
            .await
            .unwrap();
        assert_eq!(item.status, BuyBackStatus::Available);
    }

    #[tokio::test]
    async fn confirm_requires_a_reservation() {
        let (board, _) = make_board();
        let seller = actor(Department::Son);
        let item = board
            .list_item(&seller, new_item("Perche micro", 40.0))
            .await
            .unwrap();

        // Skipping Reserved is invalid
        let err = board.confirm_sale(&seller, &item.id).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        board
            .toggle_reservation(&actor(Department::Camera), &item.id, None)
            .await
            .unwrap();

        // A bystander department cannot close the sale
        let err = board
            .confirm_sale(&actor(Department::Lumiere), &item.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Authorization(_)));

        let item = board.confirm_sale(&seller, &item.id).await.unwrap();
        assert_eq!(item.status, BuyBackStatus::Sold);
        // The reservation stays as the sale record
        assert_eq!(item.reserved_by, Some(Department::Camera));

        // Sold is terminal
        let err = board
            .toggle_reservation(&actor(Department::Camera), &item.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn listing_validates_input() {
        let (board, _) = make_board();
        let seller = actor(Department::Son);

        let err = board
            .list_item(&seller, new_item("  ", 10.0))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let err = board
            .list_item(&seller, new_item("Perche", -3.0))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        // The TBD sentinel is a legal price
        assert!(board.list_item(&seller, new_item("Perche", PRICE_TBD)).await.is_ok());
    }

    #[tokio::test]
    async fn delete_is_seller_or_production_and_removes_photo() {
        let (board, photos) = make_board();
        let seller = actor(Department::Son);
        let mut listing = new_item("Perche micro", 40.0);
        listing.photo = Some("data:image/jpeg;base64,xxxx".to_string());

        let item = board.list_item(&seller, listing).await.unwrap();
        let photo_ref = item.photo.clone().unwrap();
        assert!(photos.contains(&photo_ref));

        let err = board
            .delete_item(&actor(Department::Camera), &item.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Authorization(_)));

        board.delete_item(&seller, &item.id).await.unwrap();
        assert!(!photos.contains(&photo_ref));
        assert!(board.items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stats_rollup() {
        let (board, _) = make_board();
        let seller = actor(Department::Son);
        let a = board.list_item(&seller, new_item("A", 10.0)).await.unwrap();
        let b = board.list_item(&seller, new_item("B", 20.0)).await.unwrap();
        board.list_item(&seller, new_item("C", 30.0)).await.unwrap();

        board
            .toggle_reservation(&actor(Department::Camera), &a.id, None)
            .await
            .unwrap();
        board
            .toggle_reservation(&actor(Department::Camera), &b.id, None)
            .await
            .unwrap();
        board.confirm_sale(&seller, &b.id).await.unwrap();

        let stats = BuyBackBoard::stats(&board.items().await.unwrap());
        assert_eq!(stats.for_sale, 3);
        assert_eq!(stats.reserved, 1);
        assert_eq!(stats.sold, 1);
        assert_eq!(stats.recovered_amount, 30.0);
    }
}
