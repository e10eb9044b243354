//! Inventory Item Model

use super::department::Department;
use serde::{Deserialize, Serialize};

/// Sentinel price meaning "price to be determined".
pub const PRICE_TBD: f64 = -1.0;

/// Resolve an optional price field to a usable amount.
///
/// Both `None` and the `-1` sentinel count as "no known price".
pub fn known_price(price: Option<f64>) -> Option<f64> {
    price.filter(|p| *p >= 0.0)
}

/// Item condition, derived from quantity changes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    New,
    Used,
    Empty,
}

/// Surplus disposition state
///
/// `None` is normal in-department stock. Every other variant is a terminal
/// surplus state reachable from `None` (or from `ReleasedToProd` when
/// production validates the release).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurplusAction {
    #[default]
    None,
    ReleasedToProd,
    Marketplace,
    Donation,
    ShortFilm,
    Buyback,
}

impl SurplusAction {
    /// Dispositions that carry a resale/valuation price
    pub fn is_priced(&self) -> bool {
        matches!(
            self,
            SurplusAction::Marketplace
                | SurplusAction::Donation
                | SurplusAction::ShortFilm
                | SurplusAction::Buyback
        )
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SurplusAction::None)
    }
}

/// Consumable/material item, owned by a single production
///
/// Lifecycle: created as an open purchase request (`purchased = false`),
/// flagged ordered (`is_bought`), received into stock (`purchased = true`),
/// then optionally moved through a surplus disposition.
///
/// Invariant: `0 <= quantity_started <= quantity_current`. `quantity_initial`
/// is the originally requested/stocked count, used for percentage displays
/// only; a split may leave it below a sibling's.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    /// Matching key across productions (case-insensitive, trimmed)
    pub name: String,
    pub department: Department,
    pub quantity_initial: i32,
    pub quantity_current: i32,
    /// How many of the current units are opened/in use
    #[serde(default)]
    pub quantity_started: i32,
    pub unit: String,
    pub status: ItemStatus,
    /// false while still an open purchase request
    #[serde(default)]
    pub purchased: bool,
    /// Ordered but not yet received
    #[serde(default)]
    pub is_bought: bool,
    /// Purchase-queue gate, present only when the project requires validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_validated: Option<bool>,
    #[serde(default)]
    pub surplus_action: SurplusAction,
    /// Current recorded price (euros), `-1` = to be determined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// First-ever acquisition price, immutable once set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub created_at: i64,
}

impl Item {
    /// Sealed (not yet opened) units
    pub fn quantity_new(&self) -> i32 {
        (self.quantity_current - self.quantity_started).max(0)
    }

    /// Whether the item mixes new and started units
    pub fn is_mixed(&self) -> bool {
        self.quantity_started > 0 && self.quantity_started < self.quantity_current
    }

    /// Open purchase request (not yet ordered or received)
    pub fn is_open_request(&self) -> bool {
        !self.purchased && !self.is_bought
    }
}

/// Create payload for a purchase request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemRequest {
    pub name: String,
    pub department: Department,
    pub quantity: i32,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Partial item update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity_initial: Option<i32>,
    pub quantity_current: Option<i32>,
    pub quantity_started: Option<i32>,
    pub status: Option<ItemStatus>,
    pub purchased: Option<bool>,
    pub is_bought: Option<bool>,
    pub is_validated: Option<bool>,
    pub surplus_action: Option<SurplusAction>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
}

impl ItemPatch {
    /// Apply the patch to an item in place
    pub fn apply(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(v) = self.quantity_initial {
            item.quantity_initial = v;
        }
        if let Some(v) = self.quantity_current {
            item.quantity_current = v;
        }
        if let Some(v) = self.quantity_started {
            item.quantity_started = v;
        }
        if let Some(v) = self.status {
            item.status = v;
        }
        if let Some(v) = self.purchased {
            item.purchased = v;
        }
        if let Some(v) = self.is_bought {
            item.is_bought = v;
        }
        if let Some(v) = self.is_validated {
            item.is_validated = Some(v);
        }
        if let Some(v) = self.surplus_action {
            item.surplus_action = v;
        }
        if let Some(v) = self.price {
            item.price = Some(v);
        }
        if let Some(v) = self.original_price {
            item.original_price = Some(v);
        }
    }

    /// Patch reflecting the full state of `item` (used after computing a
    /// transition on a cloned item)
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: Some(item.name.clone()),
            quantity_initial: Some(item.quantity_initial),
            quantity_current: Some(item.quantity_current),
            quantity_started: Some(item.quantity_started),
            status: Some(item.status),
            purchased: Some(item.purchased),
            is_bought: Some(item.is_bought),
            is_validated: item.is_validated,
            surplus_action: Some(item.surplus_action),
            price: item.price,
            original_price: item.original_price,
        }
    }
}

/// Cross-production marketplace listing
///
/// An item enriched with its owning project. Listings are read-only
/// copies: the owning production keeps write authority, and no two items
/// from different productions are ever merged into one row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(flatten)]
    pub item: Item,
    pub project_id: String,
    pub production_name: String,
}
