//! Buy-Back Board Model

use super::department::Department;
use serde::{Deserialize, Serialize};

/// Resale board status
///
/// Linear, non-cyclic: `Available -> Reserved -> Sold`, with
/// `Reserved -> Available` as the cancel-reservation transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuyBackStatus {
    #[default]
    Available,
    Reserved,
    Sold,
}

/// Department-internal resale record
///
/// Quantity is implicitly 1: one listing per physical unit. The three
/// `reserved_by*` fields are set together on reservation and cleared
/// together on cancellation; a sale keeps them as the sale record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuyBackItem {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Asking price (euros), `-1` = to be determined
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Stored photo reference (external collaborator)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub seller_department: Department,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_by: Option<Department>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_by_user_id: Option<String>,
    pub status: BuyBackStatus,
    /// Creation timestamp (millis)
    pub date: i64,
}

impl BuyBackItem {
    /// Clear the reservation fields as one unit
    pub fn clear_reservation(&mut self) {
        self.reserved_by = None;
        self.reserved_by_name = None;
        self.reserved_by_user_id = None;
    }
}

/// Create payload for a resale listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBuyBackItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Raw photo payload (data URL) to be uploaded, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}
