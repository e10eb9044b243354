//! Cross-Production Transaction Model

use serde::{Deserialize, Serialize};

/// Transaction status
///
/// Linear with a rejection branch: `Pending -> Validated`,
/// `Pending -> Cancelled`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Validated,
    Cancelled,
}

/// Immutable line-item snapshot inside a transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    pub id: String,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
}

/// Cross-production purchase record
///
/// A receipt, not a live reference: the `items` snapshots never change
/// after creation. Created together with the seller stock decrement;
/// cancellation restores the decremented stock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub seller_id: String,
    pub seller_name: String,
    pub buyer_id: String,
    pub buyer_name: String,
    pub items: Vec<TransactionLine>,
    pub total_amount: f64,
    /// Platform commission (fixed percentage of the total)
    pub platform_fee: f64,
    pub status: TransactionStatus,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoiced_at: Option<i64>,
}

/// Create payload for a transaction (id/status assigned by the ledger)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCreate {
    pub seller_id: String,
    pub seller_name: String,
    pub buyer_id: String,
    pub buyer_name: String,
    pub items: Vec<TransactionLine>,
    pub total_amount: f64,
    pub platform_fee: f64,
}
