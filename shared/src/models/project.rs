//! Project Settings & Actor Context

use super::department::Department;
use serde::{Deserialize, Serialize};

/// Per-production settings relevant to the stock engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub production_company: String,
    /// Purchase requests need production validation before entering the queue
    #[serde(default)]
    pub require_order_validation: bool,
    /// End of shooting (millis); gates department-side surplus release
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shooting_end_date: Option<i64>,
}

impl ProjectSettings {
    /// Display name for transactions (company when set, else project name)
    pub fn display_name(&self) -> &str {
        if self.production_company.is_empty() {
            &self.name
        } else {
            &self.production_company
        }
    }

    /// Whether shooting has wrapped at the given instant
    pub fn shooting_finished_at(&self, now: i64) -> bool {
        self.shooting_end_date.is_some_and(|end| now >= end)
    }
}

/// Identity of the acting user, read-only input to authorization checks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorContext {
    pub department: Department,
    #[serde(default)]
    pub is_admin: bool,
    pub project_id: String,
    pub user_name: String,
}

impl ActorContext {
    /// Production role or platform admin
    pub fn is_production(&self) -> bool {
        self.is_admin || self.department.is_production()
    }
}
