use super::*;
use crate::services::LogNotifier;
use crate::storage::{ItemStore, MemoryStore};
use shared::models::{ActorContext, Department, Item, ItemStatus, ProjectSettings};
use std::sync::Arc;


const PROJECT_ID: &str = "prod-a";

fn test_project() -> ProjectSettings {
    ProjectSettings {
        id: PROJECT_ID.to_string(),
        name: "Le Dernier Souffle".to_string(),
        production_company: "Films du Nord".to_string(),
        require_order_validation: false,
        shooting_end_date: None,
    }
}

fn production_actor() -> ActorContext {
    ActorContext {
        department: Department::Production,
        is_admin: false,
        project_id: PROJECT_ID.to_string(),
        user_name: "Claire".to_string(),
    }
}

fn dept_actor(department: Department) -> ActorContext {
    ActorContext {
        department,
        is_admin: false,
        project_id: PROJECT_ID.to_string(),
        user_name: "Marc".to_string(),
    }
}

fn make_stock_item(id: &str, name: &str, current: i32, started: i32) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
        department: Department::Machinerie,
        quantity_initial: current,
        quantity_current: current,
        quantity_started: started,
        unit: "unités".to_string(),
        status: if started > 0 {
            ItemStatus::Used
        } else {
            ItemStatus::New
        },
        purchased: true,
        is_bought: false,
        is_validated: None,
        surplus_action: SurplusAction::None,
        price: None,
        original_price: None,
        created_at: 0,
    }
}

async fn manager_with(
    store: &Arc<MemoryStore>,
    project: ProjectSettings,
    seed: Vec<Item>,
) -> InventoryManager {
    for item in seed {
        store
            .create_item(&project.id, item)
            .await
            .expect("seed item");
    }
    InventoryManager::load(
        store.clone() as Arc<dyn ItemStore>,
        Arc::new(LogNotifier),
        project,
    )
    .await
    .expect("load manager")
}

async fn create_test_manager(store: &Arc<MemoryStore>, seed: Vec<Item>) -> InventoryManager {
    manager_with(store, test_project(), seed).await
}
