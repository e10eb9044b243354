//! End-to-end demo of the surplus lifecycle
//!
//! Seeds two productions in the in-memory store, walks an item from
//! purchase request to marketplace listing, matches it against another
//! production's need, executes the order and settles the transaction.
//!
//! ```text
//! cargo run --example surplus_demo
//! ```

use anyhow::Result;
use std::sync::Arc;
use stock_engine::utils::logger;
use stock_engine::{
    ActorContext, BuyBackBoard, Config, Department, InventoryManager, ItemStore, LogNotifier,
    MarketplaceService, MemoryLedger, MemoryPhotoStore, MemoryStore, NewBuyBackItem,
    NewItemRequest, ProjectSettings, SurplusAction, TransactionLedger,
};

fn project(id: &str, name: &str, company: &str) -> ProjectSettings {
    ProjectSettings {
        id: id.to_string(),
        name: name.to_string(),
        production_company: company.to_string(),
        require_order_validation: false,
        shooting_end_date: Some(shared::util::now_millis() - 1_000),
    }
}

fn actor(project_id: &str, department: Department, user_name: &str) -> ActorContext {
    ActorContext {
        department,
        is_admin: false,
        project_id: project_id.to_string(),
        user_name: user_name.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    logger::init_logger(&config);
    tracing::info!(environment = %config.environment, "surplus demo starting");

    let store = Arc::new(MemoryStore::new());
    let ledger = Arc::new(MemoryLedger::new());
    let notifier = Arc::new(LogNotifier);

    let alpha = project("alpha", "Le Dernier Souffle", "Films du Nord");
    let omega = project("omega", "Les Années Folles", "Studio Omega");
    store.register_project(&alpha.id, alpha.display_name());
    store.register_project(&omega.id, omega.display_name());

    let alpha_inventory = InventoryManager::load(
        store.clone() as Arc<dyn ItemStore>,
        notifier.clone(),
        alpha.clone(),
    )
    .await?;
    let omega_inventory = InventoryManager::load(
        store.clone() as Arc<dyn ItemStore>,
        notifier.clone(),
        omega.clone(),
    )
    .await?;

    // --- Production Omega buys gaffer tape and opens a few rolls ---
    let regie = actor(&omega.id, Department::Regie, "Nina");
    let request = omega_inventory
        .add_request(
            &regie,
            NewItemRequest {
                name: "Gaffer Tape".to_string(),
                department: Department::Regie,
                quantity: 10,
                unit: "rouleaux".to_string(),
                price: None,
            },
        )
        .await?;
    omega_inventory
        .mark_bought(&regie, &request.id, Some(6.0))
        .await?;
    omega_inventory
        .mark_purchased(&regie, &request.id, None)
        .await?;
    for _ in 0..3 {
        omega_inventory.mark_started(&regie, &request.id).await?;
    }

    // --- End of shoot: the surplus goes to the global marketplace ---
    let quote = omega_inventory.propose_disposition(&request.id, SurplusAction::Marketplace)?;
    tracing::info!(
        suggested = ?quote.suggested_price,
        split_needed = quote.requires_split_choice,
        "disposition quoted"
    );
    let written = omega_inventory
        .commit_disposition(
            &actor(&omega.id, Department::Production, "Paul"),
            &request.id,
            SurplusAction::Marketplace,
            Some(5.0),
            Some(stock_engine::inventory::SplitMode::OnlyNew),
        )
        .await?;
    tracing::info!(records = written.len(), "surplus committed");

    // --- Production Alpha needs the same tape and orders the surplus ---
    let alpha_regie = actor(&alpha.id, Department::Regie, "Sam");
    alpha_inventory
        .add_request(
            &alpha_regie,
            NewItemRequest {
                name: "  gaffer tape ".to_string(),
                department: Department::Regie,
                quantity: 5,
                unit: "rouleaux".to_string(),
                price: Some(8.0),
            },
        )
        .await?;

    let marketplace = MarketplaceService::new(
        store.clone() as Arc<dyn ItemStore>,
        ledger.clone() as Arc<dyn TransactionLedger>,
    )
    .with_fee_rate(config.platform_fee_rate);
    marketplace.refresh_listings().await?;

    let opportunities = marketplace.opportunities_for(&alpha_inventory.open_requests(), &alpha.id);
    for opportunity in &opportunities {
        tracing::info!(
            item = %opportunity.request.name,
            seller = %opportunity.listing.production_name,
            quantity = opportunity.quantity,
            cost = opportunity.cost,
            saving = opportunity.saving,
            "opportunity found"
        );
    }

    let transactions = marketplace.execute_orders(&alpha, &opportunities).await?;
    alpha_inventory.refresh().await?;
    omega_inventory.refresh().await?;
    for transaction in &transactions {
        let settled = marketplace.validate_transaction(&transaction.id).await?;
        tracing::info!(
            transaction_id = %settled.id,
            total = settled.total_amount,
            fee = settled.platform_fee,
            status = ?settled.status,
            "transaction settled"
        );
    }

    // --- Meanwhile, the omega sound department resells a boom pole ---
    let board = BuyBackBoard::new(
        store.clone(),
        Arc::new(MemoryPhotoStore::new()),
        notifier,
        omega.id.clone(),
    );
    let son = actor(&omega.id, Department::Son, "Léa");
    let pole = board
        .list_item(
            &son,
            NewBuyBackItem {
                name: "Perche micro".to_string(),
                description: Some("Très bon état".to_string()),
                price: 40.0,
                original_price: Some(80.0),
                photo: None,
            },
        )
        .await?;
    board
        .toggle_reservation(&actor(&omega.id, Department::Camera, "Hugo"), &pole.id, None)
        .await?;
    board.confirm_sale(&son, &pole.id).await?;
    let stats = BuyBackBoard::stats(&board.items().await?);
    tracing::info!(
        sold = stats.sold,
        recovered = stats.recovered_amount,
        "buy-back board settled"
    );

    tracing::info!("surplus demo finished");
    Ok(())
}
