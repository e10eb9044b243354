//! Disposition transition planner
//!
//! Decides, for a single disposition request, whether a full-item
//! transition or a quantity split is required, and produces the resulting
//! records. Pure: the manager persists whatever the plan says.
//!
//! Split conservation: the two halves of any split always add up to the
//! source item's `quantity_current`.

use shared::models::{Item, ItemStatus, SurplusAction, known_price};
use shared::util::split_item_id;
use thiserror::Error;

/// Caller's choice when a disposition hits a mixed new/started item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Send only the sealed units; the started units stay in stock
    OnlyNew,
    /// Send everything, keeping the new/started distinction as two records
    All,
}

/// Outcome of planning a disposition
#[derive(Debug, Clone, PartialEq)]
pub enum DispositionPlan {
    /// One whole-item update
    Whole(Item),
    /// The existing record truncated to the started units, plus a spawned
    /// record for the new units
    Split { truncated: Item, spawned: Item },
}

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("item mixes new and started units; a split mode is required")]
    SplitChoiceRequired,

    #[error("resale price must be non-negative")]
    NegativePrice,

    #[error("{0:?} is not a surplus disposition")]
    NotADisposition(SurplusAction),
}

/// Record a resale price, snapshotting the first-ever acquisition price
/// before overwriting.
///
/// Idempotent on `original_price`: once set it is never overwritten.
fn apply_resale_price(item: &mut Item, resale_price: f64) {
    if item.original_price.is_none() {
        item.original_price = known_price(item.price);
    }
    item.price = Some(resale_price);
}

fn whole_transition(item: &Item, action: SurplusAction, resale_price: Option<f64>) -> Item {
    let mut updated = item.clone();
    updated.surplus_action = action;
    if action.is_priced()
        && let Some(price) = resale_price
    {
        apply_resale_price(&mut updated, price);
    }
    updated
}

/// Truncate the source record down to its started units
fn truncate_to_started(item: &Item, action: SurplusAction) -> Item {
    let mut truncated = item.clone();
    truncated.quantity_current = item.quantity_started;
    truncated.quantity_initial = item.quantity_started;
    truncated.quantity_started = item.quantity_started;
    truncated.status = ItemStatus::Used;
    truncated.surplus_action = action;
    truncated
}

/// Spawn the record carrying the new-unit portion
fn spawn_new_portion(item: &Item, action: SurplusAction, now: i64) -> Item {
    let quantity_new = item.quantity_new();
    let mut spawned = item.clone();
    spawned.id = split_item_id(&item.id, now);
    spawned.quantity_current = quantity_new;
    spawned.quantity_initial = quantity_new;
    spawned.quantity_started = 0;
    spawned.status = ItemStatus::New;
    spawned.purchased = true;
    spawned.is_bought = false;
    spawned.surplus_action = action;
    spawned.created_at = now;
    spawned
}

/// Plan a disposition request.
///
/// Unmixed items (all new or all started) transition whole. Mixed items
/// need a [`SplitMode`]:
/// - `OnlyNew` truncates the original back to normal stock
///   (`surplus_action` reset) and spawns a new record carrying the action.
/// - `All` with a priced action keeps both halves on the action, split
///   only to preserve the new/started distinction for display and
///   reversal; for `ReleasedToProd` the whole quantity moves as one
///   record.
pub fn plan_disposition(
    item: &Item,
    action: SurplusAction,
    resale_price: Option<f64>,
    mode: Option<SplitMode>,
    now: i64,
) -> Result<DispositionPlan, PlanError> {
    if action.is_none() {
        return Err(PlanError::NotADisposition(action));
    }
    if resale_price.is_some_and(|p| p < 0.0) {
        return Err(PlanError::NegativePrice);
    }

    if !item.is_mixed() {
        return Ok(DispositionPlan::Whole(whole_transition(
            item,
            action,
            resale_price,
        )));
    }

    match mode.ok_or(PlanError::SplitChoiceRequired)? {
        SplitMode::OnlyNew => {
            let truncated = truncate_to_started(item, SurplusAction::None);
            let mut spawned = spawn_new_portion(item, action, now);
            if action.is_priced()
                && let Some(price) = resale_price
            {
                apply_resale_price(&mut spawned, price);
            }
            Ok(DispositionPlan::Split { truncated, spawned })
        }
        SplitMode::All => {
            if !action.is_priced() {
                // ReleasedToProd: no "keep distinct" rule, one record moves
                return Ok(DispositionPlan::Whole(whole_transition(
                    item,
                    action,
                    resale_price,
                )));
            }
            let mut truncated = truncate_to_started(item, action);
            let mut spawned = spawn_new_portion(item, action, now);
            if let Some(price) = resale_price {
                apply_resale_price(&mut truncated, price);
                apply_resale_price(&mut spawned, price);
            }
            Ok(DispositionPlan::Split { truncated, spawned })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Department;

    fn make_item(current: i32, started: i32, price: Option<f64>) -> Item {
        Item {
            id: "itm1".to_string(),
            name: "Gaffer Tape".to_string(),
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
            price,
            original_price: None,
            created_at: 0,
        }
    }

    #[test]
    fn unmixed_item_transitions_whole() {
        let item = make_item(10, 0, Some(4.0));
        let plan =
            plan_disposition(&item, SurplusAction::Marketplace, Some(5.0), None, 99).unwrap();
        match plan {
            DispositionPlan::Whole(updated) => {
                assert_eq!(updated.surplus_action, SurplusAction::Marketplace);
                assert_eq!(updated.price, Some(5.0));
                assert_eq!(updated.original_price, Some(4.0));
                assert_eq!(updated.quantity_current, 10);
            }
            other => panic!("expected whole transition, got {other:?}"),
        }
    }

    #[test]
    fn all_started_item_transitions_whole() {
        let item = make_item(4, 4, None);
        let plan = plan_disposition(&item, SurplusAction::Donation, None, None, 99).unwrap();
        assert!(matches!(plan, DispositionPlan::Whole(_)));
    }

    #[test]
    fn mixed_item_requires_split_choice() {
        let item = make_item(10, 3, None);
        let err =
            plan_disposition(&item, SurplusAction::Marketplace, None, None, 99).unwrap_err();
        assert_eq!(err, PlanError::SplitChoiceRequired);
    }

    #[test]
    fn only_new_split_matches_contract() {
        // Item {quantityCurrent: 10, quantityStarted: 3}, MARKETPLACE,
        // ONLY_NEW, price 5
        let item = make_item(10, 3, Some(4.0));
        let plan = plan_disposition(
            &item,
            SurplusAction::Marketplace,
            Some(5.0),
            Some(SplitMode::OnlyNew),
            1234,
        )
        .unwrap();

        let DispositionPlan::Split { truncated, spawned } = plan else {
            panic!("expected a split");
        };

        assert_eq!(truncated.id, "itm1");
        assert_eq!(truncated.quantity_current, 3);
        assert_eq!(truncated.quantity_initial, 3);
        assert_eq!(truncated.quantity_started, 3);
        assert_eq!(truncated.status, ItemStatus::Used);
        assert_eq!(truncated.surplus_action, SurplusAction::None);

        assert_eq!(spawned.id, "itm1_surplus_1234");
        assert_eq!(spawned.quantity_current, 7);
        assert_eq!(spawned.quantity_initial, 7);
        assert_eq!(spawned.quantity_started, 0);
        assert_eq!(spawned.status, ItemStatus::New);
        assert_eq!(spawned.surplus_action, SurplusAction::Marketplace);
        assert!(spawned.purchased);
        assert!(!spawned.is_bought);
        assert_eq!(spawned.price, Some(5.0));
        assert_eq!(spawned.original_price, Some(4.0));
    }

    #[test]
    fn split_conserves_quantity() {
        for started in 1..10 {
            let item = make_item(10, started, None);
            for mode in [SplitMode::OnlyNew, SplitMode::All] {
                let plan = plan_disposition(
                    &item,
                    SurplusAction::Marketplace,
                    None,
                    Some(mode),
                    7,
                )
                .unwrap();
                let DispositionPlan::Split { truncated, spawned } = plan else {
                    panic!("expected a split");
                };
                assert_eq!(
                    truncated.quantity_current + spawned.quantity_current,
                    item.quantity_current
                );
            }
        }
    }

    #[test]
    fn all_mode_keeps_both_halves_on_priced_disposition() {
        let item = make_item(10, 3, Some(8.0));
        let plan = plan_disposition(
            &item,
            SurplusAction::Buyback,
            Some(4.0),
            Some(SplitMode::All),
            55,
        )
        .unwrap();

        let DispositionPlan::Split { truncated, spawned } = plan else {
            panic!("expected a split");
        };
        assert_eq!(truncated.surplus_action, SurplusAction::Buyback);
        assert_eq!(spawned.surplus_action, SurplusAction::Buyback);
        assert_eq!(truncated.price, Some(4.0));
        assert_eq!(spawned.price, Some(4.0));
        assert_eq!(truncated.original_price, Some(8.0));
    }

    #[test]
    fn all_mode_release_moves_one_record() {
        let item = make_item(10, 3, None);
        let plan = plan_disposition(
            &item,
            SurplusAction::ReleasedToProd,
            None,
            Some(SplitMode::All),
            55,
        )
        .unwrap();
        match plan {
            DispositionPlan::Whole(updated) => {
                assert_eq!(updated.surplus_action, SurplusAction::ReleasedToProd);
                assert_eq!(updated.quantity_current, 10);
                assert_eq!(updated.quantity_started, 3);
            }
            other => panic!("expected whole transition, got {other:?}"),
        }
    }

    #[test]
    fn original_price_snapshot_is_idempotent() {
        let mut item = make_item(10, 0, Some(100.0));
        let plan =
            plan_disposition(&item, SurplusAction::Buyback, Some(50.0), None, 1).unwrap();
        let DispositionPlan::Whole(updated) = plan else {
            panic!("expected whole transition");
        };
        assert_eq!(updated.price, Some(50.0));
        assert_eq!(updated.original_price, Some(100.0));

        // A second priced disposition must not overwrite the snapshot
        item = updated;
        item.surplus_action = SurplusAction::None;
        let plan =
            plan_disposition(&item, SurplusAction::Marketplace, Some(25.0), None, 2).unwrap();
        let DispositionPlan::Whole(updated) = plan else {
            panic!("expected whole transition");
        };
        assert_eq!(updated.price, Some(25.0));
        assert_eq!(updated.original_price, Some(100.0));
    }

    #[test]
    fn negative_price_is_rejected() {
        let item = make_item(10, 0, None);
        let err =
            plan_disposition(&item, SurplusAction::Marketplace, Some(-2.0), None, 1).unwrap_err();
        assert_eq!(err, PlanError::NegativePrice);
    }
}
