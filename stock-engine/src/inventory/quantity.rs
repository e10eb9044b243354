//! Quantity mutation primitives
//!
//! Status is derived from quantity changes, never set independently:
//! `Empty` at zero, `Used` once below the initial count or once any unit
//! is opened.

use shared::models::{Item, ItemPatch, ItemStatus};

/// Derive the status after a quantity change
pub fn derive_status(quantity_current: i32, quantity_initial: i32, previous: ItemStatus) -> ItemStatus {
    if quantity_current == 0 {
        ItemStatus::Empty
    } else if quantity_current < quantity_initial {
        ItemStatus::Used
    } else {
        previous
    }
}

/// Adjust `quantity_current` by `delta`, clamped at zero.
///
/// Keeps `quantity_started <= quantity_current` and recomputes the status.
pub fn adjust(item: &Item, delta: i32) -> ItemPatch {
    let quantity = (item.quantity_current + delta).max(0);
    ItemPatch {
        quantity_current: Some(quantity),
        quantity_started: Some(item.quantity_started.min(quantity)),
        status: Some(derive_status(quantity, item.quantity_initial, item.status)),
        ..Default::default()
    }
}

/// Open one sealed unit, if any remain.
///
/// Returns `None` when every unit is already started.
pub fn mark_started(item: &Item) -> Option<ItemPatch> {
    if item.quantity_started >= item.quantity_current {
        return None;
    }
    Some(ItemPatch {
        quantity_started: Some(item.quantity_started + 1),
        status: Some(ItemStatus::Used),
        ..Default::default()
    })
}
