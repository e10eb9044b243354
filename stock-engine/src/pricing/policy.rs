//! Price Resolution Policy
//!
//! Suggested prices pre-fill a user-facing confirmation and are never
//! applied silently.

use shared::models::{Item, Listing, SurplusAction, known_price};

/// Buy-back purchase rate: the platform buys surplus at half its
/// acquisition price. Read-only suggestion, not user-editable.
pub const BUYBACK_RATE: f64 = 0.5;

/// Resale rate applied when a buy-back listing is matched against another
/// production's need.
pub const BUYBACK_RESALE_RATE: f64 = 0.75;

/// Platform commission on cross-production sales.
pub const PLATFORM_FEE_RATE: f64 = 0.10;

/// Price basis for discount computations: the first-ever acquisition price
/// when recorded, else the current price, else zero.
fn price_basis(item: &Item) -> f64 {
    known_price(item.original_price)
        .or_else(|| known_price(item.price))
        .unwrap_or(0.0)
}

/// Suggested price for a disposition, no rounding applied.
///
/// - `Buyback`: half the acquisition price, fixed.
/// - `Marketplace`: the item's current recorded price, editable.
/// - `Donation` / `ShortFilm`: zero; valuation is optional metadata.
/// - Non-priced dispositions have no suggestion.
pub fn suggested_price(action: SurplusAction, item: &Item) -> Option<f64> {
    match action {
        SurplusAction::Buyback => Some(BUYBACK_RATE * price_basis(item)),
        SurplusAction::Marketplace => Some(known_price(item.price).unwrap_or(0.0)),
        SurplusAction::Donation | SurplusAction::ShortFilm => Some(0.0),
        SurplusAction::None | SurplusAction::ReleasedToProd => None,
    }
}

/// Effective unit price of a listing for cross-production matching.
///
/// Buy-back listings are owned by the platform and resell at a discount;
/// everything else lists at the seller's price.
pub fn effective_listing_price(listing: &Listing) -> f64 {
    match listing.item.surplus_action {
        SurplusAction::Buyback => BUYBACK_RESALE_RATE * price_basis(&listing.item),
        _ => known_price(listing.item.price).unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Department, ItemStatus, PRICE_TBD};

    fn make_item(price: Option<f64>, original_price: Option<f64>) -> Item {
        Item {
            id: "i1".to_string(),
            name: "Gaffer Tape".to_string(),
            department: Department::Machinerie,
            quantity_initial: 10,
            quantity_current: 10,
            quantity_started: 0,
            unit: "unités".to_string(),
            status: ItemStatus::New,
            purchased: true,
            is_bought: false,
            is_validated: None,
            surplus_action: SurplusAction::None,
            price,
            original_price,
            created_at: 0,
        }
    }

    fn make_listing(item: Item) -> Listing {
        Listing {
            item,
            project_id: "p1".to_string(),
            production_name: "Film A".to_string(),
        }
    }

    #[test]
    fn buyback_is_half_of_original_price() {
        let item = make_item(Some(80.0), Some(100.0));
        assert_eq!(suggested_price(SurplusAction::Buyback, &item), Some(50.0));
    }

    #[test]
    fn buyback_falls_back_to_current_price_then_zero() {
        let item = make_item(Some(80.0), None);
        assert_eq!(suggested_price(SurplusAction::Buyback, &item), Some(40.0));

        let bare = make_item(None, None);
        assert_eq!(suggested_price(SurplusAction::Buyback, &bare), Some(0.0));
    }

    #[test]
    fn tbd_sentinel_counts_as_no_price() {
        let item = make_item(Some(PRICE_TBD), None);
        assert_eq!(suggested_price(SurplusAction::Buyback, &item), Some(0.0));
        assert_eq!(suggested_price(SurplusAction::Marketplace, &item), Some(0.0));
    }

    #[test]
    fn marketplace_defaults_to_current_price() {
        let item = make_item(Some(12.5), Some(20.0));
        assert_eq!(
            suggested_price(SurplusAction::Marketplace, &item),
            Some(12.5)
        );
    }

    #[test]
    fn donations_default_to_zero() {
        let item = make_item(Some(12.5), Some(20.0));
        assert_eq!(suggested_price(SurplusAction::Donation, &item), Some(0.0));
        assert_eq!(suggested_price(SurplusAction::ShortFilm, &item), Some(0.0));
    }

    #[test]
    fn no_suggestion_for_unpriced_dispositions() {
        let item = make_item(Some(12.5), None);
        assert_eq!(suggested_price(SurplusAction::ReleasedToProd, &item), None);
        assert_eq!(suggested_price(SurplusAction::None, &item), None);
    }

    #[test]
    fn buyback_listing_resells_at_discount() {
        let mut item = make_item(Some(50.0), Some(100.0));
        item.surplus_action = SurplusAction::Buyback;
        assert_eq!(effective_listing_price(&make_listing(item)), 75.0);
    }

    #[test]
    fn marketplace_listing_sells_at_seller_price() {
        let mut item = make_item(Some(50.0), Some(100.0));
        item.surplus_action = SurplusAction::Marketplace;
        assert_eq!(effective_listing_price(&make_listing(item)), 50.0);
    }
}
