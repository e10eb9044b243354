//! Marketplace Matcher
//!
//! Pure matching of purchase requests against global listings. Matching is
//! always by value (normalized name), never by shared identity: items from
//! different productions stay distinct rows.

use crate::pricing::effective_listing_price;
use serde::Serialize;
use shared::models::{Item, Listing, SurplusAction, known_price};

/// A matched request with its best-priced source listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub request: Item,
    pub listing: Listing,
    /// Effective unit price used for ranking
    pub unit_cost: f64,
    /// Orderable units: request need capped by listing stock
    pub quantity: i32,
    pub cost: f64,
    /// Against the request's own recorded price, zero when unknown
    pub saving: f64,
}

/// Matching key: case-insensitive, whitespace-trimmed name
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether a listing may serve a request from `my_project_id`.
///
/// Foreign listings always qualify; buy-back listings also qualify for
/// their originating production, since the platform owns them now.
fn visible_to(listing: &Listing, my_project_id: &str) -> bool {
    listing.project_id != my_project_id
        || listing.item.surplus_action == SurplusAction::Buyback
}

/// Compute one opportunity per matchable open request.
///
/// Deterministic: the cheapest effective price wins, ties broken by
/// listing id ascending. Requests with no candidate produce nothing.
pub fn compute_opportunities(
    requests: &[Item],
    listings: &[Listing],
    my_project_id: &str,
) -> Vec<Opportunity> {
    let mut opportunities = Vec::new();

    for request in requests
        .iter()
        .filter(|r| r.is_open_request() && r.is_validated != Some(false))
    {
        let wanted = normalize_name(&request.name);

        let mut best: Option<(&Listing, f64)> = None;
        for listing in listings {
            if listing.item.quantity_current <= 0
                || !visible_to(listing, my_project_id)
                || normalize_name(&listing.item.name) != wanted
            {
                continue;
            }
            let price = effective_listing_price(listing);
            let better = match &best {
                None => true,
                Some((current, current_price)) => {
                    price < *current_price
                        || (price == *current_price && listing.item.id < current.item.id)
                }
            };
            if better {
                best = Some((listing, price));
            }
        }

        if let Some((listing, unit_cost)) = best {
            let quantity = request.quantity_initial.min(listing.item.quantity_current);
            let own_price = known_price(request.price).unwrap_or(unit_cost);
            opportunities.push(Opportunity {
                request: request.clone(),
                listing: listing.clone(),
                unit_cost,
                quantity,
                cost: unit_cost * quantity as f64,
                saving: ((own_price - unit_cost) * quantity as f64).max(0.0),
            });
        }
    }

    opportunities
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Department, ItemStatus};

    fn make_request(id: &str, name: &str, quantity: i32) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            department: Department::Regie,
            quantity_initial: quantity,
            quantity_current: quantity,
            quantity_started: 0,
            unit: "unités".to_string(),
            status: ItemStatus::New,
            purchased: false,
            is_bought: false,
            is_validated: None,
            surplus_action: SurplusAction::None,
            price: None,
            original_price: None,
            created_at: 0,
        }
    }

    fn make_listing(
        id: &str,
        name: &str,
        project_id: &str,
        action: SurplusAction,
        price: f64,
        quantity: i32,
    ) -> Listing {
        let mut item = make_request(id, name, quantity);
        item.purchased = true;
        item.surplus_action = action;
        item.price = Some(price);
        Listing {
            item,
            project_id: project_id.to_string(),
            production_name: format!("Production {project_id}"),
        }
    }

    #[test]
    fn matches_are_case_and_whitespace_insensitive() {
        let requests = vec![make_request("r1", "Câble HDMI", 5)];
        let listings = vec![make_listing(
            "l1",
            "  câble hdmi ",
            "B",
            SurplusAction::Marketplace,
            20.0,
            10,
        )];

        let opportunities = compute_opportunities(&requests, &listings, "A");
        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities[0].unit_cost, 20.0);
        assert_eq!(opportunities[0].quantity, 5);
        assert_eq!(opportunities[0].cost, 100.0);
    }

    #[test]
    fn own_marketplace_listings_are_invisible() {
        let requests = vec![make_request("r1", "Gaffer", 1)];
        let listings = vec![make_listing(
            "l1",
            "Gaffer",
            "A",
            SurplusAction::Marketplace,
            5.0,
            3,
        )];
        assert!(compute_opportunities(&requests, &listings, "A").is_empty());
    }

    #[test]
    fn own_buyback_listings_are_visible() {
        let requests = vec![make_request("r1", "Gaffer", 1)];
        let mut listing = make_listing("l1", "Gaffer", "A", SurplusAction::Buyback, 8.0, 3);
        listing.item.original_price = Some(8.0);
        let opportunities = compute_opportunities(&requests, &[listing], "A");
        assert_eq!(opportunities.len(), 1);
        // Buy-back resale discount applies
        assert_eq!(opportunities[0].unit_cost, 6.0);
    }

    #[test]
    fn cheapest_effective_price_wins() {
        let requests = vec![make_request("r1", "Gaffer", 2)];
        let listings = vec![
            make_listing("l1", "Gaffer", "B", SurplusAction::Marketplace, 9.0, 5),
            make_listing("l2", "Gaffer", "C", SurplusAction::Marketplace, 7.0, 5),
        ];
        let opportunities = compute_opportunities(&requests, &listings, "A");
        assert_eq!(opportunities[0].listing.item.id, "l2");
        assert_eq!(opportunities[0].cost, 14.0);
    }

    #[test]
    fn tie_break_is_stable() {
        let requests = vec![make_request("r1", "Gaffer", 2)];
        let l_first = make_listing("l1", "Gaffer", "B", SurplusAction::Marketplace, 7.0, 5);
        let l_second = make_listing("l2", "Gaffer", "C", SurplusAction::Marketplace, 7.0, 5);

        // Same prices, either input order: the lower listing id wins
        let a = compute_opportunities(
            &requests,
            &[l_first.clone(), l_second.clone()],
            "A",
        );
        let b = compute_opportunities(&requests, &[l_second, l_first], "A");
        assert_eq!(a, b);
        assert_eq!(a[0].listing.item.id, "l1");
    }

    #[test]
    fn bought_or_received_requests_do_not_match() {
        let mut bought = make_request("r1", "Gaffer", 2);
        bought.is_bought = true;
        let mut received = make_request("r2", "Gaffer", 2);
        received.purchased = true;
        let listings = vec![make_listing(
            "l1",
            "Gaffer",
            "B",
            SurplusAction::Marketplace,
            7.0,
            5,
        )];
        assert!(compute_opportunities(&[bought, received], &listings, "A").is_empty());
    }

    #[test]
    fn quantity_is_capped_by_listing_stock() {
        let requests = vec![make_request("r1", "Gaffer", 8)];
        let listings = vec![make_listing(
            "l1",
            "Gaffer",
            "B",
            SurplusAction::Marketplace,
            2.0,
            3,
        )];
        let opportunities = compute_opportunities(&requests, &listings, "A");
        assert_eq!(opportunities[0].quantity, 3);
    }

    #[test]
    fn saving_compares_against_own_recorded_price() {
        let mut request = make_request("r1", "Gaffer", 2);
        request.price = Some(10.0);
        let listings = vec![make_listing(
            "l1",
            "Gaffer",
            "B",
            SurplusAction::Marketplace,
            7.0,
            5,
        )];
        let opportunities = compute_opportunities(&[request], &listings, "A");
        assert_eq!(opportunities[0].saving, 6.0);
    }
}
