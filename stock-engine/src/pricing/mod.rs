//! Price resolution
//!
//! Pure pricing rules for surplus dispositions and cross-production
//! listings. Nothing here mutates state: callers apply a chosen price
//! explicitly after user confirmation.

pub mod policy;

pub use policy::{
    BUYBACK_RATE, BUYBACK_RESALE_RATE, PLATFORM_FEE_RATE, effective_listing_price,
    suggested_price,
};
