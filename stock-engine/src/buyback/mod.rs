//! Department-internal resale board

pub mod board;

pub use board::{BoardStats, BuyBackBoard};
