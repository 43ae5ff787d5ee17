//! Stock ledger rules.
//!
//! This module implements the arithmetic side of the inventory ledger:
//! - Signed stock deltas and the non-negative stock invariant
//! - Line item validation shared by purchases and sales
//! - Error types for ledger operations
//!
//! Persistence (row locking, transactions) lives in `stockbar-db`; this
//! module only decides whether a delta is legal given the current stock.

pub mod error;
pub mod lines;
pub mod stock;

#[cfg(test)]
mod stock_props;

pub use error::InventoryError;
pub use lines::{LineItem, validate_line_items};
pub use stock::{StockDirection, checked_apply};
