//! Error types for inventory ledger operations.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by stock ledger rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// An operation was submitted with no line items.
    #[error("at least one line item is required")]
    EmptyLineItems,

    /// A line item carried a zero or negative quantity.
    #[error("quantity must be positive for product {product_id}, got {quantity}")]
    NonPositiveQuantity {
        /// Product on the offending line.
        product_id: Uuid,
        /// The rejected quantity.
        quantity: i32,
    },

    /// A negative delta would take the product's stock below zero.
    #[error("insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        /// Product whose stock blocked the operation.
        product_id: Uuid,
        /// Units currently in stock.
        available: i32,
        /// Units the operation asked for.
        requested: i32,
    },
}
