//! Signed stock deltas and the non-negative stock invariant.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::InventoryError;

/// Direction of a manual stock adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    /// Add units to stock.
    Increase,
    /// Remove units from stock.
    Decrease,
}

impl StockDirection {
    /// Converts a positive quantity into a signed delta.
    #[must_use]
    pub const fn signed(self, quantity: i32) -> i32 {
        match self {
            Self::Increase => quantity,
            Self::Decrease => -quantity,
        }
    }
}

/// Applies a signed delta to a product's current stock.
///
/// A positive delta always succeeds. A negative delta succeeds only when the
/// current stock covers it; otherwise nothing is applied and the caller gets
/// the exact shortfall.
///
/// # Errors
///
/// Returns `InventoryError::InsufficientStock` when `current + delta` would
/// go below zero.
pub fn checked_apply(product_id: Uuid, current: i32, delta: i32) -> Result<i32, InventoryError> {
    let updated = current + delta;
    if updated < 0 {
        return Err(InventoryError::InsufficientStock {
            product_id,
            available: current,
            requested: -delta,
        });
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_delta_always_succeeds() {
        let id = Uuid::new_v4();
        assert_eq!(checked_apply(id, 0, 5).unwrap(), 5);
        assert_eq!(checked_apply(id, 10, 5).unwrap(), 15);
    }

    #[test]
    fn test_negative_delta_within_stock() {
        let id = Uuid::new_v4();
        assert_eq!(checked_apply(id, 10, -10).unwrap(), 0);
        assert_eq!(checked_apply(id, 10, -3).unwrap(), 7);
    }

    #[test]
    fn test_negative_delta_overdraw_reports_shortfall() {
        let id = Uuid::new_v4();
        let err = checked_apply(id, 3, -12).unwrap_err();
        assert_eq!(
            err,
            InventoryError::InsufficientStock {
                product_id: id,
                available: 3,
                requested: 12,
            }
        );
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let id = Uuid::new_v4();
        assert_eq!(checked_apply(id, 7, 0).unwrap(), 7);
    }

    #[test]
    fn test_direction_signs() {
        assert_eq!(StockDirection::Increase.signed(4), 4);
        assert_eq!(StockDirection::Decrease.signed(4), -4);
    }
}
