//! Line item validation shared by purchases and sales.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::InventoryError;

/// A single purchase or sale line as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product the line refers to.
    pub product_id: Uuid,
    /// Units bought or sold. Must be positive.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Line subtotal as reported by the caller. Not recomputed here; the
    /// header total is expected, not enforced, to match the line sum.
    pub subtotal: Decimal,
}

/// Validates a set of line items before any transaction side effect.
///
/// # Errors
///
/// Returns `InventoryError::EmptyLineItems` for an empty list and
/// `InventoryError::NonPositiveQuantity` for the first line whose quantity
/// is zero or negative.
pub fn validate_line_items(lines: &[LineItem]) -> Result<(), InventoryError> {
    if lines.is_empty() {
        return Err(InventoryError::EmptyLineItems);
    }

    for line in lines {
        if line.quantity <= 0 {
            return Err(InventoryError::NonPositiveQuantity {
                product_id: line.product_id,
                quantity: line.quantity,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn line(quantity: i32) -> LineItem {
        LineItem {
            product_id: Uuid::new_v4(),
            quantity,
            unit_price: dec!(2.50),
            subtotal: dec!(2.50) * Decimal::from(quantity),
        }
    }

    #[test]
    fn test_empty_lines_rejected() {
        assert_eq!(
            validate_line_items(&[]).unwrap_err(),
            InventoryError::EmptyLineItems
        );
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(-50)]
    fn test_non_positive_quantity_rejected(#[case] quantity: i32) {
        let bad = line(quantity);
        let err = validate_line_items(&[line(3), bad.clone()]).unwrap_err();
        assert_eq!(
            err,
            InventoryError::NonPositiveQuantity {
                product_id: bad.product_id,
                quantity,
            }
        );
    }

    #[test]
    fn test_valid_lines_accepted() {
        assert!(validate_line_items(&[line(1), line(12)]).is_ok());
    }
}
