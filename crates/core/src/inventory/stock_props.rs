//! Property tests for stock delta arithmetic.

use proptest::prelude::*;
use uuid::Uuid;

use super::error::InventoryError;
use super::stock::checked_apply;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A non-negative delta applied to non-negative stock never fails.
    #[test]
    fn prop_positive_delta_never_fails(
        current in 0i32..1_000_000,
        delta in 0i32..1_000_000,
    ) {
        let updated = checked_apply(Uuid::nil(), current, delta).unwrap();
        prop_assert_eq!(updated, current + delta);
    }

    /// The result of a successful apply is never negative.
    #[test]
    fn prop_stock_never_negative(
        current in 0i32..1_000_000,
        delta in -1_000_000i32..1_000_000,
    ) {
        if let Ok(updated) = checked_apply(Uuid::nil(), current, delta) {
            prop_assert!(updated >= 0);
        }
    }

    /// A withdrawal fails exactly when it exceeds current stock, and the
    /// reported shortfall matches the inputs.
    #[test]
    fn prop_overdraw_reports_exact_shortfall(
        current in 0i32..1_000,
        requested in 1i32..2_000,
    ) {
        let id = Uuid::new_v4();
        let result = checked_apply(id, current, -requested);
        if requested > current {
            prop_assert_eq!(
                result.unwrap_err(),
                InventoryError::InsufficientStock {
                    product_id: id,
                    available: current,
                    requested,
                }
            );
        } else {
            prop_assert_eq!(result.unwrap(), current - requested);
        }
    }

    /// Applying a delta and then its negation restores the original stock
    /// whenever both directions are legal.
    #[test]
    fn prop_delta_then_inverse_is_identity(
        current in 0i32..1_000_000,
        delta in 0i32..1_000_000,
    ) {
        let up = checked_apply(Uuid::nil(), current, delta).unwrap();
        let back = checked_apply(Uuid::nil(), up, -delta).unwrap();
        prop_assert_eq!(back, current);
    }
}
