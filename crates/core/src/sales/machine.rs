//! The sale state machine: which transitions move stock, and in which
//! direction.

use super::status::SaleStatus;

/// Stock effect of a status transition, applied uniformly to every line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StockEffect {
    /// No stock movement.
    None,
    /// Return every line quantity to stock (+qty per line).
    ReturnToStock,
    /// Remove every line quantity from stock (-qty per line). May fail on
    /// insufficient stock, aborting the whole transition.
    DeductFromStock,
}

/// Decides the stock effect of moving a sale from one status to another.
///
/// Transitions are caller-driven and all pairs are legal. Stock moves only
/// when the sale crosses the Voided boundary:
///
/// - into Voided: lines stop holding stock, so quantities are returned
/// - out of Voided: lines hold stock again, so quantities are re-deducted
/// - Voided -> Voided is an idempotent no-op
#[must_use]
pub const fn transition_effect(from: SaleStatus, to: SaleStatus) -> StockEffect {
    match (from.holds_stock(), to.holds_stock()) {
        (true, false) => StockEffect::ReturnToStock,
        (false, true) => StockEffect::DeductFromStock,
        _ => StockEffect::None,
    }
}

/// Whether creating a sale in `initial` status deducts stock immediately.
///
/// A sale created already-Voided never holds stock, so nothing is deducted.
#[must_use]
pub const fn creation_deducts_stock(initial: SaleStatus) -> bool {
    initial.holds_stock()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SaleStatus::Pending, SaleStatus::Voided, StockEffect::ReturnToStock)]
    #[case(SaleStatus::Completed, SaleStatus::Voided, StockEffect::ReturnToStock)]
    #[case(SaleStatus::Voided, SaleStatus::Pending, StockEffect::DeductFromStock)]
    #[case(SaleStatus::Voided, SaleStatus::Completed, StockEffect::DeductFromStock)]
    #[case(SaleStatus::Pending, SaleStatus::Completed, StockEffect::None)]
    #[case(SaleStatus::Completed, SaleStatus::Pending, StockEffect::None)]
    #[case(SaleStatus::Pending, SaleStatus::Pending, StockEffect::None)]
    #[case(SaleStatus::Completed, SaleStatus::Completed, StockEffect::None)]
    #[case(SaleStatus::Voided, SaleStatus::Voided, StockEffect::None)]
    fn test_transition_table(
        #[case] from: SaleStatus,
        #[case] to: SaleStatus,
        #[case] expected: StockEffect,
    ) {
        assert_eq!(transition_effect(from, to), expected);
    }

    #[test]
    fn test_creation_effect() {
        assert!(creation_deducts_stock(SaleStatus::Pending));
        assert!(creation_deducts_stock(SaleStatus::Completed));
        assert!(!creation_deducts_stock(SaleStatus::Voided));
    }
}
