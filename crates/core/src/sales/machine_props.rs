//! Property tests for the sale state machine.

use proptest::prelude::*;

use super::machine::{StockEffect, transition_effect};
use super::status::SaleStatus;

fn status_strategy() -> impl Strategy<Value = SaleStatus> {
    prop_oneof![
        Just(SaleStatus::Pending),
        Just(SaleStatus::Completed),
        Just(SaleStatus::Voided),
    ]
}

/// Net stock change per unit of line quantity for an effect.
const fn effect_sign(effect: StockEffect) -> i32 {
    match effect {
        StockEffect::None => 0,
        StockEffect::ReturnToStock => 1,
        StockEffect::DeductFromStock => -1,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Stock moves exactly when the transition crosses the Voided boundary.
    #[test]
    fn prop_effect_tracks_holds_stock(
        from in status_strategy(),
        to in status_strategy(),
    ) {
        let effect = transition_effect(from, to);
        match (from.holds_stock(), to.holds_stock()) {
            (true, false) => prop_assert_eq!(effect, StockEffect::ReturnToStock),
            (false, true) => prop_assert_eq!(effect, StockEffect::DeductFromStock),
            _ => prop_assert_eq!(effect, StockEffect::None),
        }
    }

    /// A transition followed by its reverse nets zero stock movement.
    #[test]
    fn prop_round_trip_nets_zero(
        from in status_strategy(),
        to in status_strategy(),
    ) {
        let there = effect_sign(transition_effect(from, to));
        let back = effect_sign(transition_effect(to, from));
        prop_assert_eq!(there + back, 0);
    }

    /// Any chain of transitions returning to the starting status nets zero.
    #[test]
    fn prop_cycle_nets_zero(
        start in status_strategy(),
        path in prop::collection::vec(status_strategy(), 0..8),
    ) {
        let mut net = 0;
        let mut current = start;
        for next in path {
            net += effect_sign(transition_effect(current, next));
            current = next;
        }
        net += effect_sign(transition_effect(current, start));
        prop_assert_eq!(net, 0);
    }

    /// Self-transitions never move stock; Voided -> Voided stays idempotent.
    #[test]
    fn prop_self_transition_is_noop(status in status_strategy()) {
        prop_assert_eq!(transition_effect(status, status), StockEffect::None);
    }

    /// Encoding survives a persist/load round trip.
    #[test]
    fn prop_status_encoding_round_trip(status in status_strategy()) {
        prop_assert_eq!(SaleStatus::from_i16(status.as_i16()), Some(status));
    }
}
