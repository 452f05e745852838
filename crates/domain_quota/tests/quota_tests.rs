//! Integration tests for the apportionment engine

use core_kernel::{Money, PeriodRef};
use domain_quota::{
    allocate, allocate_with_mode, assess_balance, checked_installment_count, compute_balance,
    normalize, normalize_to_permillage, split_into_installments, BalanceStatus, Charge,
    Participant, PaymentRecord, QuotaError, WeightMode, MAX_INSTALLMENTS, PERMILLAGE_TOTAL,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_utils::{
    assert_all_non_negative, assert_conserves_total, assert_err_variant, assert_fair_spread,
    assert_money_sum_equals, assert_money_zero, assert_status, cents, equal_participants_strategy,
    installment_count_strategy, large_total_strategy, minors, participants_strategy,
    total_strategy, BuildingFixtures, DateFixtures, MoneyFixtures,
};

// ============================================================================
// Installment splitting
// ============================================================================

mod installment_tests {
    use super::*;

    #[test]
    fn test_ten_euros_in_three() {
        let parts = split_into_installments(cents(1000), 3).unwrap();
        assert_eq!(minors(&parts), vec![334, 333, 333]);
    }

    #[test]
    fn test_annual_budget_in_twelve() {
        let parts = split_into_installments(MoneyFixtures::annual_budget(), 12).unwrap();
        assert!(parts.iter().all(|p| *p == cents(500_000)));
    }

    #[test]
    fn test_count_from_untrusted_integer() {
        assert_err_variant!(checked_installment_count(0), QuotaError::InvalidInstallmentCount(0));
        assert_err_variant!(checked_installment_count(-12), QuotaError::InvalidInstallmentCount(-12));
        assert_eq!(checked_installment_count(i64::from(MAX_INSTALLMENTS)), Ok(MAX_INSTALLMENTS));
    }

    #[test]
    fn test_largest_safe_total() {
        let total = Money::from_minor(core_kernel::MAX_SAFE_MINOR).unwrap();
        let parts = split_into_installments(total, 7).unwrap();
        assert_money_sum_equals(&parts, total);
    }
}

// ============================================================================
// Weight normalization
// ============================================================================

mod weight_tests {
    use super::*;

    #[test]
    fn test_mixed_table_normalizes_to_fractions() {
        let participants = BuildingFixtures::participants(&BuildingFixtures::mixed());
        let shares = normalize(&participants, WeightMode::Permillage).unwrap();

        assert_eq!(shares[0].share, dec!(0.1205));
        assert_eq!(shares[2].share, dec!(0.17525));
        let sum: Decimal = shares.iter().map(|s| s.share).sum();
        assert_eq!(sum, Decimal::ONE);
    }

    #[test]
    fn test_equal_mode_shares() {
        let participants = BuildingFixtures::participants(&BuildingFixtures::mixed());
        let points = normalize_to_permillage(&participants, WeightMode::Equal).unwrap();
        let values: Vec<u32> = points.iter().map(|p| p.permillage).collect();

        // 1000 / 6 = 166.67: four leftover points go to the first four
        assert_eq!(values, vec![167, 167, 167, 167, 166, 166]);
    }

    #[test]
    fn test_negative_weight_is_reported_with_position() {
        let participants = vec![
            Participant::new("1A", dec!(500)),
            Participant::new("1B", dec!(-1)),
        ];
        assert_err_variant!(
            normalize(&participants, WeightMode::Permillage),
            QuotaError::InvalidWeight { index: 1, .. }
        );
    }

    #[test]
    fn test_all_zero_weights() {
        let participants = vec![Participant::new("1A", dec!(0)), Participant::new("1B", dec!(0))];
        assert_err_variant!(
            normalize_to_permillage(&participants, WeightMode::Permillage),
            QuotaError::NoValidWeights
        );
    }
}

// ============================================================================
// Allocation
// ============================================================================

mod allocation_tests {
    use super::*;

    #[test]
    fn test_one_euro_over_thirds() {
        let participants = BuildingFixtures::participants(&BuildingFixtures::thirds());
        let allocations = allocate(MoneyFixtures::one_euro(), &participants).unwrap();

        let amounts: Vec<i64> = allocations.iter().map(|a| a.amount.minor()).collect();
        assert_eq!(amounts, vec![33, 33, 34]);
        assert_eq!(allocations[2].participant_id, "2A");
    }

    #[test]
    fn test_mixed_table_monthly_quota() {
        let participants = BuildingFixtures::participants(&BuildingFixtures::mixed());
        let allocations = allocate(MoneyFixtures::monthly_quota(), &participants).unwrap();

        let amounts: Vec<i64> = allocations.iter().map(|a| a.amount.minor()).collect();
        assert_eq!(amounts, vec![6025, 6500, 8763, 8737, 9975, 10000]);
        assert_conserves_total(&allocations, MoneyFixtures::monthly_quota());
    }

    #[test]
    fn test_equal_split_ignores_table() {
        let participants = BuildingFixtures::participants(&BuildingFixtures::mixed());
        let allocations = allocate_with_mode(cents(100), &participants, WeightMode::Equal).unwrap();

        let amounts: Vec<Money> = allocations.iter().map(|a| a.amount).collect();
        assert_eq!(minors(&amounts), vec![17, 17, 17, 17, 16, 16]);
    }

    #[test]
    fn test_permillage_table_not_summing_to_thousand() {
        let participants = vec![Participant::new("1A", dec!(100)), Participant::new("1B", dec!(300))];
        let allocations = allocate(cents(1000), &participants).unwrap();

        assert_eq!(allocations[0].amount, cents(250));
        assert_eq!(allocations[1].amount, cents(750));
    }
}

// ============================================================================
// Balance
// ============================================================================

mod balance_tests {
    use super::*;

    #[test]
    fn test_statuses_around_due_date() {
        let today = DateFixtures::today();
        let quota = MoneyFixtures::monthly_quota();

        let late = assess_balance(quota, Money::ZERO, Some(DateFixtures::past_due()), today).unwrap();
        assert_status(late.status, BalanceStatus::Late);

        let pending = assess_balance(quota, Money::ZERO, Some(DateFixtures::future_due()), today).unwrap();
        assert_status(pending.status, BalanceStatus::Pending);

        let partial = assess_balance(quota, cents(100), Some(DateFixtures::past_due()), today).unwrap();
        assert_status(partial.status, BalanceStatus::Partial);
    }

    #[test]
    fn test_overpayment_displays_zero_balance() {
        let period = DateFixtures::month(2025, 3);
        let records = vec![PaymentRecord::new("1A", period, cents(6000))];

        let result = compute_balance(
            &"1A",
            period,
            cents(5000),
            &records,
            Some(DateFixtures::past_due()),
            DateFixtures::today(),
        )
        .unwrap();

        assert_status(result.status, BalanceStatus::Paid);
        assert_eq!(result.balance, cents(-1000));
        assert_money_zero(result.display_balance());
        assert_money_zero(result.outstanding());
        assert_eq!(result.overpayment(), cents(1000));
    }

    #[test]
    fn test_stale_recorded_status_does_not_win() {
        let period = DateFixtures::month(2025, 3);
        let mut record = PaymentRecord::new("1A", period, cents(1000));
        record.recorded_status = Some(BalanceStatus::Late);

        let result = compute_balance(
            &"1A",
            period,
            cents(1000),
            &[record],
            Some(DateFixtures::past_due()),
            DateFixtures::today(),
        )
        .unwrap();
        assert_status(result.status, BalanceStatus::Paid);
    }

    #[test]
    fn test_installment_periods_are_separate() {
        let records = vec![
            PaymentRecord::new("1A", PeriodRef::Installment(1), cents(500)),
            PaymentRecord::new("1A", PeriodRef::Installment(2), cents(500)),
        ];

        let result = compute_balance(
            &"1A",
            PeriodRef::Installment(1),
            cents(1000),
            &records,
            None,
            DateFixtures::today(),
        )
        .unwrap();
        assert_eq!(result.paid, cents(500));
        assert_eq!(result.outstanding(), cents(500));
    }

    #[test]
    fn test_record_json_without_status() {
        let json = r#"{"participant_id":"1A","period":{"installment":2},"amount_paid":1250}"#;
        let record: PaymentRecord<String> = serde_json::from_str(json).unwrap();

        assert_eq!(record.period, PeriodRef::Installment(2));
        assert_eq!(record.amount_paid, cents(1250));
        assert!(record.recorded_status.is_none());
    }
}

// ============================================================================
// Charge pipeline
// ============================================================================

mod charge_tests {
    use super::*;

    #[test]
    fn test_project_budget_in_installments() {
        let participants = BuildingFixtures::participants(&BuildingFixtures::thirds());
        let result = Charge::new(MoneyFixtures::project_budget(), participants, WeightMode::Permillage)
            .with_installments(10)
            .apportion()
            .unwrap();

        assert_eq!(result.total_allocated().unwrap(), MoneyFixtures::project_budget());
        for share in &result.shares {
            let amounts: Vec<Money> = share.installments.iter().map(|i| i.amount).collect();
            assert_money_sum_equals(&amounts, share.share);
            assert_fair_spread(&amounts);
        }
    }

    #[test]
    fn test_serialized_charge_shape() {
        let charge = Charge::new(cents(100), vec![Participant::equal("1A")], WeightMode::Equal);
        let json = serde_json::to_value(&charge).unwrap();

        assert_eq!(json["total"], 100);
        assert_eq!(json["mode"], "equal");
        assert_eq!(json["installments"], 1);
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_allocation_conserves_total(
        total in total_strategy(),
        participants in participants_strategy(30)
    ) {
        let allocations = allocate(total, &participants).unwrap();
        let amounts: Vec<Money> = allocations.iter().map(|a| a.amount).collect();

        assert_all_non_negative(&amounts);
        prop_assert_eq!(Money::try_sum(amounts).unwrap(), total);
    }

    #[test]
    fn prop_zero_weight_gets_nothing(
        total in total_strategy(),
        participants in participants_strategy(30)
    ) {
        let allocations = allocate(total, &participants).unwrap();
        for (allocation, participant) in allocations.iter().zip(&participants) {
            if participant.weight.is_zero() {
                prop_assert!(allocation.amount.is_zero());
            }
        }
    }

    #[test]
    fn prop_equal_split_is_fair(
        total in total_strategy(),
        participants in equal_participants_strategy(50)
    ) {
        let allocations = allocate(total, &participants).unwrap();
        let amounts: Vec<i64> = allocations.iter().map(|a| a.amount.minor()).collect();
        let spread = amounts.iter().max().unwrap() - amounts.iter().min().unwrap();

        prop_assert!(spread <= 1);
    }

    #[test]
    fn prop_permillage_sums_to_thousand(participants in participants_strategy(30)) {
        let points = normalize_to_permillage(&participants, WeightMode::Permillage).unwrap();
        let sum: u32 = points.iter().map(|p| p.permillage).sum();

        prop_assert_eq!(sum, PERMILLAGE_TOTAL);
    }

    #[test]
    fn prop_installments_conserve_share(
        total in large_total_strategy(),
        n in installment_count_strategy()
    ) {
        let parts = split_into_installments(total, n).unwrap();

        assert_all_non_negative(&parts);
        assert_fair_spread(&parts);
        prop_assert_eq!(Money::try_sum(parts).unwrap(), total);
    }

    #[test]
    fn prop_splitting_is_deterministic(
        total in large_total_strategy(),
        n in installment_count_strategy()
    ) {
        prop_assert_eq!(split_into_installments(total, n), split_into_installments(total, n));
    }

    #[test]
    fn prop_normalizing_is_deterministic(participants in participants_strategy(30)) {
        for mode in [WeightMode::Equal, WeightMode::Permillage] {
            prop_assert_eq!(normalize(&participants, mode), normalize(&participants, mode));
            prop_assert_eq!(
                normalize_to_permillage(&participants, mode),
                normalize_to_permillage(&participants, mode)
            );
        }
    }

    #[test]
    fn prop_apportioning_is_deterministic(
        total in total_strategy(),
        participants in participants_strategy(20),
        n in 1u32..=24
    ) {
        let charge = Charge::new(total, participants, WeightMode::Permillage).with_installments(n);
        let first = charge.apportion().unwrap();

        prop_assert_eq!(&first, &charge.apportion().unwrap());
        prop_assert_eq!(first.total_allocated().unwrap(), total);
    }
}
