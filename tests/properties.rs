/// property tests for the loan ledger laws
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use flat_loan_billing_rs::delinquency::observed_week;
use flat_loan_billing_rs::{Loan, LoanError, LoanId, Money, Rate};
use proptest::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
}

fn loan(principal: i64, rate_bps: u32) -> Result<Loan, LoanError> {
    Loan::create(
        LoanId::new("P").unwrap(),
        Money::from_minor(principal),
        Rate::from_bps(rate_bps),
        start(),
    )
}

/// `principal * (1 + rate)` rounded half away from zero, computed here
fn expected_total(principal: i64, rate_bps: u32) -> i64 {
    let rate = Decimal::from(rate_bps) / Decimal::from(10_000);
    (Decimal::from(principal) * (Decimal::ONE + rate))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap()
}

fn check_creation(principal: i64, rate_bps: u32, expected: i64) -> Result<(), TestCaseError> {
    match loan(principal, rate_bps) {
        Ok(loan) => {
            prop_assert_eq!(expected % 50, 0);
            prop_assert_eq!(loan.total_due(), Money::from_minor(expected));
            prop_assert_eq!(loan.weekly_due, Money::from_minor(expected / 50));
            prop_assert_eq!(loan.outstanding, loan.total_due());
        }
        Err(LoanError::UnsupportedProduct { total_due, term_weeks }) => {
            prop_assert_ne!(expected % 50, 0);
            prop_assert_eq!(total_due, Money::from_minor(expected));
            prop_assert_eq!(term_weeks, 50);
        }
        Err(other) => prop_assert!(false, "unexpected error {:?}", other),
    }
    Ok(())
}

proptest! {
    #[test]
    fn creation_succeeds_exactly_when_total_divides(
        principal in 1i64..50_000_000,
        rate_bps in 0u32..5_000,
    ) {
        check_creation(principal, rate_bps, expected_total(principal, rate_bps))?;
    }

    #[test]
    fn midpoint_totals_round_up(tens in 0i64..500_000) {
        // (10t + 5) * 1.1 = 11t + 5.5
        let principal = tens * 10 + 5;
        check_creation(principal, 1_000, tens * 11 + 6)?;
    }

    #[test]
    fn zero_rate_multiples_of_fifty_always_succeed(weeks_worth in 1i64..1_000_000) {
        let loan = loan(weeks_worth * 50, 0).unwrap();
        prop_assert_eq!(loan.weekly_due, Money::from_minor(weeks_worth));
    }

    #[test]
    fn payments_conserve_and_never_revert(
        weekly in 1i64..200_000,
        payments in 0usize..=50,
    ) {
        let mut loan = loan(weekly * 50, 0).unwrap();
        let total_due = loan.total_due();
        let now = Utc.with_ymd_and_hms(2025, 8, 2, 0, 0, 0).unwrap();
        let mut previous_count = 0;

        for expected_week in 1..=payments as u32 {
            let paid_before: Vec<bool> = loan.schedule.iter().map(|w| w.paid).collect();
            let receipt = loan.apply_payment(loan.weekly_due, now).unwrap();

            // fifo: every earlier week is already paid
            prop_assert_eq!(receipt.paid_week, expected_week);
            prop_assert!(loan.schedule.iter().take(expected_week as usize).all(|w| w.paid));

            // monotonic
            prop_assert_eq!(loan.paid_count, previous_count + 1);
            for (was_paid, week) in paid_before.iter().zip(loan.schedule.iter()) {
                prop_assert!(!was_paid || week.paid);
            }
            previous_count = loan.paid_count;

            // conservation
            let paid_total = loan.weekly_due.checked_times(loan.paid_count).unwrap();
            prop_assert_eq!(loan.recompute_outstanding() + paid_total, total_due);
            prop_assert!(loan.caches_consistent());
        }
    }

    #[test]
    fn wrong_amounts_change_nothing(
        paid in 0u32..50,
        delta in prop_oneof![-110_000i64..0, 1i64..110_000],
    ) {
        let mut loan = loan(5_000_000, 1_000).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 8, 2, 0, 0, 0).unwrap();
        for _ in 0..paid {
            loan.apply_payment(loan.weekly_due, now).unwrap();
        }
        let before = loan.clone();

        let amount = Money::from_minor(loan.weekly_due.as_minor() + delta);
        let result = loan.apply_payment(amount, now);

        let is_wrong_amount = matches!(result, Err(LoanError::WrongAmount { .. }));
        prop_assert!(is_wrong_amount);
        prop_assert_eq!(&loan, &before);
    }

    #[test]
    fn observed_week_stays_in_term(offset_days in -10_000i64..10_000) {
        let now = start().and_hms_opt(12, 0, 0).unwrap().and_utc() + Duration::days(offset_days);
        let week = observed_week(start(), now);
        prop_assert!((1..=50).contains(&week));
    }

    #[test]
    fn future_start_is_never_delinquent(days_before in 1i64..5_000) {
        let loan = loan(5_000_000, 1_000).unwrap();
        let now = start().and_hms_opt(0, 0, 0).unwrap().and_utc() - Duration::days(days_before);
        let status = loan.is_delinquent(now);
        prop_assert_eq!(status.observed_week, 1);
        prop_assert!(!status.delinquent);
        prop_assert_eq!(status.streak, 0);
    }

    #[test]
    fn streak_is_binary(days in 0i64..400, paid in 0u32..=50) {
        let mut loan = loan(5_000_000, 1_000).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 8, 2, 0, 0, 0).unwrap();
        for _ in 0..paid {
            loan.apply_payment(loan.weekly_due, now).unwrap();
        }

        let status = loan.is_delinquent(start().and_hms_opt(0, 0, 0).unwrap().and_utc() + Duration::days(days));
        prop_assert!(status.streak == 0 || status.streak == 2);
        prop_assert_eq!(status.delinquent, status.streak == 2);
    }
}

#[test]
fn full_payoff_law() {
    let mut loan = loan(5_000_000, 1_000).unwrap();
    let now = Utc.with_ymd_and_hms(2025, 8, 2, 0, 0, 0).unwrap();

    for _ in 0..50 {
        loan.apply_payment(loan.weekly_due, now).unwrap();
    }

    assert_eq!(loan.recompute_outstanding(), Money::ZERO);
    assert!(matches!(
        loan.apply_payment(loan.weekly_due, now),
        Err(LoanError::AlreadyPaid { paid_weeks: 50 })
    ));
}

#[test]
fn midpoint_total_that_divides_is_accepted() {
    // 45 * 1.1 = 49.5
    let loan = loan(45, 1_000).unwrap();
    assert_eq!(loan.total_due(), Money::from_minor(50));
    assert_eq!(loan.weekly_due, Money::from_minor(1));
}

#[test]
fn midpoint_total_that_does_not_divide_is_rejected() {
    // 135 * 1.1 = 148.5
    assert!(matches!(
        loan(135, 1_000),
        Err(LoanError::UnsupportedProduct { total_due, term_weeks: 50 })
            if total_due == Money::from_minor(149)
    ));
}
