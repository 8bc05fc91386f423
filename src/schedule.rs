use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::{WeekIndex, TERM_WEEKS};

/// one week of the repayment schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub index: WeekIndex,
    pub amount: Money,
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Installment {
    pub fn new(index: WeekIndex, amount: Money) -> Self {
        Self {
            index,
            amount,
            paid: false,
            paid_at: None,
        }
    }

    /// one-way transition to paid
    pub(crate) fn mark_paid(&mut self, now: DateTime<Utc>) {
        debug_assert!(!self.paid, "installment {} paid twice", self.index);
        self.paid = true;
        self.paid_at = Some(now);
    }
}

/// fixed 50-week schedule, indexed 1..=50
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Installment>", into = "Vec<Installment>")]
pub struct Schedule([Installment; TERM_WEEKS]);

impl Schedule {
    /// flat schedule where every week owes the same amount
    pub fn flat(weekly_due: Money) -> Self {
        Schedule(std::array::from_fn(|i| {
            Installment::new(i as WeekIndex + 1, weekly_due)
        }))
    }

    /// installment at a 1-based week index
    pub fn get(&self, week: WeekIndex) -> Option<&Installment> {
        let position = usize::try_from(week).ok()?.checked_sub(1)?;
        self.0.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Installment> {
        self.0.iter()
    }

    /// oldest unpaid installment
    pub fn first_unpaid(&self) -> Option<&Installment> {
        self.0.iter().find(|installment| !installment.paid)
    }

    pub(crate) fn first_unpaid_mut(&mut self) -> Option<&mut Installment> {
        self.0.iter_mut().find(|installment| !installment.paid)
    }

    /// sum of every installment, paid or not
    pub fn total(&self) -> Money {
        self.0.iter().map(|installment| installment.amount).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Installment>> for Schedule {
    type Error = LoanError;

    fn try_from(installments: Vec<Installment>) -> Result<Self> {
        let found = installments.len();
        let installments: [Installment; TERM_WEEKS] =
            installments
                .try_into()
                .map_err(|_| LoanError::CorruptSchedule {
                    message: format!("expected {} installments, found {}", TERM_WEEKS, found),
                })?;

        for (position, installment) in installments.iter().enumerate() {
            let expected = position as WeekIndex + 1;
            if installment.index != expected {
                return Err(LoanError::CorruptSchedule {
                    message: format!(
                        "installment at position {} has index {}, expected {}",
                        position, installment.index, expected
                    ),
                });
            }
            if installment.paid != installment.paid_at.is_some() {
                return Err(LoanError::CorruptSchedule {
                    message: format!("installment {} has inconsistent paid state", expected),
                });
            }
        }

        Ok(Schedule(installments))
    }
}

impl From<Schedule> for Vec<Installment> {
    fn from(schedule: Schedule) -> Self {
        Vec::from(schedule.0)
    }
}

/// total repaid under flat interest: `principal * (1 + rate)`,
/// rounded half away from zero to a whole currency unit
pub fn flat_total_due(principal: Money, annual_rate: Rate) -> Result<Money> {
    let factor = Decimal::ONE
        .checked_add(annual_rate.as_decimal())
        .ok_or_else(|| overflow(principal, annual_rate))?;

    let exact = principal
        .as_decimal()
        .checked_mul(factor)
        .ok_or_else(|| overflow(principal, annual_rate))?;

    exact
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .map(Money::from_minor)
        .ok_or_else(|| overflow(principal, annual_rate))
}

/// equal weekly amount, rejecting totals that do not split into whole units
pub fn weekly_due_for(total_due: Money) -> Result<Money> {
    total_due
        .split_evenly(TERM_WEEKS as u32)
        .ok_or(LoanError::UnsupportedProduct {
            total_due,
            term_weeks: TERM_WEEKS as u32,
        })
}

fn overflow(principal: Money, annual_rate: Rate) -> LoanError {
    LoanError::CalculationError {
        message: format!("total due overflows for principal {} at {}", principal, annual_rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_flat_total_due() {
        let total = flat_total_due(Money::from_minor(5_000_000), Rate::from_percentage(10)).unwrap();
        assert_eq!(total, Money::from_minor(5_500_000));

        let zero_rate = flat_total_due(Money::from_minor(1_000), Rate::ZERO).unwrap();
        assert_eq!(zero_rate, Money::from_minor(1_000));
    }

    #[test]
    fn test_total_due_rounds_half_away_from_zero() {
        // 15 * 1.1 = 16.5
        let total = flat_total_due(Money::from_minor(15), Rate::from_percentage(10)).unwrap();
        assert_eq!(total, Money::from_minor(17));

        // 45 * 1.1 = 49.5
        let total = flat_total_due(Money::from_minor(45), Rate::from_percentage(10)).unwrap();
        assert_eq!(total, Money::from_minor(50));

        // 13 * 1.1 = 14.3
        let total = flat_total_due(Money::from_minor(13), Rate::from_percentage(10)).unwrap();
        assert_eq!(total, Money::from_minor(14));
    }

    #[test]
    fn test_total_due_overflow_is_an_error() {
        let result = flat_total_due(Money::from_minor(i64::MAX), Rate::from_decimal(dec!(1000)));
        assert!(matches!(result, Err(LoanError::CalculationError { .. })));
    }

    #[test]
    fn test_weekly_due_requires_divisibility() {
        assert_eq!(weekly_due_for(Money::from_minor(5_500_000)).unwrap(), Money::from_minor(110_000));
        assert_eq!(
            weekly_due_for(Money::from_minor(5_500_010)),
            Err(LoanError::UnsupportedProduct {
                total_due: Money::from_minor(5_500_010),
                term_weeks: 50,
            })
        );
    }

    #[test]
    fn test_flat_schedule_shape() {
        let schedule = Schedule::flat(Money::from_minor(110_000));
        assert_eq!(schedule.len(), TERM_WEEKS);
        assert_eq!(schedule.total(), Money::from_minor(5_500_000));
        assert_eq!(schedule.get(1).unwrap().index, 1);
        assert_eq!(schedule.get(50).unwrap().index, 50);
        assert!(schedule.get(0).is_none());
        assert!(schedule.get(51).is_none());
        assert!(schedule.iter().all(|i| !i.paid && i.paid_at.is_none()));
    }

    #[test]
    fn test_first_unpaid_follows_index_order() {
        let mut schedule = Schedule::flat(Money::from_minor(10));
        let now = Utc.with_ymd_and_hms(2025, 8, 15, 0, 0, 0).unwrap();

        schedule.first_unpaid_mut().unwrap().mark_paid(now);
        schedule.first_unpaid_mut().unwrap().mark_paid(now);

        assert_eq!(schedule.first_unpaid().unwrap().index, 3);
        assert_eq!(schedule.get(2).unwrap().paid_at, Some(now));
    }

    #[test]
    fn test_schedule_json_round_trip_keeps_fixed_length() {
        let schedule = Schedule::flat(Money::from_minor(20));
        let json = serde_json::to_string(&schedule).unwrap();
        let restored: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, schedule);
    }

    #[test]
    fn test_short_schedule_is_rejected() {
        let installments: Vec<Installment> = (1..=49)
            .map(|i| Installment::new(i, Money::from_minor(20)))
            .collect();
        let result = Schedule::try_from(installments);
        assert!(matches!(result, Err(LoanError::CorruptSchedule { .. })));
    }

    #[test]
    fn test_out_of_order_schedule_is_rejected() {
        let mut installments: Vec<Installment> = (1..=50)
            .map(|i| Installment::new(i, Money::from_minor(20)))
            .collect();
        installments.swap(3, 4);
        assert!(matches!(
            Schedule::try_from(installments),
            Err(LoanError::CorruptSchedule { .. })
        ));
    }
}
