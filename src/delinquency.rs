/// delinquency evaluation over the two most recently due weeks
use chrono::{DateTime, NaiveDate, Utc};

use crate::dates::midnight_utc;
use crate::loan::Loan;
use crate::types::{DelinquencyStatus, WeekIndex, TERM_WEEKS};

/// number of most recently due installments inspected
pub const LOOKBACK_WEEKS: u32 = 2;

/// week index implied by `now`, in `1..=50`
///
/// Days 0-6 after the start date are week 1, days 7-13 week 2, and so on,
/// capped at the last week of the term. Instants before the start are week 1.
pub fn observed_week(start_date: NaiveDate, now: DateTime<Utc>) -> WeekIndex {
    let starts_at = midnight_utc(start_date);
    if now < starts_at {
        return 1;
    }

    let elapsed_weeks = (now - starts_at).num_days() / 7;
    let last_week = TERM_WEEKS as i64;
    (elapsed_weeks + 1).min(last_week) as WeekIndex
}

impl Loan {
    pub fn week_index_at(&self, now: DateTime<Utc>) -> WeekIndex {
        observed_week(self.start_date, now)
    }

    /// evaluate delinquency against the two most recently due installments
    ///
    /// Delinquent only when both installments immediately before the observed
    /// week are unpaid; older arrears are not considered.
    pub fn is_delinquent(&self, now: DateTime<Utc>) -> DelinquencyStatus {
        let observed = self.week_index_at(now);
        if observed <= LOOKBACK_WEEKS {
            return DelinquencyStatus::current(observed);
        }

        let all_unpaid = (observed - LOOKBACK_WEEKS..observed).all(|week| {
            self.schedule
                .get(week)
                .map_or(false, |installment| !installment.paid)
        });

        if all_unpaid {
            DelinquencyStatus {
                delinquent: true,
                streak: LOOKBACK_WEEKS,
                observed_week: observed,
            }
        } else {
            DelinquencyStatus::current(observed)
        }
    }
}
