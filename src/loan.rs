use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::midnight_utc;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::schedule::{flat_total_due, weekly_due_for, Installment, Schedule};
use crate::types::{LoanId, TERM_WEEKS};

/// flat-interest weekly loan
///
/// `paid_count` and `outstanding` are caches over `schedule`; they are only
/// ever refreshed through the balance calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub principal: Money,
    pub annual_rate: Rate,
    pub start_date: NaiveDate,
    pub weekly_due: Money,
    pub schedule: Schedule,
    pub paid_count: u32,
    pub outstanding: Money,
}

impl Loan {
    /// derive a new loan and its 50-week schedule
    pub fn create(
        id: LoanId,
        principal: Money,
        annual_rate: Rate,
        start_date: NaiveDate,
    ) -> Result<Self> {
        if !principal.is_positive() {
            return Err(LoanError::InvalidPrincipal { principal });
        }
        if annual_rate.is_negative() {
            return Err(LoanError::InvalidRate { rate: annual_rate });
        }

        let total_due = flat_total_due(principal, annual_rate)?;
        let weekly_due = weekly_due_for(total_due)?;

        Ok(Self {
            id,
            principal,
            annual_rate,
            start_date,
            weekly_due,
            schedule: Schedule::flat(weekly_due),
            paid_count: 0,
            outstanding: total_due,
        })
    }

    /// total repaid over the full term
    pub fn total_due(&self) -> Money {
        self.schedule.total()
    }

    /// interest charged over the full term
    pub fn total_interest(&self) -> Money {
        self.total_due() - self.principal
    }

    pub fn term_weeks(&self) -> u32 {
        TERM_WEEKS as u32
    }

    /// next installment a payment would settle
    pub fn next_due(&self) -> Option<&Installment> {
        self.schedule.first_unpaid()
    }

    pub fn is_fully_paid(&self) -> bool {
        self.next_due().is_none()
    }

    /// midnight UTC on the start date, when the repayment clock begins
    pub fn starts_at(&self) -> DateTime<Utc> {
        midnight_utc(self.start_date)
    }
}
