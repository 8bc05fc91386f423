use chrono::{DateTime, Utc};

use crate::balance;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::loan::Loan;
use crate::types::PaymentReceipt;

impl Loan {
    /// apply one payment to the oldest unpaid week
    ///
    /// The amount must equal that week's amount exactly. On error the loan
    /// is left untouched.
    pub fn apply_payment(&mut self, amount: Money, now: DateTime<Utc>) -> Result<PaymentReceipt> {
        let paid_weeks = balance::paid_weeks(&self.schedule);
        let installment = self
            .schedule
            .first_unpaid_mut()
            .ok_or(LoanError::AlreadyPaid { paid_weeks })?;

        if amount != installment.amount {
            return Err(LoanError::WrongAmount {
                week: installment.index,
                expected: installment.amount,
                provided: amount,
            });
        }

        installment.mark_paid(now);
        let paid_week = installment.index;

        let remaining_outstanding = self.refresh_caches();

        Ok(PaymentReceipt {
            paid_week,
            remaining_outstanding,
        })
    }

    /// amount the next payment must carry, if anything is still owed
    pub fn next_payable(&self) -> Option<Money> {
        self.next_due().map(|installment| installment.amount)
    }
}
