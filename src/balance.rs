use crate::decimal::Money;
use crate::loan::Loan;
use crate::schedule::Schedule;

/// sum of every unpaid installment
pub fn unpaid_total(schedule: &Schedule) -> Money {
    schedule
        .iter()
        .filter(|installment| !installment.paid)
        .map(|installment| installment.amount)
        .sum()
}

/// number of installments marked paid
pub fn paid_weeks(schedule: &Schedule) -> u32 {
    schedule.iter().filter(|installment| installment.paid).count() as u32
}

impl Loan {
    /// recompute the outstanding balance from the schedule and refresh the cache
    ///
    /// This is the source of truth for what remains owed; callers must not
    /// read `outstanding` directly.
    pub fn recompute_outstanding(&mut self) -> Money {
        self.outstanding = unpaid_total(&self.schedule);
        self.outstanding
    }

    /// refresh both cached fields, returning the outstanding balance
    pub(crate) fn refresh_caches(&mut self) -> Money {
        self.paid_count = paid_weeks(&self.schedule);
        self.recompute_outstanding()
    }

    /// whether the caches agree with the schedule
    pub fn caches_consistent(&self) -> bool {
        self.paid_count == paid_weeks(&self.schedule)
            && self.outstanding == unpaid_total(&self.schedule)
    }
}
