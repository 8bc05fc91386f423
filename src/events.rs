use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{LoanId, WeekIndex};

/// all events that can be emitted by the loan service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    LoanCreated {
        loan_id: LoanId,
        principal: Money,
        annual_rate: Rate,
        weekly_due: Money,
        total_due: Money,
        start_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    InstallmentPaid {
        loan_id: LoanId,
        week: WeekIndex,
        amount: Money,
        remaining_outstanding: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentRejected {
        loan_id: LoanId,
        amount: Money,
        code: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    LoanSettled {
        loan_id: LoanId,
        total_paid: Money,
        timestamp: DateTime<Utc>,
    },
    DelinquencyObserved {
        loan_id: LoanId,
        observed_week: WeekIndex,
        streak: u32,
        timestamp: DateTime<Utc>,
    },
    LoanDeleted {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn loan_id(&self) -> &LoanId {
        match self {
            Event::LoanCreated { loan_id, .. }
            | Event::InstallmentPaid { loan_id, .. }
            | Event::PaymentRejected { loan_id, .. }
            | Event::LoanSettled { loan_id, .. }
            | Event::DelinquencyObserved { loan_id, .. }
            | Event::LoanDeleted { loan_id, .. } => loan_id,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// events for a single loan, oldest first
    pub fn events_for<'a>(&'a self, loan_id: &'a LoanId) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |event| event.loan_id() == loan_id)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
