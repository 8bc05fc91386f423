use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use tracing::{debug, info, warn};

use crate::config::ProductConfig;
use crate::dates::parse_start_date;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::loan::Loan;
use crate::repository::{InMemoryLoanRepository, LoanRepository};
use crate::types::{DelinquencyStatus, LoanId, PaymentReceipt};

/// parameters for opening a loan
#[derive(Debug, Clone, PartialEq)]
pub struct CreateLoanRequest {
    pub principal: Money,
    /// falls back to the product default when absent
    pub annual_rate: Option<Rate>,
    pub start_date: NaiveDate,
}

impl CreateLoanRequest {
    pub fn new(principal: Money, start_date: NaiveDate) -> Self {
        Self {
            principal,
            annual_rate: None,
            start_date,
        }
    }

    pub fn with_rate(mut self, annual_rate: Rate) -> Self {
        self.annual_rate = Some(annual_rate);
        self
    }

    /// build from raw transport values
    pub fn parse(principal: i64, annual_rate: Option<&str>, start_date: &str) -> Result<Self> {
        let annual_rate = annual_rate
            .map(|raw| {
                raw.parse::<Rate>().map_err(|e| LoanError::InvalidRequest {
                    message: format!("annual rate {:?} is not a decimal: {}", raw, e),
                })
            })
            .transpose()?;

        Ok(Self {
            principal: Money::from_minor(principal),
            annual_rate,
            start_date: parse_start_date(start_date)?,
        })
    }
}

/// orchestrates the loan core against a repository and a clock
///
/// Every payment, rejection and delinquent query appends to an in-process
/// event log that is only emptied by `take_events`. Long-running callers
/// must drain it periodically.
pub struct LoanService<R: LoanRepository = InMemoryLoanRepository> {
    repository: R,
    config: ProductConfig,
    events: EventStore,
}

impl LoanService<InMemoryLoanRepository> {
    /// standard product over an in-memory store
    pub fn in_memory() -> Self {
        Self::new(InMemoryLoanRepository::new(), ProductConfig::standard())
    }
}

impl<R: LoanRepository> LoanService<R> {
    pub fn new(repository: R, config: ProductConfig) -> Self {
        Self {
            repository,
            config,
            events: EventStore::new(),
        }
    }

    pub fn config(&self) -> &ProductConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// open a loan under a generated id
    pub fn create_loan(
        &mut self,
        request: CreateLoanRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        self.create_loan_with_id(LoanId::generate(), request, time_provider)
    }

    /// open a loan under a caller-supplied id
    pub fn create_loan_with_id(
        &mut self,
        id: LoanId,
        request: CreateLoanRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let annual_rate = self.config.resolve_rate(request.annual_rate);

        let loan = self
            .config
            .validate(request.principal, annual_rate)
            .and_then(|_| Loan::create(id, request.principal, annual_rate, request.start_date))
            .map_err(|e| {
                warn!(
                    principal = %request.principal,
                    annual_rate = %annual_rate,
                    code = e.code(),
                    error = %e,
                    "loan creation rejected"
                );
                e
            })?;

        self.repository.create(&loan)?;

        info!(
            loan_id = %loan.id,
            principal = %loan.principal,
            weekly_due = %loan.weekly_due,
            start_date = %loan.start_date,
            "loan created"
        );

        self.events.emit(Event::LoanCreated {
            loan_id: loan.id.clone(),
            principal: loan.principal,
            annual_rate: loan.annual_rate,
            weekly_due: loan.weekly_due,
            total_due: loan.total_due(),
            start_date: loan.start_date,
            timestamp: time_provider.now(),
        });

        Ok(loan)
    }

    /// pay the oldest unpaid week of a loan
    pub fn make_payment(
        &mut self,
        id: &LoanId,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        self.make_payment_at(id, amount, time_provider.now())
    }

    /// pay with system time
    pub fn make_payment_now(&mut self, id: &LoanId, amount: Money) -> Result<PaymentReceipt> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.make_payment(id, amount, &time)
    }

    /// pay at an explicit instant
    pub fn make_payment_at(
        &mut self,
        id: &LoanId,
        amount: Money,
        now: DateTime<Utc>,
    ) -> Result<PaymentReceipt> {
        if !amount.is_positive() {
            warn!(loan_id = %id, amount = %amount, "non-positive payment rejected");
            return Err(LoanError::InvalidPaymentAmount { amount });
        }

        let outcome = self.repository.modify(id, |loan| {
            let receipt = loan.apply_payment(amount, now)?;
            Ok((receipt, loan.is_fully_paid(), loan.total_due()))
        });

        match outcome {
            Ok((receipt, settled, total_due)) => {
                info!(
                    loan_id = %id,
                    week = receipt.paid_week,
                    amount = %amount,
                    remaining = %receipt.remaining_outstanding,
                    "installment paid"
                );
                self.events.emit(Event::InstallmentPaid {
                    loan_id: id.clone(),
                    week: receipt.paid_week,
                    amount,
                    remaining_outstanding: receipt.remaining_outstanding,
                    timestamp: now,
                });

                if settled {
                    info!(loan_id = %id, total_paid = %total_due, "loan settled");
                    self.events.emit(Event::LoanSettled {
                        loan_id: id.clone(),
                        total_paid: total_due,
                        timestamp: now,
                    });
                }

                Ok(receipt)
            }
            Err(e @ (LoanError::WrongAmount { .. } | LoanError::AlreadyPaid { .. })) => {
                warn!(loan_id = %id, amount = %amount, code = e.code(), error = %e, "payment rejected");
                self.events.emit(Event::PaymentRejected {
                    loan_id: id.clone(),
                    amount,
                    code: e.code().to_string(),
                    reason: e.to_string(),
                    timestamp: now,
                });
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// outstanding balance, recomputed from the schedule
    pub fn outstanding(&self, id: &LoanId) -> Result<Money> {
        let mut loan = self.repository.get_by_id(id)?;
        let outstanding = loan.recompute_outstanding();
        debug!(loan_id = %id, outstanding = %outstanding, "outstanding computed");
        Ok(outstanding)
    }

    /// delinquency status at the provider's current time
    pub fn delinquency(
        &mut self,
        id: &LoanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<DelinquencyStatus> {
        self.delinquency_at(id, time_provider.now())
    }

    /// delinquency status with system time
    pub fn delinquency_now(&mut self, id: &LoanId) -> Result<DelinquencyStatus> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.delinquency(id, &time)
    }

    /// delinquency status at an explicit instant
    pub fn delinquency_at(&mut self, id: &LoanId, now: DateTime<Utc>) -> Result<DelinquencyStatus> {
        let loan = self.repository.get_by_id(id)?;
        let status = loan.is_delinquent(now);

        if status.delinquent {
            warn!(
                loan_id = %id,
                observed_week = status.observed_week,
                streak = status.streak,
                "loan delinquent"
            );
            self.events.emit(Event::DelinquencyObserved {
                loan_id: id.clone(),
                observed_week: status.observed_week,
                streak: status.streak,
                timestamp: now,
            });
        } else {
            debug!(loan_id = %id, observed_week = status.observed_week, "loan current");
        }

        Ok(status)
    }

    pub fn get_loan(&self, id: &LoanId) -> Result<Loan> {
        self.repository.get_by_id(id)
    }

    pub fn list_loans(&self) -> Result<Vec<Loan>> {
        self.repository.list()
    }

    pub fn delete_loan(&mut self, id: &LoanId, time_provider: &SafeTimeProvider) -> Result<()> {
        self.repository.delete(id)?;
        info!(loan_id = %id, "loan deleted");
        self.events.emit(Event::LoanDeleted {
            loan_id: id.clone(),
            timestamp: time_provider.now(),
        });
        Ok(())
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}
