use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::errors::{LoanError, Result};
use crate::loan::Loan;
use crate::types::LoanId;

/// persistence for loans
///
/// `modify` is the only write path that runs a core operation; it must
/// load, mutate and store one loan without interleaving another writer.
pub trait LoanRepository {
    fn create(&self, loan: &Loan) -> Result<()>;

    fn get_by_id(&self, id: &LoanId) -> Result<Loan>;

    fn update(&self, loan: &Loan) -> Result<()>;

    /// all loans ordered by id
    fn list(&self) -> Result<Vec<Loan>>;

    fn delete(&self, id: &LoanId) -> Result<()>;

    /// run `f` against a loan and store the result if it succeeds
    fn modify<T, F>(&self, id: &LoanId, f: F) -> Result<T>
    where
        F: FnOnce(&mut Loan) -> Result<T>;
}

/// in-memory repository; the write lock serializes writers per process
#[derive(Debug, Default)]
pub struct InMemoryLoanRepository {
    loans: RwLock<HashMap<LoanId, Loan>>,
}

impl InMemoryLoanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.loans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LoanRepository for InMemoryLoanRepository {
    fn create(&self, loan: &Loan) -> Result<()> {
        let mut loans = self.loans.write().unwrap_or_else(PoisonError::into_inner);
        if loans.contains_key(&loan.id) {
            return Err(LoanError::DuplicateLoan { id: loan.id.clone() });
        }
        loans.insert(loan.id.clone(), loan.clone());
        tracing::debug!(loan_id = %loan.id, "stored new loan");
        Ok(())
    }

    fn get_by_id(&self, id: &LoanId) -> Result<Loan> {
        self.loans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| LoanError::LoanNotFound { id: id.clone() })
    }

    fn update(&self, loan: &Loan) -> Result<()> {
        let mut loans = self.loans.write().unwrap_or_else(PoisonError::into_inner);
        match loans.get_mut(&loan.id) {
            Some(stored) => {
                *stored = loan.clone();
                Ok(())
            }
            None => Err(LoanError::LoanNotFound { id: loan.id.clone() }),
        }
    }

    fn list(&self) -> Result<Vec<Loan>> {
        let loans = self.loans.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<Loan> = loans.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    fn delete(&self, id: &LoanId) -> Result<()> {
        let mut loans = self.loans.write().unwrap_or_else(PoisonError::into_inner);
        loans
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| LoanError::LoanNotFound { id: id.clone() })
    }

    fn modify<T, F>(&self, id: &LoanId, f: F) -> Result<T>
    where
        F: FnOnce(&mut Loan) -> Result<T>,
    {
        let mut loans = self.loans.write().unwrap_or_else(PoisonError::into_inner);
        let stored = loans
            .get_mut(id)
            .ok_or_else(|| LoanError::LoanNotFound { id: id.clone() })?;

        // work on a copy so a failed operation never reaches the store
        let mut working = stored.clone();
        let outcome = f(&mut working)?;
        *stored = working;
        Ok(outcome)
    }
}
