use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LoanError, Result};

/// number of weekly installments in every loan
pub const TERM_WEEKS: usize = 50;

/// 1-based installment position within a schedule
pub type WeekIndex = u32;

/// unique identifier for a loan, assigned once at creation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(String);

impl LoanId {
    /// wrap a caller-supplied id, rejecting blank ones
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(LoanError::InvalidLoanId);
        }
        Ok(LoanId(id))
    }

    /// generate a fresh `loan_<uuid>` id
    pub fn generate() -> Self {
        LoanId(format!("loan_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LoanId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// outcome of a successful payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub paid_week: WeekIndex,
    pub remaining_outstanding: Money,
}

/// delinquency status relative to a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelinquencyStatus {
    pub delinquent: bool,
    /// 2 when both inspected installments are unpaid, otherwise 0
    pub streak: u32,
    pub observed_week: WeekIndex,
}

impl DelinquencyStatus {
    pub fn current(observed_week: WeekIndex) -> Self {
        Self {
            delinquent: false,
            streak: 0,
            observed_week,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_id_rejects_blank() {
        assert!(matches!(LoanId::new(""), Err(LoanError::InvalidLoanId)));
        assert!(matches!(LoanId::new("   "), Err(LoanError::InvalidLoanId)));
        assert_eq!(LoanId::new("L1").unwrap().as_str(), "L1");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = LoanId::generate();
        let b = LoanId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("loan_"));
    }

    #[test]
    fn test_loan_id_serializes_as_plain_string() {
        let id = LoanId::new("L1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"L1\"");
    }
}
