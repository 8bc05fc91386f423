/// caller-facing views of loans, results and errors
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::LoanError;
use crate::loan::Loan;
use crate::schedule::Installment;
use crate::types::{DelinquencyStatus, LoanId, PaymentReceipt, WeekIndex, TERM_WEEKS};

/// full loan including its schedule
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub principal: Money,
    pub annual_rate: Rate,
    pub start_date: NaiveDate,
    pub weekly_due: Money,
    pub total_due: Money,
    pub schedule: Vec<Installment>,
    pub paid_count: u32,
    pub outstanding: Money,
}

impl LoanView {
    pub fn from_loan(loan: &Loan) -> Self {
        let mut loan = loan.clone();
        let outstanding = loan.refresh_caches();
        LoanView {
            id: loan.id.clone(),
            principal: loan.principal,
            annual_rate: loan.annual_rate,
            start_date: loan.start_date,
            weekly_due: loan.weekly_due,
            total_due: loan.total_due(),
            schedule: loan.schedule.iter().cloned().collect(),
            paid_count: loan.paid_count,
            outstanding,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentView {
    pub paid_week_index: WeekIndex,
    pub remaining_outstanding: Money,
}

impl From<PaymentReceipt> for PaymentView {
    fn from(receipt: PaymentReceipt) -> Self {
        Self {
            paid_week_index: receipt.paid_week,
            remaining_outstanding: receipt.remaining_outstanding,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingView {
    pub outstanding: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelinquencyView {
    pub delinquent: bool,
    pub streak: u32,
    pub observed_week: WeekIndex,
}

impl From<DelinquencyStatus> for DelinquencyView {
    fn from(status: DelinquencyStatus) -> Self {
        Self {
            delinquent: status.delinquent,
            streak: status.streak,
            observed_week: status.observed_week,
        }
    }
}

/// structured error body with actionable details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorView {
    pub error: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

impl ErrorView {
    pub fn from_error(error: &LoanError) -> Self {
        let mut details: BTreeMap<String, String> = BTreeMap::new();
        let message = match error {
            LoanError::InvalidPrincipal { principal } => {
                details.insert("provided".into(), principal.to_string());
                details.insert("min_value".into(), "1".into());
                "Principal amount must be greater than 0".to_string()
            }
            LoanError::InvalidRate { rate } => {
                details.insert("provided".into(), rate.as_decimal().to_string());
                details.insert("min_value".into(), "0".into());
                "Annual rate cannot be negative".to_string()
            }
            LoanError::PrincipalAboveLimit { principal, maximum } => {
                details.insert("provided".into(), principal.to_string());
                details.insert("maximum".into(), maximum.to_string());
                "Principal amount exceeds maximum allowed limit".to_string()
            }
            LoanError::RateAboveLimit { rate, maximum } => {
                details.insert("provided".into(), rate.as_decimal().to_string());
                details.insert("maximum".into(), maximum.as_decimal().to_string());
                "Annual rate exceeds maximum allowed limit".to_string()
            }
            LoanError::UnsupportedProduct { total_due, term_weeks } => {
                details.insert("total_due".into(), total_due.to_string());
                details.insert(
                    "required".into(),
                    format!("Total due amount must be divisible by {} (weeks)", term_weeks),
                );
                details.insert("suggestion".into(), "Try adjusting the principal or annual rate".into());
                "Loan parameters result in non-integral weekly payments".to_string()
            }
            LoanError::WrongAmount { week, expected, provided } => {
                details.insert("provided_amount".into(), provided.to_string());
                details.insert("required_amount".into(), expected.to_string());
                details.insert("week_number".into(), week.to_string());
                details.insert("suggestion".into(), format!("Pay exactly {} for week {}", expected, week));
                "Payment amount does not match the required weekly amount".to_string()
            }
            LoanError::AlreadyPaid { paid_weeks } => {
                details.insert("paid_weeks".into(), paid_weeks.to_string());
                details.insert("total_weeks".into(), TERM_WEEKS.to_string());
                details.insert("suggestion".into(), "No further payments are required for this loan".into());
                "Loan is already fully paid".to_string()
            }
            LoanError::InvalidPaymentAmount { amount } => {
                details.insert("provided".into(), amount.to_string());
                details.insert("min_value".into(), "1".into());
                "Payment amount must be greater than 0".to_string()
            }
            LoanError::InvalidDate { .. } => {
                details.insert("required".into(), "YYYY-MM-DD or RFC 3339".into());
                "Date format is invalid".to_string()
            }
            LoanError::LoanNotFound { id } => {
                details.insert("loan_id".into(), id.to_string());
                "Loan not found".to_string()
            }
            other => other.to_string(),
        };

        ErrorView {
            error: error.to_string(),
            code: error.code().to_string(),
            message,
            details,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&LoanError> for ErrorView {
    fn from(error: &LoanError) -> Self {
        ErrorView::from_error(error)
    }
}
