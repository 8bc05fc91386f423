use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::{LoanId, WeekIndex};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoanError {
    #[error("invalid principal: {principal} must be greater than zero")]
    InvalidPrincipal {
        principal: Money,
    },

    #[error("invalid annual rate: {rate} must not be negative")]
    InvalidRate {
        rate: Rate,
    },

    #[error("unsupported product: total due {total_due} is not divisible into {term_weeks} equal weekly installments")]
    UnsupportedProduct {
        total_due: Money,
        term_weeks: u32,
    },

    #[error("wrong amount for week {week}: expected {expected}, provided {provided}")]
    WrongAmount {
        week: WeekIndex,
        expected: Money,
        provided: Money,
    },

    #[error("loan already fully paid ({paid_weeks} weeks paid)")]
    AlreadyPaid {
        paid_weeks: u32,
    },

    #[error("invalid loan id: must not be empty")]
    InvalidLoanId,

    #[error("invalid request: {message}")]
    InvalidRequest {
        message: String,
    },

    #[error("principal exceeds limit: maximum {maximum}, requested {principal}")]
    PrincipalAboveLimit {
        principal: Money,
        maximum: Money,
    },

    #[error("annual rate exceeds limit: maximum {maximum}, requested {rate}")]
    RateAboveLimit {
        rate: Rate,
        maximum: Rate,
    },

    #[error("invalid payment amount: {amount} must be greater than zero")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("loan already exists: {id}")]
    DuplicateLoan {
        id: LoanId,
    },

    #[error("corrupt schedule: {message}")]
    CorruptSchedule {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("storage error: {message}")]
    Storage {
        message: String,
    },
}

/// coarse error category for transport layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    UnsupportedProduct,
    WrongAmount,
    AlreadyPaid,
    NotFound,
    Conflict,
    Internal,
}

impl LoanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoanError::InvalidPrincipal { .. }
            | LoanError::InvalidRate { .. }
            | LoanError::InvalidLoanId
            | LoanError::InvalidRequest { .. }
            | LoanError::PrincipalAboveLimit { .. }
            | LoanError::RateAboveLimit { .. }
            | LoanError::InvalidPaymentAmount { .. }
            | LoanError::InvalidDate { .. } => ErrorKind::Validation,
            LoanError::UnsupportedProduct { .. } => ErrorKind::UnsupportedProduct,
            LoanError::WrongAmount { .. } => ErrorKind::WrongAmount,
            LoanError::AlreadyPaid { .. } => ErrorKind::AlreadyPaid,
            LoanError::LoanNotFound { .. } => ErrorKind::NotFound,
            LoanError::DuplicateLoan { .. } => ErrorKind::Conflict,
            LoanError::CorruptSchedule { .. }
            | LoanError::CalculationError { .. }
            | LoanError::Storage { .. } => ErrorKind::Internal,
        }
    }

    /// stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            LoanError::InvalidPrincipal { .. } => "INVALID_PRINCIPAL",
            LoanError::InvalidRate { .. } => "INVALID_ANNUAL_RATE",
            LoanError::UnsupportedProduct { .. } => "NON_INTEGRAL_WEEKLY_PAYMENT",
            LoanError::WrongAmount { .. } => "INCORRECT_PAYMENT_AMOUNT",
            LoanError::AlreadyPaid { .. } => "LOAN_ALREADY_PAID",
            LoanError::InvalidLoanId => "INVALID_LOAN_ID",
            LoanError::InvalidRequest { .. } => "INVALID_LOAN_PARAMETERS",
            LoanError::PrincipalAboveLimit { .. } => "PRINCIPAL_TOO_HIGH",
            LoanError::RateAboveLimit { .. } => "ANNUAL_RATE_TOO_HIGH",
            LoanError::InvalidPaymentAmount { .. } => "INVALID_PAYMENT_AMOUNT",
            LoanError::InvalidDate { .. } => "INVALID_DATE",
            LoanError::LoanNotFound { .. } => "LOAN_NOT_FOUND",
            LoanError::DuplicateLoan { .. } => "LOAN_ALREADY_EXISTS",
            LoanError::CorruptSchedule { .. } => "CORRUPT_SCHEDULE",
            LoanError::CalculationError { .. } => "CALCULATION_ERROR",
            LoanError::Storage { .. } => "STORAGE_ERROR",
        }
    }

    /// whether the caller sent something the product cannot accept
    pub fn is_client_error(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Internal)
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
