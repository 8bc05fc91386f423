pub mod balance;
pub mod config;
pub mod dates;
pub mod decimal;
pub mod delinquency;
pub mod errors;
pub mod events;
pub mod loan;
pub mod payments;
pub mod repository;
pub mod schedule;
pub mod serialization;
pub mod service;
pub mod types;

// re-export key types
pub use config::ProductConfig;
pub use decimal::{Money, Rate};
pub use errors::{ErrorKind, LoanError, Result};
pub use events::{Event, EventStore};
pub use loan::Loan;
pub use repository::{InMemoryLoanRepository, LoanRepository};
pub use schedule::{Installment, Schedule};
pub use serialization::{DelinquencyView, ErrorView, LoanView, OutstandingView, PaymentView};
pub use service::{CreateLoanRequest, LoanService};
pub use types::{DelinquencyStatus, LoanId, PaymentReceipt, WeekIndex, TERM_WEEKS};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
