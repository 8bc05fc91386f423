use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::errors::{LoanError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// parse a `YYYY-MM-DD` start date
pub fn parse_start_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| LoanError::InvalidDate {
        message: format!("start date {:?} must be YYYY-MM-DD: {}", input, e),
    })
}

/// midnight UTC on `date`
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// parse an RFC 3339 timestamp (any offset) or a bare date at midnight UTC
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(midnight_utc)
        .map_err(|_| LoanError::InvalidDate {
            message: format!("{:?} is neither RFC 3339 nor YYYY-MM-DD", input),
        })
}
