use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};

/// product policy enforced above the loan core
///
/// The core only requires a positive principal, a non-negative rate and an
/// evenly divisible total. Ceilings and defaults live here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub max_principal: Option<Money>,
    pub max_annual_rate: Option<Rate>,
    pub default_annual_rate: Rate,
}

impl ProductConfig {
    /// standard weekly micro-loan product
    pub fn standard() -> Self {
        Self {
            max_principal: Some(Money::from_minor(5_000_000)),
            max_annual_rate: Some(Rate::from_decimal(dec!(0.50))),
            default_annual_rate: Rate::from_decimal(dec!(0.10)),
        }
    }

    /// no ceilings; only the core rules apply
    pub fn unrestricted() -> Self {
        Self {
            max_principal: None,
            max_annual_rate: None,
            default_annual_rate: Rate::from_decimal(dec!(0.10)),
        }
    }

    /// load from a json document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| LoanError::InvalidRequest {
            message: format!("invalid product config: {}", e),
        })?;
        if config.default_annual_rate.is_negative() {
            return Err(LoanError::InvalidRate {
                rate: config.default_annual_rate,
            });
        }
        Ok(config)
    }

    pub fn with_max_principal(mut self, maximum: Money) -> Self {
        self.max_principal = Some(maximum);
        self
    }

    pub fn with_max_annual_rate(mut self, maximum: Rate) -> Self {
        self.max_annual_rate = Some(maximum);
        self
    }

    pub fn with_default_annual_rate(mut self, rate: Rate) -> Self {
        self.default_annual_rate = rate;
        self
    }

    /// rate to use when a request leaves it out
    pub fn resolve_rate(&self, requested: Option<Rate>) -> Rate {
        requested.unwrap_or(self.default_annual_rate)
    }

    /// check creation parameters against the product ceilings
    pub fn validate(&self, principal: Money, annual_rate: Rate) -> Result<()> {
        if !principal.is_positive() {
            return Err(LoanError::InvalidPrincipal { principal });
        }
        if let Some(maximum) = self.max_principal {
            if principal > maximum {
                return Err(LoanError::PrincipalAboveLimit { principal, maximum });
            }
        }
        if annual_rate.is_negative() {
            return Err(LoanError::InvalidRate { rate: annual_rate });
        }
        if let Some(maximum) = self.max_annual_rate {
            if annual_rate > maximum {
                return Err(LoanError::RateAboveLimit {
                    rate: annual_rate,
                    maximum,
                });
            }
        }
        Ok(())
    }
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_ceilings() {
        let config = ProductConfig::standard();

        assert!(config.validate(Money::from_minor(5_000_000), Rate::from_percentage(50)).is_ok());
        assert!(matches!(
            config.validate(Money::from_minor(5_000_001), Rate::from_percentage(10)),
            Err(LoanError::PrincipalAboveLimit { .. })
        ));
        assert!(matches!(
            config.validate(Money::from_minor(1_000_000), Rate::from_percentage(51)),
            Err(LoanError::RateAboveLimit { .. })
        ));
        assert!(matches!(
            config.validate(Money::ZERO, Rate::from_percentage(10)),
            Err(LoanError::InvalidPrincipal { .. })
        ));
    }

    #[test]
    fn test_unrestricted_allows_large_values() {
        let config = ProductConfig::unrestricted();
        assert!(config.validate(Money::from_minor(50_000_000), Rate::from_percentage(200)).is_ok());
    }

    #[test]
    fn test_default_rate_applies_when_missing() {
        let config = ProductConfig::standard();
        assert_eq!(config.resolve_rate(None), Rate::from_percentage(10));
        assert_eq!(config.resolve_rate(Some(Rate::ZERO)), Rate::ZERO);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "max_principal": 10000000,
            "max_annual_rate": "0.25",
            "default_annual_rate": "0.05"
        }"#;
        let config = ProductConfig::from_json(json).unwrap();
        assert_eq!(config.max_principal, Some(Money::from_minor(10_000_000)));
        assert_eq!(config.max_annual_rate, Some(Rate::from_percentage(25)));
        assert_eq!(config.default_annual_rate, Rate::from_percentage(5));

    }

    #[test]
    fn test_malformed_json_is_a_validation_error() {
        let err = ProductConfig::from_json("{").unwrap_err();
        assert!(matches!(err, LoanError::InvalidRequest { .. }));
        assert_eq!(err.kind(), crate::errors::ErrorKind::Validation);

        let err = ProductConfig::from_json(r#"{"default_annual_rate": "lots"}"#).unwrap_err();
        assert_eq!(err.code(), "INVALID_LOAN_PARAMETERS");
    }

    #[test]
    fn test_from_json_rejects_negative_default_rate() {
        let json = r#"{"max_principal": null, "max_annual_rate": null, "default_annual_rate": "-0.1"}"#;
        assert!(matches!(ProductConfig::from_json(json), Err(LoanError::InvalidRate { .. })));
    }
}
