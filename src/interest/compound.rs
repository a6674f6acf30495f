use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::Rate;
use crate::errors::{Result, ScheduleError};

/// convention for turning a nominal annual rate into a monthly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Compounding {
    /// compounded twice a year, as quoted on Canadian mortgages
    #[default]
    #[serde(rename = "semiannual")]
    SemiAnnual,
    /// annual rate divided by twelve, no compounding adjustment
    Annual,
    /// effective annual rate spread over twelve compounding months
    SimpleMonthly,
}

impl Compounding {
    /// periodic (monthly) rate for the given annual rate
    ///
    /// * `SemiAnnual`: `(1 + r/2)^(2/12) - 1`
    /// * `Annual`: `r / 12`
    /// * `SimpleMonthly`: `(1 + r)^(1/12) - 1`
    ///
    /// A zero annual rate gives exactly zero under every convention. Rates at
    /// or below -100% are rejected since the base of the power is no longer
    /// positive.
    pub fn periodic_rate(&self, annual_rate: Rate) -> Result<Rate> {
        let annual = annual_rate.as_decimal();

        if annual <= Decimal::NEGATIVE_ONE {
            return Err(ScheduleError::invalid_spec(format!(
                "annual rate {} leaves no positive compounding base",
                annual_rate
            )));
        }

        if annual.is_zero() {
            return Ok(Rate::ZERO);
        }

        match self {
            Compounding::Annual => Ok(annual_rate.monthly_rate()),
            Compounding::SemiAnnual => {
                fractional_rate(Decimal::ONE + annual / dec!(2), dec!(2) / dec!(12))
            }
            Compounding::SimpleMonthly => {
                fractional_rate(Decimal::ONE + annual, Decimal::ONE / dec!(12))
            }
        }
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Compounding::SemiAnnual => "semiannual",
            Compounding::Annual => "annual",
            Compounding::SimpleMonthly => "simple_monthly",
        };
        write!(f, "{}", label)
    }
}

/// `base^exponent - 1`
fn fractional_rate(base: Decimal, exponent: Decimal) -> Result<Rate> {
    let factor = base.checked_powd(exponent).ok_or_else(|| {
        ScheduleError::calculation(format!("overflow raising {} to {}", base, exponent))
    })?;

    Ok(Rate::from_decimal(factor - Decimal::ONE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Rate, expected: Decimal) {
        let diff = (actual.as_decimal() - expected).abs();
        assert!(
            diff < dec!(0.000000001),
            "expected {} got {}",
            expected,
            actual.as_decimal()
        );
    }

    #[test]
    fn test_annual_is_simple_division() {
        let rate = Compounding::Annual.periodic_rate(Rate::from_percentage(4)).unwrap();
        assert_eq!(rate.as_decimal(), dec!(0.04) / dec!(12));
    }

    #[test]
    fn test_semiannual_compounding() {
        let rate = Compounding::SemiAnnual
            .periodic_rate(Rate::from_percentage(4))
            .unwrap();
        assert_close(rate, dec!(0.0033058903246372));
    }

    #[test]
    fn test_simple_monthly_compounding() {
        let rate = Compounding::SimpleMonthly
            .periodic_rate(Rate::from_percentage(4))
            .unwrap();
        assert_close(rate, dec!(0.0032737397821989));
    }

    #[test]
    fn test_convention_ordering() {
        let annual_rate = Rate::from_percentage(6);

        let simple = Compounding::SimpleMonthly.periodic_rate(annual_rate).unwrap();
        let semi = Compounding::SemiAnnual.periodic_rate(annual_rate).unwrap();
        let annual = Compounding::Annual.periodic_rate(annual_rate).unwrap();

        // more compounding per year means a smaller monthly rate for the same quote
        assert!(simple < semi);
        assert!(semi < annual);
    }

    #[test]
    fn test_zero_rate_every_convention() {
        for compounding in [
            Compounding::SemiAnnual,
            Compounding::Annual,
            Compounding::SimpleMonthly,
        ] {
            let rate = compounding.periodic_rate(Rate::ZERO).unwrap();
            assert!(rate.is_zero(), "{} should give a zero periodic rate", compounding);
        }
    }

    #[test]
    fn test_negative_rate_within_bounds() {
        let rate = Compounding::SemiAnnual
            .periodic_rate(Rate::from_decimal(dec!(-0.01)))
            .unwrap();
        assert!(rate.as_decimal() < Decimal::ZERO);
        assert!(rate.as_decimal() > dec!(-0.001));
    }

    #[test]
    fn test_rate_at_minus_one_rejected() {
        let result = Compounding::SimpleMonthly.periodic_rate(Rate::from_decimal(dec!(-1)));
        assert!(matches!(result, Err(ScheduleError::InvalidLoanSpec { .. })));

        let result = Compounding::Annual.periodic_rate(Rate::from_decimal(dec!(-1.5)));
        assert!(matches!(result, Err(ScheduleError::InvalidLoanSpec { .. })));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Compounding::SemiAnnual).unwrap(),
            "\"semiannual\""
        );
        assert_eq!(
            serde_json::to_string(&Compounding::SimpleMonthly).unwrap(),
            "\"simple_monthly\""
        );
        let parsed: Compounding = serde_json::from_str("\"annual\"").unwrap();
        assert_eq!(parsed, Compounding::Annual);
    }
}
