use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::interest::{Compounding, TaxOverlay};

/// finest rounding a schedule may ask for, the working precision of `Money`
pub const MAX_ROUNDING_DIGITS: u32 = 8;

fn default_rounding_digits() -> u32 {
    2
}

/// loan specification, immutable input to the amortization engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSpec {
    /// outstanding amount at period 0
    pub principal: Money,
    /// nominal annual rate as a fraction
    pub annual_rate: Rate,
    /// amortization period used to size the level payment
    pub term_years: u32,
    #[serde(default)]
    pub compounding: Compounding,
    /// constant extra principal paid every period
    #[serde(default)]
    pub additional_monthly_payment: Money,
    /// decimal places for per-period interest, payment and deduction rounding
    #[serde(default = "default_rounding_digits")]
    pub rounding_digits: u32,
    #[serde(default)]
    pub tax_overlay: Option<TaxOverlay>,
}

impl LoanSpec {
    pub fn builder() -> LoanSpecBuilder {
        LoanSpecBuilder::new()
    }

    /// semiannually compounded loan rounded to cents, as Canadian lenders quote it
    pub fn canadian(principal: Money, annual_rate: Rate, term_years: u32) -> Result<Self> {
        LoanSpecBuilder::new()
            .principal(principal)
            .annual_rate(annual_rate)
            .term_years(term_years)
            .compounding(Compounding::SemiAnnual)
            .rounding_digits(2)
            .build()
    }

    /// rate divided by twelve, rounded to whole euros, with the mortgage interest deduction
    pub fn dutch(
        principal: Money,
        annual_rate: Rate,
        term_years: u32,
        tax_overlay: TaxOverlay,
    ) -> Result<Self> {
        LoanSpecBuilder::new()
            .principal(principal)
            .annual_rate(annual_rate)
            .term_years(term_years)
            .compounding(Compounding::Annual)
            .rounding_digits(0)
            .tax_overlay(tax_overlay)
            .build()
    }

    /// parse and validate a spec from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: LoanSpec = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// number of periods the level payment is sized for
    pub fn term_months(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(ScheduleError::invalid_spec(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }

        if self.term_years == 0 {
            return Err(ScheduleError::invalid_spec("term must be at least one year"));
        }

        if self.annual_rate.as_decimal() <= Decimal::NEGATIVE_ONE {
            return Err(ScheduleError::invalid_spec(format!(
                "annual rate {} must be above -100%",
                self.annual_rate
            )));
        }

        if self.additional_monthly_payment.is_negative() {
            return Err(ScheduleError::invalid_spec(format!(
                "additional monthly payment cannot be negative, got {}",
                self.additional_monthly_payment
            )));
        }

        if self.rounding_digits > MAX_ROUNDING_DIGITS {
            return Err(ScheduleError::invalid_spec(format!(
                "rounding digits {} exceed the supported {}",
                self.rounding_digits, MAX_ROUNDING_DIGITS
            )));
        }

        if let Some(overlay) = &self.tax_overlay {
            overlay.validate()?;
        }

        Ok(())
    }
}

/// builder for loan specs
#[derive(Debug, Clone, Default)]
pub struct LoanSpecBuilder {
    principal: Option<Money>,
    annual_rate: Option<Rate>,
    term_years: Option<u32>,
    compounding: Compounding,
    additional_monthly_payment: Money,
    rounding_digits: Option<u32>,
    tax_overlay: Option<TaxOverlay>,
}

impl LoanSpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn annual_rate(mut self, rate: Rate) -> Self {
        self.annual_rate = Some(rate);
        self
    }

    pub fn term_years(mut self, years: u32) -> Self {
        self.term_years = Some(years);
        self
    }

    pub fn compounding(mut self, compounding: Compounding) -> Self {
        self.compounding = compounding;
        self
    }

    pub fn additional_monthly_payment(mut self, amount: Money) -> Self {
        self.additional_monthly_payment = amount;
        self
    }

    pub fn rounding_digits(mut self, digits: u32) -> Self {
        self.rounding_digits = Some(digits);
        self
    }

    pub fn tax_overlay(mut self, overlay: TaxOverlay) -> Self {
        self.tax_overlay = Some(overlay);
        self
    }

    pub fn build(self) -> Result<LoanSpec> {
        let spec = LoanSpec {
            principal: self
                .principal
                .ok_or_else(|| ScheduleError::invalid_spec("principal is required"))?,
            annual_rate: self
                .annual_rate
                .ok_or_else(|| ScheduleError::invalid_spec("annual rate is required"))?,
            term_years: self
                .term_years
                .ok_or_else(|| ScheduleError::invalid_spec("term is required"))?,
            compounding: self.compounding,
            additional_monthly_payment: self.additional_monthly_payment,
            rounding_digits: self.rounding_digits.unwrap_or_else(default_rounding_digits),
            tax_overlay: self.tax_overlay,
        };

        spec.validate()?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base() -> LoanSpecBuilder {
        LoanSpec::builder()
            .principal(Money::from_major(300_000))
            .annual_rate(Rate::from_percentage(4))
            .term_years(30)
    }

    #[test]
    fn test_builder_defaults() {
        let spec = base().build().unwrap();

        assert_eq!(spec.compounding, Compounding::SemiAnnual);
        assert_eq!(spec.rounding_digits, 2);
        assert_eq!(spec.additional_monthly_payment, Money::ZERO);
        assert!(spec.tax_overlay.is_none());
        assert_eq!(spec.term_months(), 360);
    }

    #[test]
    fn test_missing_fields() {
        let result = LoanSpec::builder().annual_rate(Rate::from_percentage(4)).term_years(30).build();
        assert!(matches!(result, Err(ScheduleError::InvalidLoanSpec { .. })));

        let result = LoanSpec::builder().principal(Money::from_major(1)).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        assert!(base().principal(Money::ZERO).build().is_err());
        assert!(base().principal(Money::from_major(-10)).build().is_err());
    }

    #[test]
    fn test_rejects_zero_term() {
        let result = base().term_years(0).build();
        assert!(matches!(result, Err(ScheduleError::InvalidLoanSpec { .. })));
    }

    #[test]
    fn test_rate_bounds() {
        assert!(base().annual_rate(Rate::from_decimal(dec!(-1))).build().is_err());
        assert!(base().annual_rate(Rate::from_decimal(dec!(-2))).build().is_err());
        assert!(base().annual_rate(Rate::from_decimal(dec!(-0.5))).build().is_ok());
        assert!(base().annual_rate(Rate::ZERO).build().is_ok());
    }

    #[test]
    fn test_rejects_negative_additional_payment() {
        let result = base().additional_monthly_payment(Money::from_major(-1)).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_excess_rounding_digits() {
        assert!(base().rounding_digits(8).build().is_ok());
        assert!(base().rounding_digits(9).build().is_err());
    }

    #[test]
    fn test_presets() {
        let canadian = LoanSpec::canadian(Money::from_major(300_000), Rate::from_percentage(4), 30).unwrap();
        assert_eq!(canadian.compounding, Compounding::SemiAnnual);
        assert_eq!(canadian.rounding_digits, 2);

        let overlay = TaxOverlay::new(Money::from_major(500));
        let dutch = LoanSpec::dutch(Money::from_major(300_000), Rate::from_percentage(4), 30, overlay).unwrap();
        assert_eq!(dutch.compounding, Compounding::Annual);
        assert_eq!(dutch.rounding_digits, 0);
        assert_eq!(dutch.tax_overlay, Some(overlay));
    }

    #[test]
    fn test_from_json_defaults() {
        let json = r#"{
            "principal": "250000",
            "annual_rate": "0.035",
            "term_years": 25
        }"#;

        let spec = LoanSpec::from_json(json).unwrap();
        assert_eq!(spec.principal, Money::from_major(250_000));
        assert_eq!(spec.annual_rate, Rate::from_decimal(dec!(0.035)));
        assert_eq!(spec.compounding, Compounding::SemiAnnual);
        assert_eq!(spec.rounding_digits, 2);
        assert!(spec.tax_overlay.is_none());
    }

    #[test]
    fn test_from_json_full() {
        let json = r#"{
            "principal": "400000",
            "annual_rate": "0.045",
            "term_years": 30,
            "compounding": "annual",
            "additional_monthly_payment": "250",
            "rounding_digits": 0,
            "tax_overlay": {
                "fictitious_monthly_income": "150",
                "deduction_rate": "0.3707"
            }
        }"#;

        let spec = LoanSpec::from_json(json).unwrap();
        assert_eq!(spec.compounding, Compounding::Annual);
        assert_eq!(spec.additional_monthly_payment, Money::from_major(250));

        let overlay = spec.tax_overlay.unwrap();
        assert_eq!(overlay.fictitious_monthly_income, Money::from_major(150));
        assert_eq!(overlay.deduction_rate, Rate::from_decimal(dec!(0.3707)));
    }

    #[test]
    fn test_from_json_validates() {
        let json = r#"{ "principal": "-5", "annual_rate": "0.04", "term_years": 30 }"#;
        assert!(matches!(
            LoanSpec::from_json(json),
            Err(ScheduleError::InvalidLoanSpec { .. })
        ));

        let malformed = r#"{ "principal": "abc" }"#;
        assert!(matches!(
            LoanSpec::from_json(malformed),
            Err(ScheduleError::Serialization(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let spec = base()
            .compounding(Compounding::SimpleMonthly)
            .additional_monthly_payment(Money::from_major(100))
            .build()
            .unwrap();

        let json = spec.to_json().unwrap();
        assert_eq!(LoanSpec::from_json(&json).unwrap(), spec);
    }
}
