use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};

/// share of (fictitious income - interest) that is deductible, Dutch 2022 top bracket
pub const DEFAULT_DEDUCTION_RATE: Rate = Rate::from_decimal(dec!(0.3707));

/// tax deduction overlay configuration
///
/// Some jurisdictions credit the owner with a notional income from the house
/// and let them deduct mortgage interest against it. The overlay turns each
/// period's interest into a deduction figure and a net cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxOverlay {
    /// notional monthly income the house is assumed to generate
    pub fictitious_monthly_income: Money,
    /// fraction of (income - interest) that is deductible
    pub deduction_rate: Rate,
}

impl TaxOverlay {
    pub fn new(fictitious_monthly_income: Money) -> Self {
        Self {
            fictitious_monthly_income,
            deduction_rate: DEFAULT_DEDUCTION_RATE,
        }
    }

    pub fn with_deduction_rate(mut self, deduction_rate: Rate) -> Self {
        self.deduction_rate = deduction_rate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let rate = self.deduction_rate.as_decimal();
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(ScheduleError::invalid_spec(format!(
                "deduction rate {} must lie between 0% and 100%",
                self.deduction_rate
            )));
        }
        Ok(())
    }
}

/// tax figures for one period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDeduction {
    /// negative when interest exceeds the fictitious income
    pub tax_deduction: Money,
    pub net_interest: Money,
    pub total_payment_after_tax: Money,
}

/// applies a tax overlay period by period
#[derive(Debug, Clone, Copy)]
pub struct DeductionEngine {
    overlay: TaxOverlay,
    rounding_digits: u32,
}

impl DeductionEngine {
    pub fn new(overlay: TaxOverlay, rounding_digits: u32) -> Self {
        Self {
            overlay,
            rounding_digits,
        }
    }

    /// deduction for a period given its (already rounded) interest and outflows
    pub fn apply(&self, interest: Money, payment: Money, additional_payment: Money) -> TaxDeduction {
        let taxable_base = self.overlay.fictitious_monthly_income - interest;
        let tax_deduction = taxable_base.scale(self.overlay.deduction_rate, self.rounding_digits);

        TaxDeduction {
            tax_deduction,
            net_interest: interest + tax_deduction,
            total_payment_after_tax: payment + additional_payment + tax_deduction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate() {
        let overlay = TaxOverlay::new(Money::from_major(500));
        assert_eq!(overlay.deduction_rate.as_decimal(), dec!(0.3707));
        assert!(overlay.validate().is_ok());
    }

    #[test]
    fn test_interest_above_income_reduces_net_interest() {
        let overlay = TaxOverlay::new(Money::from_major(500));
        let engine = DeductionEngine::new(overlay, 0);

        let interest = Money::from_major(900);
        let result = engine.apply(interest, Money::from_major(1_400), Money::ZERO);

        // 0.3707 * (500 - 900) = -148.28
        assert_eq!(result.tax_deduction, Money::from_major(-148));
        assert_eq!(result.net_interest, Money::from_major(752));
        assert!(result.net_interest < interest);
        assert_eq!(result.total_payment_after_tax, Money::from_major(1_252));
    }

    #[test]
    fn test_two_digit_rounding() {
        let overlay = TaxOverlay::new(Money::from_major(500));
        let engine = DeductionEngine::new(overlay, 2);

        let result = engine.apply(Money::from_major(900), Money::from_major(1_400), Money::from_major(100));

        assert_eq!(result.tax_deduction, Money::from_str_exact("-148.28").unwrap());
        assert_eq!(result.net_interest, Money::from_str_exact("751.72").unwrap());
        assert_eq!(
            result.total_payment_after_tax,
            Money::from_str_exact("1351.72").unwrap()
        );
    }

    #[test]
    fn test_income_above_interest_is_a_surcharge() {
        let overlay = TaxOverlay::new(Money::from_major(1_000))
            .with_deduction_rate(Rate::from_percentage(50));
        let engine = DeductionEngine::new(overlay, 2);

        let result = engine.apply(Money::from_major(200), Money::from_major(800), Money::ZERO);

        assert_eq!(result.tax_deduction, Money::from_major(400));
        assert_eq!(result.net_interest, Money::from_major(600));
    }

    #[test]
    fn test_rate_out_of_range() {
        let overlay = TaxOverlay::new(Money::from_major(500))
            .with_deduction_rate(Rate::from_decimal(dec!(1.2)));
        assert!(matches!(
            overlay.validate(),
            Err(ScheduleError::InvalidLoanSpec { .. })
        ));

        let overlay = TaxOverlay::new(Money::from_major(500))
            .with_deduction_rate(Rate::from_decimal(dec!(-0.1)));
        assert!(overlay.validate().is_err());
    }
}
