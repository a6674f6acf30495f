use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::LoanSpecBuilder;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::interest::TaxOverlay;

/// buyer costs (legal fees, inspection, appraisal) when none are given, as a share of the price
pub const DEFAULT_PURCHASE_COST_RATE: Rate = Rate::from_decimal(dec!(0.05));

/// a house that can be bought with a mortgage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    /// purchase price including any overbid
    pub value: Money,
    /// cadastral (WOZ) value the tax authority assesses
    pub woz_value: Money,
    /// yearly rate applied to the WOZ value to get the fictitious income
    pub eigenwoningforfait: Rate,
}

/// outcome of buying a house
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// amount to be financed
    pub mortgage: Money,
    /// cash needed up front, down payment plus costs
    pub cash: Money,
}

impl House {
    pub fn new(value: Money, woz_value: Money, eigenwoningforfait: Rate) -> Self {
        Self {
            value,
            woz_value,
            eigenwoningforfait,
        }
    }

    /// notional monthly income the house generates for tax purposes
    pub fn monthly_fictitious_income(&self) -> Money {
        Money::from_decimal(
            self.woz_value.as_decimal() * self.eigenwoningforfait.as_decimal() / dec!(12),
        )
    }

    /// deduction overlay at the default rate for this house
    pub fn tax_overlay(&self) -> TaxOverlay {
        TaxOverlay::new(self.monthly_fictitious_income())
    }

    pub fn buy(&self, down_payment: Money, additional_costs: Option<Money>) -> Result<Purchase> {
        if down_payment.is_negative() {
            return Err(ScheduleError::InvalidPurchase {
                message: format!("down payment cannot be negative, got {}", down_payment),
            });
        }

        if down_payment > self.value {
            return Err(ScheduleError::InvalidPurchase {
                message: format!(
                    "down payment {} exceeds the house value {}",
                    down_payment, self.value
                ),
            });
        }

        let costs = match additional_costs {
            Some(costs) if costs.is_negative() => {
                return Err(ScheduleError::InvalidPurchase {
                    message: format!("additional costs cannot be negative, got {}", costs),
                });
            }
            Some(costs) => costs,
            None => Money::from_decimal(
                self.value.as_decimal() * DEFAULT_PURCHASE_COST_RATE.as_decimal(),
            ),
        };

        Ok(Purchase {
            mortgage: self.value - down_payment,
            cash: down_payment + costs,
        })
    }

    /// sale proceeds, closing costs are not modelled
    pub fn sell(&self) -> Money {
        self.value
    }
}

impl Purchase {
    /// builder pre-filled with the financed amount
    pub fn loan_spec(&self, term_years: u32, annual_rate: Rate) -> LoanSpecBuilder {
        LoanSpecBuilder::new()
            .principal(self.mortgage)
            .annual_rate(annual_rate)
            .term_years(term_years)
    }
}
