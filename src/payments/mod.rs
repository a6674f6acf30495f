pub mod aggregation;
pub mod amortization;
pub mod columns;

use crate::decimal::Money;

pub use aggregation::{aggregate_to_monthly, MonthlySummary};
pub use amortization::{
    amortize, annuity_payment, first_of_next_month, required_monthly_payment,
    AmortizationEngine, AmortizationSchedule, PeriodRecord, Schedule,
};
pub use columns::ScheduleColumns;

/// monthly cash leaving the owner's pocket, the leg a rent-vs-buy simulation consumes
pub trait MonthlyOutflows {
    /// after-tax total when a deduction applies, otherwise payment plus extra principal
    fn monthly_outflows(&self) -> Vec<Money>;
}

impl MonthlyOutflows for [PeriodRecord] {
    fn monthly_outflows(&self) -> Vec<Money> {
        self.iter()
            .map(|r| r.total_payment_after_tax().unwrap_or(r.total_payment))
            .collect()
    }
}

impl MonthlyOutflows for AmortizationSchedule {
    fn monthly_outflows(&self) -> Vec<Money> {
        self.records.monthly_outflows()
    }
}

impl MonthlyOutflows for [MonthlySummary] {
    fn monthly_outflows(&self) -> Vec<Money> {
        self.iter()
            .map(|s| s.tax.map(|t| t.total_payment_after_tax).unwrap_or(s.total_payment))
            .collect()
    }
}
