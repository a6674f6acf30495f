use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::interest::TaxDeduction;

use super::amortization::PeriodRecord;

/// schedule figures resampled to one row per calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub date: NaiveDate,
    /// largest opening balance in the month
    pub begin_balance: Money,
    pub payment: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    pub additional_payment: Money,
    /// smallest closing balance in the month
    pub end_balance: Money,
    pub total_payment: Money,
    /// summed tax figures, only when every record in the month has them
    #[serde(flatten)]
    pub tax: Option<TaxDeduction>,
}

impl MonthlySummary {
    fn open(record: &PeriodRecord) -> Self {
        Self {
            date: record.date,
            begin_balance: record.begin_balance,
            payment: record.payment,
            principal_component: record.principal_component,
            interest_component: record.interest_component,
            additional_payment: record.additional_payment,
            end_balance: record.end_balance,
            total_payment: record.payment + record.additional_payment,
            tax: record.tax,
        }
    }

    fn absorb(&mut self, record: &PeriodRecord) {
        self.begin_balance = self.begin_balance.max(record.begin_balance);
        self.payment += record.payment;
        self.principal_component += record.principal_component;
        self.interest_component += record.interest_component;
        self.additional_payment += record.additional_payment;
        self.end_balance = self.end_balance.min(record.end_balance);
        self.total_payment = self.payment + self.additional_payment;

        self.tax = match (self.tax, record.tax) {
            (Some(acc), Some(next)) => Some(TaxDeduction {
                tax_deduction: acc.tax_deduction + next.tax_deduction,
                net_interest: acc.net_interest + next.net_interest,
                total_payment_after_tax: acc.total_payment_after_tax + next.total_payment_after_tax,
            }),
            _ => None,
        };
    }
}

/// group records by month: max opening balance, summed flows, min closing balance
///
/// The engine emits one record per month, so for its output this is an
/// identity. Rows come back in date order.
pub fn aggregate_to_monthly(records: &[PeriodRecord]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<NaiveDate, MonthlySummary> = BTreeMap::new();

    for record in records {
        months
            .entry(record.date)
            .and_modify(|summary| summary.absorb(record))
            .or_insert_with(|| MonthlySummary::open(record));
    }

    months.into_values().collect()
}
