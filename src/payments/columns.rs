//! columnar view of a schedule, the shape the web layer returns
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::Result;

use super::amortization::PeriodRecord;

/// one vector per record field, aligned by period
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleColumns {
    /// id of the schedule the columns were taken from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<Uuid>,
    pub period_index: Vec<u32>,
    pub date: Vec<NaiveDate>,
    pub begin_balance: Vec<Money>,
    pub payment: Vec<Money>,
    pub principal_component: Vec<Money>,
    pub interest_component: Vec<Money>,
    pub additional_payment: Vec<Money>,
    pub end_balance: Vec<Money>,
    pub total_payment: Vec<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_deduction: Option<Vec<Money>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_interest: Option<Vec<Money>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_payment_after_tax: Option<Vec<Money>>,
}

impl ScheduleColumns {
    /// tax columns appear only if every record carries tax figures
    pub fn from_records(records: &[PeriodRecord]) -> Self {
        let with_tax = !records.is_empty() && records.iter().all(|r| r.tax.is_some());
        let tax_column = |pick: fn(&PeriodRecord) -> Option<Money>| {
            with_tax.then(|| records.iter().filter_map(pick).collect::<Vec<_>>())
        };

        ScheduleColumns {
            schedule_id: None,
            period_index: records.iter().map(|r| r.period_index).collect(),
            date: records.iter().map(|r| r.date).collect(),
            begin_balance: records.iter().map(|r| r.begin_balance).collect(),
            payment: records.iter().map(|r| r.payment).collect(),
            principal_component: records.iter().map(|r| r.principal_component).collect(),
            interest_component: records.iter().map(|r| r.interest_component).collect(),
            additional_payment: records.iter().map(|r| r.additional_payment).collect(),
            end_balance: records.iter().map(|r| r.end_balance).collect(),
            total_payment: records.iter().map(|r| r.total_payment).collect(),
            tax_deduction: tax_column(PeriodRecord::tax_deduction),
            net_interest: tax_column(PeriodRecord::net_interest),
            total_payment_after_tax: tax_column(PeriodRecord::total_payment_after_tax),
        }
    }

    pub fn with_schedule_id(mut self, id: Uuid) -> Self {
        self.schedule_id = Some(id);
        self
    }

    pub fn len(&self) -> usize {
        self.period_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.period_index.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
