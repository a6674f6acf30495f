use std::iter::FusedIterator;

use chrono::{Datelike, Months, NaiveDate};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::config::LoanSpec;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::interest::{DeductionEngine, TaxDeduction};

use super::aggregation::{aggregate_to_monthly, MonthlySummary};
use super::columns::ScheduleColumns;

/// one period of an amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub period_index: u32,
    /// first day of the month the payment falls in
    pub date: NaiveDate,
    pub begin_balance: Money,
    pub payment: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    pub additional_payment: Money,
    pub end_balance: Money,
    /// regular plus additional payment
    pub total_payment: Money,
    /// present only when the loan carries a tax overlay
    #[serde(flatten)]
    pub tax: Option<TaxDeduction>,
}

impl PeriodRecord {
    pub fn tax_deduction(&self) -> Option<Money> {
        self.tax.map(|t| t.tax_deduction)
    }

    pub fn net_interest(&self) -> Option<Money> {
        self.tax.map(|t| t.net_interest)
    }

    pub fn total_payment_after_tax(&self) -> Option<Money> {
        self.tax.map(|t| t.total_payment_after_tax)
    }
}

/// first day of the month following `date`
pub fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// level payment that pays `principal` off over `periods` at `periodic_rate`
///
/// `principal * r / (1 - (1 + r)^-n)`, or `principal / n` when the rate is
/// zero, rounded to `rounding_digits`.
pub fn annuity_payment(
    principal: Money,
    periodic_rate: Rate,
    periods: u32,
    rounding_digits: u32,
) -> Result<Money> {
    if periods == 0 {
        return Err(ScheduleError::invalid_spec("cannot amortize over zero periods"));
    }

    let p = principal.as_decimal();
    let n = Decimal::from(periods);

    if periodic_rate.is_zero() {
        return Ok(Money::from_decimal((p / n).round_dp(rounding_digits)));
    }

    let r = periodic_rate.as_decimal();
    let growth = (Decimal::ONE + r)
        .checked_powu(periods as u64)
        .ok_or_else(|| {
            ScheduleError::calculation(format!(
                "compounding {} over {} periods overflows",
                periodic_rate, periods
            ))
        })?;

    let no_payment = || {
        ScheduleError::calculation(format!(
            "no level payment exists for periodic rate {} over {} periods",
            periodic_rate, periods
        ))
    };

    // (1 + r)^n underflows to zero for steep negative rates
    let discount = Decimal::ONE
        .checked_div(growth)
        .and_then(|inverse| Decimal::ONE.checked_sub(inverse))
        .ok_or_else(no_payment)?;
    let payment = p
        .checked_mul(r)
        .and_then(|interest| interest.checked_div(discount))
        .ok_or_else(no_payment)?;

    Ok(Money::from_decimal(payment.round_dp(rounding_digits)))
}

/// required level monthly payment for a loan
pub fn required_monthly_payment(spec: &LoanSpec) -> Result<Money> {
    spec.validate()?;
    let periodic_rate = spec.compounding.periodic_rate(spec.annual_rate)?;
    annuity_payment(
        spec.principal,
        periodic_rate,
        spec.term_months(),
        spec.rounding_digits,
    )
}

/// amortize against the system clock, first payment next month
pub fn amortize(spec: &LoanSpec) -> Result<Schedule> {
    let time = SafeTimeProvider::new(TimeSource::System);
    AmortizationEngine::new(&time).amortize(spec)
}

/// produces payment schedules from loan specs
///
/// The engine only remembers the month of the first payment. Each call to
/// `amortize` builds an independent schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmortizationEngine {
    first_period: NaiveDate,
}

impl AmortizationEngine {
    /// engine whose first payment falls on the first of next month
    pub fn new(time: &SafeTimeProvider) -> Self {
        Self {
            first_period: first_of_next_month(time.now().date_naive()),
        }
    }

    /// engine with an explicit first payment month
    pub fn starting(date: NaiveDate) -> Self {
        Self {
            first_period: first_of_month(date),
        }
    }

    pub fn first_period(&self) -> NaiveDate {
        self.first_period
    }

    pub fn required_monthly_payment(&self, spec: &LoanSpec) -> Result<Money> {
        required_monthly_payment(spec)
    }

    /// lazy schedule for `spec`
    pub fn amortize(&self, spec: &LoanSpec) -> Result<Schedule> {
        spec.validate()?;
        let periodic_rate = spec.compounding.periodic_rate(spec.annual_rate)?;
        let payment = annuity_payment(
            spec.principal,
            periodic_rate,
            spec.term_months(),
            spec.rounding_digits,
        )?;

        debug!(
            principal = %spec.principal,
            annual_rate = %spec.annual_rate,
            compounding = %spec.compounding,
            periodic_rate = %periodic_rate.as_decimal(),
            payment = %payment,
            term_months = spec.term_months(),
            "starting amortization schedule"
        );

        Ok(Schedule::new(spec, periodic_rate, payment, self.first_period))
    }
}

/// lazy, finite sequence of period records
///
/// Yields `Ok` records until the balance reaches zero. If the balance is still
/// outstanding after `term_months + 1` periods it yields a single
/// `NonTerminatingSchedule` error and then ends. A schedule cannot be
/// rewound or copied part-way; ask the engine for a fresh one instead.
#[derive(Debug)]
pub struct Schedule {
    periodic_rate: Rate,
    payment: Money,
    additional: Money,
    rounding_digits: u32,
    deduction: Option<DeductionEngine>,
    first_period: NaiveDate,
    balance: Money,
    period: u32,
    max_periods: u32,
    finished: bool,
}

impl Schedule {
    fn new(spec: &LoanSpec, periodic_rate: Rate, payment: Money, first_period: NaiveDate) -> Self {
        Self {
            periodic_rate,
            payment,
            additional: spec.additional_monthly_payment,
            rounding_digits: spec.rounding_digits,
            deduction: spec
                .tax_overlay
                .map(|overlay| DeductionEngine::new(overlay, spec.rounding_digits)),
            first_period,
            balance: spec.principal,
            period: 1,
            max_periods: spec.term_months().saturating_add(1),
            finished: false,
        }
    }

    pub fn periodic_rate(&self) -> Rate {
        self.periodic_rate
    }

    /// level payment before any final-period clipping
    pub fn payment(&self) -> Money {
        self.payment
    }

    /// most periods the schedule may run before it is declared stuck
    pub fn max_periods(&self) -> u32 {
        self.max_periods
    }

    fn step(&mut self) -> Result<PeriodRecord> {
        let date = self
            .first_period
            .checked_add_months(Months::new(self.period - 1))
            .ok_or_else(|| {
                ScheduleError::calculation(format!("period {} is out of calendar range", self.period))
            })?;

        let overflow = || {
            ScheduleError::calculation(format!(
                "period {} leaves the decimal range at balance {}",
                self.period, self.balance
            ))
        };

        let begin_balance = self.balance;
        let interest = begin_balance
            .checked_scale(self.periodic_rate, self.rounding_digits)
            .ok_or_else(overflow)?;

        // the final payment never exceeds what is owed
        let owed = begin_balance.checked_add(interest).ok_or_else(overflow)?;
        let payment = self.payment.min(owed);
        let principal_component = payment.checked_sub(interest).ok_or_else(overflow)?;

        // extra principal is clipped after the regular payment is settled
        let headroom = begin_balance
            .checked_sub(principal_component)
            .ok_or_else(overflow)?;
        let additional_payment = if headroom.is_positive() {
            self.additional.min(headroom)
        } else {
            Money::ZERO
        };

        let end_balance = headroom
            .checked_sub(additional_payment)
            .ok_or_else(overflow)?;
        let tax = self
            .deduction
            .map(|engine| engine.apply(interest, payment, additional_payment));

        trace!(
            period = self.period,
            %begin_balance,
            %interest,
            %payment,
            %additional_payment,
            %end_balance,
            "amortized period"
        );

        let record = PeriodRecord {
            period_index: self.period,
            date,
            begin_balance,
            payment,
            principal_component,
            interest_component: interest,
            additional_payment,
            end_balance,
            total_payment: payment + additional_payment,
            tax,
        };

        self.period += 1;
        self.balance = end_balance;

        if !end_balance.is_positive() {
            debug!(periods = record.period_index, payoff = %date, "schedule paid off");
        }

        Ok(record)
    }
}

impl Iterator for Schedule {
    type Item = Result<PeriodRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || !self.balance.is_positive() {
            self.finished = true;
            return None;
        }

        if self.period > self.max_periods {
            self.finished = true;
            warn!(
                periods = self.max_periods,
                remaining = %self.balance,
                "schedule did not reach a zero balance"
            );
            return Some(Err(ScheduleError::NonTerminatingSchedule {
                periods: self.max_periods,
                remaining: self.balance,
            }));
        }

        let result = self.step();
        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished || !self.balance.is_positive() {
            return (0, Some(0));
        }
        // one extra slot for a possible guard error
        let remaining = self.max_periods.saturating_sub(self.period) as usize + 2;
        (1, Some(remaining))
    }
}

impl FusedIterator for Schedule {}

/// fully materialized schedule with totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// unique per generated schedule; tags its log lines and travels with its columns
    pub id: Uuid,
    pub spec: LoanSpec,
    pub periodic_rate: Rate,
    pub required_payment: Money,
    pub records: Vec<PeriodRecord>,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_additional: Money,
    /// regular plus additional payments over the whole schedule
    pub total_payment: Money,
    pub total_tax_deduction: Option<Money>,
}

impl AmortizationSchedule {
    /// run the schedule to completion; any error discards the partial result
    pub fn generate(engine: &AmortizationEngine, spec: &LoanSpec) -> Result<Self> {
        let schedule = engine.amortize(spec)?;
        let periodic_rate = schedule.periodic_rate();
        let required_payment = schedule.payment();
        let records = schedule.collect::<Result<Vec<_>>>()?;

        let total_interest: Money = records.iter().map(|r| r.interest_component).sum();
        let total_principal: Money = records.iter().map(|r| r.principal_component).sum();
        let total_additional: Money = records.iter().map(|r| r.additional_payment).sum();
        let total_payment: Money = records.iter().map(|r| r.total_payment).sum();
        let total_tax_deduction: Option<Money> = spec
            .tax_overlay
            .map(|_| records.iter().filter_map(|r| r.tax_deduction()).sum());

        let id = Uuid::new_v4();
        debug!(
            schedule_id = %id,
            periods = records.len(),
            %total_interest,
            "generated amortization schedule"
        );

        Ok(Self {
            id,
            spec: spec.clone(),
            periodic_rate,
            required_payment,
            records,
            total_interest,
            total_principal,
            total_additional,
            total_payment,
            total_tax_deduction,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// record for a 1-based period index
    pub fn get_payment(&self, period_index: u32) -> Option<&PeriodRecord> {
        let index = period_index.checked_sub(1)? as usize;
        self.records.get(index)
    }

    /// balance after a period; the principal before the first one
    pub fn balance_after_payment(&self, period_index: u32) -> Money {
        if period_index == 0 {
            return self.spec.principal;
        }
        self.get_payment(period_index)
            .map(|r| r.end_balance)
            .unwrap_or(Money::ZERO)
    }

    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    pub fn monthly_summary(&self) -> Vec<MonthlySummary> {
        aggregate_to_monthly(&self.records)
    }

    /// columnar view tagged with this schedule's id
    pub fn columns(&self) -> ScheduleColumns {
        ScheduleColumns::from_records(&self.records).with_schedule_id(self.id)
    }
}
