pub mod config;
pub mod decimal;
pub mod errors;
pub mod house;
pub mod interest;
pub mod payments;

// re-export key types
pub use config::{LoanSpec, LoanSpecBuilder};
pub use decimal::{Money, Rate};
pub use errors::{Result, ScheduleError};
pub use house::{House, Purchase};
pub use interest::{Compounding, DeductionEngine, TaxDeduction, TaxOverlay};
pub use payments::{
    aggregate_to_monthly, amortize, required_monthly_payment, AmortizationEngine,
    AmortizationSchedule, MonthlyOutflows, MonthlySummary, PeriodRecord, Schedule,
    ScheduleColumns,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
