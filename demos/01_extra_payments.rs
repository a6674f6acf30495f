/// extra payments - how additional principal shortens the schedule
use mortgage_amortization_rs::chrono::NaiveDate;
use mortgage_amortization_rs::{
    AmortizationEngine, AmortizationSchedule, Compounding, LoanSpec, Money, Rate,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let engine = AmortizationEngine::starting(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

    println!("=== extra payments ===\n");
    for extra in [0, 100, 250, 500, 1_000] {
        let spec = LoanSpec::builder()
            .principal(Money::from_major(300_000))
            .annual_rate(Rate::from_bps(450))
            .term_years(30)
            .compounding(Compounding::SemiAnnual)
            .additional_monthly_payment(Money::from_major(extra))
            .build()?;

        let schedule = AmortizationSchedule::generate(&engine, &spec)?;
        println!(
            "extra {:>5}: {:>3} payments, paid off {}, total interest {}",
            extra,
            schedule.len(),
            schedule.payoff_date().map(|d| d.to_string()).unwrap_or_default(),
            schedule.total_interest,
        );
    }

    Ok(())
}
