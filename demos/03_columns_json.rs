/// columns json - the record set a web handler returns
use mortgage_amortization_rs::{
    AmortizationEngine, AmortizationSchedule, LoanSpec, MonthlyOutflows, SafeTimeProvider,
    TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let request = r#"{
        "principal": "25000",
        "annual_rate": "0.05",
        "term_years": 1,
        "compounding": "simple_monthly",
        "additional_monthly_payment": "500"
    }"#;

    let spec = LoanSpec::from_json(request)?;
    let time = SafeTimeProvider::new(TimeSource::System);
    let schedule = AmortizationSchedule::generate(&AmortizationEngine::new(&time), &spec)?;

    println!("{}", schedule.columns().to_json_pretty()?);

    let outflows = schedule.monthly_outflows();
    println!("\nmonthly outflows fed to the simulation: {:?}", outflows);

    Ok(())
}
