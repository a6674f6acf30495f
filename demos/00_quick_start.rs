/// quick start - minimal example to get started
use mortgage_amortization_rs::{amortize, LoanSpec, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a $300,000 mortgage at 4% over 30 years, compounded semiannually
    let spec = LoanSpec::canadian(Money::from_major(300_000), Rate::from_percentage(4), 30)?;

    // print the first year
    for record in amortize(&spec)?.take(12) {
        let record = record?;
        println!(
            "{} #{:>3}  paid {:>9}  interest {:>8}  principal {:>8}  balance {:>10}",
            record.date,
            record.period_index,
            record.payment,
            record.interest_component,
            record.principal_component,
            record.end_balance,
        );
    }

    Ok(())
}
