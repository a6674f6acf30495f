/// dutch mortgage - buy a house and apply the mortgage interest deduction
use mortgage_amortization_rs::{
    AmortizationEngine, AmortizationSchedule, House, LoanSpec, Money, Rate, SafeTimeProvider,
    TimeSource,
};
use mortgage_amortization_rs::chrono::{TimeZone, Utc};
use mortgage_amortization_rs::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== dutch tax overlay ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 6, 12, 0, 0, 0).unwrap()
    ));

    let house = House::new(
        Money::from_major(450_000),
        Money::from_major(420_000),
        Rate::from_decimal(Decimal::new(45, 4)), // 0.45% eigenwoningforfait
    );
    let purchase = house.buy(Money::from_major(50_000), None)?;
    println!("mortgage: {}, cash up front: {}", purchase.mortgage, purchase.cash);
    println!("fictitious monthly income: {}\n", house.monthly_fictitious_income());

    let spec = LoanSpec::dutch(purchase.mortgage, Rate::from_bps(410), 30, house.tax_overlay())?;
    let schedule = AmortizationSchedule::generate(&AmortizationEngine::new(&time), &spec)?;

    for record in schedule.records.iter().take(6) {
        println!(
            "{}  payment {:>5}  interest {:>5}  deduction {:>5}  after tax {:>5}",
            record.date,
            record.payment,
            record.interest_component,
            record.tax_deduction().unwrap_or_default(),
            record.total_payment_after_tax().unwrap_or_default(),
        );
    }

    println!("\ntotal interest: {}", schedule.total_interest);
    if let Some(deduction) = schedule.total_tax_deduction {
        println!("total deduction: {}", deduction);
    }

    Ok(())
}
