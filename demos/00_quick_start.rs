/// quick start - minimal example to get started
use flat_loan_billing_rs::chrono::{TimeZone, Utc};
use flat_loan_billing_rs::{CreateLoanRequest, LoanService, LoanView, Money, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 8, 15, 9, 0, 0).unwrap()
    ));
    let mut service = LoanService::in_memory();

    // 5,000,000 at 10% flat, repaid over 50 weeks
    let request = CreateLoanRequest::parse(5_000_000, Some("0.10"), "2025-08-15")?;
    let loan = service.create_loan(request, &time)?;

    // pay the first week
    let receipt = service.make_payment(&loan.id, Money::from_minor(110_000), &time)?;
    println!("paid week {}, {} left", receipt.paid_week, receipt.remaining_outstanding);

    // print current state
    let loan = service.get_loan(&loan.id)?;
    println!("{}", LoanView::from_loan(&loan).to_json_pretty()?);

    Ok(())
}
