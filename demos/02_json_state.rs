/// json state - serialization for debugging and persistence
use flat_loan_billing_rs::chrono::{Duration, TimeZone, Utc};
use flat_loan_billing_rs::{
    CreateLoanRequest, DelinquencyView, Loan, LoanId, LoanService, OutstandingView, PaymentView,
    SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== json state serialization ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let mut service = LoanService::in_memory();

    let id = LoanId::new("L1")?;
    let request = CreateLoanRequest::parse(5_000_000, None, "2025-08-01")?;
    let loan = service.create_loan_with_id(id.clone(), request, &time)?;

    // stage 1: payment result
    let receipt = service.make_payment(&id, loan.weekly_due, &time)?;
    println!("payment:     {}", serde_json::to_string(&PaymentView::from(receipt))?);

    // stage 2: outstanding
    let outstanding = OutstandingView { outstanding: service.outstanding(&id)? };
    println!("outstanding: {}", serde_json::to_string(&outstanding)?);

    // stage 3: three weeks later with nothing more paid
    controller.advance(Duration::days(21));
    let status = service.delinquency(&id, &time)?;
    println!("delinquency: {}", serde_json::to_string(&DelinquencyView::from(status))?);

    // stage 4: stored form survives a round trip
    let stored = serde_json::to_string(&service.get_loan(&id)?)?;
    let restored: Loan = serde_json::from_str(&stored)?;
    println!("\nrestored loan {} with {} of 50 weeks paid", restored.id, restored.paid_count);

    // stage 5: event log
    println!("\nevents:");
    println!("{}", serde_json::to_string_pretty(service.events())?);

    Ok(())
}
