/// scenarios - on-time payer, two skipped weeks, full payoff
use flat_loan_billing_rs::chrono::{Duration, TimeZone, Utc};
use flat_loan_billing_rs::{
    CreateLoanRequest, ErrorView, LoanService, Money, SafeTimeProvider, TimeSource,
};
use tracing_subscriber::EnvFilter;

fn request() -> Result<CreateLoanRequest, flat_loan_billing_rs::LoanError> {
    CreateLoanRequest::parse(5_000_000, Some("0.10"), "2025-08-15")
}

fn on_time(weeks: u32) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== on time: {} weeks ===", weeks);

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 8, 15, 10, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let mut service = LoanService::in_memory();
    let loan = service.create_loan(request()?, &time)?;

    for _ in 0..weeks {
        let receipt = service.make_payment(&loan.id, loan.weekly_due, &time)?;
        let status = service.delinquency(&loan.id, &time)?;
        println!(
            "week {:>2}: paid week {:>2}, outstanding {:>8}, delinquent {}",
            status.observed_week, receipt.paid_week, receipt.remaining_outstanding, status.delinquent
        );
        controller.advance(Duration::days(7));
    }

    Ok(())
}

fn skip_two_weeks() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== skip two weeks ===");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 8, 15, 10, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let mut service = LoanService::in_memory();
    let loan = service.create_loan(request()?, &time)?;

    controller.advance(Duration::days(14));
    let status = service.delinquency(&loan.id, &time)?;
    println!(
        "after two missed weeks: observed week {}, delinquent {}, streak {}",
        status.observed_week, status.delinquent, status.streak
    );

    // catch up weeks 1 and 2
    service.make_payment(&loan.id, loan.weekly_due, &time)?;
    service.make_payment(&loan.id, loan.weekly_due, &time)?;
    let status = service.delinquency(&loan.id, &time)?;
    println!("after catching up: delinquent {}", status.delinquent);

    // a short payment is rejected with guidance
    if let Err(e) = service.make_payment(&loan.id, Money::from_minor(100_000), &time) {
        println!("{}", ErrorView::from_error(&e).to_json_pretty()?);
    }

    Ok(())
}

fn full_payoff() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== full payoff ===");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 8, 15, 10, 0, 0).unwrap()
    ));
    let mut service = LoanService::in_memory();
    let loan = service.create_loan(request()?, &time)?;

    for _ in 0..50 {
        service.make_payment(&loan.id, loan.weekly_due, &time)?;
    }
    println!("outstanding after 50 payments: {}", service.outstanding(&loan.id)?);

    match service.make_payment(&loan.id, loan.weekly_due, &time) {
        Ok(_) => println!("unexpected: 51st payment accepted"),
        Err(e) => println!("51st payment rejected: {} ({})", e, e.code()),
    }

    for event in service.take_events().iter().rev().take(2) {
        println!("{:?}", event);
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    on_time(4)?;
    skip_two_weeks()?;
    full_payoff()?;

    Ok(())
}
