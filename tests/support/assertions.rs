use rust_decimal::Decimal;

use cryptogap::application::CycleReport;

pub fn assert_decimal_near(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

/// Symbols of the report's opportunities, best first.
pub fn ranked_symbols(report: &CycleReport) -> Vec<String> {
    report
        .opportunities
        .iter()
        .map(|o| o.candidate().symbol().to_string())
        .collect()
}
