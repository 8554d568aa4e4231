use napi::Result as NapiResult;
use napi_derive::napi;

use loan_schedule_core::loan::Loan;
use loan_schedule_core::schedule;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_loan(input_json: &str) -> NapiResult<Loan> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn payment_schedule(input_json: String) -> NapiResult<String> {
    let loan = parse_loan(&input_json)?;
    let output = schedule::analyze_schedule(&loan).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn annuity_payment(input_json: String) -> NapiResult<String> {
    let loan = parse_loan(&input_json)?;
    let output = schedule::analyze_annuity(&loan).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_loan(input_json: String) -> NapiResult<String> {
    let loan = parse_loan(&input_json)?;
    loan.validate().map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({ "valid": true })).map_err(to_napi_error)
}
