use clap::Args;
use serde_json::Value;

use loan_schedule_core::loan::{Loan, RateOverride};
use loan_schedule_core::schedule;

use crate::input;

/// Arguments for schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to a loan JSON file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal in minor currency units (cents)
    #[arg(long)]
    pub amount: Option<i64>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Nominal annual interest rate in basis points
    #[arg(long)]
    pub interest_rate: Option<u32>,

    /// Default annual index rate in basis points
    #[arg(long, default_value_t = 0)]
    pub default_index_rate: u32,

    /// Index-rate override as SEGMENT=RATE_BP, repeatable
    #[arg(long = "override", value_name = "SEGMENT=RATE")]
    pub overrides: Vec<String>,
}

/// Arguments for the level-payment calculation
#[derive(Args)]
pub struct AnnuityArgs {
    /// Path to a loan JSON file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal in minor currency units (cents)
    #[arg(long)]
    pub amount: Option<i64>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Nominal annual interest rate in basis points
    #[arg(long, default_value_t = 0)]
    pub interest_rate: u32,
}

/// Arguments for loan validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to a loan JSON file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: Loan = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let mut loan = Loan::new()
            .with_amount(args.amount.ok_or("--amount is required (or provide --input)")?)
            .with_term(args.term.ok_or("--term is required (or provide --input)")?)
            .with_interest_rate(
                args.interest_rate
                    .ok_or("--interest-rate is required (or provide --input)")?,
            )
            .with_default_index_rate(args.default_index_rate);
        for override_arg in &args.overrides {
            loan.add_override(parse_override(override_arg)?);
        }
        loan
    };

    let result = schedule::analyze_schedule(&loan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_annuity(args: AnnuityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: Loan = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        Loan::new()
            .with_amount(args.amount.ok_or("--amount is required (or provide --input)")?)
            .with_term(args.term.ok_or("--term is required (or provide --input)")?)
            .with_interest_rate(args.interest_rate)
    };

    let result = schedule::analyze_annuity(&loan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: Loan = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input is required (or pipe a loan document to stdin)".into());
    };

    loan.validate()?;
    Ok(serde_json::json!({
        "valid": true,
        "overrides": loan.overrides().len(),
    }))
}

/// Parse an override flag of the form `SEGMENT=RATE_BP`, e.g. `6=410`.
fn parse_override(raw: &str) -> Result<RateOverride, Box<dyn std::error::Error>> {
    let (segment, rate) = raw
        .split_once('=')
        .ok_or_else(|| format!("Invalid override '{}': expected SEGMENT=RATE", raw))?;
    Ok(RateOverride {
        segment_number: segment
            .trim()
            .parse()
            .map_err(|_| format!("Invalid override segment in '{}'", raw))?,
        rate: rate
            .trim()
            .parse()
            .map_err(|_| format!("Invalid override rate in '{}'", raw))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override() {
        let parsed = parse_override("6=410").unwrap();
        assert_eq!(parsed.segment_number, 6);
        assert_eq!(parsed.rate, 410);
    }

    #[test]
    fn test_parse_override_with_spaces() {
        let parsed = parse_override(" 12 = 395 ").unwrap();
        assert_eq!(parsed.segment_number, 12);
        assert_eq!(parsed.rate, 395);
    }

    #[test]
    fn test_parse_override_rejects_garbage() {
        assert!(parse_override("6").is_err());
        assert!(parse_override("a=410").is_err());
        assert!(parse_override("6=x").is_err());
    }
}
