//! Fixed-annuity amortization with indexed rate overrides.
//!
//! The level payment is computed once, rounded once, and reused for every
//! period. Interest and index amounts are rounded to minor units before they
//! are applied, principal is the residual of `annuity - interest`, and the
//! final period pays off the remaining balance exactly. Reordering any of
//! those steps breaks the conservation invariant
//! `sum(principal) == amount`, so all math here stays in `Decimal` and
//! integer minor units.

use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Instant;

use crate::error::LoanScheduleError;
use crate::loan::Loan;
use crate::money;
use crate::types::{with_metadata, ComputationOutput, MinorUnits, Rate};
use crate::LoanScheduleResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One period of an amortization schedule.
///
/// The total is derived from the three components once, at construction; the
/// type is immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Payment {
    segment_number: u32,
    principal_payment: MinorUnits,
    interest_payment: MinorUnits,
    index_payment: MinorUnits,
    total_payment: MinorUnits,
}

impl Payment {
    pub fn new(
        segment_number: u32,
        principal_payment: MinorUnits,
        interest_payment: MinorUnits,
        index_payment: MinorUnits,
    ) -> Self {
        Self {
            segment_number,
            principal_payment,
            interest_payment,
            index_payment,
            total_payment: principal_payment + interest_payment + index_payment,
        }
    }

    /// 1-based period index.
    pub fn segment_number(&self) -> u32 {
        self.segment_number
    }

    pub fn principal_payment(&self) -> MinorUnits {
        self.principal_payment
    }

    pub fn interest_payment(&self) -> MinorUnits {
        self.interest_payment
    }

    pub fn index_payment(&self) -> MinorUnits {
        self.index_payment
    }

    /// Sum of principal, interest and index components.
    pub fn total_payment(&self) -> MinorUnits {
        self.total_payment
    }
}

/// A full schedule plus its aggregate cash flows.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOutput {
    /// Rounded level payment the schedule was built from.
    pub annuity_payment: MinorUnits,
    pub payments: Vec<Payment>,
    pub total_principal: MinorUnits,
    pub total_interest: MinorUnits,
    pub total_index: MinorUnits,
    pub total_paid: MinorUnits,
}

/// Level-payment output for callers that only need the annuity figure.
#[derive(Debug, Clone, Serialize)]
pub struct AnnuityOutput {
    pub annuity_payment: MinorUnits,
}

// ---------------------------------------------------------------------------
// Annuity payment
// ---------------------------------------------------------------------------

/// Rounded level payment for a loan.
///
/// Fails with [`LoanScheduleError::TermOutOfRange`] when the term is below 1.
pub fn annuity_payment(loan: &Loan) -> LoanScheduleResult<MinorUnits> {
    let raw = raw_annuity_payment(loan.amount(), loan.term(), loan.monthly_interest_rate())?;
    Ok(money::round_minor_units(raw))
}

/// `r*A / (1 - (1+r)^(-N))` for a positive monthly rate, `A / N` at zero.
fn raw_annuity_payment(
    amount: MinorUnits,
    term: u32,
    monthly_rate: Rate,
) -> LoanScheduleResult<Decimal> {
    if term < 1 {
        return Err(LoanScheduleError::TermOutOfRange { term });
    }

    let amount = Decimal::from(amount);
    if monthly_rate > Decimal::ZERO {
        let discount = iterative_pow_recip(Decimal::ONE + monthly_rate, term);
        Ok(monthly_rate * amount / (Decimal::ONE - discount))
    } else {
        Ok(amount / Decimal::from(term))
    }
}

/// Compute `1 / base^n` by repeated multiplication of the reciprocal, so
/// large exponents underflow towards zero instead of overflowing.
fn iterative_pow_recip(base: Decimal, n: u32) -> Decimal {
    if base.is_zero() {
        return Decimal::ZERO;
    }
    let recip = Decimal::ONE / base;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result *= recip;
    }
    result
}

// ---------------------------------------------------------------------------
// Amortization loop
// ---------------------------------------------------------------------------

/// Build the payment schedule for a loan.
///
/// A zero-amount loan yields an empty schedule regardless of term. The
/// active monthly index rate starts from the loan default and is permanently
/// replaced by each override from its segment onward, until a later override
/// replaces it again.
pub fn payment_schedule(loan: &Loan) -> LoanScheduleResult<Vec<Payment>> {
    if loan.amount() == 0 {
        return Ok(Vec::new());
    }

    let annuity = annuity_payment(loan)?;
    let monthly_interest = loan.monthly_interest_rate();
    let mut monthly_index = loan.monthly_default_index_rate();
    let mut remaining = loan.amount();

    let mut payments = Vec::with_capacity(loan.term() as usize);
    for segment_number in 1..=loan.term() {
        if let Some(rate_override) = loan.override_for_segment(segment_number) {
            monthly_index = money::monthly_rate_from_basis_points(rate_override.rate);
        }

        let interest = money::round_minor_units(Decimal::from(remaining) * monthly_interest);
        let index = money::round_minor_units(Decimal::from(remaining) * monthly_index);
        let mut principal = annuity - interest;
        if segment_number == loan.term() && principal != remaining {
            // Settle the balance exactly; rounding drift lands here.
            principal = remaining;
        }

        remaining -= principal;
        payments.push(Payment::new(segment_number, principal, interest, index));
    }

    Ok(payments)
}

// ---------------------------------------------------------------------------
// Analysis envelopes
// ---------------------------------------------------------------------------

/// Validate a loan, build its schedule and aggregate totals.
pub fn analyze_schedule(loan: &Loan) -> LoanScheduleResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    loan.validate()?;

    for rate_override in loan.overrides() {
        if rate_override.segment_number > loan.term() {
            warnings.push(format!(
                "Override for segment {} is beyond the loan term ({}) and never takes effect",
                rate_override.segment_number,
                loan.term()
            ));
        }
    }

    let payments = payment_schedule(loan)?;
    let annuity = if loan.amount() == 0 {
        0
    } else {
        annuity_payment(loan)?
    };

    if let Some(last) = payments.last() {
        let level_principal = annuity - last.interest_payment();
        let drift = level_principal - last.principal_payment();
        if drift != 0 {
            warnings.push(format!(
                "Final period principal adjusted by {} minor units to settle the balance exactly",
                drift
            ));
        }
    }

    let output = ScheduleOutput {
        annuity_payment: annuity,
        total_principal: payments.iter().map(Payment::principal_payment).sum(),
        total_interest: payments.iter().map(Payment::interest_payment).sum(),
        total_index: payments.iter().map(Payment::index_payment).sum(),
        total_paid: payments.iter().map(Payment::total_payment).sum(),
        payments,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Annuity Amortization with Indexed Rate Overrides",
        loan,
        warnings,
        elapsed,
        output,
    ))
}

/// Validate a loan and compute just its level payment.
pub fn analyze_annuity(loan: &Loan) -> LoanScheduleResult<ComputationOutput<AnnuityOutput>> {
    let start = Instant::now();

    loan.validate()?;
    let annuity = annuity_payment(loan)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Annuity Level Payment",
        loan,
        Vec::new(),
        elapsed,
        AnnuityOutput {
            annuity_payment: annuity,
        },
    ))
}
