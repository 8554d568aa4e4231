//! Loan aggregate: the financial parameters of a loan plus an ordered,
//! loan-owned collection of index-rate overrides keyed by segment number.
//!
//! A loan starts zeroed and is populated by its owner before any schedule is
//! computed. Duplicate override segment numbers are representable; they are a
//! data-integrity violation reported by [`Loan::validate`], not prevented at
//! insertion time.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::LoanScheduleError;
use crate::money;
use crate::types::{BasisPoints, MinorUnits, Rate};
use crate::LoanScheduleResult;

/// Largest amount representable in the data model: 10 digits of minor units.
const MAX_AMOUNT: MinorUnits = 9_999_999_999;

/// Field cap for terms, rates and segment numbers: 5 digits.
const MAX_FIVE_DIGITS: u32 = 99_999;

/// An index-rate override for one segment of a loan.
///
/// Each override belongs to exactly one loan; moving one between loans goes
/// through [`Loan::adopt_override`] so it never belongs to both at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOverride {
    /// 1-based segment the override takes effect from.
    pub segment_number: u32,
    /// Annual index rate in basis points.
    pub rate: BasisPoints,
}

/// A loan: principal, term, contractual interest rate, and the index-rate
/// schedule (default rate plus per-segment overrides).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// Principal in minor currency units (cents).
    amount: MinorUnits,
    /// Term in months.
    term: u32,
    /// Nominal annual interest rate in basis points.
    interest_rate: BasisPoints,
    /// Annual index rate in basis points, used until an override takes over.
    default_index_rate: BasisPoints,
    /// Overrides in insertion order. Insertion order is the validation scan
    /// order and decides which of two same-segment overrides wins a lookup.
    #[serde(default)]
    overrides: Vec<RateOverride>,
}

impl Loan {
    /// An all-zero loan, to be populated by the caller.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amount(mut self, amount: MinorUnits) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_term(mut self, term: u32) -> Self {
        self.term = term;
        self
    }

    pub fn with_interest_rate(mut self, interest_rate: BasisPoints) -> Self {
        self.interest_rate = interest_rate;
        self
    }

    pub fn with_default_index_rate(mut self, default_index_rate: BasisPoints) -> Self {
        self.default_index_rate = default_index_rate;
        self
    }

    pub fn with_override(mut self, rate_override: RateOverride) -> Self {
        self.overrides.push(rate_override);
        self
    }

    pub fn amount(&self) -> MinorUnits {
        self.amount
    }

    pub fn term(&self) -> u32 {
        self.term
    }

    pub fn interest_rate(&self) -> BasisPoints {
        self.interest_rate
    }

    pub fn default_index_rate(&self) -> BasisPoints {
        self.default_index_rate
    }

    /// Monthly fractional rate for the contractual interest rate.
    pub fn monthly_interest_rate(&self) -> Rate {
        money::monthly_rate_from_basis_points(self.interest_rate)
    }

    /// Monthly fractional rate for the default index rate.
    pub fn monthly_default_index_rate(&self) -> Rate {
        money::monthly_rate_from_basis_points(self.default_index_rate)
    }

    /// Append an override. Duplicates are accepted here and rejected by
    /// [`Loan::validate`].
    pub fn add_override(&mut self, rate_override: RateOverride) {
        self.overrides.push(rate_override);
    }

    /// Detach and return the first override with the given segment number.
    pub fn remove_override(&mut self, segment_number: u32) -> Option<RateOverride> {
        let idx = self
            .overrides
            .iter()
            .position(|o| o.segment_number == segment_number)?;
        Some(self.overrides.remove(idx))
    }

    /// Move an override from `donor` into this loan. The override leaves the
    /// donor and joins this loan in a single step; there is no state in which
    /// it belongs to both loans or to neither. Returns false when the donor
    /// has no override for that segment.
    pub fn adopt_override(&mut self, donor: &mut Loan, segment_number: u32) -> bool {
        match donor.remove_override(segment_number) {
            Some(rate_override) => {
                self.overrides.push(rate_override);
                true
            }
            None => false,
        }
    }

    /// First override for the segment, in insertion order.
    pub fn override_for_segment(&self, segment_number: u32) -> Option<&RateOverride> {
        self.overrides
            .iter()
            .find(|o| o.segment_number == segment_number)
    }

    /// Overrides in insertion order.
    pub fn overrides(&self) -> &[RateOverride] {
        &self.overrides
    }

    /// Data-integrity checks: field ranges and override uniqueness.
    ///
    /// Duplicate segment numbers are reported for the first segment number
    /// seen twice, with its position in insertion order.
    pub fn validate(&self) -> LoanScheduleResult<()> {
        if self.amount < 0 {
            return Err(LoanScheduleError::InvalidInput {
                field: "amount".into(),
                reason: "Amount should be greater than or equal to 0".into(),
            });
        }
        if self.amount > MAX_AMOUNT {
            return Err(LoanScheduleError::InvalidInput {
                field: "amount".into(),
                reason: "Amount is too big. It should have 10 digits or less".into(),
            });
        }
        if self.term > MAX_FIVE_DIGITS {
            return Err(LoanScheduleError::InvalidInput {
                field: "term".into(),
                reason: "Term is too big. It should have 5 digits or less".into(),
            });
        }
        if self.interest_rate > MAX_FIVE_DIGITS {
            return Err(LoanScheduleError::InvalidInput {
                field: "interest_rate".into(),
                reason: "Interest rate is too big. It should have 5 digits or less".into(),
            });
        }
        if self.default_index_rate > MAX_FIVE_DIGITS {
            return Err(LoanScheduleError::InvalidInput {
                field: "default_index_rate".into(),
                reason: "Default index rate is too big. It should have 5 digits or less".into(),
            });
        }

        for rate_override in &self.overrides {
            if rate_override.segment_number == 0 {
                return Err(LoanScheduleError::InvalidInput {
                    field: "segment_number".into(),
                    reason: "Segment number should be greater than 0".into(),
                });
            }
            if rate_override.segment_number > MAX_FIVE_DIGITS {
                return Err(LoanScheduleError::InvalidInput {
                    field: "segment_number".into(),
                    reason: "Segment number is too big. It should have 5 digits or less".into(),
                });
            }
            if rate_override.rate > MAX_FIVE_DIGITS {
                return Err(LoanScheduleError::InvalidInput {
                    field: "rate".into(),
                    reason: "Rate is too big. It should have 5 digits or less".into(),
                });
            }
        }

        let mut seen: HashSet<u32> = HashSet::with_capacity(self.overrides.len());
        for (position, rate_override) in self.overrides.iter().enumerate() {
            if !seen.insert(rate_override.segment_number) {
                return Err(LoanScheduleError::DuplicateOverride {
                    segment_number: rate_override.segment_number,
                    position,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_loan_is_zeroed() {
        let loan = Loan::new();
        assert_eq!(loan.amount(), 0);
        assert_eq!(loan.term(), 0);
        assert_eq!(loan.interest_rate(), 0);
        assert_eq!(loan.default_index_rate(), 0);
        assert!(loan.overrides().is_empty());
    }

    #[test]
    fn test_monthly_interest_rate() {
        let loan = Loan::new().with_interest_rate(1200);
        // 1200 bp = 12% annually = 1% monthly.
        assert_eq!(loan.monthly_interest_rate(), dec!(0.01));
    }

    #[test]
    fn test_override_for_segment_first_match_wins() {
        let loan = Loan::new()
            .with_override(RateOverride {
                segment_number: 3,
                rate: 410,
            })
            .with_override(RateOverride {
                segment_number: 3,
                rate: 500,
            });
        assert_eq!(loan.override_for_segment(3).map(|o| o.rate), Some(410));
        assert!(loan.override_for_segment(4).is_none());
    }

    #[test]
    fn test_remove_override() {
        let mut loan = Loan::new().with_override(RateOverride {
            segment_number: 2,
            rate: 390,
        });
        let removed = loan.remove_override(2);
        assert_eq!(removed.map(|o| o.rate), Some(390));
        assert!(loan.overrides().is_empty());
        assert!(loan.remove_override(2).is_none());
    }

    #[test]
    fn test_adopt_override_moves_between_loans() {
        let mut first = Loan::new().with_override(RateOverride {
            segment_number: 6,
            rate: 410,
        });
        let mut second = Loan::new();

        assert!(second.adopt_override(&mut first, 6));
        assert!(first.override_for_segment(6).is_none());
        assert_eq!(second.override_for_segment(6).map(|o| o.rate), Some(410));

        // Nothing left to adopt.
        assert!(!second.adopt_override(&mut first, 6));
        assert_eq!(second.overrides().len(), 1);
    }

    #[test]
    fn test_validate_ok() {
        let loan = Loan::new()
            .with_amount(1_000_000)
            .with_term(12)
            .with_interest_rate(400)
            .with_default_index_rate(394)
            .with_override(RateOverride {
                segment_number: 6,
                rate: 410,
            });
        assert!(loan.validate().is_ok());
    }

    #[test]
    fn test_validate_negative_amount() {
        let err = Loan::new().with_amount(-1).validate().unwrap_err();
        assert!(matches!(
            err,
            LoanScheduleError::InvalidInput { ref field, .. } if field == "amount"
        ));
    }

    #[test]
    fn test_validate_amount_too_big() {
        let err = Loan::new().with_amount(10_000_000_000).validate().unwrap_err();
        assert!(err.to_string().contains("10 digits or less"));
    }

    #[test]
    fn test_validate_zero_segment_number() {
        let err = Loan::new()
            .with_override(RateOverride {
                segment_number: 0,
                rate: 100,
            })
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("Segment number should be greater than 0"));
    }

    #[test]
    fn test_validate_duplicate_reports_first_duplicate_position() {
        let loan = Loan::new()
            .with_override(RateOverride {
                segment_number: 2,
                rate: 100,
            })
            .with_override(RateOverride {
                segment_number: 5,
                rate: 200,
            })
            .with_override(RateOverride {
                segment_number: 2,
                rate: 300,
            })
            .with_override(RateOverride {
                segment_number: 5,
                rate: 400,
            });
        let err = loan.validate().unwrap_err();
        match err {
            LoanScheduleError::DuplicateOverride {
                segment_number,
                position,
            } => {
                assert_eq!(segment_number, 2);
                assert_eq!(position, 2);
            }
            other => panic!("Expected DuplicateOverride, got {:?}", other),
        }
    }
}
