//! Rate conversions and minor-unit rounding.
//!
//! Every fractional monetary amount passes through [`round_minor_units`]
//! exactly once on its way to an integer amount; ties round away from zero,
//! not to even.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{BasisPoints, MinorUnits, Rate};

/// Convert basis points to a fractional ratio (100 bp = 0.01).
pub fn basis_points_to_ratio(basis_points: BasisPoints) -> Rate {
    Decimal::from(basis_points) / dec!(10000)
}

/// Convert an annual ratio to its monthly equivalent. Periods are always
/// months; other period counts are not supported.
pub fn annual_to_monthly(annual: Rate) -> Rate {
    annual / dec!(12)
}

/// Monthly fractional rate for an annual rate quoted in basis points.
pub fn monthly_rate_from_basis_points(basis_points: BasisPoints) -> Rate {
    basis_points_to_ratio(basis_points) / dec!(12)
}

/// Round a fractional amount to whole minor units, ties away from zero
/// (1.5 → 2). Saturates at `MinorUnits::MAX` beyond the i64 range, which no
/// validated loan can reach.
pub fn round_minor_units(value: Decimal) -> MinorUnits {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(MinorUnits::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_points_to_ratio() {
        assert_eq!(basis_points_to_ratio(400), dec!(0.04));
        assert_eq!(basis_points_to_ratio(1), dec!(0.0001));
        assert_eq!(basis_points_to_ratio(0), Decimal::ZERO);
    }

    #[test]
    fn test_annual_to_monthly() {
        assert_eq!(annual_to_monthly(dec!(0.12)), dec!(0.01));
        assert_eq!(annual_to_monthly(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_rate_composition() {
        // 400 bp annually = 0.04 / 12 monthly.
        assert_eq!(
            monthly_rate_from_basis_points(400),
            annual_to_monthly(basis_points_to_ratio(400))
        );
    }

    #[test]
    fn test_round_minor_units_nearest() {
        assert_eq!(round_minor_units(dec!(333.33)), 333);
        assert_eq!(round_minor_units(dec!(333.67)), 334);
        assert_eq!(round_minor_units(dec!(16666.4999)), 16666);
    }

    #[test]
    fn test_round_minor_units_ties_away_from_zero() {
        assert_eq!(round_minor_units(dec!(1.5)), 2);
        assert_eq!(round_minor_units(dec!(2.5)), 3);
        assert_eq!(round_minor_units(dec!(16666.5)), 16667);
    }

    #[test]
    fn test_round_minor_units_whole() {
        assert_eq!(round_minor_units(dec!(100)), 100);
        assert_eq!(round_minor_units(Decimal::ZERO), 0);
    }
}
