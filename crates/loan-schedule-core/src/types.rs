use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monetary amounts in minor currency units (e.g. cents). Always whole units;
/// fractional intermediates live in `Decimal` until rounded.
pub type MinorUnits = i64;

/// Annual rates in basis points (1 bp = 0.01%).
pub type BasisPoints = u32;

/// Fractional rate ratios (0.0033 = 0.33%). Wraps Decimal to prevent
/// accidental f64 usage.
pub type Rate = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "minor_units_i64".to_string(),
        },
    }
}
