//! Unit conversion engine
//!
//! Normalizes quantities to the smallest unit of their family for storage and
//! converts them back into something readable for display.

pub mod converter;
pub mod format;
pub mod units;

use thiserror::Error;

pub use converter::{
    decompose_to_breakdown, denormalize_to_largest_whole, normalize_to_base, parse_quantity,
    present, Breakdown, DisplayMode, Presentation, Quantity,
};
pub use format::format_amount;
pub use units::{Conversion, ConversionLink, Unit, UnitFamily, CONVERSIONS};

/// Conversion error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Unknown unit '{0}' (expected one of: tsp, tbsp, fl oz, cup, pt, qt, gal, oz, lbs)")]
    UnknownUnit(String),

    #[error("Invalid amount {0}: amounts must be finite and non-negative")]
    InvalidAmount(f64),

    #[error("Unknown display mode '{0}' (expected 'largest-unit' or 'breakdown')")]
    UnknownDisplayMode(String),
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;
