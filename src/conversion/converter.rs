//! Conversion algorithms
//!
//! Quantities are stored in the base unit of their family and converted back
//! for display, either into the largest unit that keeps the amount above one
//! or into a multi-unit breakdown such as "1 cup 1 tbsp 1 tsp".
//!
//! An up-move is only taken when the converted amount is strictly greater
//! than 1, so `2 cup` stays `2 cup` instead of becoming `1 pt`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::format::format_amount;
use super::units::{Conversion, Unit};
use super::{ConversionError, ConversionResult};

/// Relative floating-point noise below this is snapped away.
const EPSILON: f64 = 1e-12;

/// Snap `amount` to the nearest nonzero integer when it lies within
/// `tolerance` of it. Nothing is ever snapped to zero.
fn snap_within(amount: f64, tolerance: f64) -> f64 {
    let nearest = amount.round();
    if nearest != 0.0 && (amount - nearest).abs() <= tolerance {
        nearest
    } else {
        amount
    }
}

fn snap(amount: f64) -> f64 {
    snap_within(amount, EPSILON * amount.abs().max(1.0))
}

/// An amount in a given unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: f64,
    pub unit: Unit,
}

impl Quantity {
    /// Create a quantity, rejecting negative and non-finite amounts
    pub fn new(amount: f64, unit: Unit) -> ConversionResult<Self> {
        let quantity = Self { amount, unit };
        quantity.validate()?;
        Ok(quantity)
    }

    pub fn validate(&self) -> ConversionResult<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(ConversionError::InvalidAmount(self.amount));
        }
        Ok(())
    }

    /// Follow a single edge of the conversion table
    fn follow(self, edge: Conversion) -> Self {
        Self {
            amount: snap(self.amount * edge.factor),
            unit: edge.unit,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_amount(self.amount), self.unit)
    }
}

/// A quantity split across units, largest unit first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakdown(pub Vec<Quantity>);

impl Breakdown {
    pub fn entries(&self) -> &[Quantity] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all entries, expressed in the base unit
    pub fn total(&self) -> ConversionResult<Option<Quantity>> {
        let mut total: Option<Quantity> = None;
        for entry in &self.0 {
            let base = normalize_to_base(*entry)?;
            total = Some(match total {
                Some(sum) => Quantity {
                    amount: sum.amount + base.amount,
                    unit: sum.unit,
                },
                None => base,
            });
        }
        Ok(total)
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// How a stored quantity should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    #[default]
    LargestUnit,
    Breakdown,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::LargestUnit => "largest-unit",
            DisplayMode::Breakdown => "breakdown",
        }
    }
}

impl FromStr for DisplayMode {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "largest-unit" => Ok(DisplayMode::LargestUnit),
            "breakdown" => Ok(DisplayMode::Breakdown),
            other => Err(ConversionError::UnknownDisplayMode(other.to_string())),
        }
    }
}

/// A quantity ready for display: `{amount, unit}` or `[{amount, unit}, ...]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Presentation {
    Single(Quantity),
    Breakdown(Breakdown),
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presentation::Single(quantity) => quantity.fmt(f),
            Presentation::Breakdown(breakdown) => breakdown.fmt(f),
        }
    }
}

/// Build a quantity from a raw amount and unit string, e.g. a database row
pub fn parse_quantity(amount: f64, unit: &str) -> ConversionResult<Quantity> {
    Quantity::new(amount, unit.parse()?)
}

/// Convert to the smallest unit of the quantity's family
pub fn normalize_to_base(quantity: Quantity) -> ConversionResult<Quantity> {
    quantity.validate()?;

    let mut current = quantity;
    while let Some(down) = current.unit.down() {
        current = current.follow(down);
    }
    Ok(current)
}

/// Walk up edge by edge while the converted amount stays above 1
fn walk_up(quantity: Quantity) -> Quantity {
    let mut current = quantity;
    while let Some(up) = current.unit.up() {
        let candidate = current.follow(up);
        if candidate.amount > 1.0 {
            current = candidate;
        } else {
            break;
        }
    }
    current
}

/// Convert to the largest unit in which the amount is still greater than 1
///
/// The quantity is normalized first, so the result does not depend on the
/// unit it was given in. Amounts too small to exceed 1 in any larger unit
/// come back in the base unit.
pub fn denormalize_to_largest_whole(quantity: Quantity) -> ConversionResult<Quantity> {
    let base = normalize_to_base(quantity)?;
    Ok(walk_up(base))
}

/// Split a quantity into whole amounts of decreasing units
///
/// The leading entry is the whole part in the largest unit from
/// [`denormalize_to_largest_whole`]. Each remainder is carried one unit down
/// and emitted whenever it reaches a whole unit. Whatever is left at the base
/// unit is emitted as-is, even when it is fractional. A zero quantity yields
/// a single zero entry in the base unit.
pub fn decompose_to_breakdown(quantity: Quantity) -> ConversionResult<Breakdown> {
    let base = normalize_to_base(quantity)?;
    if base.amount == 0.0 {
        return Ok(Breakdown(vec![base]));
    }

    let mut entries = Vec::new();
    let mut current = walk_up(base);
    // Noise allowance in the current unit, relative to the whole quantity
    let mut tolerance = EPSILON * current.amount.max(1.0);

    while let Some(down) = current.unit.down() {
        let mut whole = current.amount.trunc();
        let mut remainder = current.amount - whole;
        if 1.0 - remainder <= tolerance {
            whole += 1.0;
            remainder = 0.0;
        }

        if whole >= 1.0 {
            entries.push(Quantity {
                amount: whole,
                unit: current.unit,
            });
        }
        if remainder <= tolerance {
            return Ok(Breakdown(entries));
        }

        current = Quantity {
            amount: remainder * down.factor,
            unit: down.unit,
        };
        tolerance *= down.factor;
    }

    current.amount = snap_within(current.amount, tolerance);
    entries.push(current);
    Ok(Breakdown(entries))
}

/// Present a stored quantity in the requested mode
pub fn present(quantity: Quantity, mode: DisplayMode) -> ConversionResult<Presentation> {
    match mode {
        DisplayMode::LargestUnit => {
            denormalize_to_largest_whole(quantity).map(Presentation::Single)
        }
        DisplayMode::Breakdown => decompose_to_breakdown(quantity).map(Presentation::Breakdown),
    }
}
