//! Unit vocabulary and the conversion table
//!
//! The table links every unit to its immediate neighbours. Volume and weight
//! form two separate chains, ordered smallest to largest:
//!
//! - tsp ↔ tbsp ↔ fl oz ↔ cup ↔ pt ↔ qt ↔ gal
//! - oz ↔ lbs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConversionError;

/// Family a unit belongs to. Families never convert into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitFamily {
    Volume,
    Weight,
}

/// A culinary measurement unit
///
/// Discriminants index [`CONVERSIONS`], so the order here must match it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "tsp")]
    Teaspoon = 0,
    #[serde(rename = "tbsp")]
    Tablespoon = 1,
    #[serde(rename = "fl oz")]
    FluidOunce = 2,
    #[serde(rename = "cup")]
    Cup = 3,
    #[serde(rename = "pt")]
    Pint = 4,
    #[serde(rename = "qt")]
    Quart = 5,
    #[serde(rename = "gal")]
    Gallon = 6,
    #[serde(rename = "oz")]
    Ounce = 7,
    #[serde(rename = "lbs")]
    Pound = 8,
}

impl Unit {
    /// Every unit, volume chain then weight chain, each smallest first
    pub const ALL: [Unit; 9] = [
        Unit::Teaspoon,
        Unit::Tablespoon,
        Unit::FluidOunce,
        Unit::Cup,
        Unit::Pint,
        Unit::Quart,
        Unit::Gallon,
        Unit::Ounce,
        Unit::Pound,
    ];

    /// Wire name, as stored in the database and sent to clients
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Teaspoon => "tsp",
            Unit::Tablespoon => "tbsp",
            Unit::FluidOunce => "fl oz",
            Unit::Cup => "cup",
            Unit::Pint => "pt",
            Unit::Quart => "qt",
            Unit::Gallon => "gal",
            Unit::Ounce => "oz",
            Unit::Pound => "lbs",
        }
    }

    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::Ounce | Unit::Pound => UnitFamily::Weight,
            _ => UnitFamily::Volume,
        }
    }

    /// Smallest unit of this unit's family
    pub fn base(&self) -> Unit {
        match self.family() {
            UnitFamily::Volume => Unit::Teaspoon,
            UnitFamily::Weight => Unit::Ounce,
        }
    }

    pub fn is_base(&self) -> bool {
        self.base() == *self
    }

    /// Conversion links for this unit
    pub fn link(&self) -> &'static ConversionLink {
        &CONVERSIONS[*self as usize]
    }

    /// Edge to the next larger unit, if any
    pub fn up(&self) -> Option<Conversion> {
        self.link().up
    }

    /// Edge to the next smaller unit, if any
    pub fn down(&self) -> Option<Conversion> {
        self.link().down
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ConversionError;

    /// Exact match against the wire names; no aliases or case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .iter()
            .copied()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| ConversionError::UnknownUnit(s.to_string()))
    }
}

/// A directed edge: `neighbour_amount = amount * factor`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub unit: Unit,
    pub factor: f64,
}

/// Up (larger) and down (smaller) edges out of a unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionLink {
    pub up: Option<Conversion>,
    pub down: Option<Conversion>,
}

const fn edge(unit: Unit, factor: f64) -> Option<Conversion> {
    Some(Conversion { unit, factor })
}

/// The conversion table, indexed by `Unit as usize`
pub static CONVERSIONS: [ConversionLink; 9] = [
    // tsp
    ConversionLink {
        up: edge(Unit::Tablespoon, 1.0 / 3.0),
        down: None,
    },
    // tbsp
    ConversionLink {
        up: edge(Unit::FluidOunce, 0.5),
        down: edge(Unit::Teaspoon, 3.0),
    },
    // fl oz
    ConversionLink {
        up: edge(Unit::Cup, 0.125),
        down: edge(Unit::Tablespoon, 2.0),
    },
    // cup
    ConversionLink {
        up: edge(Unit::Pint, 0.5),
        down: edge(Unit::FluidOunce, 8.0),
    },
    // pt
    ConversionLink {
        up: edge(Unit::Quart, 0.5),
        down: edge(Unit::Cup, 2.0),
    },
    // qt
    ConversionLink {
        up: edge(Unit::Gallon, 0.25),
        down: edge(Unit::Pint, 2.0),
    },
    // gal
    ConversionLink {
        up: None,
        down: edge(Unit::Quart, 4.0),
    },
    // oz
    ConversionLink {
        up: edge(Unit::Pound, 1.0 / 16.0),
        down: None,
    },
    // lbs
    ConversionLink {
        up: None,
        down: edge(Unit::Ounce, 16.0),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_wire_name() {
        for unit in Unit::ALL {
            assert_eq!(unit.as_str().parse::<Unit>().unwrap(), unit);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_units() {
        for bad in ["", "TSP", "floz", "fl  oz", "gram", "lb", "cups"] {
            match bad.parse::<Unit>() {
                Err(ConversionError::UnknownUnit(s)) => assert_eq!(s, bad),
                other => panic!("expected UnknownUnit for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Unit::FluidOunce).unwrap();
        assert_eq!(json, r#""fl oz""#);
        let unit: Unit = serde_json::from_str(r#""lbs""#).unwrap();
        assert_eq!(unit, Unit::Pound);
    }

    #[test]
    fn test_table_is_indexed_by_discriminant() {
        for unit in Unit::ALL {
            let link = unit.link();
            if let Some(up) = link.up {
                let back = up.unit.down().expect("up neighbour must link back down");
                assert_eq!(back.unit, unit);
            }
            if let Some(down) = link.down {
                let back = down.unit.up().expect("down neighbour must link back up");
                assert_eq!(back.unit, unit);
            }
        }
    }

    #[test]
    fn test_edges_are_exact_inverses() {
        for unit in Unit::ALL {
            if let Some(up) = unit.up() {
                let down = up.unit.down().unwrap();
                // 1 of the larger unit down to the smaller and back up again
                let round_trip = 1.0 * down.factor * up.factor;
                assert!((round_trip - 1.0).abs() < 1e-12, "{} <-> {}", unit, up.unit);
            }
        }
    }

    #[test]
    fn test_families_never_cross() {
        for unit in Unit::ALL {
            for neighbour in [unit.up(), unit.down()].into_iter().flatten() {
                assert_eq!(neighbour.unit.family(), unit.family());
            }
        }
    }

    #[test]
    fn test_chain_ends() {
        assert!(Unit::Teaspoon.down().is_none());
        assert!(Unit::Gallon.up().is_none());
        assert!(Unit::Ounce.down().is_none());
        assert!(Unit::Pound.up().is_none());
        assert_eq!(Unit::Cup.base(), Unit::Teaspoon);
        assert_eq!(Unit::Pound.base(), Unit::Ounce);
        assert!(Unit::Ounce.is_base());
        assert!(!Unit::Gallon.is_base());
    }
}
