//! Conversion MCP Tool
//!
//! Stateless conversion of a single quantity, without touching the database.

use std::str::FromStr;

use serde::Serialize;

use crate::conversion::{normalize_to_base, parse_quantity, present, DisplayMode, Presentation};

use super::error::{ToolError, ToolResult};

/// Target of a conversion request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertMode {
    /// The smallest unit of the family, as stored
    Base,
    Display(DisplayMode),
}

impl FromStr for ConvertMode {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "base" => Ok(ConvertMode::Base),
            other => Ok(ConvertMode::Display(other.parse()?)),
        }
    }
}

/// Response for convert_quantity
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub mode: &'static str,
    pub result: Presentation,
    pub display: String,
}

/// Convert an amount into the base unit, the largest whole unit or a breakdown
pub fn convert_quantity(
    amount: f64,
    unit: &str,
    mode: Option<&str>,
) -> ToolResult<ConvertResponse> {
    let mode = match mode {
        Some(m) => m.parse::<ConvertMode>()?,
        None => ConvertMode::Display(DisplayMode::default()),
    };
    let quantity = parse_quantity(amount, unit)?;

    let (mode_name, result) = match mode {
        ConvertMode::Base => ("base", Presentation::Single(normalize_to_base(quantity)?)),
        ConvertMode::Display(display) => (display.as_str(), present(quantity, display)?),
    };

    Ok(ConvertResponse {
        mode: mode_name,
        display: result.to_string(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::ConversionError;

    #[test]
    fn test_convert_to_base() {
        let response = convert_quantity(1.0, "gal", Some("base")).unwrap();
        assert_eq!(response.mode, "base");
        assert_eq!(response.display, "768 tsp");
    }

    #[test]
    fn test_convert_default_is_largest_unit() {
        let response = convert_quantity(0.5, "cup", None).unwrap();
        assert_eq!(response.mode, "largest-unit");
        assert_eq!(response.display, "4 fl oz");
    }

    #[test]
    fn test_convert_breakdown() {
        let response = convert_quantity(5.5, "cup", Some("breakdown")).unwrap();
        assert_eq!(response.display, "1 qt 1 cup 4 fl oz");
        assert_eq!(
            serde_json::to_value(&response.result).unwrap(),
            serde_json::json!([
                {"amount": 1.0, "unit": "qt"},
                {"amount": 1.0, "unit": "cup"},
                {"amount": 4.0, "unit": "fl oz"}
            ])
        );
    }

    #[test]
    fn test_convert_errors() {
        assert!(matches!(
            convert_quantity(1.0, "liter", None),
            Err(ToolError::Conversion(ConversionError::UnknownUnit(_)))
        ));
        assert!(matches!(
            convert_quantity(f64::NAN, "cup", None),
            Err(ToolError::Conversion(ConversionError::InvalidAmount(_)))
        ));
        assert!(matches!(
            convert_quantity(1.0, "cup", Some("smallest")),
            Err(ToolError::Conversion(ConversionError::UnknownDisplayMode(_)))
        ));
    }
}
