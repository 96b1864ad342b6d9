//! Larder Tools module
//!
//! MCP tool implementations for ingredients, recipes and conversions.

pub mod convert;
pub mod error;
pub mod ingredients;
pub mod recipes;
pub mod status;

pub use error::{ErrorResponse, ToolError, ToolResult};

use crate::conversion::DisplayMode;

/// Parse an optional display mode, defaulting to the largest whole unit
pub fn parse_display_mode(mode: Option<&str>) -> ToolResult<DisplayMode> {
    match mode {
        Some(m) => Ok(m.trim().parse()?),
        None => Ok(DisplayMode::default()),
    }
}
