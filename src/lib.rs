//! Larder Library
//!
//! Pantry ingredients, recipes and cooking unit conversion.

pub mod build_info;
pub mod config;
pub mod conversion;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
