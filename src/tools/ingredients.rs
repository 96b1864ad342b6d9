//! Ingredient MCP Tools
//!
//! Pantry ingredients are stored in the base unit of their family and
//! presented in the caller's chosen display mode.

use rusqlite::Connection;
use serde::Serialize;

use crate::conversion::{normalize_to_base, parse_quantity, present, Presentation, Quantity};
use crate::db::Database;
use crate::models::{Ingredient, IngredientCreate};

use super::error::{ToolError, ToolResult};
use super::parse_display_mode;

/// An ingredient as shown to clients
#[derive(Debug, Serialize)]
pub struct IngredientView {
    pub id: i64,
    pub name: String,
    pub quantity: Presentation,
    pub display: String,
    pub updated_at: String,
}

/// Response for list_ingredients
#[derive(Debug, Serialize)]
pub struct ListIngredientsResponse {
    pub ingredients: Vec<IngredientView>,
    pub total: usize,
    /// Rows whose stored amount or unit could not be read
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unreadable: Vec<String>,
}

/// Response for delete_ingredient
#[derive(Debug, Serialize)]
pub struct DeleteIngredientResponse {
    pub success: bool,
    pub deleted: String,
}

fn view(ingredient: Ingredient, mode: Option<&str>) -> ToolResult<IngredientView> {
    let quantity = present(ingredient.quantity()?, parse_display_mode(mode)?)?;
    Ok(IngredientView {
        id: ingredient.id,
        name: ingredient.name,
        display: quantity.to_string(),
        quantity,
        updated_at: ingredient.updated_at,
    })
}

fn validate_name(name: &str) -> ToolResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ToolError::InvalidInput("Ingredient name cannot be empty".to_string()));
    }
    Ok(name)
}

fn duplicate(name: &str) -> ToolError {
    ToolError::Conflict(format!("An ingredient named '{}' already exists", name))
}

/// Insert a normalized ingredient, reporting a name collision as a conflict
fn insert(conn: &Connection, name: &str, quantity: Quantity) -> ToolResult<Ingredient> {
    if Ingredient::get_by_name(conn, name)?.is_some() {
        return Err(duplicate(name));
    }

    let data = IngredientCreate {
        name: name.to_string(),
        quantity,
    };
    // A concurrent add can still win between the lookup and the insert
    Ingredient::create(conn, &data).map_err(|e| ToolError::from_insert(e, || duplicate(name)))
}

/// Add an ingredient to the pantry
pub fn add_ingredient(
    db: &Database,
    name: &str,
    amount: f64,
    unit: &str,
) -> ToolResult<IngredientView> {
    let name = validate_name(name)?;
    let quantity = normalize_to_base(parse_quantity(amount, unit)?)?;

    let conn = db.get_conn()?;
    let ingredient = insert(&conn, name, quantity)?;
    tracing::info!(name, amount = quantity.amount, unit = %quantity.unit, "Added ingredient");

    view(ingredient, None)
}

/// Get a single ingredient by name
pub fn get_ingredient(db: &Database, name: &str, mode: Option<&str>) -> ToolResult<IngredientView> {
    let conn = db.get_conn()?;
    let ingredient = Ingredient::get_by_name(&conn, name.trim())?
        .ok_or_else(|| ToolError::NotFound(format!("No ingredient named '{}'", name.trim())))?;
    view(ingredient, mode)
}

/// List all ingredients
pub fn list_ingredients(db: &Database, mode: Option<&str>) -> ToolResult<ListIngredientsResponse> {
    // Reject a bad mode up front rather than once per row
    parse_display_mode(mode)?;

    let conn = db.get_conn()?;
    let rows = Ingredient::list(&conn)?;
    tracing::debug!(count = rows.len(), "Listing ingredients");

    let mut ingredients = Vec::with_capacity(rows.len());
    let mut unreadable = Vec::new();
    for row in rows {
        let name = row.name.clone();
        match view(row, mode) {
            Ok(v) => ingredients.push(v),
            Err(ToolError::Conversion(e)) => {
                tracing::warn!(name = %name, error = %e, "Skipping unreadable ingredient row");
                unreadable.push(name);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(ListIngredientsResponse {
        total: ingredients.len(),
        ingredients,
        unreadable,
    })
}

/// Replace the amount of an existing ingredient
pub fn update_ingredient(
    db: &Database,
    name: &str,
    amount: f64,
    unit: &str,
) -> ToolResult<IngredientView> {
    let name = validate_name(name)?;
    let quantity = normalize_to_base(parse_quantity(amount, unit)?)?;

    let conn = db.get_conn()?;
    let ingredient = Ingredient::update_quantity(&conn, name, &quantity)?
        .ok_or_else(|| ToolError::NotFound(format!("No ingredient named '{}'", name)))?;
    tracing::info!(name, amount = quantity.amount, unit = %quantity.unit, "Updated ingredient");

    view(ingredient, None)
}

/// Delete an ingredient (blocked while any recipe uses it)
pub fn delete_ingredient(db: &Database, name: &str) -> ToolResult<DeleteIngredientResponse> {
    let name = name.trim();
    let conn = db.get_conn()?;

    let ingredient = Ingredient::get_by_name(&conn, name)?
        .ok_or_else(|| ToolError::NotFound(format!("No ingredient named '{}'", name)))?;

    let usage = Ingredient::recipe_usage_count(&conn, ingredient.id)?;
    if usage > 0 {
        return Err(ToolError::Conflict(format!(
            "Cannot delete '{}': used in {} recipe(s)",
            name, usage
        )));
    }

    Ingredient::delete_by_name(&conn, name)?;
    tracing::info!(name, "Deleted ingredient");

    Ok(DeleteIngredientResponse {
        success: true,
        deleted: name.to_string(),
    })
}
