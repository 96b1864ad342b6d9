//! Ingredient model
//!
//! A named pantry ingredient and how much of it is on hand.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::conversion::{parse_quantity, ConversionResult, Quantity};
use crate::db::DbResult;

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// A stored ingredient row
///
/// `amount` and `unit` are kept as raw columns; use [`Ingredient::quantity`]
/// to get a checked [`Quantity`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new ingredient
#[derive(Debug, Clone)]
pub struct IngredientCreate {
    pub name: String,
    pub quantity: Quantity,
}

impl Ingredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            amount: row.get("amount")?,
            unit: row.get("unit")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Parse the stored amount and unit
    pub fn quantity(&self) -> ConversionResult<Quantity> {
        parse_quantity(self.amount, &self.unit)
    }

    /// Insert a new ingredient
    pub fn create(conn: &Connection, data: &IngredientCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO ingredients (name, amount, unit) VALUES (?1, ?2, ?3)",
            params![data.name, data.quantity.amount, data.quantity.unit.as_str()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(ingredient) => Ok(Some(ingredient)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE name = ?1")?;

        match stmt.query_row([name], Self::from_row) {
            Ok(ingredient) => Ok(Some(ingredient)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all ingredients ordered by name
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients ORDER BY name")?;
        let ingredients = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ingredients)
    }

    /// Replace the stored quantity of the named ingredient
    pub fn update_quantity(
        conn: &Connection,
        name: &str,
        quantity: &Quantity,
    ) -> DbResult<Option<Self>> {
        let rows = conn.execute(
            "UPDATE ingredients SET amount = ?1, unit = ?2, updated_at = ?3 WHERE name = ?4",
            params![quantity.amount, quantity.unit.as_str(), now(), name],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        Self::get_by_name(conn, name)
    }

    /// Overwrite the raw amount and unit columns of a row
    pub fn set_raw(conn: &Connection, id: i64, amount: f64, unit: &str) -> DbResult<bool> {
        let rows = conn.execute(
            "UPDATE ingredients SET amount = ?1, unit = ?2, updated_at = ?3 WHERE id = ?4",
            params![amount, unit, now(), id],
        )?;
        Ok(rows > 0)
    }

    /// Number of recipes using this ingredient
    pub fn recipe_usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE ingredient_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete the named ingredient. Returns Ok(false) if it did not exist.
    pub fn delete_by_name(conn: &Connection, name: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM ingredients WHERE name = ?1", [name])?;
        Ok(rows > 0)
    }
}
