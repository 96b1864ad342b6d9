//! Recipe Ingredient model
//!
//! Links an ingredient to a recipe with the amount the recipe calls for.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::conversion::{parse_quantity, ConversionResult, Quantity};
use crate::db::DbResult;

/// Recipe ingredient joined with the ingredient's name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientDetail {
    pub id: i64,
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub amount: f64,
    pub unit: String,
}

impl RecipeIngredientDetail {
    pub fn quantity(&self) -> ConversionResult<Quantity> {
        parse_quantity(self.amount, &self.unit)
    }
}

pub struct RecipeIngredient;

impl RecipeIngredient {
    /// Link an ingredient to a recipe, returning the new row id
    pub fn create(
        conn: &Connection,
        recipe_id: i64,
        ingredient_id: i64,
        quantity: &Quantity,
    ) -> DbResult<i64> {
        conn.execute(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount, unit)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![recipe_id, ingredient_id, quantity.amount, quantity.unit.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Ingredients of a recipe in the order they were added
    pub fn get_details_for_recipe(
        conn: &Connection,
        recipe_id: i64,
    ) -> DbResult<Vec<RecipeIngredientDetail>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT ri.id, ri.ingredient_id, i.name AS ingredient_name, ri.amount, ri.unit
            FROM recipe_ingredients ri
            INNER JOIN ingredients i ON ri.ingredient_id = i.id
            WHERE ri.recipe_id = ?1
            ORDER BY ri.id
            "#,
        )?;

        let details = stmt
            .query_map([recipe_id], |row| {
                Ok(RecipeIngredientDetail {
                    id: row.get("id")?,
                    ingredient_id: row.get("ingredient_id")?,
                    ingredient_name: row.get("ingredient_name")?,
                    amount: row.get("amount")?,
                    unit: row.get("unit")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::Unit;
    use crate::db::migrations::run_migrations;
    use crate::models::{Ingredient, IngredientCreate, Recipe, RecipeCreate};

    #[test]
    fn test_links_cascade_with_recipe_and_block_ingredient_delete() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();

        let flour = Ingredient::create(
            &conn,
            &IngredientCreate {
                name: "flour".to_string(),
                quantity: Quantity::new(480.0, Unit::Teaspoon).unwrap(),
            },
        )
        .unwrap();
        let recipe = Recipe::create(
            &conn,
            &RecipeCreate {
                name: "bread".to_string(),
                instructions: "Bake it.".to_string(),
            },
        )
        .unwrap();

        let three_cups = Quantity::new(144.0, Unit::Teaspoon).unwrap();
        RecipeIngredient::create(&conn, recipe.id, flour.id, &three_cups).unwrap();

        let details = RecipeIngredient::get_details_for_recipe(&conn, recipe.id).unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].ingredient_name, "flour");
        assert_eq!(details[0].quantity().unwrap().unit, Unit::Teaspoon);

        assert!(Ingredient::delete_by_name(&conn, "flour").is_err());
        assert_eq!(Ingredient::recipe_usage_count(&conn, flour.id).unwrap(), 1);

        assert!(Recipe::delete_by_name(&conn, "bread").unwrap());
        assert_eq!(Ingredient::recipe_usage_count(&conn, flour.id).unwrap(), 0);
        assert!(Ingredient::delete_by_name(&conn, "flour").unwrap());
    }
}
