//! Recipe MCP Tools
//!
//! Recipes reference pantry ingredients by name. Amounts are normalized to
//! the base unit before they are stored, like ingredient stock.

use std::collections::HashSet;

use rusqlite::TransactionBehavior;
use serde::Serialize;

use crate::conversion::{normalize_to_base, parse_quantity, present, Presentation, Quantity};
use crate::db::Database;
use crate::models::{Ingredient, Recipe, RecipeCreate, RecipeIngredient};

use super::error::{ToolError, ToolResult};
use super::parse_display_mode;

/// Amount of an ingredient a new recipe calls for
#[derive(Debug, Clone)]
pub struct IngredientUsage {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// Response for create_recipe
#[derive(Debug, Serialize)]
pub struct CreateRecipeResponse {
    pub id: i64,
    pub name: String,
    pub ingredient_count: usize,
    pub created_at: String,
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub names: Vec<String>,
    pub total: usize,
}

/// A recipe ingredient as shown to clients
#[derive(Debug, Serialize)]
pub struct RecipeIngredientView {
    pub name: String,
    pub quantity: Presentation,
    pub display: String,
}

/// Full recipe detail
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub instructions: String,
    pub ingredients: Vec<RecipeIngredientView>,
    /// Ingredients whose stored amount or unit could not be read
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unreadable: Vec<String>,
    pub created_at: String,
}

/// Response for delete_recipe
#[derive(Debug, Serialize)]
pub struct DeleteRecipeResponse {
    pub success: bool,
    pub deleted: String,
}

fn duplicate(name: &str) -> ToolError {
    ToolError::Conflict(format!("A recipe named '{}' already exists", name))
}

/// Check a new recipe, returning its ingredients with normalized amounts
fn validate_create(
    name: &str,
    instructions: &str,
    ingredients: &[IngredientUsage],
) -> ToolResult<Vec<(String, Quantity)>> {
    tracing::debug!("Validating recipe");

    if name.trim().is_empty() {
        return Err(ToolError::InvalidInput("No recipe name specified.".to_string()));
    }
    if instructions.trim().is_empty() {
        return Err(ToolError::InvalidInput("No recipe instructions specified.".to_string()));
    }
    if ingredients.is_empty() {
        return Err(ToolError::InvalidInput("No recipe ingredients specified.".to_string()));
    }

    let mut seen = HashSet::new();
    let mut validated = Vec::with_capacity(ingredients.len());
    for (index, usage) in ingredients.iter().enumerate() {
        let ingredient_name = usage.name.trim();
        if ingredient_name.is_empty() {
            return Err(ToolError::InvalidInput(format!("Ingredient {}: Missing name.", index)));
        }
        if !seen.insert(ingredient_name) {
            return Err(ToolError::InvalidInput(format!(
                "Ingredient {}: '{}' is listed more than once.",
                index, ingredient_name
            )));
        }
        if usage.amount == 0.0 {
            return Err(ToolError::InvalidInput(format!("Ingredient {}: Missing amount.", index)));
        }

        let quantity = parse_quantity(usage.amount, &usage.unit)
            .and_then(normalize_to_base)
            .map_err(|e| ToolError::InvalidInput(format!("Ingredient {}: {}", index, e)))?;
        validated.push((ingredient_name.to_string(), quantity));
    }

    Ok(validated)
}

/// Create a recipe and link its ingredients in one transaction
pub fn create_recipe(
    db: &Database,
    name: &str,
    instructions: &str,
    ingredients: &[IngredientUsage],
) -> ToolResult<CreateRecipeResponse> {
    let usages = validate_create(name, instructions, ingredients)?;
    let name = name.trim();

    db.with_conn_mut(|conn| -> ToolResult<CreateRecipeResponse> {
        // Take the write lock up front so the name check and insert are atomic
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if Recipe::get_by_name(&tx, name)?.is_some() {
            return Err(duplicate(name));
        }

        tracing::debug!(recipe = name, "Creating recipe");
        let data = RecipeCreate {
            name: name.to_string(),
            instructions: instructions.to_string(),
        };
        let recipe =
            Recipe::create(&tx, &data).map_err(|e| ToolError::from_insert(e, || duplicate(name)))?;

        for (index, (ingredient_name, quantity)) in usages.iter().enumerate() {
            let ingredient = Ingredient::get_by_name(&tx, ingredient_name)?.ok_or_else(|| {
                ToolError::InvalidInput(format!(
                    "Ingredient {}: No ingredient named '{}'.",
                    index, ingredient_name
                ))
            })?;
            RecipeIngredient::create(&tx, recipe.id, ingredient.id, quantity)?;
        }

        tx.commit()?;
        tracing::info!(recipe = name, ingredients = usages.len(), "Created recipe");

        Ok(CreateRecipeResponse {
            id: recipe.id,
            name: recipe.name,
            ingredient_count: usages.len(),
            created_at: recipe.created_at,
        })
    })
}

/// List all recipe names
pub fn list_recipe_names(db: &Database) -> ToolResult<ListRecipesResponse> {
    tracing::debug!("Listing all recipe names");
    let conn = db.get_conn()?;
    let names = Recipe::list_names(&conn)?;
    Ok(ListRecipesResponse {
        total: names.len(),
        names,
    })
}

/// Get a recipe with its ingredients presented in the given mode
pub fn get_recipe(db: &Database, name: &str, mode: Option<&str>) -> ToolResult<RecipeDetail> {
    let mode = parse_display_mode(mode)?;
    let name = name.trim();
    let conn = db.get_conn()?;

    let recipe = Recipe::get_by_name(&conn, name)?
        .ok_or_else(|| ToolError::NotFound(format!("No recipe named '{}'", name)))?;

    let mut ingredients = Vec::new();
    let mut unreadable = Vec::new();
    for detail in RecipeIngredient::get_details_for_recipe(&conn, recipe.id)? {
        let quantity = match detail.quantity().and_then(|q| present(q, mode)) {
            Ok(q) => q,
            Err(e) => {
                tracing::warn!(
                    recipe = %recipe.name,
                    ingredient = %detail.ingredient_name,
                    error = %e,
                    "Skipping unreadable recipe ingredient row"
                );
                unreadable.push(detail.ingredient_name);
                continue;
            }
        };
        ingredients.push(RecipeIngredientView {
            name: detail.ingredient_name,
            display: quantity.to_string(),
            quantity,
        });
    }

    Ok(RecipeDetail {
        id: recipe.id,
        name: recipe.name,
        instructions: recipe.instructions,
        ingredients,
        unreadable,
        created_at: recipe.created_at,
    })
}

/// Delete a recipe and its ingredient links
pub fn delete_recipe(db: &Database, name: &str) -> ToolResult<DeleteRecipeResponse> {
    let name = name.trim();
    let conn = db.get_conn()?;

    if !Recipe::delete_by_name(&conn, name)? {
        return Err(ToolError::NotFound(format!("No recipe named '{}'", name)));
    }
    tracing::info!(recipe = name, "Deleted recipe");

    Ok(DeleteRecipeResponse {
        success: true,
        deleted: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::tools::ingredients::{add_ingredient, delete_ingredient};

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        add_ingredient(&db, "flour", 5.0, "lbs").unwrap();
        add_ingredient(&db, "milk", 1.0, "gal").unwrap();
        add_ingredient(&db, "salt", 10.0, "tsp").unwrap();
        db
    }

    fn usage(name: &str, amount: f64, unit: &str) -> IngredientUsage {
        IngredientUsage {
            name: name.to_string(),
            amount,
            unit: unit.to_string(),
        }
    }

    fn pancakes() -> Vec<IngredientUsage> {
        vec![
            usage("flour", 12.0, "oz"),
            usage("milk", 1.25, "cup"),
            usage("salt", 0.5, "tsp"),
        ]
    }

    #[test]
    fn test_create_and_get_recipe() {
        let db = setup();
        let created = create_recipe(&db, "pancakes", "Whisk and fry.", &pancakes()).unwrap();
        assert_eq!(created.ingredient_count, 3);

        let detail = get_recipe(&db, "pancakes", None).unwrap();
        let shown: Vec<(&str, &str)> = detail
            .ingredients
            .iter()
            .map(|i| (i.name.as_str(), i.display.as_str()))
            .collect();
        assert_eq!(shown, vec![("flour", "12 oz"), ("milk", "1.25 cup"), ("salt", "0.5 tsp")]);

        let detail = get_recipe(&db, "pancakes", Some("breakdown")).unwrap();
        assert_eq!(detail.ingredients[1].display, "1 cup 2 fl oz");
    }

    #[test]
    fn test_validation_messages() {
        let db = setup();

        let err = create_recipe(&db, "", "Stir.", &pancakes()).unwrap_err();
        assert_eq!(err.to_string(), "No recipe name specified.");

        let err = create_recipe(&db, "soup", "  ", &pancakes()).unwrap_err();
        assert_eq!(err.to_string(), "No recipe instructions specified.");

        let err = create_recipe(&db, "soup", "Stir.", &[]).unwrap_err();
        assert_eq!(err.to_string(), "No recipe ingredients specified.");

        let err = create_recipe(&db, "soup", "Stir.", &[usage("salt", 0.0, "tsp")]).unwrap_err();
        assert_eq!(err.to_string(), "Ingredient 0: Missing amount.");

        let unnamed = [usage("salt", 1.0, "tsp"), usage("", 1.0, "tsp")];
        let err = create_recipe(&db, "soup", "Stir.", &unnamed).unwrap_err();
        assert_eq!(err.to_string(), "Ingredient 1: Missing name.");

        let err = create_recipe(&db, "soup", "Stir.", &[usage("salt", 1.0, "dash")]).unwrap_err();
        assert!(err.to_string().starts_with("Ingredient 0: Unknown unit 'dash'"));

        let repeated = [usage("salt", 1.0, "tsp"), usage("salt", 2.0, "tsp")];
        let err = create_recipe(&db, "soup", "Stir.", &repeated).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[test]
    fn test_unknown_ingredient_rolls_back() {
        let db = setup();
        let soup = [usage("salt", 1.0, "tsp"), usage("leeks", 2.0, "cup")];
        let err = create_recipe(&db, "soup", "Simmer.", &soup).unwrap_err();
        assert_eq!(err.to_string(), "Ingredient 1: No ingredient named 'leeks'.");
        assert_eq!(list_recipe_names(&db).unwrap().total, 0);
    }

    #[test]
    fn test_duplicate_recipe_name() {
        let db = setup();
        create_recipe(&db, "pancakes", "Whisk and fry.", &pancakes()).unwrap();
        let err = create_recipe(&db, "pancakes", "Again.", &pancakes()).unwrap_err();
        assert!(matches!(err, ToolError::Conflict(_)));
    }

    #[test]
    fn test_recipe_name_collision_is_a_conflict() {
        let db = setup();
        let data = RecipeCreate {
            name: "toast".to_string(),
            instructions: "Toast.".to_string(),
        };
        let err = db
            .with_conn(|conn| {
                Recipe::create(conn, &data)?;
                Recipe::create(conn, &data)
            })
            .unwrap_err();
        assert!(matches!(
            ToolError::from_insert(err, || duplicate("toast")),
            ToolError::Conflict(_)
        ));

        let err = create_recipe(&db, "toast", "Again.", &pancakes()).unwrap_err();
        assert!(matches!(err, ToolError::Conflict(_)));
    }

    #[test]
    fn test_get_recipe_skips_unreadable_rows() {
        let db = setup();
        create_recipe(&db, "pancakes", "Whisk and fry.", &pancakes()).unwrap();
        db.with_conn(|conn| {
            conn.execute("UPDATE recipe_ingredients SET unit = 'handful' WHERE amount < 1", [])?;
            Ok(())
        })
        .unwrap();

        let detail = get_recipe(&db, "pancakes", None).unwrap();
        assert_eq!(detail.ingredients.len(), 2);
        assert_eq!(detail.unreadable, vec!["salt".to_string()]);
    }

    #[test]
    fn test_list_and_delete() {
        let db = setup();
        create_recipe(&db, "waffles", "Press.", &pancakes()).unwrap();
        create_recipe(&db, "crepes", "Swirl.", &pancakes()).unwrap();

        let listed = list_recipe_names(&db).unwrap();
        assert_eq!(listed.names, vec!["crepes", "waffles"]);

        assert!(matches!(delete_ingredient(&db, "flour"), Err(ToolError::Conflict(_))));

        delete_recipe(&db, "waffles").unwrap();
        delete_recipe(&db, "crepes").unwrap();
        assert!(matches!(delete_recipe(&db, "crepes"), Err(ToolError::NotFound(_))));
        assert!(delete_ingredient(&db, "flour").unwrap().success);
    }
}
