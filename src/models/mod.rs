//! Data models
//!
//! Rust structs representing database entities.

mod ingredient;
mod recipe;
mod recipe_ingredient;

pub use ingredient::{Ingredient, IngredientCreate};
pub use recipe::{Recipe, RecipeCreate};
pub use recipe_ingredient::{RecipeIngredient, RecipeIngredientDetail};
