//! Rewrite stored ingredient amounts into their base unit
//! Usage: cargo run --bin renormalize_ingredients -- [--dry-run]

use larder::conversion::normalize_to_base;
use larder::models::Ingredient;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dry_run = std::env::args().any(|a| a == "--dry-run");

    let db_path = larder::config::database_path();
    println!("Database: {}", db_path.display());

    let database = larder::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        larder::db::migrations::run_migrations(conn)?;

        let ingredients = Ingredient::list(conn)?;
        println!("Found {} ingredients", ingredients.len());

        let mut changed = 0;
        let mut unreadable = 0;

        for ingredient in &ingredients {
            let quantity = match ingredient.quantity() {
                Ok(q) => q,
                Err(e) => {
                    println!(
                        "  {}: cannot read '{} {}' ({})",
                        ingredient.name, ingredient.amount, ingredient.unit, e
                    );
                    unreadable += 1;
                    continue;
                }
            };

            if quantity.unit.is_base() {
                continue;
            }

            let base = match normalize_to_base(quantity) {
                Ok(b) => b,
                Err(e) => {
                    println!("  {}: {}", ingredient.name, e);
                    unreadable += 1;
                    continue;
                }
            };

            println!("  {}: {} -> {}", ingredient.name, quantity, base);
            if !dry_run {
                Ingredient::set_raw(conn, ingredient.id, base.amount, base.unit.as_str())?;
            }
            changed += 1;
        }

        println!(
            "\n{} {} ingredients, {} unreadable",
            if dry_run { "Would update" } else { "Updated" },
            changed,
            unreadable
        );
        Ok(())
    })?;

    Ok(())
}
