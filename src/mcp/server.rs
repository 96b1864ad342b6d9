//! Larder MCP Server Implementation
//!
//! Exposes the ingredient, recipe and conversion tools over MCP.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::tools::convert;
use crate::tools::ingredients;
use crate::tools::recipes::{self, IngredientUsage};
use crate::tools::status::StatusTracker;
use crate::tools::{ErrorResponse, ToolError, ToolResult};

/// Larder MCP Service
#[derive(Clone)]
pub struct LarderService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<LarderService>,
}

impl LarderService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Turn a tool outcome into an MCP result
///
/// Bad input becomes `invalid_params`; missing records and conflicts are
/// reported as an `{"error": ...}` body; database failures are internal errors.
fn respond<T: Serialize>(result: ToolResult<T>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => to_json(&value),
        Err(e @ (ToolError::InvalidInput(_) | ToolError::Conversion(_))) => {
            Err(McpError::invalid_params(e.to_string(), None))
        }
        Err(e @ (ToolError::NotFound(_) | ToolError::Conflict(_))) => {
            to_json(&ErrorResponse::from(&e))
        }
        Err(e @ ToolError::Database(_)) => {
            tracing::error!(error = %e, "Tool call failed");
            Err(McpError::internal_error(e.to_string(), None))
        }
    }
}

// ============================================================================
// Ingredient Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientQuantityParams {
    /// Ingredient name (unique)
    pub name: String,
    /// Amount, zero or positive
    pub amount: f64,
    /// One of: tsp, tbsp, fl oz, cup, pt, qt, gal, oz, lbs
    pub unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetIngredientParams {
    pub name: String,
    /// "largest-unit" (default) or "breakdown"
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListIngredientsParams {
    /// "largest-unit" (default) or "breakdown"
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteIngredientParams {
    pub name: String,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeIngredientParam {
    /// Name of an existing pantry ingredient
    pub name: String,
    pub amount: f64,
    /// One of: tsp, tbsp, fl oz, cup, pt, qt, gal, oz, lbs
    pub unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    /// Recipe name (unique)
    pub name: String,
    pub instructions: String,
    /// Ingredients and the amounts the recipe uses
    pub ingredients: Vec<RecipeIngredientParam>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    pub name: String,
    /// "largest-unit" (default) or "breakdown"
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRecipeParams {
    pub name: String,
}

// ============================================================================
// Conversion Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertQuantityParams {
    pub amount: f64,
    /// One of: tsp, tbsp, fl oz, cup, pt, qt, gal, oz, lbs
    pub unit: String,
    /// "base", "largest-unit" (default) or "breakdown"
    pub mode: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl LarderService {
    // --- Status ---

    #[tool(description = "Get the current status of the Larder service including build info, database status, and process information")]
    async fn larder_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get instructions for using Larder: accepted units, how amounts are stored, and display modes. Call this before adding ingredients or recipes.")]
    fn larder_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::INGREDIENT_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(INGREDIENT_INSTRUCTIONS)]))
    }

    // --- Ingredients ---

    #[tool(description = "Add a pantry ingredient with an amount and unit. The amount is stored in the smallest unit of its family.")]
    fn add_ingredient(
        &self,
        Parameters(p): Parameters<IngredientQuantityParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(ingredients::add_ingredient(&self.database, &p.name, p.amount, &p.unit))
    }

    #[tool(description = "Get an ingredient by name, shown in the largest whole unit or as a multi-unit breakdown")]
    fn get_ingredient(
        &self,
        Parameters(p): Parameters<GetIngredientParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(ingredients::get_ingredient(&self.database, &p.name, p.mode.as_deref()))
    }

    #[tool(description = "List all pantry ingredients, shown in the largest whole unit or as multi-unit breakdowns")]
    fn list_ingredients(
        &self,
        Parameters(p): Parameters<ListIngredientsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(ingredients::list_ingredients(&self.database, p.mode.as_deref()))
    }

    #[tool(description = "Replace the amount of an existing ingredient")]
    fn update_ingredient(
        &self,
        Parameters(p): Parameters<IngredientQuantityParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(ingredients::update_ingredient(&self.database, &p.name, p.amount, &p.unit))
    }

    #[tool(description = "Delete an ingredient (only allowed if no recipe uses it)")]
    fn delete_ingredient(
        &self,
        Parameters(p): Parameters<DeleteIngredientParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(ingredients::delete_ingredient(&self.database, &p.name))
    }

    // --- Recipes ---

    #[tool(description = "Create a recipe with instructions and the amounts of existing pantry ingredients it uses")]
    fn create_recipe(
        &self,
        Parameters(p): Parameters<CreateRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let usages: Vec<IngredientUsage> = p
            .ingredients
            .into_iter()
            .map(|i| IngredientUsage {
                name: i.name,
                amount: i.amount,
                unit: i.unit,
            })
            .collect();
        respond(recipes::create_recipe(&self.database, &p.name, &p.instructions, &usages))
    }

    #[tool(description = "List the names of all recipes")]
    fn list_recipes(&self) -> Result<CallToolResult, McpError> {
        respond(recipes::list_recipe_names(&self.database))
    }

    #[tool(description = "Get a recipe with its instructions and ingredient amounts")]
    fn get_recipe(
        &self,
        Parameters(p): Parameters<GetRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(recipes::get_recipe(&self.database, &p.name, p.mode.as_deref()))
    }

    #[tool(description = "Delete a recipe")]
    fn delete_recipe(
        &self,
        Parameters(p): Parameters<DeleteRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(recipes::delete_recipe(&self.database, &p.name))
    }

    // --- Conversion ---

    #[tool(description = "Convert an amount without storing it: to the base unit (tsp/oz), the largest whole unit, or a multi-unit breakdown")]
    fn convert_quantity(
        &self,
        Parameters(p): Parameters<ConvertQuantityParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(convert::convert_quantity(p.amount, &p.unit, p.mode.as_deref()))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for LarderService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: crate::build_info::NAME.into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Larder".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Larder - pantry ingredient and recipe tracking with cooking unit conversion. \
                 Call larder_instructions first. \
                 Ingredients: add/get/list/update/delete_ingredient. \
                 Recipes: create/get/list/delete_recipe. \
                 Conversion: convert_quantity (mode: base, largest-unit, breakdown). \
                 Units: tsp, tbsp, fl oz, cup, pt, qt, gal (volume); oz, lbs (weight)."
                    .into(),
            ),
        }
    }
}
