use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct IngredientDoc {
    pub ingredient_id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(ToSchema)]
pub struct RecipeSummaryDoc {
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub recipe_image: Option<String>,
    pub recipe_slug: String,
    /// `VEG`, `NON_VEG` or `VEGAN`
    pub recipe_type: String,
    pub created_at: DateTime<Utc>,
    pub ingredients: Vec<IngredientDoc>,
}

#[derive(ToSchema)]
pub struct RecipeDetailDoc {
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub recipe_description: String,
    pub recipe_image: Option<String>,
    pub recipe_slug: String,
    pub recipe_type: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ingredients: Vec<IngredientDoc>,
}

#[derive(ToSchema)]
pub struct RecipeInputDoc {
    pub recipe_name: String,
    pub recipe_description: String,
    pub recipe_type: String,
    /// Path relative to the media root
    pub recipe_image: Option<String>,
    pub ingredients: Option<Vec<String>>,
}

/// Every field optional; `recipe_image: null` clears the image.
#[derive(ToSchema)]
pub struct RecipePatchDoc {
    pub recipe_name: Option<String>,
    pub recipe_description: Option<String>,
    pub recipe_type: Option<String>,
    pub recipe_image: Option<String>,
    /// Replaces the current ingredient list
    pub ingredients: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct RecipeListResponse {
    pub status: String,
    pub data: Vec<RecipeSummaryDoc>,
    pub count: u64,
}

#[derive(ToSchema)]
pub struct RecipeResponse {
    pub status: String,
    pub message: Option<String>,
    pub data: RecipeDetailDoc,
}

#[derive(ToSchema)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    /// Field name to messages, on validation failures
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    pub error: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::recipes::list,
        crate::routes::recipes::create,
        crate::routes::recipes::retrieve,
        crate::routes::recipes::update,
        crate::routes::recipes::destroy,
    ),
    components(
        schemas(
            HealthResponse,
            IngredientDoc,
            RecipeSummaryDoc,
            RecipeDetailDoc,
            RecipeInputDoc,
            RecipePatchDoc,
            RecipeListResponse,
            RecipeResponse,
            MessageResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "recipes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_recipe_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/recipes/"));
        assert!(doc.paths.paths.contains_key("/recipes/{id}/"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
