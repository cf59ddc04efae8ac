use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use models::recipe::RecipeType;
use serde::Deserialize;
use service::errors::FieldErrors;
use service::pagination::Pagination;
use service::recipe::domain::{Ordering, RecipeInput, RecipePatch, RecipeQuery};
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::response::Envelope;
use crate::state::ServerState;

const INVALID_BODY: &str = "Invalid request body";

/// Raw list query string. Everything is read as text so bad values become field errors.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// `VEG`, `NON_VEG` or `VEGAN`
    pub recipe_type: Option<String>,
    /// Case-insensitive substring of the recipe name
    pub search: Option<String>,
    /// `created_at`, `-created_at` (default), `recipe_name` or `-recipe_name`
    pub ordering: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl ListParams {
    fn into_query(self) -> Result<RecipeQuery, ApiError> {
        let mut errs = FieldErrors::new();
        let recipe_type = match self.recipe_type.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(code) => RecipeType::parse(code)
                .map_err(|e| errs.add("recipe_type", e.into_message()))
                .ok(),
            None => None,
        };
        let mut number = |field: &str, raw: Option<String>| -> Option<u32> {
            let raw = raw?;
            match raw.trim().parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    errs.add(field, "A valid integer is required.");
                    None
                }
            }
        };
        let page = number("page", self.page);
        let page_size = number("page_size", self.page_size);
        if !errs.is_empty() {
            return Err(ApiError::validation(errs));
        }
        // Unknown ordering fields fall back to the default.
        let ordering = self.ordering.as_deref().and_then(Ordering::parse).unwrap_or_default();
        Ok(RecipeQuery::new(recipe_type, self.search.as_deref(), ordering, Pagination::from_query(page, page_size)))
    }
}

/// Non-UUID ids can never match a record.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim_end_matches('/')).map_err(|_| ApiError::not_found())
}

#[utoipa::path(
    get, path = "/recipes/", tag = "recipes", params(ListParams),
    responses(
        (status = 200, description = "Active recipes", body = crate::openapi::RecipeListResponse),
        (status = 400, description = "Invalid filter", body = crate::openapi::ErrorResponse),
        (status = 500, description = "Failed to fetch recipes", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request("Invalid query parameters", e.body_text()))?;
    let query = params.into_query()?;
    let page = state
        .recipes
        .list(&query)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch recipes"))?;
    Ok(Json(Envelope::success(page.items).with_count(page.count)))
}

#[utoipa::path(
    post, path = "/recipes/", tag = "recipes", request_body = crate::openapi::RecipeInputDoc,
    responses(
        (status = 201, description = "Recipe created successfully", body = crate::openapi::RecipeResponse),
        (status = 400, description = "Validation failed", body = crate::openapi::ErrorResponse),
        (status = 409, description = "Slug conflict after retries", body = crate::openapi::ErrorResponse),
        (status = 500, description = "Failed to create recipe", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<RecipeInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::bad_request(INVALID_BODY, e.body_text()))?;
    let created = state
        .recipes
        .create(input)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to create recipe"))?;
    info!(recipe_id = %created.recipe_id, slug = %created.recipe_slug, "recipe create request served");
    Ok((StatusCode::CREATED, Json(Envelope::success(created).with_message("Recipe created successfully"))))
}

#[utoipa::path(
    get, path = "/recipes/{id}/", tag = "recipes",
    params(("id" = String, Path, description = "Recipe UUID")),
    responses(
        (status = 200, description = "Recipe", body = crate::openapi::RecipeResponse),
        (status = 404, description = "Recipe not found", body = crate::openapi::ErrorResponse),
        (status = 500, description = "Failed to fetch recipe", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn retrieve(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let detail = state
        .recipes
        .get(id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch recipe"))?;
    Ok(Json(Envelope::success(detail)))
}

/// Serves both PUT and PATCH; both are partial.
#[utoipa::path(
    patch, path = "/recipes/{id}/", tag = "recipes",
    params(("id" = String, Path, description = "Recipe UUID")),
    request_body = crate::openapi::RecipePatchDoc,
    responses(
        (status = 200, description = "Recipe updated successfully", body = crate::openapi::RecipeResponse),
        (status = 400, description = "Validation failed", body = crate::openapi::ErrorResponse),
        (status = 404, description = "Recipe not found", body = crate::openapi::ErrorResponse),
        (status = 409, description = "Slug conflict after retries", body = crate::openapi::ErrorResponse),
        (status = 500, description = "Failed to update recipe", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<RecipePatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let Json(patch) = payload.map_err(|e| ApiError::bad_request(INVALID_BODY, e.body_text()))?;
    let updated = state
        .recipes
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to update recipe"))?;
    Ok(Json(Envelope::success(updated).with_message("Recipe updated successfully")))
}

#[utoipa::path(
    delete, path = "/recipes/{id}/", tag = "recipes",
    params(("id" = String, Path, description = "Recipe UUID")),
    responses(
        (status = 200, description = "Recipe deleted successfully", body = crate::openapi::MessageResponse),
        (status = 404, description = "Recipe not found", body = crate::openapi::ErrorResponse),
        (status = 500, description = "Failed to delete recipe", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn destroy(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state
        .recipes
        .soft_delete(id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to delete recipe"))?;
    Ok(Json(Envelope::message("Recipe deleted successfully")))
}
