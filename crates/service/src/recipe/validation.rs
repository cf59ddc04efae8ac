//! Input validation for recipe writes.
//!
//! All rules are checked before returning so the caller gets every field error at once.

use models::{ingredient, recipe};
use models::recipe::RecipeType;

use crate::errors::{FieldErrors, ServiceError};
use super::domain::{RecipeInput, RecipePatch, ValidPatch, ValidRecipe};

const REQUIRED: &str = "This field is required.";

fn check_name(raw: &str, errs: &mut FieldErrors) -> Option<String> {
    recipe::normalize_name(raw).map_err(|e| errs.add("recipe_name", e.into_message())).ok()
}

fn check_description(raw: &str, errs: &mut FieldErrors) -> Option<String> {
    recipe::normalize_description(raw)
        .map_err(|e| errs.add("recipe_description", e.into_message()))
        .ok()
}

fn check_type(raw: &str, errs: &mut FieldErrors) -> Option<RecipeType> {
    RecipeType::parse(raw).map_err(|e| errs.add("recipe_type", e.into_message())).ok()
}

/// Blank strings mean "no image".
fn check_image(raw: Option<&str>, errs: &mut FieldErrors) -> Option<Option<String>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Some(None),
        Some(path) => recipe::validate_image_path(path)
            .map(|_| Some(path.to_string()))
            .map_err(|e| errs.add("recipe_image", e.into_message()))
            .ok(),
    }
}

fn check_ingredients(raw: &[String], errs: &mut FieldErrors) -> Option<Vec<String>> {
    let mut out = Vec::with_capacity(raw.len());
    let mut ok = true;
    for (i, name) in raw.iter().enumerate() {
        match ingredient::normalize_name(name) {
            Ok(n) => out.push(n),
            Err(e) => {
                ok = false;
                errs.add("ingredients", format!("Item {}: {}", i, e.into_message()));
            }
        }
    }
    ok.then_some(out)
}

/// Validate a create payload: name, description and type are required.
pub fn validate_create(input: &RecipeInput) -> Result<ValidRecipe, ServiceError> {
    let mut errs = FieldErrors::new();

    let name = match input.recipe_name.as_deref() {
        Some(n) => check_name(n, &mut errs),
        None => { errs.add("recipe_name", REQUIRED); None }
    };
    let description = match input.recipe_description.as_deref() {
        Some(d) => check_description(d, &mut errs),
        None => { errs.add("recipe_description", REQUIRED); None }
    };
    let recipe_type = match input.recipe_type.as_deref() {
        Some(t) => check_type(t, &mut errs),
        None => { errs.add("recipe_type", REQUIRED); None }
    };
    let image = check_image(input.recipe_image.as_deref(), &mut errs);
    let ingredients = check_ingredients(input.ingredients.as_deref().unwrap_or_default(), &mut errs);

    match (name, description, recipe_type, image, ingredients) {
        (Some(name), Some(description), Some(recipe_type), Some(image), Some(ingredients)) if errs.is_empty() => {
            Ok(ValidRecipe { name, description, recipe_type, image, ingredients })
        }
        _ => Err(ServiceError::Validation(errs)),
    }
}

/// Validate a partial update; only present fields are checked.
pub fn validate_patch(patch: &RecipePatch) -> Result<ValidPatch, ServiceError> {
    let mut errs = FieldErrors::new();
    let out = ValidPatch {
        name: patch.recipe_name.as_deref().and_then(|n| check_name(n, &mut errs)),
        description: patch.recipe_description.as_deref().and_then(|d| check_description(d, &mut errs)),
        recipe_type: patch.recipe_type.as_deref().and_then(|t| check_type(t, &mut errs)),
        image: match &patch.recipe_image {
            None => None,
            Some(img) => check_image(img.as_deref(), &mut errs),
        },
        ingredients: patch.ingredients.as_deref().and_then(|i| check_ingredients(i, &mut errs)),
    };
    errs.into_result()?;
    Ok(out)
}
