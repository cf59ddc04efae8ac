use std::path::{Component, Path};

use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};

use crate::{errors, ingredient, slug};

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MIN_LEN: usize = 10;
pub const IMAGE_MAX_LEN: usize = 255;
pub const SLUG_MAX_LEN: usize = 120;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RecipeType {
    #[sea_orm(string_value = "VEG")]
    #[serde(rename = "VEG")]
    Vegetarian,
    #[sea_orm(string_value = "NON_VEG")]
    #[serde(rename = "NON_VEG")]
    NonVegetarian,
    #[sea_orm(string_value = "VEGAN")]
    #[serde(rename = "VEGAN")]
    Vegan,
}

impl RecipeType {
    pub const ALL: [RecipeType; 3] = [RecipeType::Vegetarian, RecipeType::NonVegetarian, RecipeType::Vegan];

    pub fn code(self) -> &'static str {
        match self {
            RecipeType::Vegetarian => "VEG",
            RecipeType::NonVegetarian => "NON_VEG",
            RecipeType::Vegan => "VEGAN",
        }
    }

    /// Parse the stored code (`VEG`, `NON_VEG`, `VEGAN`); surrounding whitespace is ignored.
    pub fn parse(code: &str) -> Result<Self, errors::ModelError> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| errors::ModelError::Validation(format!("\"{code}\" is not a valid choice.")))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes_master")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub recipe_id: Uuid,
    pub recipe_name: String,
    #[sea_orm(column_type = "Text")]
    pub recipe_description: String,
    pub recipe_image: Option<String>,
    #[sea_orm(unique)]
    pub recipe_slug: String,
    pub recipe_type: RecipeType,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Ingredient }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Ingredient => Entity::has_many(ingredient::Entity).into(),
        }
    }
}

impl Related<ingredient::Entity> for Entity {
    fn to() -> RelationDef { Relation::Ingredient.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trim, check length bounds and title-case a recipe name.
pub fn normalize_name(name: &str) -> Result<String, errors::ModelError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len < NAME_MIN_LEN {
        return Err(errors::ModelError::Validation("Recipe name must be at least 3 characters long.".into()));
    }
    if len > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation("Ensure this field has no more than 100 characters.".into()));
    }
    Ok(slug::title_case(trimmed))
}

/// Trim a description and check its minimum length; whitespace alone never counts.
pub fn normalize_description(description: &str) -> Result<String, errors::ModelError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation("This field may not be blank.".into()));
    }
    if trimmed.chars().count() < DESCRIPTION_MIN_LEN {
        return Err(errors::ModelError::Validation("Ensure this field has at least 10 characters.".into()));
    }
    Ok(trimmed.to_string())
}

/// Image references are relative paths under the media root.
pub fn validate_image_path(path: &str) -> Result<(), errors::ModelError> {
    if path.chars().count() > IMAGE_MAX_LEN {
        return Err(errors::ModelError::Validation("Ensure this field has no more than 255 characters.".into()));
    }
    let p = Path::new(path);
    let contained = !path.is_empty()
        && !path.starts_with('/')
        && !path.starts_with('\\')
        && p.components().all(|c| matches!(c, Component::Normal(_)));
    if !contained {
        return Err(errors::ModelError::Validation("Image must be a relative path inside the media store.".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_title_cased() {
        assert_eq!(normalize_name("  tomato soup ").unwrap(), "Tomato Soup");
    }

    #[test]
    fn short_name_rejected_after_trim() {
        assert!(normalize_name("ab").is_err());
        assert!(normalize_name("  ab   ").is_err());
        assert!(normalize_name("abc").is_ok());
    }

    #[test]
    fn long_name_rejected() {
        assert!(normalize_name(&"a".repeat(NAME_MAX_LEN + 1)).is_err());
        assert!(normalize_name(&"a".repeat(NAME_MAX_LEN)).is_ok());
    }

    #[test]
    fn description_is_trimmed_before_length_check() {
        assert!(normalize_description("too short").is_err());
        assert!(normalize_description("   too short   ").is_err());
        assert!(normalize_description(&" ".repeat(12)).is_err());
        assert_eq!(normalize_description("  long enough \n").unwrap(), "long enough");
    }

    #[test]
    fn recipe_type_codes_round_trip() {
        for t in RecipeType::ALL {
            assert_eq!(RecipeType::parse(t.code()).unwrap(), t);
        }
        assert_eq!(RecipeType::parse(" VEGAN ").unwrap(), RecipeType::Vegan);
        assert!(RecipeType::parse("veg").is_err());
        assert!(RecipeType::parse("PESCATARIAN").is_err());
    }

    #[test]
    fn recipe_type_serializes_as_code() {
        assert_eq!(serde_json::to_value(RecipeType::NonVegetarian).unwrap(), serde_json::json!("NON_VEG"));
    }

    #[test]
    fn image_paths_must_stay_in_media_root() {
        assert!(validate_image_path("recipes/2024/05/soup.jpg").is_ok());
        assert!(validate_image_path("/etc/passwd").is_err());
        assert!(validate_image_path("recipes/../../secret").is_err());
        assert!(validate_image_path("").is_err());
        assert!(validate_image_path(&format!("recipes/{}", "a".repeat(IMAGE_MAX_LEN))).is_err());
    }
}
