use chrono::{DateTime, Utc};
use models::recipe::RecipeType;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::pagination::Pagination;

/// Raw create payload. Every field is optional here so that missing values are
/// reported as field errors; a value of the wrong JSON type still fails to decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeInput {
    #[serde(default)]
    pub recipe_name: Option<String>,
    #[serde(default)]
    pub recipe_description: Option<String>,
    #[serde(default)]
    pub recipe_type: Option<String>,
    #[serde(default)]
    pub recipe_image: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
}

/// Raw partial-update payload (PUT and PATCH are both partial).
/// `recipe_image: null` clears the image; an absent key leaves it unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipePatch {
    #[serde(default)]
    pub recipe_name: Option<String>,
    #[serde(default)]
    pub recipe_description: Option<String>,
    #[serde(default)]
    pub recipe_type: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub recipe_image: Option<Option<String>>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
}

fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Validated create data.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRecipe {
    pub name: String,
    pub description: String,
    pub recipe_type: RecipeType,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
}

/// Validated partial update; `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub recipe_type: Option<RecipeType>,
    pub image: Option<Option<String>>,
    pub ingredients: Option<Vec<String>>,
}

/// Row to insert; the slug has already been resolved.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub slug: String,
    pub recipe_type: RecipeType,
    pub ingredients: Vec<String>,
}

/// Column changes for an update; `slug` is set only when the name's slug changed.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<Option<String>>,
    pub slug: Option<String>,
    pub recipe_type: Option<RecipeType>,
    pub ingredients: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRecord {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored recipe together with its ingredients, as the repository returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub slug: String,
    pub recipe_type: RecipeType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ingredients: Vec<IngredientRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ordering {
    #[serde(rename = "created_at")]
    CreatedAsc,
    #[default]
    #[serde(rename = "-created_at")]
    CreatedDesc,
    #[serde(rename = "recipe_name")]
    NameAsc,
    #[serde(rename = "-recipe_name")]
    NameDesc,
}

impl Ordering {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "created_at" => Some(Self::CreatedAsc),
            "-created_at" => Some(Self::CreatedDesc),
            "recipe_name" => Some(Self::NameAsc),
            "-recipe_name" => Some(Self::NameDesc),
            _ => None,
        }
    }
}

/// Normalized list query; also the cache key payload for list results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeQuery {
    pub recipe_type: Option<RecipeType>,
    /// Lowercased, trimmed; `None` when blank.
    pub search: Option<String>,
    pub ordering: Ordering,
    pub pagination: Pagination,
}

impl RecipeQuery {
    pub fn new(recipe_type: Option<RecipeType>, search: Option<&str>, ordering: Ordering, pagination: Pagination) -> Self {
        let search = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
        Self { recipe_type, search, ordering, pagination: pagination.clamped() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientView {
    pub ingredient_id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub recipe_image: Option<String>,
    pub recipe_slug: String,
    pub recipe_type: RecipeType,
    pub created_at: DateTime<Utc>,
    pub ingredients: Vec<IngredientView>,
}

/// Single-record representation with every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub recipe_description: String,
    pub recipe_image: Option<String>,
    pub recipe_slug: String,
    pub recipe_type: RecipeType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ingredients: Vec<IngredientView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePage {
    pub items: Vec<RecipeSummary>,
    /// Total active records matching the filters, across all pages.
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
}

impl From<&IngredientRecord> for IngredientView {
    fn from(i: &IngredientRecord) -> Self {
        Self {
            ingredient_id: i.id,
            recipe_id: i.recipe_id,
            ingredient_name: i.name.clone(),
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

impl From<&RecipeRecord> for RecipeSummary {
    fn from(r: &RecipeRecord) -> Self {
        Self {
            recipe_id: r.id,
            recipe_name: r.name.clone(),
            recipe_image: r.image.clone(),
            recipe_slug: r.slug.clone(),
            recipe_type: r.recipe_type,
            created_at: r.created_at,
            ingredients: r.ingredients.iter().map(IngredientView::from).collect(),
        }
    }
}

impl From<RecipeRecord> for RecipeDetail {
    fn from(r: RecipeRecord) -> Self {
        Self {
            recipe_id: r.id,
            recipe_name: r.name,
            recipe_description: r.description,
            recipe_image: r.image,
            recipe_slug: r.slug,
            recipe_type: r.recipe_type,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
            ingredients: r.ingredients.iter().map(IngredientView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_null_image_from_absent() {
        let absent: RecipePatch = serde_json::from_str(r#"{"recipe_name":"x"}"#).unwrap();
        assert_eq!(absent.recipe_image, None);
        let cleared: RecipePatch = serde_json::from_str(r#"{"recipe_image":null}"#).unwrap();
        assert_eq!(cleared.recipe_image, Some(None));
        let set: RecipePatch = serde_json::from_str(r#"{"recipe_image":"recipes/a.jpg"}"#).unwrap();
        assert_eq!(set.recipe_image, Some(Some("recipes/a.jpg".into())));
    }

    #[test]
    fn ordering_parses_known_fields_only() {
        assert_eq!(Ordering::parse("-created_at"), Some(Ordering::CreatedDesc));
        assert_eq!(Ordering::parse("recipe_name"), Some(Ordering::NameAsc));
        assert_eq!(Ordering::parse("recipe_description"), None);
        assert_eq!(Ordering::default(), Ordering::CreatedDesc);
    }

    #[test]
    fn query_normalizes_search() {
        let q = RecipeQuery::new(None, Some("  SoUp "), Ordering::default(), Pagination::default());
        assert_eq!(q.search.as_deref(), Some("soup"));
        let blank = RecipeQuery::new(None, Some("   "), Ordering::default(), Pagination::default());
        assert!(blank.search.is_none());
    }
}
