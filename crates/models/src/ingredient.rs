use sea_orm::{entity::prelude::*, sea_query::ForeignKeyAction};
use serde::{Deserialize, Serialize};

use crate::{errors, recipe};

pub const NAME_MAX_LEN: usize = 100;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ingredient_id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_name: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Recipe }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Recipe => Entity::belongs_to(recipe::Entity)
                .from(Column::RecipeId)
                .to(recipe::Column::RecipeId)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<recipe::Entity> for Entity {
    fn to() -> RelationDef { Relation::Recipe.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trim and bound an ingredient name.
pub fn normalize_name(name: &str) -> Result<String, errors::ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation("Ingredient name may not be blank.".into()));
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation("Ingredient name must be at most 100 characters.".into()));
    }
    Ok(trimmed.to_string())
}
