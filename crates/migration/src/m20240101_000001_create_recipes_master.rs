//! Create `recipes_master` table.
//! Slugs are unique across all rows, active or not.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecipesMaster::Table)
                    .if_not_exists()
                    .col(uuid(RecipesMaster::RecipeId).primary_key())
                    .col(string_len(RecipesMaster::RecipeName, 100).not_null())
                    .col(text(RecipesMaster::RecipeDescription).not_null())
                    .col(string_len_null(RecipesMaster::RecipeImage, 255))
                    .col(string_len(RecipesMaster::RecipeSlug, 120).not_null())
                    .col(string_len(RecipesMaster::RecipeType, 20).not_null())
                    .col(boolean(RecipesMaster::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(RecipesMaster::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(RecipesMaster::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_recipes_master_slug")
                    .table(RecipesMaster::Table)
                    .col(RecipesMaster::RecipeSlug)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RecipesMaster::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RecipesMaster {
    Table,
    RecipeId,
    RecipeName,
    RecipeDescription,
    RecipeImage,
    RecipeSlug,
    RecipeType,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
