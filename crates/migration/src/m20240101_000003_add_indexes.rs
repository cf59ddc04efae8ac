use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing filters by type on active rows
        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_type_active")
                    .table(RecipesMaster::Table)
                    .col(RecipesMaster::RecipeType)
                    .col(RecipesMaster::IsActive)
                    .to_owned(),
            )
            .await?;

        // Default ordering is newest first on active rows
        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_created_active")
                    .table(RecipesMaster::Table)
                    .col(RecipesMaster::CreatedAt)
                    .col(RecipesMaster::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_name")
                    .table(RecipesMaster::Table)
                    .col(RecipesMaster::RecipeName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ingredients_recipe")
                    .table(Ingredients::Table)
                    .col(Ingredients::RecipeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_recipes_type_active").table(RecipesMaster::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_recipes_created_active").table(RecipesMaster::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_recipes_name").table(RecipesMaster::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_ingredients_recipe").table(Ingredients::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RecipesMaster { Table, RecipeType, IsActive, CreatedAt, RecipeName }

#[derive(DeriveIden)]
enum Ingredients { Table, RecipeId }
