//! Create `ingredients` table, owned by `recipes_master` (cascade on delete).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ingredients::Table)
                    .if_not_exists()
                    .col(uuid(Ingredients::IngredientId).primary_key())
                    .col(uuid(Ingredients::RecipeId).not_null())
                    .col(string_len(Ingredients::IngredientName, 100).not_null())
                    .col(timestamp_with_time_zone(Ingredients::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Ingredients::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ingredients_recipe")
                            .from(Ingredients::Table, Ingredients::RecipeId)
                            .to(RecipesMaster::Table, RecipesMaster::RecipeId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Ingredients::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Ingredients {
    Table,
    IngredientId,
    RecipeId,
    IngredientName,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RecipesMaster { Table, RecipeId }
