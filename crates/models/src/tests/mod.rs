//! Entity-level tests against PostgreSQL.
//! Skipped when `SKIP_DB_TESTS` is set or the database cannot be reached.

use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr, TransactionTrait};
use uuid::Uuid;

use crate::db::connect;
use crate::recipe::RecipeType;
use crate::{ingredient, recipe};

async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

fn recipe_am(slug: &str) -> recipe::ActiveModel {
    let now = Utc::now().into();
    recipe::ActiveModel {
        recipe_id: Set(Uuid::new_v4()),
        recipe_name: Set("Model Test Recipe".into()),
        recipe_description: Set("Inserted by the entity tests".into()),
        recipe_image: Set(None),
        recipe_slug: Set(slug.to_string()),
        recipe_type: Set(RecipeType::Vegan),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[tokio::test]
async fn recipe_with_ingredients_cascades_on_hard_delete() -> anyhow::Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let slug = format!("model-test-{}", Uuid::new_v4());
    let r = recipe_am(&slug).insert(&db).await?;
    assert_eq!(r.recipe_type, RecipeType::Vegan);

    for name in ["rice", "beans"] {
        let now = Utc::now().into();
        ingredient::ActiveModel {
            ingredient_id: Set(Uuid::new_v4()),
            recipe_id: Set(r.recipe_id),
            ingredient_name: Set(name.into()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db)
        .await?;
    }

    let related = ingredient::Entity::find()
        .filter(ingredient::Column::RecipeId.eq(r.recipe_id))
        .all(&db)
        .await?;
    assert_eq!(related.len(), 2);

    recipe::Entity::delete_by_id(r.recipe_id).exec(&db).await?;
    let after = ingredient::Entity::find()
        .filter(ingredient::Column::RecipeId.eq(r.recipe_id))
        .all(&db)
        .await?;
    assert!(after.is_empty());
    Ok(())
}

#[tokio::test]
async fn duplicate_slug_is_a_unique_violation() -> anyhow::Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let slug = format!("model-dup-{}", Uuid::new_v4());
    let first = recipe_am(&slug).insert(&db).await?;

    let txn = db.begin().await?;
    let err = recipe_am(&slug).insert(&txn).await.expect_err("slug must be unique");
    assert!(matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))));
    txn.rollback().await?;

    recipe::Entity::delete_by_id(first.recipe_id).exec(&db).await?;
    Ok(())
}
