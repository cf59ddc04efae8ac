use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use models::{ingredient, recipe};

use crate::errors::ServiceError;
use crate::recipe::domain::{IngredientRecord, NewRecipe, Ordering, RecipeChanges, RecipeQuery, RecipeRecord};
use crate::recipe::repository::RecipeRepository;

pub struct SeaOrmRecipeRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRecipeRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn ingredient_record(m: ingredient::Model) -> IngredientRecord {
    IngredientRecord {
        id: m.ingredient_id,
        recipe_id: m.recipe_id,
        name: m.ingredient_name,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn recipe_record(m: recipe::Model, ingredients: Vec<IngredientRecord>) -> RecipeRecord {
    RecipeRecord {
        id: m.recipe_id,
        name: m.recipe_name,
        description: m.recipe_description,
        image: m.recipe_image,
        slug: m.recipe_slug,
        recipe_type: m.recipe_type,
        is_active: m.is_active,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
        ingredients,
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Ingredients for many recipes in one query, grouped by recipe id.
async fn load_ingredients<C: ConnectionTrait>(
    conn: &C,
    recipe_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<IngredientRecord>>, DbErr> {
    let mut grouped: HashMap<Uuid, Vec<IngredientRecord>> = HashMap::new();
    if recipe_ids.is_empty() {
        return Ok(grouped);
    }
    let rows = ingredient::Entity::find()
        .filter(ingredient::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .order_by_asc(ingredient::Column::CreatedAt)
        .order_by_asc(ingredient::Column::IngredientName)
        .all(conn)
        .await?;
    for row in rows {
        grouped.entry(row.recipe_id).or_default().push(ingredient_record(row));
    }
    Ok(grouped)
}

async fn insert_ingredients<C: ConnectionTrait>(
    conn: &C,
    recipe_id: Uuid,
    names: Vec<String>,
    now: DateTime<Utc>,
) -> Result<Vec<IngredientRecord>, DbErr> {
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let row = ingredient::ActiveModel {
            ingredient_id: Set(Uuid::new_v4()),
            recipe_id: Set(recipe_id),
            ingredient_name: Set(name),
            created_at: Set(now.fixed_offset()),
            updated_at: Set(now.fixed_offset()),
        }
        .insert(conn)
        .await?;
        out.push(ingredient_record(row));
    }
    Ok(out)
}

#[async_trait::async_trait]
impl RecipeRepository for SeaOrmRecipeRepository {
    async fn list_active(&self, query: &RecipeQuery) -> Result<(Vec<RecipeRecord>, u64), ServiceError> {
        let mut select = recipe::Entity::find().filter(recipe::Column::IsActive.eq(true));
        if let Some(t) = query.recipe_type {
            select = select.filter(recipe::Column::RecipeType.eq(t));
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", like_escape(search));
            select = select.filter(Expr::expr(Func::lower(Expr::col(recipe::Column::RecipeName))).like(pattern));
        }
        select = match query.ordering {
            Ordering::CreatedAsc => select.order_by_asc(recipe::Column::CreatedAt),
            Ordering::CreatedDesc => select.order_by_desc(recipe::Column::CreatedAt),
            Ordering::NameAsc => select.order_by_asc(recipe::Column::RecipeName),
            Ordering::NameDesc => select.order_by_desc(recipe::Column::RecipeName),
        }
        .order_by_asc(recipe::Column::RecipeId);

        // fetch_page takes a 0-based index
        let (page_idx, per_page) = query.pagination.normalize();
        let paginator = select.paginate(&self.db, per_page);
        let count = paginator.num_items().await?;
        let rows = paginator.fetch_page(page_idx).await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.recipe_id).collect();
        let mut ingredients = load_ingredients(&self.db, &ids).await?;
        let records = rows
            .into_iter()
            .map(|r| {
                let items = ingredients.remove(&r.recipe_id).unwrap_or_default();
                recipe_record(r, items)
            })
            .collect();
        Ok((records, count))
    }

    async fn find_active(&self, id: Uuid) -> Result<Option<RecipeRecord>, ServiceError> {
        let Some(row) = recipe::Entity::find_by_id(id)
            .filter(recipe::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let items = load_ingredients(&self.db, &[id]).await?.remove(&id).unwrap_or_default();
        Ok(Some(recipe_record(row, items)))
    }

    async fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, ServiceError> {
        let mut select = recipe::Entity::find().filter(recipe::Column::RecipeSlug.eq(slug));
        if let Some(id) = exclude {
            select = select.filter(recipe::Column::RecipeId.ne(id));
        }
        Ok(select.count(&self.db).await? > 0)
    }

    async fn insert(&self, new: NewRecipe) -> Result<RecipeRecord, ServiceError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;
        let row = recipe::ActiveModel {
            recipe_id: Set(new.id),
            recipe_name: Set(new.name),
            recipe_description: Set(new.description),
            recipe_image: Set(new.image),
            recipe_slug: Set(new.slug),
            recipe_type: Set(new.recipe_type),
            is_active: Set(true),
            created_at: Set(now.fixed_offset()),
            updated_at: Set(now.fixed_offset()),
        }
        .insert(&txn)
        .await?;
        let items = insert_ingredients(&txn, new.id, new.ingredients, now).await?;
        txn.commit().await?;
        Ok(recipe_record(row, items))
    }

    async fn update(&self, id: Uuid, changes: RecipeChanges) -> Result<Option<RecipeRecord>, ServiceError> {
        let txn = self.db.begin().await?;
        // Row lock plus the is_active re-check keeps a concurrent soft delete from being overwritten.
        let Some(current) = recipe::Entity::find_by_id(id)
            .filter(recipe::Column::IsActive.eq(true))
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let now = Utc::now();
        let mut am: recipe::ActiveModel = current.into();
        if let Some(name) = changes.name { am.recipe_name = Set(name); }
        if let Some(description) = changes.description { am.recipe_description = Set(description); }
        if let Some(image) = changes.image { am.recipe_image = Set(image); }
        if let Some(slug) = changes.slug { am.recipe_slug = Set(slug); }
        if let Some(t) = changes.recipe_type { am.recipe_type = Set(t); }
        am.updated_at = Set(now.fixed_offset());
        let row = am.update(&txn).await?;

        let items = match changes.ingredients {
            Some(names) => {
                ingredient::Entity::delete_many()
                    .filter(ingredient::Column::RecipeId.eq(id))
                    .exec(&txn)
                    .await?;
                insert_ingredients(&txn, id, names, now).await?
            }
            None => load_ingredients(&txn, &[id]).await?.remove(&id).unwrap_or_default(),
        };
        txn.commit().await?;
        Ok(Some(recipe_record(row, items)))
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = recipe::Entity::update_many()
            .col_expr(recipe::Column::IsActive, Expr::value(false))
            .col_expr(recipe::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(recipe::Column::RecipeId.eq(id))
            .filter(recipe::Column::IsActive.eq(true))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }
}
