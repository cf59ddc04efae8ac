use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewRecipe, RecipeChanges, RecipeQuery, RecipeRecord};
use crate::errors::ServiceError;

/// Persistence for recipes and their ingredients.
///
/// Implementations must enforce slug uniqueness across all records (active or not)
/// and report a clash as `ServiceError::Conflict`.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// One page of active recipes matching the query, plus the total match count.
    async fn list_active(&self, query: &RecipeQuery) -> Result<(Vec<RecipeRecord>, u64), ServiceError>;
    async fn find_active(&self, id: Uuid) -> Result<Option<RecipeRecord>, ServiceError>;
    /// Whether any record other than `exclude` holds `slug`.
    async fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, ServiceError>;
    /// Insert the recipe and its ingredients atomically.
    async fn insert(&self, new: NewRecipe) -> Result<RecipeRecord, ServiceError>;
    /// Apply changes to an active record atomically; `None` if it is missing or inactive.
    async fn update(&self, id: Uuid, changes: RecipeChanges) -> Result<Option<RecipeRecord>, ServiceError>;
    /// Mark an active record inactive; `false` if there was nothing to deactivate.
    async fn deactivate(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// In-memory repository for tests and local runs without PostgreSQL.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Mutex;

    use chrono::Utc;

    use crate::recipe::domain::{IngredientRecord, Ordering};

    #[derive(Default)]
    pub struct InMemoryRecipeRepository {
        records: Mutex<Vec<RecipeRecord>>, // insertion order
        stale_slug_checks: AtomicBool,
        failing: AtomicBool,
        list_calls: AtomicUsize,
        find_calls: AtomicUsize,
    }

    impl InMemoryRecipeRepository {
        pub fn new() -> Self { Self::default() }

        /// Make `slug_taken` always answer `false`, as if another writer raced us.
        pub fn set_stale_slug_checks(&self, on: bool) { self.stale_slug_checks.store(on, AtomicOrdering::SeqCst); }

        /// Make every call fail with a store error.
        pub fn set_failing(&self, on: bool) { self.failing.store(on, AtomicOrdering::SeqCst); }

        pub fn list_calls(&self) -> usize { self.list_calls.load(AtomicOrdering::SeqCst) }

        pub fn find_calls(&self) -> usize { self.find_calls.load(AtomicOrdering::SeqCst) }

        /// Every stored record, inactive ones included.
        pub fn all(&self) -> Vec<RecipeRecord> { self.records.lock().unwrap().clone() }

        fn check(&self) -> Result<(), ServiceError> {
            if self.failing.load(AtomicOrdering::SeqCst) {
                return Err(ServiceError::Db("store unavailable".into()));
            }
            Ok(())
        }
    }

    fn ingredients_for(recipe_id: Uuid, names: Vec<String>) -> Vec<IngredientRecord> {
        let now = Utc::now();
        names
            .into_iter()
            .map(|name| IngredientRecord { id: Uuid::new_v4(), recipe_id, name, created_at: now, updated_at: now })
            .collect()
    }

    fn slug_conflict(slug: &str) -> ServiceError {
        ServiceError::Conflict(format!("duplicate key value violates unique constraint \"uniq_recipes_master_slug\" ({slug})"))
    }

    #[async_trait]
    impl RecipeRepository for InMemoryRecipeRepository {
        async fn list_active(&self, query: &RecipeQuery) -> Result<(Vec<RecipeRecord>, u64), ServiceError> {
            self.check()?;
            self.list_calls.fetch_add(1, AtomicOrdering::SeqCst);
            let records = self.records.lock().unwrap();
            let mut matched: Vec<(usize, &RecipeRecord)> = records
                .iter()
                .enumerate()
                .filter(|(_, r)| r.is_active)
                .filter(|(_, r)| query.recipe_type.map_or(true, |t| r.recipe_type == t))
                .filter(|(_, r)| query.search.as_deref().map_or(true, |s| r.name.to_lowercase().contains(s)))
                .collect();
            match query.ordering {
                Ordering::CreatedAsc => matched.sort_by_key(|(i, r)| (r.created_at, *i)),
                Ordering::CreatedDesc => matched.sort_by_key(|(i, r)| std::cmp::Reverse((r.created_at, *i))),
                Ordering::NameAsc => matched.sort_by(|a, b| a.1.name.cmp(&b.1.name).then(a.0.cmp(&b.0))),
                Ordering::NameDesc => matched.sort_by(|a, b| b.1.name.cmp(&a.1.name).then(a.0.cmp(&b.0))),
            }
            let count = matched.len() as u64;
            let (_, per) = query.pagination.normalize();
            let page = matched
                .into_iter()
                .skip(query.pagination.offset() as usize)
                .take(per as usize)
                .map(|(_, r)| r.clone())
                .collect();
            Ok((page, count))
        }

        async fn find_active(&self, id: Uuid) -> Result<Option<RecipeRecord>, ServiceError> {
            self.check()?;
            self.find_calls.fetch_add(1, AtomicOrdering::SeqCst);
            let records = self.records.lock().unwrap();
            Ok(records.iter().find(|r| r.id == id && r.is_active).cloned())
        }

        async fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, ServiceError> {
            self.check()?;
            if self.stale_slug_checks.load(AtomicOrdering::SeqCst) {
                return Ok(false);
            }
            let records = self.records.lock().unwrap();
            Ok(records.iter().any(|r| r.slug == slug && Some(r.id) != exclude))
        }

        async fn insert(&self, new: NewRecipe) -> Result<RecipeRecord, ServiceError> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            if records.iter().any(|r| r.slug == new.slug) {
                return Err(slug_conflict(&new.slug));
            }
            let now = Utc::now();
            let record = RecipeRecord {
                id: new.id,
                name: new.name,
                description: new.description,
                image: new.image,
                slug: new.slug,
                recipe_type: new.recipe_type,
                is_active: true,
                created_at: now,
                updated_at: now,
                ingredients: ingredients_for(new.id, new.ingredients),
            };
            records.push(record.clone());
            Ok(record)
        }

        async fn update(&self, id: Uuid, changes: RecipeChanges) -> Result<Option<RecipeRecord>, ServiceError> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            if let Some(slug) = &changes.slug {
                if records.iter().any(|r| &r.slug == slug && r.id != id) {
                    return Err(slug_conflict(slug));
                }
            }
            let Some(record) = records.iter_mut().find(|r| r.id == id && r.is_active) else {
                return Ok(None);
            };
            if let Some(name) = changes.name { record.name = name; }
            if let Some(description) = changes.description { record.description = description; }
            if let Some(image) = changes.image { record.image = image; }
            if let Some(slug) = changes.slug { record.slug = slug; }
            if let Some(t) = changes.recipe_type { record.recipe_type = t; }
            if let Some(names) = changes.ingredients { record.ingredients = ingredients_for(id, names); }
            record.updated_at = Utc::now();
            Ok(Some(record.clone()))
        }

        async fn deactivate(&self, id: Uuid) -> Result<bool, ServiceError> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            match records.iter_mut().find(|r| r.id == id && r.is_active) {
                Some(record) => {
                    record.is_active = false;
                    record.updated_at = Utc::now();
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }
}
