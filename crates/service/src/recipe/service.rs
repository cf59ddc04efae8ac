use std::sync::Arc;
use std::time::Duration;

use models::slug::slugify;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{NewRecipe, RecipeChanges, RecipeDetail, RecipeInput, RecipePage, RecipePatch, RecipeQuery, RecipeSummary};
use super::repository::RecipeRepository;
use super::slug::{opaque_slug, resolve_unique_slug};
use super::validation::{validate_create, validate_patch};
use crate::cache::{detail_key, list_key, CacheStore, LIST_PREFIX};
use crate::errors::ServiceError;

/// Writes that hit the slug unique index are retried this many times in total.
pub const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Recipe business operations, independent of the web framework.
///
/// Reads go through the cache; writes invalidate it. Cache failures are logged and ignored.
pub struct RecipeService {
    repo: Arc<dyn RecipeRepository>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl RecipeService {
    pub fn new(repo: Arc<dyn RecipeRepository>, cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { repo, cache, ttl }
    }

    /// Active recipes matching the query, newest first by default.
    ///
    /// # Examples
    /// ```
    /// use std::{sync::Arc, time::Duration};
    /// use service::cache::NoopCacheStore;
    /// use service::pagination::Pagination;
    /// use service::recipe::{domain::{Ordering, RecipeQuery}, repository::mock::InMemoryRecipeRepository, RecipeService};
    /// let svc = RecipeService::new(Arc::new(InMemoryRecipeRepository::new()), Arc::new(NoopCacheStore), Duration::from_secs(60));
    /// let query = RecipeQuery::new(None, None, Ordering::default(), Pagination::default());
    /// let page = tokio_test::block_on(svc.list(&query)).unwrap();
    /// assert_eq!(page.count, 0);
    /// ```
    #[instrument(skip(self, query), fields(recipe_type = ?query.recipe_type, search = ?query.search, page = query.pagination.page))]
    pub async fn list(&self, query: &RecipeQuery) -> Result<RecipePage, ServiceError> {
        let key = list_key(query)
            .map_err(|e| warn!(error = %e, "cache key encoding failed"))
            .ok();
        if let Some(key) = &key {
            if let Some(page) = self.cached::<RecipePage>(key).await {
                debug!(count = page.count, "recipes_list cache hit");
                return Ok(page);
            }
        }

        let (records, count) = self.repo.list_active(query).await?;
        let page = RecipePage {
            items: records.iter().map(RecipeSummary::from).collect(),
            count,
            page: query.pagination.page,
            page_size: query.pagination.page_size,
        };
        if let Some(key) = &key {
            self.store(key, &page).await;
        }
        info!(count, returned = page.items.len(), "recipes_listed");
        Ok(page)
    }

    #[instrument(skip(self), fields(recipe_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<RecipeDetail, ServiceError> {
        let key = detail_key(id);
        if let Some(detail) = self.cached::<RecipeDetail>(&key).await {
            debug!("recipe cache hit");
            return Ok(detail);
        }
        let record = self
            .repo
            .find_active(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Recipe"))?;
        let detail = RecipeDetail::from(record);
        self.store(&key, &detail).await;
        Ok(detail)
    }

    /// Validate, assign a unique slug and persist a new recipe.
    ///
    /// # Examples
    /// ```
    /// use std::{sync::Arc, time::Duration};
    /// use service::cache::NoopCacheStore;
    /// use service::recipe::{domain::RecipeInput, repository::mock::InMemoryRecipeRepository, RecipeService};
    /// let svc = RecipeService::new(Arc::new(InMemoryRecipeRepository::new()), Arc::new(NoopCacheStore), Duration::from_secs(60));
    /// let input = RecipeInput {
    ///     recipe_name: Some("tomato soup".into()),
    ///     recipe_description: Some("A warm classic soup".into()),
    ///     recipe_type: Some("VEG".into()),
    ///     ..Default::default()
    /// };
    /// let created = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(created.recipe_name, "Tomato Soup");
    /// assert_eq!(created.recipe_slug, "tomato-soup");
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: RecipeInput) -> Result<RecipeDetail, ServiceError> {
        let valid = validate_create(&input)?;
        let base = slugify(&valid.name);

        let mut attempt = 1;
        let record = loop {
            let slug = if attempt < MAX_WRITE_ATTEMPTS {
                resolve_unique_slug(self.repo.as_ref(), &base, None).await?
            } else {
                opaque_slug(&base)
            };
            let new = NewRecipe {
                id: Uuid::new_v4(),
                name: valid.name.clone(),
                description: valid.description.clone(),
                image: valid.image.clone(),
                slug,
                recipe_type: valid.recipe_type,
                ingredients: valid.ingredients.clone(),
            };
            match self.repo.insert(new).await {
                Ok(record) => break record,
                Err(ServiceError::Conflict(msg)) if attempt < MAX_WRITE_ATTEMPTS => {
                    warn!(attempt, %msg, "slug conflict on insert, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        self.invalidate_lists().await;
        info!(recipe_id = %record.id, slug = %record.slug, "recipe_created");
        Ok(RecipeDetail::from(record))
    }

    /// Partial update; only fields present in `patch` change.
    #[instrument(skip(self, patch), fields(recipe_id = %id))]
    pub async fn update(&self, id: Uuid, patch: RecipePatch) -> Result<RecipeDetail, ServiceError> {
        let current = self
            .repo
            .find_active(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Recipe"))?;
        let valid = validate_patch(&patch)?;

        // Slug follows the name only when the name's slug base actually changes.
        let new_base = valid.name.as_deref().map(slugify).filter(|b| *b != current.slug);

        let mut attempt = 1;
        let record = loop {
            let slug = match &new_base {
                None => None,
                Some(base) if attempt < MAX_WRITE_ATTEMPTS => {
                    Some(resolve_unique_slug(self.repo.as_ref(), base, Some(id)).await?)
                }
                Some(base) => Some(opaque_slug(base)),
            }
            .filter(|s| *s != current.slug);
            let changes = RecipeChanges {
                name: valid.name.clone(),
                description: valid.description.clone(),
                image: valid.image.clone(),
                slug,
                recipe_type: valid.recipe_type,
                ingredients: valid.ingredients.clone(),
            };
            match self.repo.update(id, changes).await {
                Ok(Some(record)) => break record,
                Ok(None) => return Err(ServiceError::not_found("Recipe")),
                Err(ServiceError::Conflict(msg)) if attempt < MAX_WRITE_ATTEMPTS => {
                    warn!(attempt, %msg, "slug conflict on update, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        self.invalidate_record(id).await;
        info!(slug = %record.slug, "recipe_updated");
        Ok(RecipeDetail::from(record))
    }

    /// Mark the recipe inactive. Its slug stays reserved.
    #[instrument(skip(self), fields(recipe_id = %id))]
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.repo.find_active(id).await?.is_none() || !self.repo.deactivate(id).await? {
            return Err(ServiceError::not_found("Recipe"));
        }
        self.invalidate_record(id).await;
        info!("recipe_deleted");
        Ok(())
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(key, error = %e, "discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "cache read failed");
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!(key, error = %e, "cache encode failed");
                return;
            }
        };
        if let Err(e) = self.cache.set(key, value, self.ttl).await {
            warn!(key, error = %e, "cache write failed");
        }
    }

    async fn invalidate_lists(&self) {
        if let Err(e) = self.cache.delete_prefix(LIST_PREFIX).await {
            warn!(error = %e, "list cache invalidation failed");
        }
    }

    async fn invalidate_record(&self, id: Uuid) {
        if let Err(e) = self.cache.delete(&detail_key(id)).await {
            warn!(recipe_id = %id, error = %e, "detail cache invalidation failed");
        }
        self.invalidate_lists().await;
    }
}
