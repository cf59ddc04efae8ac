use std::sync::Arc;
use std::time::Duration;

use configs::CacheConfig;
use sea_orm::DatabaseConnection;
use service::cache::{CacheStore, MokaCacheStore, NoopCacheStore};
use service::recipe::repository::RecipeRepository;
use service::recipe::repo::SeaOrmRecipeRepository;
use service::recipe::RecipeService;
use tracing::info;

#[derive(Clone)]
pub struct ServerState {
    pub recipes: Arc<RecipeService>,
}

impl ServerState {
    /// Wire the recipe service over any repository, with the cache chosen by config.
    pub fn with_repository(repo: Arc<dyn RecipeRepository>, cache_cfg: &CacheConfig) -> Self {
        let cache: Arc<dyn CacheStore> = if cache_cfg.enabled {
            info!(ttl_secs = cache_cfg.ttl_secs, max_capacity = cache_cfg.max_capacity, "recipe cache enabled");
            Arc::new(MokaCacheStore::new(cache_cfg.max_capacity))
        } else {
            info!("recipe cache disabled");
            Arc::new(NoopCacheStore)
        };
        let recipes = RecipeService::new(repo, cache, Duration::from_secs(cache_cfg.ttl_secs));
        Self { recipes: Arc::new(recipes) }
    }

    pub fn from_db(db: DatabaseConnection, cache_cfg: &CacheConfig) -> Self {
        Self::with_repository(Arc::new(SeaOrmRecipeRepository::new(db)), cache_cfg)
    }
}
