//! Unique slug resolution on top of `models::slug::slugify`.

use tracing::warn;
use uuid::Uuid;

use super::repository::RecipeRepository;
use crate::errors::ServiceError;

/// Numbered candidates tried before falling back to a random suffix.
pub const MAX_SUFFIX_ATTEMPTS: u32 = 100;

/// `base-<8 hex chars>`; used when numbered suffixes are exhausted or a write keeps conflicting.
pub fn opaque_slug(base: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}-{}", base, &id[..8])
}

/// Return `base` if no other record holds it, else the first free `base-N`.
///
/// `exclude` is the record being renamed, so it never collides with itself.
pub async fn resolve_unique_slug(
    repo: &dyn RecipeRepository,
    base: &str,
    exclude: Option<Uuid>,
) -> Result<String, ServiceError> {
    if !repo.slug_taken(base, exclude).await? {
        return Ok(base.to_string());
    }
    for n in 1..=MAX_SUFFIX_ATTEMPTS {
        let candidate = format!("{base}-{n}");
        if !repo.slug_taken(&candidate, exclude).await? {
            return Ok(candidate);
        }
    }
    let fallback = opaque_slug(base);
    warn!(base, slug = %fallback, "numbered slug suffixes exhausted");
    Ok(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::domain::NewRecipe;
    use crate::recipe::repository::mock::InMemoryRecipeRepository;
    use models::recipe::RecipeType;

    async fn seed(repo: &InMemoryRecipeRepository, slug: &str) -> Uuid {
        let id = Uuid::new_v4();
        repo.insert(NewRecipe {
            id,
            name: "Seed".into(),
            description: "seeded description".into(),
            image: None,
            slug: slug.into(),
            recipe_type: RecipeType::Vegan,
            ingredients: vec![],
        })
        .await
        .unwrap();
        id
    }

    #[tokio::test]
    async fn free_base_is_used_as_is() {
        let repo = InMemoryRecipeRepository::new();
        assert_eq!(resolve_unique_slug(&repo, "pasta", None).await.unwrap(), "pasta");
    }

    #[tokio::test]
    async fn taken_base_gets_the_first_free_number() {
        let repo = InMemoryRecipeRepository::new();
        seed(&repo, "pasta").await;
        seed(&repo, "pasta-1").await;
        assert_eq!(resolve_unique_slug(&repo, "pasta", None).await.unwrap(), "pasta-2");
    }

    #[tokio::test]
    async fn excluded_record_does_not_collide_with_itself() {
        let repo = InMemoryRecipeRepository::new();
        let id = seed(&repo, "pasta").await;
        assert_eq!(resolve_unique_slug(&repo, "pasta", Some(id)).await.unwrap(), "pasta");
    }

    #[tokio::test]
    async fn exhausted_suffixes_fall_back_to_opaque() {
        let repo = InMemoryRecipeRepository::new();
        seed(&repo, "pie").await;
        for n in 1..=MAX_SUFFIX_ATTEMPTS {
            seed(&repo, &format!("pie-{n}")).await;
        }
        let slug = resolve_unique_slug(&repo, "pie", None).await.unwrap();
        let suffix = slug.strip_prefix("pie-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn opaque_slugs_differ() {
        assert_ne!(opaque_slug("soup"), opaque_slug("soup"));
    }
}
