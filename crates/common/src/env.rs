//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::{info, warn};

/// Ensure the media root exists so recipe image paths can be served.
/// Creates it when missing; a path that exists but is not a directory is an error.
pub async fn ensure_media_root(media_root: &str) -> anyhow::Result<()> {
    match tokio::fs::metadata(media_root).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!("media root {media_root} exists but is not a directory")),
        Err(_) => {
            warn!(%media_root, "media root not found; creating it");
            tokio::fs::create_dir_all(media_root)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {media_root}: {e}"))?;
            info!(%media_root, "media root created");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_media_root() {
        let dir = std::env::temp_dir().join(format!("media-{}", uuid::Uuid::new_v4()));
        let path = dir.to_string_lossy().to_string();
        ensure_media_root(&path).await.unwrap();
        assert!(tokio::fs::metadata(&path).await.unwrap().is_dir());
        // second call is a no-op
        ensure_media_root(&path).await.unwrap();
        tokio::fs::remove_dir_all(&path).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_file_as_media_root() {
        let file = std::env::temp_dir().join(format!("media-file-{}", uuid::Uuid::new_v4()));
        tokio::fs::write(&file, b"x").await.unwrap();
        let res = ensure_media_root(&file.to_string_lossy()).await;
        assert!(res.is_err());
        tokio::fs::remove_file(&file).await.unwrap();
    }
}
