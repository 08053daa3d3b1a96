//! Video asset persistence.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use vshelf_models::{VideoAsset, VideoId};

use crate::error::RepositoryError;

/// Create/read/update of video asset records.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn get(&self, id: &VideoId) -> Result<Option<VideoAsset>, RepositoryError>;

    /// Replace an existing record. Fails with `NotFound` if it does not exist.
    async fn update(&self, asset: &VideoAsset) -> Result<(), RepositoryError>;

    /// Store a new record. Fails with `AlreadyExists` on id collision.
    async fn insert(&self, asset: &VideoAsset) -> Result<(), RepositoryError>;
}

/// Process-local repository.
#[derive(Debug, Default)]
pub struct InMemoryAssetRepository {
    assets: RwLock<HashMap<VideoId, VideoAsset>>,
}

impl InMemoryAssetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.assets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.assets.read().await.is_empty()
    }
}

#[async_trait]
impl AssetRepository for InMemoryAssetRepository {
    async fn get(&self, id: &VideoId) -> Result<Option<VideoAsset>, RepositoryError> {
        Ok(self.assets.read().await.get(id).cloned())
    }

    async fn update(&self, asset: &VideoAsset) -> Result<(), RepositoryError> {
        let mut assets = self.assets.write().await;
        match assets.get_mut(&asset.id) {
            Some(existing) => {
                *existing = asset.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(asset.id)),
        }
    }

    async fn insert(&self, asset: &VideoAsset) -> Result<(), RepositoryError> {
        let mut assets = self.assets.write().await;
        if assets.contains_key(&asset.id) {
            return Err(RepositoryError::AlreadyExists(asset.id));
        }
        assets.insert(asset.id, asset.clone());
        Ok(())
    }
}
