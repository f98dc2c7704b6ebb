//! Assets sub-client: paged asset list with a TTL cache.

use crate::client::FeedClient;
use crate::domain::asset::{Asset, DEFAULT_PAGE_SIZE};
use crate::error::SdkError;
use std::time::Instant;

/// Sub-client for asset operations.
pub struct Assets<'a> {
    pub(crate) client: &'a FeedClient,
}

impl<'a> Assets<'a> {
    /// Get one page of assets. Uses TTL cache.
    pub async fn list(&self, page: u32, page_size: u32) -> Result<Vec<Asset>, SdkError> {
        {
            let cache = self.client.asset_cache.read().await;
            if let Some((assets, fetched_at)) = cache.get(&(page, page_size)) {
                if fetched_at.elapsed() < self.client.asset_cache_ttl {
                    return Ok(assets.clone());
                }
            }
        }

        self.fetch(page, page_size).await
    }

    /// First page at the dashboard's default page size.
    pub async fn first_page(&self) -> Result<Vec<Asset>, SdkError> {
        self.list(0, DEFAULT_PAGE_SIZE).await
    }

    /// Bypass the cache and fetch the page again.
    pub async fn refetch(&self, page: u32, page_size: u32) -> Result<Vec<Asset>, SdkError> {
        self.client
            .asset_cache
            .write()
            .await
            .remove(&(page, page_size));
        self.fetch(page, page_size).await
    }

    /// Clear all cached pages.
    pub async fn clear_cache(&self) {
        self.client.asset_cache.write().await.clear();
    }

    async fn fetch(&self, page: u32, page_size: u32) -> Result<Vec<Asset>, SdkError> {
        let resp = self.client.http.get_assets(page, page_size).await?;
        let assets: Vec<Asset> = resp.assets.into_iter().map(Asset::from).collect();
        tracing::debug!(page, page_size, count = assets.len(), "Fetched assets");

        self.client
            .asset_cache
            .write()
            .await
            .insert((page, page_size), (assets.clone(), Instant::now()));
        Ok(assets)
    }
}
