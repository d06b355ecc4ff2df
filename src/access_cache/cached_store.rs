use super::{AccessCache, AccessMetaStore};
use crate::playlist::{PlaylistAccessMeta, PlaylistError};
use crate::playlist_meta::AccessMetaInvalidation;
use crate::policy::AccessMetaSource;
use crate::privacy::PrivacyUpdate;
use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Read-through/write-through chain in front of the durable access-meta
/// store.
///
/// Both tiers are optional; a chain without caches degenerates to the bare
/// store. A tier returning an error (as opposed to a miss) fails the whole
/// operation: a degraded cache is a hard dependency failure here, not
/// something to silently route around.
pub struct CachedAccessMetaStore {
    store: Arc<dyn AccessMetaStore>,
    l1: Option<Arc<dyn AccessCache>>,
    l2: Option<Arc<dyn AccessCache>>,
}

impl CachedAccessMetaStore {
    pub fn new(store: Arc<dyn AccessMetaStore>) -> Self {
        Self {
            store,
            l1: None,
            l2: None,
        }
    }

    pub fn with_l1(mut self, cache: Arc<dyn AccessCache>) -> Self {
        self.l1 = Some(cache);
        self
    }

    pub fn with_l2(mut self, cache: Arc<dyn AccessCache>) -> Self {
        self.l2 = Some(cache);
        self
    }

    /// Returns the access projection, trying L1, then L2, then the durable
    /// store. Hits in a lower tier populate the tiers above best-effort on
    /// the way back.
    pub async fn get_access_meta(
        &self,
        playlist_id: Uuid,
    ) -> Result<PlaylistAccessMeta, PlaylistError> {
        if let Some(l1) = &self.l1 {
            if let Some(meta) = l1
                .get(playlist_id)
                .await
                .context("l1 access cache read failed")?
            {
                return Ok(meta);
            }
        }

        if let Some(l2) = &self.l2 {
            if let Some(meta) = l2
                .get(playlist_id)
                .await
                .context("l2 access cache read failed")?
            {
                if let Some(l1) = &self.l1 {
                    if let Err(err) = l1.set(playlist_id, meta).await {
                        warn!("failed to backfill l1 access cache for {playlist_id}: {err:#}");
                    }
                }
                return Ok(meta);
            }
        }

        let meta = self
            .store
            .get_access_meta(playlist_id)
            .await
            .context("access meta store read failed")?
            .ok_or(PlaylistError::NotFound)?;
        debug!("access meta for {playlist_id} loaded from durable store");

        if let Some(l2) = &self.l2 {
            if let Err(err) = l2.set(playlist_id, meta).await {
                warn!("failed to populate l2 access cache for {playlist_id}: {err:#}");
            }
        }
        if let Some(l1) = &self.l1 {
            if let Err(err) = l1.set(playlist_id, meta).await {
                warn!("failed to populate l1 access cache for {playlist_id}: {err:#}");
            }
        }

        Ok(meta)
    }

    /// Persists a new privacy flag, then refreshes the cache tiers.
    ///
    /// The durable write happens first; if it fails no tier is touched, so
    /// the caches can only ever lag the store, never lead it.
    pub async fn update_privacy(
        &self,
        playlist_id: Uuid,
        is_private: bool,
    ) -> Result<(), PlaylistError> {
        self.store
            .update_privacy(playlist_id, is_private)
            .await
            .context("access meta store privacy update failed")?;

        let mut meta = self.get_access_meta(playlist_id).await?;
        meta.is_private = is_private;

        if let Some(l2) = &self.l2 {
            l2.set(playlist_id, meta)
                .await
                .context("l2 access cache refresh failed")?;
        }
        if let Some(l1) = &self.l1 {
            l1.set(playlist_id, meta)
                .await
                .context("l1 access cache refresh failed")?;
        }

        Ok(())
    }

    /// Drops the projection from both tiers. The durable row is owned by
    /// meta deletion and is not touched here.
    pub async fn delete_access_meta(&self, playlist_id: Uuid) -> Result<(), PlaylistError> {
        if let Some(l2) = &self.l2 {
            l2.delete(playlist_id)
                .await
                .context("l2 access cache delete failed")?;
        }
        if let Some(l1) = &self.l1 {
            l1.delete(playlist_id)
                .await
                .context("l1 access cache delete failed")?;
        }
        Ok(())
    }
}

#[async_trait]
impl AccessMetaSource for CachedAccessMetaStore {
    async fn get_access_meta(
        &self,
        playlist_id: Uuid,
    ) -> Result<PlaylistAccessMeta, PlaylistError> {
        CachedAccessMetaStore::get_access_meta(self, playlist_id).await
    }
}

#[async_trait]
impl PrivacyUpdate for CachedAccessMetaStore {
    async fn update_privacy(
        &self,
        playlist_id: Uuid,
        is_private: bool,
    ) -> Result<(), PlaylistError> {
        CachedAccessMetaStore::update_privacy(self, playlist_id, is_private).await
    }
}

#[async_trait]
impl AccessMetaInvalidation for CachedAccessMetaStore {
    async fn delete_access_meta(&self, playlist_id: Uuid) -> Result<(), PlaylistError> {
        CachedAccessMetaStore::delete_access_meta(self, playlist_id).await
    }
}
