use super::AccessCache;
use crate::playlist::PlaylistAccessMeta;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use uuid::Uuid;

/// Thin client contract for the shared cache deployment (e.g. a redis
/// cluster). Implementations live with the rest of the storage clients,
/// outside this crate.
#[async_trait]
pub trait RemoteCacheClient: Send + Sync {
    /// Returns the raw bytes stored under the key.
    /// Returns Ok(None) if the key is absent or already expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores bytes under the key with the given time-to-live.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Removes the key if present.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// TTL policy for L2 entries: a fixed base plus a uniformly random jitter
/// picked per write, so entries written in a burst do not all expire in the
/// same instant.
#[derive(Debug, Clone, Copy)]
pub struct RemoteCacheTtl {
    pub base: Duration,
    pub jitter: Duration,
}

impl RemoteCacheTtl {
    fn pick(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.base;
        }
        let jitter_ms = rand::rng().random_range(0..self.jitter.as_millis() as u64);
        self.base + Duration::from_millis(jitter_ms)
    }
}

/// Shared L2 tier over a [`RemoteCacheClient`]. Projections are stored as
/// JSON under a per-playlist key.
pub struct RemoteAccessCache<C> {
    client: C,
    ttl: RemoteCacheTtl,
}

impl<C: RemoteCacheClient> RemoteAccessCache<C> {
    pub fn new(client: C, ttl: RemoteCacheTtl) -> Self {
        Self { client, ttl }
    }

    fn key(playlist_id: Uuid) -> String {
        format!("playlist_access:{playlist_id}")
    }
}

#[async_trait]
impl<C: RemoteCacheClient> AccessCache for RemoteAccessCache<C> {
    async fn get(&self, playlist_id: Uuid) -> Result<Option<PlaylistAccessMeta>> {
        let data = self
            .client
            .get(&Self::key(playlist_id))
            .await
            .context("failed to read access meta from remote cache")?;
        let Some(data) = data else {
            return Ok(None);
        };
        let meta = serde_json::from_slice(&data)
            .context("failed to decode cached access meta")?;
        Ok(Some(meta))
    }

    async fn set(&self, playlist_id: Uuid, meta: PlaylistAccessMeta) -> Result<()> {
        let data = serde_json::to_vec(&meta).context("failed to encode access meta")?;
        self.client
            .set(&Self::key(playlist_id), data, self.ttl.pick())
            .await
            .context("failed to write access meta to remote cache")
    }

    async fn delete(&self, playlist_id: Uuid) -> Result<()> {
        self.client
            .delete(&Self::key(playlist_id))
            .await
            .context("failed to delete access meta from remote cache")
    }
}
