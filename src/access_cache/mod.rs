//! Two-tier caching for playlist access projections.
//!
//! The chain composes an optional process-local L1 and an optional shared L2
//! in front of the durable access-meta store. Reads fall through tier by
//! tier and populate the tiers above on the way back; privacy updates write
//! the durable store first and refresh the tiers only after that succeeds.

mod cached_store;
mod lru_cache;
mod remote_cache;

pub use cached_store::CachedAccessMetaStore;
pub use lru_cache::LruAccessCache;
pub use remote_cache::{RemoteAccessCache, RemoteCacheClient, RemoteCacheTtl};

use crate::playlist::PlaylistAccessMeta;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// A single cache tier holding access projections.
#[async_trait]
pub trait AccessCache: Send + Sync {
    /// Returns the cached projection for the playlist.
    /// Returns Ok(None) on a cache miss.
    /// Returns Err if the tier itself failed; the chain treats that as a
    /// hard dependency failure, never as a miss.
    async fn get(&self, playlist_id: Uuid) -> Result<Option<PlaylistAccessMeta>>;

    /// Stores the projection for the playlist, replacing any previous entry.
    async fn set(&self, playlist_id: Uuid, meta: PlaylistAccessMeta) -> Result<()>;

    /// Drops the cached projection if present. Absent entries are not an
    /// error.
    async fn delete(&self, playlist_id: Uuid) -> Result<()>;
}

/// Durable store of access projections, the relational source of truth.
#[async_trait]
pub trait AccessMetaStore: Send + Sync {
    /// Returns the access projection for the playlist.
    /// Returns Ok(None) if the playlist does not exist.
    /// Returns Err if there is a store error.
    async fn get_access_meta(&self, playlist_id: Uuid) -> Result<Option<PlaylistAccessMeta>>;

    /// Persists a new privacy flag for the playlist.
    async fn update_privacy(&self, playlist_id: Uuid, is_private: bool) -> Result<()>;
}
