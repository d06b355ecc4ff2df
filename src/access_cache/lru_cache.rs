use super::AccessCache;
use crate::playlist::PlaylistAccessMeta;
use anyhow::Result;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use uuid::Uuid;

/// Process-local L1 tier: bounded, capacity-evicted, no TTL.
///
/// Entries live until they are explicitly deleted, refreshed, or pushed out
/// by newer entries once the cache is full. The lock is never held across an
/// await point.
pub struct LruAccessCache {
    entries: Mutex<LruCache<Uuid, PlaylistAccessMeta>>,
}

impl LruAccessCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }
}

#[async_trait]
impl AccessCache for LruAccessCache {
    async fn get(&self, playlist_id: Uuid) -> Result<Option<PlaylistAccessMeta>> {
        Ok(self.entries.lock().unwrap().get(&playlist_id).copied())
    }

    async fn set(&self, playlist_id: Uuid, meta: PlaylistAccessMeta) -> Result<()> {
        self.entries.lock().unwrap().put(playlist_id, meta);
        Ok(())
    }

    async fn delete(&self, playlist_id: Uuid) -> Result<()> {
        self.entries.lock().unwrap().pop(&playlist_id);
        Ok(())
    }
}
