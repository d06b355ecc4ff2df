//! In-memory collaborator implementations backing the e2e tests.

use anyhow::{bail, Result};
use async_trait::async_trait;
use catalog_playlists::access_cache::{AccessMetaStore, RemoteCacheClient};
use catalog_playlists::aggregator::UserLookup;
use catalog_playlists::cover::CoverStore;
use catalog_playlists::favorites::FavoritesStore;
use catalog_playlists::playlist::{
    Cover, PlaylistAccessMeta, PlaylistMeta, PlaylistTrack, TrackMeta, UserInfo,
};
use catalog_playlists::playlist_meta::PlaylistMetaStore;
use catalog_playlists::playlist_tracks::PlaylistTracksStore;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// One in-memory "deployment": playlists, favorites, tracks, covers and
/// users, all behind the same struct so the store traits can share state the
/// way the real backends share a database.
#[derive(Default)]
pub struct InMemoryCatalog {
    playlists: Mutex<HashMap<Uuid, PlaylistMeta>>,
    // playlist id -> users holding a favorite
    favorites: Mutex<HashMap<Uuid, HashSet<Uuid>>>,
    // playlist id -> track ids in position order
    tracks: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    covers: Mutex<HashMap<Uuid, Cover>>,
    users: Mutex<HashMap<Uuid, UserInfo>>,

    access_meta_reads: AtomicUsize,
    fail_delete_all_tracks: AtomicBool,
}

impl InMemoryCatalog {
    pub fn add_user(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.users.lock().unwrap().insert(
            id,
            UserInfo {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    /// How many times the durable access-meta store has been queried; cache
    /// hits do not show up here.
    pub fn access_meta_reads(&self) -> usize {
        self.access_meta_reads.load(Ordering::SeqCst)
    }

    pub fn fail_next_delete_all_tracks(&self) {
        self.fail_delete_all_tracks.store(true, Ordering::SeqCst);
    }

    pub fn playlist(&self, playlist_id: Uuid) -> Option<PlaylistMeta> {
        self.playlists.lock().unwrap().get(&playlist_id).cloned()
    }

    pub fn favorite_holders(&self, playlist_id: Uuid) -> HashSet<Uuid> {
        self.favorites
            .lock()
            .unwrap()
            .get(&playlist_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn track_ids(&self, playlist_id: Uuid) -> Vec<Uuid> {
        self.tracks
            .lock()
            .unwrap()
            .get(&playlist_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn cover(&self, playlist_id: Uuid) -> Option<Cover> {
        self.covers.lock().unwrap().get(&playlist_id).cloned()
    }

    fn owner_of(&self, playlist_id: Uuid) -> Option<Uuid> {
        self.playlists
            .lock()
            .unwrap()
            .get(&playlist_id)
            .map(|playlist| playlist.owner_id)
    }
}

#[async_trait]
impl AccessMetaStore for InMemoryCatalog {
    async fn get_access_meta(&self, playlist_id: Uuid) -> Result<Option<PlaylistAccessMeta>> {
        self.access_meta_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .playlists
            .lock()
            .unwrap()
            .get(&playlist_id)
            .map(|playlist| PlaylistAccessMeta {
                owner_id: playlist.owner_id,
                is_private: playlist.is_private,
            }))
    }

    async fn update_privacy(&self, playlist_id: Uuid, is_private: bool) -> Result<()> {
        let mut playlists = self.playlists.lock().unwrap();
        match playlists.get_mut(&playlist_id) {
            Some(playlist) => {
                playlist.is_private = is_private;
                Ok(())
            }
            None => bail!("no playlist {playlist_id}"),
        }
    }
}

#[async_trait]
impl PlaylistMetaStore for InMemoryCatalog {
    async fn create(&self, playlist: &PlaylistMeta) -> Result<()> {
        self.playlists
            .lock()
            .unwrap()
            .insert(playlist.id, playlist.clone());
        Ok(())
    }

    async fn get_by_id(&self, playlist_id: Uuid) -> Result<Option<PlaylistMeta>> {
        Ok(self.playlists.lock().unwrap().get(&playlist_id).cloned())
    }

    async fn get_by_user(&self, user_id: Uuid) -> Result<Vec<PlaylistMeta>> {
        let mut playlists: Vec<_> = self
            .playlists
            .lock()
            .unwrap()
            .values()
            .filter(|playlist| playlist.owner_id == user_id)
            .cloned()
            .collect();
        playlists.sort_by_key(|playlist| playlist.created_at);
        Ok(playlists)
    }

    async fn update(&self, playlist: &PlaylistMeta) -> Result<()> {
        let mut playlists = self.playlists.lock().unwrap();
        match playlists.get_mut(&playlist.id) {
            Some(existing) => {
                // The owner column is never rewritten.
                let owner_id = existing.owner_id;
                *existing = playlist.clone();
                existing.owner_id = owner_id;
                Ok(())
            }
            None => bail!("no playlist {}", playlist.id),
        }
    }

    async fn delete(&self, playlist_id: Uuid) -> Result<()> {
        self.playlists.lock().unwrap().remove(&playlist_id);
        Ok(())
    }
}

#[async_trait]
impl FavoritesStore for InMemoryCatalog {
    async fn add_favorite(&self, user_id: Uuid, playlist_id: Uuid) -> Result<()> {
        self.favorites
            .lock()
            .unwrap()
            .entry(playlist_id)
            .or_default()
            .insert(user_id);
        Ok(())
    }

    async fn user_favorites(&self, user_id: Uuid) -> Result<Vec<PlaylistMeta>> {
        let playlist_ids: Vec<Uuid> = self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, holders)| holders.contains(&user_id))
            .map(|(playlist_id, _)| *playlist_id)
            .collect();
        let playlists = self.playlists.lock().unwrap();
        Ok(playlist_ids
            .into_iter()
            .filter_map(|playlist_id| playlists.get(&playlist_id).cloned())
            .collect())
    }

    async fn delete_favorite(&self, user_id: Uuid, playlist_id: Uuid) -> Result<()> {
        if let Some(holders) = self.favorites.lock().unwrap().get_mut(&playlist_id) {
            holders.remove(&user_id);
        }
        Ok(())
    }

    async fn users_with_favorite(
        &self,
        playlist_id: Uuid,
        include_owner: bool,
    ) -> Result<Vec<Uuid>> {
        let owner = self.owner_of(playlist_id);
        Ok(self
            .favorite_holders(playlist_id)
            .into_iter()
            .filter(|user_id| include_owner || Some(*user_id) != owner)
            .collect())
    }

    async fn delete_all_favorites(&self, playlist_id: Uuid, include_owner: bool) -> Result<()> {
        let owner = self.owner_of(playlist_id);
        if let Some(holders) = self.favorites.lock().unwrap().get_mut(&playlist_id) {
            holders.retain(|user_id| !include_owner && Some(*user_id) == owner);
        }
        Ok(())
    }

    async fn restore_favorites(&self, user_ids: &[Uuid], playlist_id: Uuid) -> Result<()> {
        self.favorites
            .lock()
            .unwrap()
            .entry(playlist_id)
            .or_default()
            .extend(user_ids.iter().copied());
        Ok(())
    }

    async fn is_favorite(&self, user_id: Uuid, playlist_id: Uuid) -> Result<bool> {
        Ok(self.favorite_holders(playlist_id).contains(&user_id))
    }
}

#[async_trait]
impl PlaylistTracksStore for InMemoryCatalog {
    async fn add_track(&self, playlist_id: Uuid, track_id: Uuid) -> Result<()> {
        self.tracks
            .lock()
            .unwrap()
            .entry(playlist_id)
            .or_default()
            .push(track_id);
        Ok(())
    }

    async fn delete_track(&self, playlist_id: Uuid, track_id: Uuid) -> Result<()> {
        if let Some(tracks) = self.tracks.lock().unwrap().get_mut(&playlist_id) {
            tracks.retain(|id| *id != track_id);
        }
        Ok(())
    }

    async fn delete_all_tracks(&self, playlist_id: Uuid) -> Result<usize> {
        if self.fail_delete_all_tracks.swap(false, Ordering::SeqCst) {
            bail!("injected tracks failure");
        }
        Ok(self
            .tracks
            .lock()
            .unwrap()
            .remove(&playlist_id)
            .map(|tracks| tracks.len())
            .unwrap_or(0))
    }

    async fn all_tracks(&self, playlist_id: Uuid) -> Result<Vec<TrackMeta>> {
        Ok(self
            .track_ids(playlist_id)
            .into_iter()
            .enumerate()
            .map(|(index, id)| TrackMeta {
                id,
                name: format!("track {index}"),
                duration_sec: 180,
            })
            .collect())
    }

    async fn change_position(&self, track: &PlaylistTrack) -> Result<()> {
        let mut tracks = self.tracks.lock().unwrap();
        let tracks = tracks.entry(track.playlist_id).or_default();
        tracks.retain(|id| *id != track.track_id);
        let position = (track.position as usize).min(tracks.len());
        tracks.insert(position, track.track_id);
        Ok(())
    }
}

#[async_trait]
impl CoverStore for InMemoryCatalog {
    async fn get_cover(&self, playlist_id: Uuid) -> Result<Option<Cover>> {
        Ok(self.covers.lock().unwrap().get(&playlist_id).cloned())
    }

    async fn upload_cover(&self, cover: &Cover) -> Result<()> {
        self.covers
            .lock()
            .unwrap()
            .insert(cover.playlist_id, cover.clone());
        Ok(())
    }

    async fn delete_cover(&self, playlist_id: Uuid) -> Result<()> {
        self.covers.lock().unwrap().remove(&playlist_id);
        Ok(())
    }
}

#[async_trait]
impl UserLookup for InMemoryCatalog {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserInfo>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }
}

/// In-memory stand-in for the shared cache deployment. TTLs are recorded but
/// never enforced; expiry behavior belongs to the real backend.
#[derive(Default)]
pub struct InMemoryCacheClient {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryCacheClient {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl RemoteCacheClient for InMemoryCacheClient {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>, _ttl: Duration) -> Result<()> {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Shared handle to an [`InMemoryCacheClient`] that can be handed to the L2
/// tier by value while the test keeps its own handle for inspection. A local
/// newtype is required because the orphan rule forbids implementing the
/// foreign `RemoteCacheClient` trait directly for `Arc<InMemoryCacheClient>`.
pub struct SharedCacheClient(pub std::sync::Arc<InMemoryCacheClient>);

#[async_trait]
impl RemoteCacheClient for SharedCacheClient {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.0.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.0.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.0.delete(key).await
    }
}
