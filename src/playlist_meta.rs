//! Canonical playlist rows and their lifecycle.
//!
//! `delete_meta` is the terminal step of the deletion saga: it runs after
//! favorites, cover and tracks are gone, so dependent rows never reference a
//! playlist id that is missing from the canonical table mid-flight.

use crate::playlist::{Caller, PlaylistError, PlaylistMeta};
use crate::policy::PlaylistPolicy;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Durable store of canonical playlist rows.
///
/// The owner column is written once at creation and never rewritten by
/// `update`.
#[async_trait]
pub trait PlaylistMetaStore: Send + Sync {
    /// Inserts a new playlist row.
    async fn create(&self, playlist: &PlaylistMeta) -> Result<()>;

    /// Returns the playlist with the given id.
    /// Returns Ok(None) if the playlist does not exist.
    async fn get_by_id(&self, playlist_id: Uuid) -> Result<Option<PlaylistMeta>>;

    /// Returns all playlists owned by the user, public and private.
    async fn get_by_user(&self, user_id: Uuid) -> Result<Vec<PlaylistMeta>>;

    /// Rewrites the mutable columns of an existing row.
    async fn update(&self, playlist: &PlaylistMeta) -> Result<()>;

    /// Removes the playlist row.
    async fn delete(&self, playlist_id: Uuid) -> Result<()>;
}

/// Invalidation surface of the access-cache chain, consumed when the
/// canonical row goes away. Implemented by the cached access-meta store.
#[async_trait]
pub trait AccessMetaInvalidation: Send + Sync {
    async fn delete_access_meta(&self, playlist_id: Uuid) -> Result<(), PlaylistError>;
}

/// The meta-deletion surface the deletion saga drives as its terminal step.
#[async_trait]
pub trait MetaRemoval: Send + Sync {
    async fn delete_meta(&self, caller: &Caller, playlist_id: Uuid) -> Result<(), PlaylistError>;
}

/// Fields a caller supplies when creating a playlist; everything else is
/// stamped by the service.
#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
    pub is_private: bool,
}

pub struct PlaylistMetaService {
    store: Arc<dyn PlaylistMetaStore>,
    policy: Arc<dyn PlaylistPolicy>,
    access: Arc<dyn AccessMetaInvalidation>,
}

impl PlaylistMetaService {
    pub fn new(
        store: Arc<dyn PlaylistMetaStore>,
        policy: Arc<dyn PlaylistPolicy>,
        access: Arc<dyn AccessMetaInvalidation>,
    ) -> Self {
        Self {
            store,
            policy,
            access,
        }
    }

    /// Creates a playlist owned by the caller. Anonymous callers are
    /// rejected, names must be non-empty.
    pub async fn create_meta(
        &self,
        caller: &Caller,
        new: NewPlaylist,
    ) -> Result<PlaylistMeta, PlaylistError> {
        let Some(owner_id) = caller.user_id() else {
            return Err(PlaylistError::Forbidden);
        };
        if new.name.is_empty() {
            return Err(anyhow!("playlist name cannot be empty").into());
        }

        let now = Utc::now();
        let playlist = PlaylistMeta {
            id: Uuid::new_v4(),
            owner_id,
            name: new.name,
            description: new.description,
            is_private: new.is_private,
            rating: 0,
            created_at: now,
            updated_at: now,
        };
        self.store
            .create(&playlist)
            .await
            .context("failed to create playlist")?;
        Ok(playlist)
    }

    /// Returns the playlist if the caller may view it.
    pub async fn get_meta(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<PlaylistMeta, PlaylistError> {
        self.policy.can_view(caller, playlist_id).await?;
        self.store
            .get_by_id(playlist_id)
            .await
            .context("failed to load playlist")?
            .ok_or(PlaylistError::NotFound)
    }

    /// Returns a user's playlists: all of them for the owner, public ones
    /// only for everybody else.
    pub async fn playlists_for_user(
        &self,
        caller: &Caller,
        user_id: Uuid,
    ) -> Result<Vec<PlaylistMeta>, PlaylistError> {
        let mut playlists = self
            .store
            .get_by_user(user_id)
            .await
            .context("failed to load user playlists")?;

        if !caller.is_user(user_id) {
            playlists.retain(|playlist| !playlist.is_private);
        }
        Ok(playlists)
    }

    /// Rewrites an existing playlist's mutable fields. Owner-gated.
    pub async fn update_meta(
        &self,
        caller: &Caller,
        mut playlist: PlaylistMeta,
    ) -> Result<PlaylistMeta, PlaylistError> {
        self.policy.can_edit(caller, playlist.id).await?;

        playlist.updated_at = Utc::now();
        self.store
            .update(&playlist)
            .await
            .context("failed to update playlist")?;
        Ok(playlist)
    }

    /// Removes the canonical row and the cached access projection.
    ///
    /// Cache invalidation goes first: a stale projection for a deleted
    /// playlist would keep answering policy checks until it expired.
    pub async fn delete_meta(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<(), PlaylistError> {
        self.policy.can_delete(caller, playlist_id).await?;

        self.access.delete_access_meta(playlist_id).await?;
        self.store
            .delete(playlist_id)
            .await
            .context("failed to delete playlist")?;
        Ok(())
    }
}

#[async_trait]
impl MetaRemoval for PlaylistMetaService {
    async fn delete_meta(&self, caller: &Caller, playlist_id: Uuid) -> Result<(), PlaylistError> {
        PlaylistMetaService::delete_meta(self, caller, playlist_id).await
    }
}
