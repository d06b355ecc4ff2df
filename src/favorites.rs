//! Favorite relations between users and playlists.

use crate::playlist::{Caller, PlaylistError, PlaylistMeta};
use crate::policy::PlaylistPolicy;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Durable store of (user, playlist) favorite pairs.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Records that the user favorited the playlist. Already-present pairs
    /// are a no-op.
    async fn add_favorite(&self, user_id: Uuid, playlist_id: Uuid) -> Result<()>;

    /// Returns the playlists the user has favorited.
    async fn user_favorites(&self, user_id: Uuid) -> Result<Vec<PlaylistMeta>>;

    /// Removes one user's favorite of the playlist, if present.
    async fn delete_favorite(&self, user_id: Uuid, playlist_id: Uuid) -> Result<()>;

    /// Returns the users who favorited the playlist. The owner's own entry
    /// is included only when `include_owner` is set.
    async fn users_with_favorite(&self, playlist_id: Uuid, include_owner: bool)
        -> Result<Vec<Uuid>>;

    /// Removes every favorite of the playlist, keeping the owner's entry
    /// unless `include_owner` is set.
    async fn delete_all_favorites(&self, playlist_id: Uuid, include_owner: bool) -> Result<()>;

    /// Re-adds the playlist to the given users' favorites.
    async fn restore_favorites(&self, user_ids: &[Uuid], playlist_id: Uuid) -> Result<()>;

    /// Returns whether the user has favorited the playlist.
    async fn is_favorite(&self, user_id: Uuid, playlist_id: Uuid) -> Result<bool>;
}

/// The favorites surface the sagas drive: snapshot the holders, bulk-evict,
/// restore a snapshot. Implemented by [`PlaylistFavoritesService`].
#[async_trait]
pub trait FavoritesEviction: Send + Sync {
    async fn users_with_favorite(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
        include_owner: bool,
    ) -> Result<Vec<Uuid>, PlaylistError>;

    async fn delete_all_favorites(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
        include_owner: bool,
    ) -> Result<(), PlaylistError>;

    async fn restore_favorites(
        &self,
        caller: &Caller,
        user_ids: &[Uuid],
        playlist_id: Uuid,
    ) -> Result<(), PlaylistError>;
}

pub struct PlaylistFavoritesService {
    store: Arc<dyn FavoritesStore>,
    policy: Arc<dyn PlaylistPolicy>,
}

impl PlaylistFavoritesService {
    pub fn new(store: Arc<dyn FavoritesStore>, policy: Arc<dyn PlaylistPolicy>) -> Self {
        Self { store, policy }
    }

    /// Adds the playlist to the caller's favorites. The caller must be able
    /// to view the playlist.
    pub async fn add_to_favorites(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<(), PlaylistError> {
        let Some(user_id) = caller.user_id() else {
            return Err(PlaylistError::Forbidden);
        };
        self.policy.can_view(caller, playlist_id).await?;
        self.store
            .add_favorite(user_id, playlist_id)
            .await
            .context("failed to add favorite")?;
        Ok(())
    }

    /// Returns the caller's own favorites. There is no way to list another
    /// user's.
    pub async fn user_favorites(&self, caller: &Caller) -> Result<Vec<PlaylistMeta>, PlaylistError> {
        let Some(user_id) = caller.user_id() else {
            return Err(PlaylistError::Forbidden);
        };
        let favorites = self
            .store
            .user_favorites(user_id)
            .await
            .context("failed to load favorites")?;
        Ok(favorites)
    }

    /// Removes the playlist from the caller's favorites.
    pub async fn remove_from_favorites(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<(), PlaylistError> {
        let Some(user_id) = caller.user_id() else {
            return Err(PlaylistError::Forbidden);
        };
        self.store
            .delete_favorite(user_id, playlist_id)
            .await
            .context("failed to remove favorite")?;
        Ok(())
    }

    /// Returns whether the caller has favorited the playlist. Anonymous
    /// callers trivially have not.
    pub async fn is_favorite(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<bool, PlaylistError> {
        let Some(user_id) = caller.user_id() else {
            return Ok(false);
        };
        self.policy.can_view(caller, playlist_id).await?;
        let is_favorite = self
            .store
            .is_favorite(user_id, playlist_id)
            .await
            .context("failed to check favorite")?;
        Ok(is_favorite)
    }
}

#[async_trait]
impl FavoritesEviction for PlaylistFavoritesService {
    async fn users_with_favorite(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
        include_owner: bool,
    ) -> Result<Vec<Uuid>, PlaylistError> {
        self.policy.can_view(caller, playlist_id).await?;
        let user_ids = self
            .store
            .users_with_favorite(playlist_id, include_owner)
            .await
            .context("failed to list favorite holders")?;
        Ok(user_ids)
    }

    async fn delete_all_favorites(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
        include_owner: bool,
    ) -> Result<(), PlaylistError> {
        self.policy.can_delete(caller, playlist_id).await?;
        self.store
            .delete_all_favorites(playlist_id, include_owner)
            .await
            .context("failed to delete favorites")?;
        Ok(())
    }

    async fn restore_favorites(
        &self,
        caller: &Caller,
        user_ids: &[Uuid],
        playlist_id: Uuid,
    ) -> Result<(), PlaylistError> {
        self.policy.can_delete(caller, playlist_id).await?;
        self.store
            .restore_favorites(user_ids, playlist_id)
            .await
            .context("failed to restore favorites")?;
        Ok(())
    }
}
