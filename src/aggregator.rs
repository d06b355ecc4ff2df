//! Read-side assembly of full playlist views.

use crate::favorites::PlaylistFavoritesService;
use crate::playlist::{AggregatedPlaylist, Caller, PlaylistError, UserInfo};
use crate::playlist_meta::PlaylistMetaService;
use crate::playlist_tracks::{PlaylistTracksService, TracksRemoval};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Lookup of public user info, owned by the user subsystem.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Returns the user's public info.
    /// Returns Ok(None) if the user does not exist.
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserInfo>>;
}

/// Assembles [`AggregatedPlaylist`] views out of the gated playlist
/// services, so every policy check of the underlying pieces applies
/// unchanged.
pub struct PlaylistAggregator {
    meta: Arc<PlaylistMetaService>,
    favorites: Arc<PlaylistFavoritesService>,
    tracks: Arc<PlaylistTracksService>,
    users: Arc<dyn UserLookup>,
}

impl PlaylistAggregator {
    pub fn new(
        meta: Arc<PlaylistMetaService>,
        favorites: Arc<PlaylistFavoritesService>,
        tracks: Arc<PlaylistTracksService>,
        users: Arc<dyn UserLookup>,
    ) -> Self {
        Self {
            meta,
            favorites,
            tracks,
            users,
        }
    }

    /// Builds the full view of one playlist.
    pub async fn get_playlist(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<AggregatedPlaylist, PlaylistError> {
        let meta = self.meta.get_meta(caller, playlist_id).await?;
        let owner = self
            .users
            .get_user(meta.owner_id)
            .await
            .context("failed to load playlist owner")?
            .ok_or(PlaylistError::NotFound)?;
        let is_favorite = self.favorites.is_favorite(caller, playlist_id).await?;
        let tracks = self.tracks.all_tracks(caller, playlist_id).await?;

        Ok(AggregatedPlaylist {
            id: meta.id,
            owner,
            name: meta.name,
            description: meta.description,
            is_private: meta.is_private,
            rating: meta.rating,
            created_at: meta.created_at,
            updated_at: meta.updated_at,
            is_favorite,
            tracks_count: tracks.len(),
            tracks,
        })
    }

    /// Builds full views for several playlists, in the given order. Fails on
    /// the first playlist the caller may not view.
    pub async fn get_playlists(
        &self,
        caller: &Caller,
        playlist_ids: &[Uuid],
    ) -> Result<Vec<AggregatedPlaylist>, PlaylistError> {
        let mut playlists = Vec::with_capacity(playlist_ids.len());
        for playlist_id in playlist_ids {
            playlists.push(self.get_playlist(caller, *playlist_id).await?);
        }
        Ok(playlists)
    }
}
