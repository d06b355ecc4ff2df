//! Ordered track membership of playlists.

use crate::playlist::{Caller, PlaylistError, PlaylistTrack, TrackMeta};
use crate::policy::PlaylistPolicy;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Durable store of playlist-track associations.
#[async_trait]
pub trait PlaylistTracksStore: Send + Sync {
    /// Appends the track at the trailing position of the playlist.
    async fn add_track(&self, playlist_id: Uuid, track_id: Uuid) -> Result<()>;

    /// Removes one track from the playlist, closing the position gap.
    async fn delete_track(&self, playlist_id: Uuid, track_id: Uuid) -> Result<()>;

    /// Removes every track association of the playlist.
    /// Returns the number of rows removed; 0 means the playlist was already
    /// empty.
    async fn delete_all_tracks(&self, playlist_id: Uuid) -> Result<usize>;

    /// Returns the playlist's tracks in position order.
    async fn all_tracks(&self, playlist_id: Uuid) -> Result<Vec<TrackMeta>>;

    /// Moves the association's track to the association's position.
    async fn change_position(&self, track: &PlaylistTrack) -> Result<()>;
}

/// The tracks surface the deletion saga drives: list, bulk-delete, restore.
/// Implemented by [`PlaylistTracksService`].
#[async_trait]
pub trait TracksRemoval: Send + Sync {
    async fn all_tracks(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<Vec<TrackMeta>, PlaylistError>;

    async fn delete_all_tracks(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<usize, PlaylistError>;

    async fn restore_tracks(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
        track_ids: &[Uuid],
    ) -> Result<(), PlaylistError>;
}

pub struct PlaylistTracksService {
    store: Arc<dyn PlaylistTracksStore>,
    policy: Arc<dyn PlaylistPolicy>,
}

impl PlaylistTracksService {
    pub fn new(store: Arc<dyn PlaylistTracksStore>, policy: Arc<dyn PlaylistPolicy>) -> Self {
        Self { store, policy }
    }

    /// Appends a track. Owner-gated.
    pub async fn add_track(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
        track_id: Uuid,
    ) -> Result<(), PlaylistError> {
        self.policy.can_edit(caller, playlist_id).await?;
        self.store
            .add_track(playlist_id, track_id)
            .await
            .context("failed to add track")?;
        Ok(())
    }

    /// Removes a single track. Owner-gated.
    pub async fn delete_track(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
        track_id: Uuid,
    ) -> Result<(), PlaylistError> {
        self.policy.can_edit(caller, playlist_id).await?;
        self.store
            .delete_track(playlist_id, track_id)
            .await
            .context("failed to delete track")?;
        Ok(())
    }

    /// Moves a track to a new position. Owner-gated.
    pub async fn change_position(
        &self,
        caller: &Caller,
        track: &PlaylistTrack,
    ) -> Result<(), PlaylistError> {
        self.policy.can_edit(caller, track.playlist_id).await?;
        self.store
            .change_position(track)
            .await
            .context("failed to change track position")?;
        Ok(())
    }
}

#[async_trait]
impl TracksRemoval for PlaylistTracksService {
    async fn all_tracks(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<Vec<TrackMeta>, PlaylistError> {
        self.policy.can_view(caller, playlist_id).await?;
        let tracks = self
            .store
            .all_tracks(playlist_id)
            .await
            .context("failed to list tracks")?;
        Ok(tracks)
    }

    // Bulk removal and restore are deletion-saga operations, so they use
    // the delete gate: an admin clearing out a public playlist is allowed
    // even though they could never edit it.
    async fn delete_all_tracks(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<usize, PlaylistError> {
        self.policy.can_delete(caller, playlist_id).await?;
        let removed = self
            .store
            .delete_all_tracks(playlist_id)
            .await
            .context("failed to delete tracks")?;
        Ok(removed)
    }

    // Restored tracks come back in snapshot order through the append path,
    // so membership survives a rollback but original positions do not.
    async fn restore_tracks(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
        track_ids: &[Uuid],
    ) -> Result<(), PlaylistError> {
        self.policy.can_delete(caller, playlist_id).await?;
        for track_id in track_ids {
            self.store
                .add_track(playlist_id, *track_id)
                .await
                .context("failed to restore track")?;
        }
        Ok(())
    }
}
