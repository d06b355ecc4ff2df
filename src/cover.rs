//! Playlist cover images.
//!
//! Covers live in the object store; this service only gates access and
//! shuttles the blob around.

use crate::playlist::{Caller, Cover, PlaylistError};
use crate::policy::PlaylistPolicy;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Object-store backed cover storage.
#[async_trait]
pub trait CoverStore: Send + Sync {
    /// Returns the cover for the playlist.
    /// Returns Ok(None) if the playlist has no cover.
    async fn get_cover(&self, playlist_id: Uuid) -> Result<Option<Cover>>;

    /// Stores the cover, replacing any existing one.
    async fn upload_cover(&self, cover: &Cover) -> Result<()>;

    /// Removes the cover if present.
    async fn delete_cover(&self, playlist_id: Uuid) -> Result<()>;
}

/// The cover surface the deletion saga drives: fetch, delete, re-upload.
/// Implemented by [`PlaylistCoverService`].
#[async_trait]
pub trait CoverRemoval: Send + Sync {
    async fn get_cover(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<Option<Cover>, PlaylistError>;

    async fn delete_cover(&self, caller: &Caller, playlist_id: Uuid) -> Result<(), PlaylistError>;

    async fn upload_cover(&self, caller: &Caller, cover: &Cover) -> Result<(), PlaylistError>;
}

pub struct PlaylistCoverService {
    store: Arc<dyn CoverStore>,
    policy: Arc<dyn PlaylistPolicy>,
}

impl PlaylistCoverService {
    pub fn new(store: Arc<dyn CoverStore>, policy: Arc<dyn PlaylistPolicy>) -> Self {
        Self { store, policy }
    }
}

#[async_trait]
impl CoverRemoval for PlaylistCoverService {
    async fn get_cover(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<Option<Cover>, PlaylistError> {
        self.policy.can_view(caller, playlist_id).await?;
        let cover = self
            .store
            .get_cover(playlist_id)
            .await
            .context("failed to load cover")?;
        Ok(cover)
    }

    async fn delete_cover(&self, caller: &Caller, playlist_id: Uuid) -> Result<(), PlaylistError> {
        self.policy.can_delete(caller, playlist_id).await?;
        self.store
            .delete_cover(playlist_id)
            .await
            .context("failed to delete cover")?;
        Ok(())
    }

    async fn upload_cover(&self, caller: &Caller, cover: &Cover) -> Result<(), PlaylistError> {
        self.policy.can_edit(caller, cover.playlist_id).await?;
        self.store
            .upload_cover(cover)
            .await
            .context("failed to upload cover")?;
        Ok(())
    }
}
