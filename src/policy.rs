//! Capability decisions for playlist operations.
//!
//! Pure decision logic over the caller's claims and the playlist's access
//! projection; the projection is fetched through the cache chain behind
//! [`AccessMetaSource`].

use crate::playlist::{Caller, PlaylistAccessMeta, PlaylistError};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Source of access projections, as seen by the policy service. Implemented
/// by the cached access-meta store.
#[async_trait]
pub trait AccessMetaSource: Send + Sync {
    /// Returns the access projection for the playlist.
    /// Returns `PlaylistError::NotFound` if the playlist does not exist.
    async fn get_access_meta(&self, playlist_id: Uuid)
        -> Result<PlaylistAccessMeta, PlaylistError>;
}

/// Capability checks consulted by every playlist service. A denial is
/// `PlaylistError::Forbidden`; projection fetch failures pass through as
/// ordinary errors.
#[async_trait]
pub trait PlaylistPolicy: Send + Sync {
    /// Anyone may view a public playlist; only the owner may view a private
    /// one.
    async fn can_view(&self, caller: &Caller, playlist_id: Uuid) -> Result<(), PlaylistError>;

    /// Only the owner may edit. Admins get no edit override.
    async fn can_edit(&self, caller: &Caller, playlist_id: Uuid) -> Result<(), PlaylistError>;

    /// The owner may always delete; an admin may delete a playlist only
    /// while it is public.
    async fn can_delete(&self, caller: &Caller, playlist_id: Uuid) -> Result<(), PlaylistError>;
}

pub struct PlaylistPolicyService {
    access: Arc<dyn AccessMetaSource>,
}

impl PlaylistPolicyService {
    pub fn new(access: Arc<dyn AccessMetaSource>) -> Self {
        Self { access }
    }
}

#[async_trait]
impl PlaylistPolicy for PlaylistPolicyService {
    async fn can_view(&self, caller: &Caller, playlist_id: Uuid) -> Result<(), PlaylistError> {
        let meta = self.access.get_access_meta(playlist_id).await?;
        if !meta.is_private || caller.is_user(meta.owner_id) {
            return Ok(());
        }
        Err(PlaylistError::Forbidden)
    }

    async fn can_edit(&self, caller: &Caller, playlist_id: Uuid) -> Result<(), PlaylistError> {
        let meta = self.access.get_access_meta(playlist_id).await?;
        if caller.is_user(meta.owner_id) {
            return Ok(());
        }
        Err(PlaylistError::Forbidden)
    }

    async fn can_delete(&self, caller: &Caller, playlist_id: Uuid) -> Result<(), PlaylistError> {
        let meta = self.access.get_access_meta(playlist_id).await?;
        if caller.is_user(meta.owner_id) || (caller.is_admin() && !meta.is_private) {
            return Ok(());
        }
        Err(PlaylistError::Forbidden)
    }
}
