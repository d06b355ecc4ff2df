//! Privacy toggling for playlists.
//!
//! Making a playlist private has a side effect beyond the flag itself:
//! non-owner favorites must go, or strangers would keep a working reference
//! to a playlist they can no longer view. The eviction happens before the
//! flag is persisted and is compensated if the persist fails.

use crate::favorites::FavoritesEviction;
use crate::playlist::{Caller, PlaylistError};
use crate::policy::PlaylistPolicy;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ChangePrivacyError {
    #[error("operation not permitted")]
    Forbidden,

    #[error("failed to change privacy of playlist {playlist_id}")]
    Failed {
        playlist_id: Uuid,
        #[source]
        source: PlaylistError,
    },
}

/// Write-through privacy persistence, implemented by the cached access-meta
/// store: the durable flag is written first, cache tiers refresh after.
#[async_trait::async_trait]
pub trait PrivacyUpdate: Send + Sync {
    async fn update_privacy(&self, playlist_id: Uuid, is_private: bool)
        -> Result<(), PlaylistError>;
}

pub struct PlaylistPrivacyChanger {
    policy: Arc<dyn PlaylistPolicy>,
    favorites: Arc<dyn FavoritesEviction>,
    access: Arc<dyn PrivacyUpdate>,
}

impl PlaylistPrivacyChanger {
    pub fn new(
        policy: Arc<dyn PlaylistPolicy>,
        favorites: Arc<dyn FavoritesEviction>,
        access: Arc<dyn PrivacyUpdate>,
    ) -> Self {
        Self {
            policy,
            favorites,
            access,
        }
    }

    /// Sets the playlist's privacy flag. Owner-gated.
    ///
    /// Going private evicts non-owner favorites first (snapshotting them for
    /// rollback); going public touches nothing but the flag. If persisting
    /// the flag fails after an eviction, the snapshot is restored
    /// best-effort and the persist failure is returned.
    pub async fn change_privacy(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
        is_private: bool,
    ) -> Result<(), ChangePrivacyError> {
        match self.policy.can_edit(caller, playlist_id).await {
            Ok(()) => {}
            Err(PlaylistError::Forbidden) => return Err(ChangePrivacyError::Forbidden),
            Err(source) => {
                return Err(ChangePrivacyError::Failed {
                    playlist_id,
                    source,
                })
            }
        }

        let mut evicted: Option<Vec<Uuid>> = None;
        let result = self
            .evict_and_persist(caller, playlist_id, is_private, &mut evicted)
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(source) => {
                if let Some(user_ids) = evicted {
                    if let Err(err) = self
                        .favorites
                        .restore_favorites(caller, &user_ids, playlist_id)
                        .await
                    {
                        warn!(
                            "failed to restore {} favorites while rolling back privacy \
                             change of playlist {playlist_id}: {err:#}",
                            user_ids.len()
                        );
                    }
                }
                Err(ChangePrivacyError::Failed {
                    playlist_id,
                    source,
                })
            }
        }
    }

    async fn evict_and_persist(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
        is_private: bool,
        evicted: &mut Option<Vec<Uuid>>,
    ) -> Result<(), PlaylistError> {
        if is_private {
            let user_ids = self
                .favorites
                .users_with_favorite(caller, playlist_id, false)
                .await?;
            self.favorites
                .delete_all_favorites(caller, playlist_id, false)
                .await?;
            debug!(
                "evicted {} non-owner favorites of playlist {playlist_id}",
                user_ids.len()
            );
            *evicted = Some(user_ids);
        }

        self.access.update_privacy(playlist_id, is_private).await
    }
}
