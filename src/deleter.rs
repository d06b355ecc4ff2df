//! Playlist deletion across independent storage backends.
//!
//! Favorites, cover, tracks and the canonical meta live in stores that share
//! no transaction, so deletion runs as a saga: steps execute in a fixed
//! order, each successful step pushes an undo value, and the first failure
//! unwinds the stack in reverse. There is no retry; a failed step ends the
//! attempt.

use crate::cover::CoverRemoval;
use crate::favorites::FavoritesEviction;
use crate::playlist::{Caller, Cover, PlaylistError};
use crate::playlist_meta::MetaRemoval;
use crate::playlist_tracks::TracksRemoval;
use crate::policy::PlaylistPolicy;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DeletePlaylistError {
    #[error("operation not permitted")]
    Forbidden,

    #[error("failed to delete playlist {playlist_id}")]
    Failed {
        playlist_id: Uuid,
        #[source]
        source: PlaylistError,
    },
}

/// A compensating action for one committed step, holding everything needed
/// to put the step's state back.
enum Undo {
    RestoreFavorites {
        favorites: Arc<dyn FavoritesEviction>,
        user_ids: Vec<Uuid>,
    },
    ReuploadCover {
        cover_service: Arc<dyn CoverRemoval>,
        cover: Cover,
    },
    RestoreTracks {
        tracks: Arc<dyn TracksRemoval>,
        track_ids: Vec<Uuid>,
    },
    /// The step found nothing to remove; there is nothing to put back.
    Nothing,
}

impl Undo {
    fn describe(&self) -> &'static str {
        match self {
            Undo::RestoreFavorites { .. } => "restore favorites",
            Undo::ReuploadCover { .. } => "re-upload cover",
            Undo::RestoreTracks { .. } => "restore tracks",
            Undo::Nothing => "nothing",
        }
    }

    async fn run(self, caller: &Caller, playlist_id: Uuid) -> Result<(), PlaylistError> {
        match self {
            Undo::RestoreFavorites {
                favorites,
                user_ids,
            } => {
                favorites
                    .restore_favorites(caller, &user_ids, playlist_id)
                    .await
            }
            Undo::ReuploadCover {
                cover_service,
                cover,
            } => cover_service.upload_cover(caller, &cover).await,
            Undo::RestoreTracks { tracks, track_ids } => {
                tracks.restore_tracks(caller, playlist_id, &track_ids).await
            }
            Undo::Nothing => Ok(()),
        }
    }
}

/// Orchestrates playlist deletion over four optional collaborators, in the
/// fixed order favorites, cover, tracks, meta. Absent collaborators are
/// skipped. Meta goes last so dependent rows never point at a playlist id
/// already missing from the canonical table.
pub struct PlaylistDeleter {
    policy: Arc<dyn PlaylistPolicy>,
    favorites: Option<Arc<dyn FavoritesEviction>>,
    cover: Option<Arc<dyn CoverRemoval>>,
    tracks: Option<Arc<dyn TracksRemoval>>,
    meta: Option<Arc<dyn MetaRemoval>>,
}

impl PlaylistDeleter {
    pub fn new(policy: Arc<dyn PlaylistPolicy>) -> Self {
        Self {
            policy,
            favorites: None,
            cover: None,
            tracks: None,
            meta: None,
        }
    }

    pub fn with_favorites(mut self, favorites: Arc<dyn FavoritesEviction>) -> Self {
        self.favorites = Some(favorites);
        self
    }

    pub fn with_cover(mut self, cover: Arc<dyn CoverRemoval>) -> Self {
        self.cover = Some(cover);
        self
    }

    pub fn with_tracks(mut self, tracks: Arc<dyn TracksRemoval>) -> Self {
        self.tracks = Some(tracks);
        self
    }

    pub fn with_meta(mut self, meta: Arc<dyn MetaRemoval>) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Deletes the playlist and everything hanging off it.
    ///
    /// On a step failure, already-committed steps are compensated in reverse
    /// order, best-effort, and the step's own error is returned; a failing
    /// compensation is logged and never masks it.
    pub async fn delete_playlist(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
    ) -> Result<(), DeletePlaylistError> {
        match self.policy.can_delete(caller, playlist_id).await {
            Ok(()) => {}
            Err(PlaylistError::Forbidden) => return Err(DeletePlaylistError::Forbidden),
            Err(source) => {
                return Err(DeletePlaylistError::Failed {
                    playlist_id,
                    source,
                })
            }
        }

        let mut undo_stack = Vec::new();
        match self.run_steps(caller, playlist_id, &mut undo_stack).await {
            Ok(()) => Ok(()),
            Err(source) => {
                self.unwind(caller, playlist_id, undo_stack).await;
                Err(DeletePlaylistError::Failed {
                    playlist_id,
                    source,
                })
            }
        }
    }

    async fn run_steps(
        &self,
        caller: &Caller,
        playlist_id: Uuid,
        undo_stack: &mut Vec<Undo>,
    ) -> Result<(), PlaylistError> {
        if let Some(favorites) = &self.favorites {
            let user_ids = favorites
                .users_with_favorite(caller, playlist_id, true)
                .await?;
            favorites
                .delete_all_favorites(caller, playlist_id, true)
                .await?;
            debug!("deleted {} favorites of playlist {playlist_id}", user_ids.len());
            undo_stack.push(Undo::RestoreFavorites {
                favorites: favorites.clone(),
                user_ids,
            });
        }

        if let Some(cover_service) = &self.cover {
            match cover_service.get_cover(caller, playlist_id).await? {
                None => undo_stack.push(Undo::Nothing),
                Some(cover) => {
                    cover_service.delete_cover(caller, playlist_id).await?;
                    debug!("deleted cover of playlist {playlist_id}");
                    undo_stack.push(Undo::ReuploadCover {
                        cover_service: cover_service.clone(),
                        cover,
                    });
                }
            }
        }

        if let Some(tracks) = &self.tracks {
            let snapshot = tracks.all_tracks(caller, playlist_id).await?;
            let removed = tracks.delete_all_tracks(caller, playlist_id).await?;
            if removed == 0 {
                undo_stack.push(Undo::Nothing);
            } else {
                debug!("deleted {removed} tracks of playlist {playlist_id}");
                undo_stack.push(Undo::RestoreTracks {
                    tracks: tracks.clone(),
                    track_ids: snapshot.iter().map(|track| track.id).collect(),
                });
            }
        }

        if let Some(meta) = &self.meta {
            meta.delete_meta(caller, playlist_id).await?;
            debug!("deleted meta of playlist {playlist_id}");
        }

        Ok(())
    }

    async fn unwind(&self, caller: &Caller, playlist_id: Uuid, undo_stack: Vec<Undo>) {
        for undo in undo_stack.into_iter().rev() {
            let description = undo.describe();
            if let Err(err) = undo.run(caller, playlist_id).await {
                warn!(
                    "compensation '{description}' failed while rolling back deletion \
                     of playlist {playlist_id}: {err:#}"
                );
            }
        }
    }
}
