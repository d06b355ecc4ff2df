use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full playlist row as held by the canonical meta store.
///
/// The owner is fixed at creation; nothing in this crate rewrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistMeta {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The minimal view of a playlist needed to answer authorization questions.
///
/// This is the unit cached by the two-tier access cache; keep it small and
/// cheap to serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistAccessMeta {
    pub owner_id: Uuid,
    pub is_private: bool,
}

/// Cover image blob, keyed by the playlist it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    pub playlist_id: Uuid,
    pub bytes: Vec<u8>,
}

/// Ordered membership of a track in a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub playlist_id: Uuid,
    pub track_id: Uuid,
    pub position: u32,
}

/// The slice of track metadata the tracks store hands back when listing a
/// playlist's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMeta {
    pub id: Uuid,
    pub name: String,
    pub duration_sec: u32,
}

/// Public user info attached to aggregated playlist views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub name: String,
}

/// A playlist assembled for the read side: meta, owner, favorite flag and
/// the full ordered track list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedPlaylist {
    pub id: Uuid,
    pub owner: UserInfo,
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_favorite: bool,
    pub tracks_count: usize,
    pub tracks: Vec<TrackMeta>,
}
