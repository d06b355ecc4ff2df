//! Catalog Playlists
//!
//! Access control, caching and multi-resource lifecycle for the playlist
//! aggregate. Storage backends and transport live elsewhere; this crate is
//! the library layer between them.

pub mod access_cache;
pub mod aggregator;
pub mod config;
pub mod cover;
pub mod deleter;
pub mod favorites;
pub mod playlist;
pub mod playlist_meta;
pub mod playlist_tracks;
pub mod policy;
pub mod privacy;

// Re-export commonly used types for convenience
pub use access_cache::{CachedAccessMetaStore, LruAccessCache, RemoteAccessCache};
pub use deleter::{DeletePlaylistError, PlaylistDeleter};
pub use playlist::{AccessLevel, Caller, Claims, PlaylistAccessMeta, PlaylistError, PlaylistMeta};
pub use policy::{PlaylistPolicy, PlaylistPolicyService};
pub use privacy::{ChangePrivacyError, PlaylistPrivacyChanger};
