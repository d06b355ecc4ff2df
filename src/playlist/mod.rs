//! Domain types for the playlist aggregate.

mod claims;
mod error;
mod models;

pub use claims::{AccessLevel, Caller, Claims};
pub use error::PlaylistError;
pub use models::{
    AggregatedPlaylist, Cover, PlaylistAccessMeta, PlaylistMeta, PlaylistTrack, TrackMeta, UserInfo,
};
