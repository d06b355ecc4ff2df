use thiserror::Error;

/// Errors surfaced by the policy service and the policy-gated playlist
/// services.
///
/// `Forbidden` is an expected, user-facing outcome and is never logged as a
/// fault. `NotFound` is a hard error on direct calls; the sagas translate
/// the soft cases (missing cover, already-empty track list) before it ever
/// reaches them.
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("operation not permitted")]
    Forbidden,

    #[error("playlist not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlaylistError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, PlaylistError::Forbidden)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PlaylistError::NotFound)
    }
}
