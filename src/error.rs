use crate::model::PlayerId;

/// Everything the rating engine can refuse or fail at.
///
/// Validation variants are produced before anything is written.  [`Error::Storage`] carries the
/// store's own error untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("winner {winner} is not one of the match participants")]
    InvalidWinner { winner: PlayerId },

    #[error("invalid player name {0:?}")]
    InvalidName(String),

    #[error("storage failure: {0:#}")]
    Storage(#[source] anyhow::Error),

    #[error("snapshot version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn player_not_found(name: impl std::fmt::Display) -> Self {
        Error::NotFound(format!("player '{}'", name))
    }
}
