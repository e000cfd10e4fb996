use std::error::Error as StdError;

use thiserror::Error;

/// Fragmark's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Fragmark's crate-wide error type.
///
/// The variants follow the failure taxonomy of the engine:
/// - precondition failures (`NoSelection`, `AudioNotLoaded`, `RegionFrozen`, `UnknownRegion`)
///   abort the operation with no state change;
/// - service failures (`Service`, `Http`) leave local state untouched so the
///   region in question stays pending.
///
/// Text-matching misses are deliberately *not* errors; they are logged and the
/// region remains usable without a text binding.
#[derive(Debug, Error)]
pub enum Error {
    /// No region is selected (or no pending region exists to fall back to).
    #[error("no region is selected")]
    NoSelection,

    /// Playback or seeking was requested before the audio surface became ready.
    #[error("audio is not loaded")]
    AudioNotLoaded,

    /// A saved region's bounds are immutable; the mutation was rejected.
    #[error("region is already saved and can no longer change")]
    RegionFrozen,

    /// The region id does not refer to any region in the store.
    #[error("unknown region")]
    UnknownRegion,

    /// The persistence service answered, but with `success: false`.
    #[error("{endpoint} rejected the request: {message}")]
    Service {
        endpoint: &'static str,
        message: String,
    },

    /// Transport-level failure talking to the persistence service.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}
