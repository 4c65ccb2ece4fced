use std::fmt;

use feed_core::PageData;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A page request finished; `epoch` is the one it was dispatched with.
    PageFetched {
        epoch: u64,
        result: Result<PageData, FetchError>,
    },
    /// The debounce window elapsed without a newer search edit.
    SearchSettled { generation: u64, text: String },
    /// Result of the startup health probe.
    Health(Result<(), FetchError>),
}

/// A failed request. `Display` is the user-facing text; `message` keeps the
/// underlying detail for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Malformed,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid endpoint url"),
            FailureKind::HttpStatus(code) => write!(f, "API error: {code}"),
            FailureKind::Timeout => write!(f, "request timed out"),
            FailureKind::TooLarge { max_bytes, .. } => {
                write!(f, "response too large (max {max_bytes} bytes)")
            }
            FailureKind::Malformed => write!(f, "malformed response from API"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
