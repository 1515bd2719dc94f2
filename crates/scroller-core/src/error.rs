#![forbid(unsafe_code)]

//! Error type shared by the engine and its hosts.

/// Scroller error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollerError {
    /// Options payload could not be decoded.
    InvalidOptions(String),
    /// The host surface rejected a structural change (wrap/unwrap).
    Surface(String),
    /// Operation attempted on a scroller that was already torn down.
    Destroyed,
}

impl core::fmt::Display for ScrollerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidOptions(msg) => write!(f, "invalid scroller options: {msg}"),
            Self::Surface(msg) => write!(f, "surface error: {msg}"),
            Self::Destroyed => f.write_str("scroller already destroyed"),
        }
    }
}

impl std::error::Error for ScrollerError {}

impl From<serde_json::Error> for ScrollerError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidOptions(err.to_string())
    }
}
