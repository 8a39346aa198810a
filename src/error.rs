//! Crate-level error types.

use std::fmt;

use crate::format::FormatError;

/// Errors produced by the sdccm crate.
#[derive(Debug)]
pub enum DccmError {
    /// The server answered a dataset request with a non-2xx status.
    Fetch {
        /// Requested URL.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
    },
    /// The request never produced a response (DNS, connection, TLS, body
    /// read, unsupported scheme).
    Transport {
        /// Requested location.
        url: String,
        /// Underlying transport failure.
        message: String,
    },
    /// The payload does not follow the packed DCCM wire format.
    Format(FormatError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for DccmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { url, status } => {
                write!(f, "HTTP error loading {url}: status {status}")
            }
            Self::Transport { url, message } => {
                write!(f, "failed to fetch {url}: {message}")
            }
            Self::Format(e) => write!(f, "format error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for DccmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FormatError> for DccmError {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<std::io::Error> for DccmError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
