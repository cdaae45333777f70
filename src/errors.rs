use std::path::{Path, PathBuf};

use crate::types::LightId;

/// All error types that can occur when talking to the bridge or running the monitors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An HTTP request to the bridge failed (connection, timeout, status).
    #[error("http {action} request failed: {err}")]
    Http { action: String, err: reqwest::Error },

    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The bridge answered with an API error object.
    #[error("bridge error {kind} at {address:?}: {description}")]
    Bridge {
        kind: u16,
        address: String,
        description: String,
    },

    /// Registration was refused because the link button was not pressed.
    #[error("link button not pressed; press the button on the bridge and try again")]
    LinkButtonNotPressed,

    /// The bridge answered with something that is neither a result nor an error.
    #[error("unexpected bridge response: {0}")]
    UnexpectedResponse(String),

    /// The requested light does not exist on the bridge.
    #[error("light {0} not found on the bridge")]
    LightNotFound(LightId),

    /// Reading or writing the credential file failed.
    #[error("config file {path:?}: {err}")]
    Config { path: PathBuf, err: std::io::Error },

    /// Monitor configuration rejected before starting.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a new HTTP error
    pub fn http(action: &str, err: reqwest::Error) -> Self {
        Error::Http {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new config file error
    pub fn config(path: &Path, err: std::io::Error) -> Self {
        Error::Config {
            path: path.to_path_buf(),
            err,
        }
    }

    /// Create a new unexpected response error
    pub fn unexpected(what: impl Into<String>) -> Self {
        Error::UnexpectedResponse(what.into())
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
