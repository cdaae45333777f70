//! Hue REST API response envelopes.
//!
//! Write requests (`POST`, `PUT`) answer with a list of per-attribute results:
//! `[{"success": {...}}, {"error": {...}}]`. Read requests answer with the
//! resource object itself, or with the same error list when they fail.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Bridge error type returned when registration happens before the link button is pressed.
pub(crate) const LINK_BUTTON_NOT_PRESSED: u16 = 101;
/// Bridge error type for a resource that does not exist.
pub(crate) const RESOURCE_NOT_AVAILABLE: u16 = 3;

/// One entry of a write response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ApiResult {
    Success(Value),
    Error(ApiError),
}

/// Error object as sent by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiError {
    #[serde(rename = "type")]
    pub kind: u16,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        if err.kind == LINK_BUTTON_NOT_PRESSED {
            return Error::LinkButtonNotPressed;
        }
        Error::Bridge {
            kind: err.kind,
            address: err.address,
            description: err.description,
        }
    }
}

/// Collects the `success` payloads of a write response, failing on the first error.
pub(crate) fn successes(body: Value) -> Result<Vec<Value>> {
    let results: Vec<ApiResult> = serde_json::from_value(body).map_err(Error::JsonLoad)?;
    if results.is_empty() {
        return Err(Error::unexpected("empty result list"));
    }

    results
        .into_iter()
        .map(|r| match r {
            ApiResult::Success(v) => Ok(v),
            ApiResult::Error(e) => Err(e.into()),
        })
        .collect()
}

/// Splits a write response into per-attribute outcomes, keeping every entry.
pub(crate) fn results(body: Value) -> Result<Vec<std::result::Result<Value, ApiError>>> {
    let results: Vec<ApiResult> = serde_json::from_value(body).map_err(Error::JsonLoad)?;
    if results.is_empty() {
        return Err(Error::unexpected("empty result list"));
    }

    Ok(results
        .into_iter()
        .map(|r| match r {
            ApiResult::Success(v) => Ok(v),
            ApiResult::Error(e) => Err(e),
        })
        .collect())
}

/// Turns an error list returned in place of a resource into an `Err`.
pub(crate) fn resource(body: Value) -> Result<Value> {
    if !body.is_array() {
        return Ok(body);
    }

    let results = successes(body)?;
    Err(Error::unexpected(format!(
        "expected a resource, got {} result(s)",
        results.len()
    )))
}
