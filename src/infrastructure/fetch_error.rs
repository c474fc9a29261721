// Fetch error taxonomy - collapsed into UnavailableReason at the client boundary
use crate::domain::source_result::UnavailableReason;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("request timed out")]
    Timeout,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("backend responded with status {0}")]
    HttpStatus(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::MalformedResponse(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::HttpStatus(status.as_u16())
        } else {
            FetchError::NetworkUnavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::MalformedResponse(e.to_string())
    }
}

impl From<FetchError> for UnavailableReason {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NetworkUnavailable(msg) => UnavailableReason::NetworkUnavailable(msg),
            FetchError::Timeout => UnavailableReason::Timeout,
            FetchError::MalformedResponse(msg) => UnavailableReason::MalformedResponse(msg),
            FetchError::HttpStatus(code) => UnavailableReason::HttpStatus(code),
        }
    }
}
