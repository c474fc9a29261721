// Source result domain model - settled outcome of one backend fetch
use serde::Serialize;
use std::fmt;

/// The four independent dashboard sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Health,
    Analytics,
    Workflows,
    Projects,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Health,
        SourceKind::Analytics,
        SourceKind::Workflows,
        SourceKind::Projects,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Health => "health",
            SourceKind::Analytics => "analytics",
            SourceKind::Workflows => "workflows",
            SourceKind::Projects => "projects",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a source did not contribute a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum UnavailableReason {
    NetworkUnavailable(String),
    Timeout,
    MalformedResponse(String),
    HttpStatus(u16),
    /// No refresh has settled yet.
    Pending,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::NetworkUnavailable(msg) => write!(f, "network unavailable: {}", msg),
            UnavailableReason::Timeout => f.write_str("timeout"),
            UnavailableReason::MalformedResponse(msg) => write!(f, "malformed response: {}", msg),
            UnavailableReason::HttpStatus(code) => {
                write!(f, "backend responded with status {}", code)
            }
            UnavailableReason::Pending => f.write_str("pending"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum SourceResult<T> {
    Success(T),
    Unavailable(UnavailableReason),
}

impl<T> SourceResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, SourceResult::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            SourceResult::Success(value) => Some(value),
            SourceResult::Unavailable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&UnavailableReason> {
        match self {
            SourceResult::Success(_) => None,
            SourceResult::Unavailable(reason) => Some(reason),
        }
    }

    pub fn pending() -> Self {
        SourceResult::Unavailable(UnavailableReason::Pending)
    }
}

impl<T, E> From<Result<T, E>> for SourceResult<T>
where
    E: Into<UnavailableReason>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => SourceResult::Success(value),
            Err(e) => SourceResult::Unavailable(e.into()),
        }
    }
}
