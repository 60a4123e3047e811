use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    #[error("{method} {url} failed: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned status {status}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode request body: {0}")]
    Encode(serde_json::Error),
    #[error("failed to load {resource}: {message}")]
    ListFetch {
        resource: &'static str,
        message: String,
    },
    #[error("list loader for {0} has stopped")]
    LoaderStopped(&'static str),

    #[error("form is invalid: {0}")]
    Validation(ValidationErrors),
    #[error("unknown field `{field}` (expected one of: {expected})")]
    UnknownField { field: String, expected: String },
    #[error("invalid value for `{field}`: {message}")]
    InvalidFieldValue { field: String, message: String },
    #[error("no {resource} with id {id} in the current list")]
    NotInList { resource: &'static str, id: i64 },
    #[error("unknown screen `{0}`")]
    UnknownScreen(String),
}

impl AdminError {
    /// HTTP status reported by the server, if this error came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            AdminError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type AdminResult<T> = std::result::Result<T, AdminError>;
