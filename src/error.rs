use thiserror::Error;

use crate::dataproc::model::ClusterState;

/// Failure to turn a cluster pool label into a filter string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("cluster pool label is empty")]
    Empty,

    #[error("malformed label token '{0}', expected key=value")]
    MalformedToken(String),

    #[error("label key '{0}' is given more than once")]
    DuplicateKey(String),

    #[error("label key '{0}' is reserved and cannot be set in a cluster pool label")]
    ReservedKey(String),
}

/// Failure to produce a usable connection URL
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("no cluster satisfies filter '{filter}'")]
    NoMatchingCluster { filter: String },

    #[error("ambiguous cluster pool label, filter '{filter}' matches {} clusters: {}", .clusters.len(), .clusters.join(", "))]
    AmbiguousSelector { filter: String, clusters: Vec<String> },

    #[error("cluster '{cluster}' is not ready (state {state})")]
    ClusterNotReady { cluster: String, state: ClusterState },

    #[error("cluster '{cluster}' does not exist")]
    ClusterNotFound { cluster: String },

    #[error("cluster '{cluster}' has no reachable HTTPS endpoint, is Component Gateway enabled?")]
    NoEndpoint { cluster: String },

    #[error("unsupported URL '{0}', expected it to start with jdbc:dataproc://")]
    UnsupportedScheme(String),

    #[error("unsupported engine '{0}', only hive is supported")]
    UnsupportedEngine(String),

    #[error("malformed URL parameter '{0}', expected key=value")]
    MalformedParameter(String),

    #[error("URL parameter '{0}' is given more than once")]
    DuplicateParameter(String),

    #[error("missing required URL parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("clusterName and clusterPoolLabel cannot both be set")]
    ConflictingSelection,
}

/// Failure talking to the cluster controller
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    #[error("invalid Dataproc endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Dataproc API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode Dataproc API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ControllerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ControllerError::NotFound { .. })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid cluster pool label: {0}")]
    InvalidSelector(#[from] SelectorError),

    #[error("invalid connection URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Dataproc API call failed: {0}")]
    Remote(#[from] ControllerError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
