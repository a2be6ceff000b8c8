use thiserror::Error;

/// Errors raised for structural problems in the input or the caller's usage.
///
/// Data-quality anomalies in a track database (duplicate references, dangling
/// nodes, unknown signal types) are never reported through this type; they are
/// logged and the offending entity is dropped.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("track database has no node table (slot 0 must be reserved)")]
    EmptyTrackDatabase,

    #[error("cannot start path exploration on track node {node}: not a vector node")]
    InvalidStart { node: usize },

    #[error("no station connector labelled '{0}'")]
    UnknownConnector(String),

    #[error("invalid route configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read route configuration: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RouteError>;
