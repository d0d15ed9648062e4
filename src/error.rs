//! Error types for metric collection.

/// Errors that can occur while reading system counters or writing a report.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// Failed to read a procfs or sysfs file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// A counter file was readable but did not have the expected shape.
    #[error("failed to parse {path}: {detail}")]
    Parse { path: String, detail: String },

    /// No source on this system exposes the requested value.
    #[error("{what} is not available on this system")]
    Unavailable { what: String },

    /// Writing the report line failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
