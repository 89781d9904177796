//! Error type shared by the route pipeline and the OpenAPI lowering.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a generation run.
#[derive(Debug, Error)]
pub enum Error {
    /// The number of `{placeholder}` segments in a path template does not
    /// match the number of declared path parameters.
    #[error(
        "path `{path}` has {placeholders} placeholder segment(s) but {parameters} path parameter(s)"
    )]
    PathMismatch {
        path: String,
        placeholders: usize,
        parameters: usize,
    },

    /// A `$ref` that does not point into `components`.
    #[error("unresolved reference `{0}`")]
    UnresolvedReference(String),

    /// Two operations lowered to the same identifier.
    #[error("operation `{0}` is defined more than once")]
    DuplicateOperation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
