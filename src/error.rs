//! Error types shared by the walker, the hash engine and the renderer

/// Errors raised while walking, hashing or rendering a tree.
///
/// Every variant is fatal for the current run: no partial digest or partial
/// listing is ever reported as a success.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The backend failed to list, stat or read a path.
    #[error("cannot access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The path does not exist.
    #[error("cannot access '{0}': No such file or directory")]
    NotFound(String),

    /// Only directories and regular files have a defined hash.
    #[error("unsupported entry kind '{kind}' for '{path}': only files and directories can be hashed")]
    UnsupportedKind { path: String, kind: &'static str },

    /// The hash algorithm name is not in the registry.
    #[error("unknown hash algorithm '{0}' (expected one of: {list})", list = crate::hash::Algorithm::NAMES.join(", "))]
    UnknownAlgorithm(String),

    /// The line template is malformed or references an unknown field.
    #[error("invalid format '{template}': {message}")]
    Template { template: String, message: String },
}

impl Error {
    /// Wrap an I/O error with the logical path it happened on.
    pub fn io(path: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path.to_string())
        } else {
            Error::Io {
                path: path.to_string(),
                source,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
