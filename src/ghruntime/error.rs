use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(
        "--app flag is required, --config must be specified, or runtime.config.json must exist in current directory"
    )]
    MissingIdentity,

    #[error("error reading config file '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing config file '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("found {} but failed to read it: {source}", path.display())]
    DefaultConfigUnreadable {
        path: PathBuf,
        #[source]
        source: Box<RuntimeError>,
    },

    #[error("directory '{}' does not exist", .0.display())]
    SourceDirMissing(PathBuf),

    #[error("error accessing path '{}': {source}", path.display())]
    FilesystemWalk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error creating bundle file '{}': {source}", path.display())]
    BundleCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error writing '{}' to bundle: {source}", path.display())]
    BundleWrite {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Invalid {kind} format ({pair}). Must be in the form 'key=value'")]
    InvalidPair { kind: &'static str, pair: String },

    #[error("{method} {path} failed: {message}")]
    Transport {
        method: &'static str,
        path: String,
        status: Option<u16>,
        message: String,
    },

    #[error("app '{app}' does not exist or is not accessible: {source}")]
    AppNotAccessible {
        app: String,
        #[source]
        source: Box<RuntimeError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

impl RuntimeError {
    /// Status code of a failed remote call, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RuntimeError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
