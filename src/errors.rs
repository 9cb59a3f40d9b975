use std::path::PathBuf;

use thiserror::Error;

use crate::data::ObjectType;

pub type Result<T> = std::result::Result<T, HelperError>;

#[derive(Debug, Error)]
pub enum HelperError {
    #[error("failed to request tool '{tool}' from library '{library}'")]
    ToolNotFound { library: String, tool: String },
    #[error("tool has no parameter '{0}'")]
    ParameterNotFound(String),
    #[error("Bad argument: {0}")]
    BadArgument(String),
    #[error("Expected data object of type '{expected}', found '{found}'")]
    TypeMismatch {
        expected: ObjectType,
        found: ObjectType,
    },
    #[error("failed to load '{}': {msg}", path.display())]
    OpenFailed { path: PathBuf, msg: String },
    #[error("coordinate reference system is not defined for '{}'", .0.display())]
    UndefinedCrs(PathBuf),
    #[error("directory '{}' does not contain any file with extension '{extension}'", directory.display())]
    NoFilesFound {
        directory: PathBuf,
        extension: String,
    },
    #[error("failed to execute tool: {0}")]
    ExecutionFailed(String),
    #[error("data object of type '{0}' does not provide a table")]
    NotTabular(ObjectType),
    #[error("tool has already been released")]
    Released,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
    #[cfg(feature = "gdal")]
    #[error(transparent)]
    Gdal(#[from] gdal::errors::GdalError),
}
