//! Fatal startup errors. Anything reported here ends the process before the
//! terminal is taken over.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum SessionError {
    /// The given path does not exist or is not a directory.
    NotADirectory(PathBuf),
    /// The path could not be resolved to an absolute form.
    Resolve { path: PathBuf, source: io::Error },
    /// One of the backend files could not be opened.
    Open { path: PathBuf, source: io::Error },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotADirectory(path) => {
                write!(f, "not a valid directory: {}", path.display())
            }
            SessionError::Resolve { path, source } => write!(
                f,
                "could not get absolute path for directory {}: {source}",
                path.display()
            ),
            SessionError::Open { path, source } => {
                write!(f, "failed to open file {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::NotADirectory(_) => None,
            SessionError::Resolve { source, .. } | SessionError::Open { source, .. } => {
                Some(source)
            }
        }
    }
}
