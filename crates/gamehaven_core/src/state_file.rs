//! Small JSON documents stored next to the database (session, seed marker).
//!
//! # Invariants
//! - Writes go to a sibling temp file first and are renamed into place, so a
//!   reader never observes a half-written document.
//! - A missing file reads as `None`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub type StateFileResult<T> = Result<T, StateFileError>;

#[derive(Debug)]
pub enum StateFileError {
    Io { path: PathBuf, source: std::io::Error },
    Format { path: PathBuf, source: serde_json::Error },
}

impl Display for StateFileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "state file `{}` i/o failed: {source}", path.display())
            }
            Self::Format { path, source } => {
                write!(f, "state file `{}` is malformed: {source}", path.display())
            }
        }
    }
}

impl Error for StateFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Format { source, .. } => Some(source),
        }
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> StateFileResult<Option<T>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StateFileError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StateFileError::Format {
            path: path.to_path_buf(),
            source,
        })
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> StateFileResult<()> {
    let io_err = |source: std::io::Error| StateFileError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StateFileError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, bytes).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)
}

pub(crate) fn remove(path: &Path) -> StateFileResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StateFileError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
