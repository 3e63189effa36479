use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::FilesystemKind;

/// Error produced when a path fails pre-flight validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The path is empty.
    #[error("path must not be empty")]
    EmptyPath,
    /// The path is the filesystem root.
    #[error("refusing to operate on the filesystem root")]
    RootPath,
    /// The path contains a shell metacharacter.
    #[error("path '{}' contains forbidden character '{character}'", path.display())]
    ForbiddenCharacter {
        /// Rejected path.
        path: PathBuf,
        /// First forbidden character found.
        character: char,
    },
    /// The path does not exist.
    #[error("path '{}' does not exist", .0.display())]
    NotFound(PathBuf),
    /// Inspecting the path failed for a reason other than absence.
    #[error("failed to inspect '{}': {source}", path.display())]
    Io {
        /// Path being inspected.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The path lives on a filesystem that the policy does not allow.
    #[error("path '{}' resides on an unsupported filesystem ({filesystem})", path.display())]
    UnsupportedFilesystem {
        /// Rejected path.
        path: PathBuf,
        /// Filesystem kind reported by the probe.
        filesystem: FilesystemKind,
    },
}

impl ValidationError {
    /// Returns the path involved, when the error concerns a concrete path.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::EmptyPath | Self::RootPath => None,
            Self::ForbiddenCharacter { path, .. }
            | Self::NotFound(path)
            | Self::Io { path, .. }
            | Self::UnsupportedFilesystem { path, .. } => Some(path),
        }
    }
}
