//! Error taxonomy of the ACL engine.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use metadata::{FilesystemKind, ValidationError};
use protocol::{FormatError, ParseError};
use walk::WalkError;

use crate::exec::{ExecError, ExecOutput};
use crate::principal::ResolverError;

/// Mutating operation that failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AclOperation {
    /// Full replace.
    Set,
    /// Incremental merge.
    Modify,
    /// Entry, default or full removal.
    Remove,
}

impl AclOperation {
    /// Lowercase verb used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Modify => "modify",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for AclOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of [`AclError`], stable for callers mapping errors
/// to status codes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AclErrorKind {
    /// The request itself is malformed.
    InvalidInput,
    /// The target path does not exist.
    PathNotFound,
    /// The target path is on a filesystem the engine does not manage.
    UnsupportedFs,
    /// Tool output could not be parsed.
    Parse,
    /// Reading the ACL failed.
    Read,
    /// Writing the ACL failed.
    Write,
    /// A domain principal does not exist.
    InvalidPrincipal,
    /// Local I/O failed.
    Io,
}

/// Error returned by [`AclEngine`](crate::AclEngine) operations.
#[derive(Debug, thiserror::Error)]
pub enum AclError {
    /// The request is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// An entry cannot be expressed in the requested dialect.
    #[error("invalid input: {0}")]
    Format(#[from] FormatError),
    /// The path does not exist.
    #[error("path '{}' does not exist", .0.display())]
    PathNotFound(PathBuf),
    /// The path resides on a filesystem outside the allowed set.
    #[error("path '{}' resides on an unsupported filesystem ({filesystem})", path.display())]
    UnsupportedFs {
        /// Rejected path.
        path: PathBuf,
        /// Kind reported by the probe.
        filesystem: FilesystemKind,
    },
    /// The reader printed a line the codec rejects.
    #[error("failed to parse ACL of '{}': {source}", path.display())]
    Parse {
        /// Path whose ACL was read.
        path: PathBuf,
        /// Codec error carrying the offending line.
        #[source]
        source: ParseError,
    },
    /// Running the reader failed.
    #[error("failed to read ACL of '{}': {source}", path.display())]
    Read {
        /// Path whose ACL was read.
        path: PathBuf,
        /// Tool failure, with captured output.
        #[source]
        source: ExecError,
    },
    /// Running the writer failed.
    #[error("failed to {operation} ACL of '{}': {source}", path.display())]
    Write {
        /// Path whose ACL was written.
        path: PathBuf,
        /// Operation being performed.
        operation: AclOperation,
        /// Tool failure, with captured output.
        #[source]
        source: ExecError,
    },
    /// A domain principal is unknown to the directory service.
    #[error("principal '{principal}' does not exist")]
    InvalidPrincipal {
        /// Unresolved principal as supplied.
        principal: String,
    },
    /// The directory service could not answer.
    #[error("failed to look up principal '{principal}': {source}")]
    PrincipalLookup {
        /// Principal being looked up.
        principal: String,
        /// Resolver failure.
        #[source]
        source: ResolverError,
    },
    /// Listing the children of a directory failed.
    #[error(transparent)]
    Listing(#[from] WalkError),
    /// Local I/O failed.
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl AclError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Returns the coarse classification of this error.
    #[must_use]
    pub const fn kind(&self) -> AclErrorKind {
        match self {
            Self::InvalidInput(_) | Self::Format(_) => AclErrorKind::InvalidInput,
            Self::PathNotFound(_) => AclErrorKind::PathNotFound,
            Self::UnsupportedFs { .. } => AclErrorKind::UnsupportedFs,
            Self::Parse { .. } => AclErrorKind::Parse,
            Self::Read { .. } => AclErrorKind::Read,
            Self::Write { .. } => AclErrorKind::Write,
            Self::InvalidPrincipal { .. } => AclErrorKind::InvalidPrincipal,
            Self::PrincipalLookup { .. } | Self::Listing(_) | Self::Io { .. } => AclErrorKind::Io,
        }
    }

    /// Output captured from a failed tool run.
    #[must_use]
    pub const fn output(&self) -> Option<&ExecOutput> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => source.output(),
            _ => None,
        }
    }

    /// Returns `true` when a tool run was stopped by its deadline.
    #[must_use]
    pub const fn is_deadline_exceeded(&self) -> bool {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => {
                source.is_deadline_exceeded()
            }
            _ => false,
        }
    }

    /// Returns `true` when a tool run was stopped by its deadline or by cancellation.
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => source.is_interrupted(),
            _ => false,
        }
    }

    /// Path the error concerns, when there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PathNotFound(path)
            | Self::UnsupportedFs { path, .. }
            | Self::Parse { path, .. }
            | Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::Listing(error) => Some(error.path()),
            Self::InvalidInput(_)
            | Self::Format(_)
            | Self::InvalidPrincipal { .. }
            | Self::PrincipalLookup { .. } => None,
        }
    }
}

impl From<ValidationError> for AclError {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::NotFound(path) => Self::PathNotFound(path),
            ValidationError::UnsupportedFilesystem { path, filesystem } => {
                Self::UnsupportedFs { path, filesystem }
            }
            ValidationError::Io { path, source } => Self::Io { path, source },
            error @ (ValidationError::EmptyPath
            | ValidationError::RootPath
            | ValidationError::ForbiddenCharacter { .. }) => Self::InvalidInput(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_kinds() {
        let cases = [
            (ValidationError::EmptyPath, AclErrorKind::InvalidInput),
            (ValidationError::RootPath, AclErrorKind::InvalidInput),
            (
                ValidationError::ForbiddenCharacter {
                    path: PathBuf::from("/a;b"),
                    character: ';',
                },
                AclErrorKind::InvalidInput,
            ),
            (
                ValidationError::NotFound(PathBuf::from("/missing")),
                AclErrorKind::PathNotFound,
            ),
            (
                ValidationError::UnsupportedFilesystem {
                    path: PathBuf::from("/mnt"),
                    filesystem: FilesystemKind::Ext4,
                },
                AclErrorKind::UnsupportedFs,
            ),
            (
                ValidationError::Io {
                    path: PathBuf::from("/mnt"),
                    source: io::Error::other("denied"),
                },
                AclErrorKind::Io,
            ),
        ];
        for (validation, kind) in cases {
            assert_eq!(AclError::from(validation).kind(), kind);
        }
    }

    #[test]
    fn write_error_exposes_output_and_operation() {
        let error = AclError::Write {
            path: PathBuf::from("/mnt/tank/f"),
            operation: AclOperation::Modify,
            source: ExecError::Failed {
                program: PathBuf::from("setfacl"),
                status: Some(1),
                output: ExecOutput {
                    stdout: String::new(),
                    stderr: "setfacl: invalid argument\n".to_owned(),
                },
            },
        };
        assert_eq!(error.kind(), AclErrorKind::Write);
        assert_eq!(
            error.output().map(ExecOutput::diagnostic),
            Some("setfacl: invalid argument")
        );
        assert!(error.to_string().starts_with("failed to modify ACL of '/mnt/tank/f'"));
        assert_eq!(error.path(), Some(Path::new("/mnt/tank/f")));
    }

    #[test]
    fn deadline_is_visible_through_read_error() {
        let error = AclError::Read {
            path: PathBuf::from("/mnt/tank"),
            source: ExecError::DeadlineExceeded {
                program: PathBuf::from("getfacl"),
            },
        };
        assert!(error.is_deadline_exceeded());
        assert!(error.is_interrupted());
        assert!(error.output().is_none());
        assert!(!AclError::invalid_input("x").is_deadline_exceeded());
    }
}
