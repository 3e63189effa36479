use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{FilesystemKind, FilesystemPolicy, FilesystemProbe, ValidationError};

/// Characters rejected anywhere in a managed path.
pub const FORBIDDEN_CHARACTERS: &[char] =
    &['&', '|', '>', '<', '$', '`', '\\', '[', ']', ';', '{', '}'];

/// A path that passed [`validate_path`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidatedPath {
    path: PathBuf,
    is_directory: bool,
    filesystem: FilesystemKind,
}

impl ValidatedPath {
    /// Returns the validated path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` when the path (following symlinks) is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Returns the filesystem kind backing the path.
    #[must_use]
    pub const fn filesystem(&self) -> FilesystemKind {
        self.filesystem
    }
}

/// Runs the syntactic checks that need no filesystem access.
pub fn check_path_syntax(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyPath);
    }
    if path == Path::new("/") {
        return Err(ValidationError::RootPath);
    }
    if let Some(character) = path
        .to_string_lossy()
        .chars()
        .find(|ch| FORBIDDEN_CHARACTERS.contains(ch))
    {
        return Err(ValidationError::ForbiddenCharacter {
            path: path.to_path_buf(),
            character,
        });
    }
    Ok(())
}

/// Validates `path` for ACL management.
///
/// Checks run in order: syntax, existence, resolved root, filesystem kind.
pub fn validate_path(
    path: &Path,
    probe: &dyn FilesystemProbe,
    policy: &FilesystemPolicy,
) -> Result<ValidatedPath, ValidationError> {
    check_path_syntax(path)?;

    let inspect_error = |source: io::Error| match source.kind() {
        io::ErrorKind::NotFound => ValidationError::NotFound(path.to_path_buf()),
        _ => ValidationError::Io {
            path: path.to_path_buf(),
            source,
        },
    };
    let metadata = fs::metadata(path).map_err(inspect_error)?;
    // `..` components and symlinks can still name the root.
    if fs::canonicalize(path).map_err(inspect_error)? == Path::new("/") {
        return Err(ValidationError::RootPath);
    }

    let filesystem = probe
        .filesystem_kind(path)
        .map_err(|source| ValidationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    if !policy.allows(filesystem) {
        return Err(ValidationError::UnsupportedFilesystem {
            path: path.to_path_buf(),
            filesystem,
        });
    }

    Ok(ValidatedPath {
        path: path.to_path_buf(),
        is_directory: metadata.is_dir(),
        filesystem,
    })
}
