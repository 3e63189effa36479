use std::ffi::{OsStr, OsString};
use std::fs::FileType;
use std::path::{Path, PathBuf};

/// One immediate child of a listed directory.
#[derive(Clone, Debug)]
pub struct ChildEntry {
    path: PathBuf,
    file_name: OsString,
    file_type: FileType,
}

impl ChildEntry {
    pub(crate) const fn new(path: PathBuf, file_name: OsString, file_type: FileType) -> Self {
        Self {
            path,
            file_name,
            file_type,
        }
    }

    /// Returns the full path of the child.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the final path component.
    #[must_use]
    pub fn file_name(&self) -> &OsStr {
        &self.file_name
    }

    /// Returns `true` for real directories; symlinks to directories are not
    /// followed.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.file_type.is_dir()
    }

    /// Returns `true` when the child is a symbolic link.
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.file_type.is_symlink()
    }
}
