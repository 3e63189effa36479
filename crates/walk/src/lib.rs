#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` lists the immediate children of a directory in a deterministic
//! order. The recursive ACL listing drives its own depth-first descent on top
//! of [`read_children`] so a failing child can be skipped without abandoning
//! its siblings.
//!
//! # Invariants
//!
//! - Children are sorted lexicographically by file name, independent of the
//!   order the filesystem returns them in.
//! - [`ChildEntry::is_directory`] never follows symbolic links, so a caller
//!   descending only into directories cannot loop through a symlink cycle.
//!
//! # Errors
//!
//! [`WalkError`] carries the directory being listed and the underlying
//! [`std::io::Error`].
//!
//! # Examples
//!
//! ```
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! fs::create_dir(temp.path().join("b"))?;
//! fs::write(temp.path().join("a.txt"), b"data")?;
//!
//! let children = walk::read_children(temp.path())?;
//! let names: Vec<_> = children.iter().map(|child| child.file_name().to_owned()).collect();
//! assert_eq!(names, ["a.txt", "b"]);
//! assert!(!children[0].is_directory());
//! assert!(children[1].is_directory());
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod entry;
mod error;

use std::fs;
use std::path::Path;

pub use entry::ChildEntry;
pub use error::{WalkError, WalkErrorKind};

/// Returns the immediate children of `directory`, sorted by file name.
pub fn read_children(directory: &Path) -> Result<Vec<ChildEntry>, WalkError> {
    let read_dir =
        fs::read_dir(directory).map_err(|error| WalkError::read_dir(directory.into(), error))?;

    let mut children = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|error| WalkError::read_dir_entry(directory.into(), error))?;
        let file_type = entry
            .file_type()
            .map_err(|error| WalkError::file_type(entry.path(), error))?;
        children.push(ChildEntry::new(entry.path(), entry.file_name(), file_type));
    }
    children.sort_by(|left, right| left.file_name().cmp(right.file_name()));

    tracing::debug!(
        directory = %directory.display(),
        count = children.len(),
        "listed directory children"
    );
    Ok(children)
}

#[cfg(test)]
mod tests;
