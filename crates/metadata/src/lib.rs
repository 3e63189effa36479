#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! Pre-flight checks run before every ACL read or write. A path is accepted
//! only when it is non-empty, is not the filesystem root, contains none of the
//! shell metacharacters `& | > < $ \` \ [ ] ; { }`, exists, and lives on a
//! filesystem whose kind the configured [`FilesystemPolicy`] allows.
//!
//! # Design
//!
//! - [`validate_path`] runs the checks in order and stops at the first
//!   failure, so cheap syntactic problems are reported without touching the
//!   filesystem.
//! - The filesystem kind is obtained through the [`FilesystemProbe`] trait.
//!   [`StatfsProbe`] reads the `statfs` magic number on Linux; tests and
//!   embedders substitute their own probe.
//!
//! # Errors
//!
//! Failures are reported as [`ValidationError`]. A missing path is reported
//! separately from other I/O failures so callers can distinguish "not found"
//! from "permission denied".
//!
//! # Examples
//!
//! ```
//! use metadata::{FilesystemPolicy, StatfsProbe, ValidationError, validate_path};
//! use std::path::Path;
//!
//! let error = validate_path(Path::new("/tmp/a;b"), &StatfsProbe, &FilesystemPolicy::permissive())
//!     .unwrap_err();
//! assert!(matches!(error, ValidationError::ForbiddenCharacter { character: ';', .. }));
//! ```

mod error;
mod filesystem;
mod validate;

pub use error::ValidationError;
pub use filesystem::{FilesystemKind, FilesystemPolicy, FilesystemProbe, StatfsProbe};
pub use validate::{FORBIDDEN_CHARACTERS, ValidatedPath, check_path_syntax, validate_path};
