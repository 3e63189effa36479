#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` manages filesystem ACLs through the platform tools. Requests are
//! typed [`protocol`] values; the engine validates the target path, turns the
//! entries into tool input with the text codec, runs `getfacl`/`setfacl` (or
//! their NFSv4 counterparts) through a [`CommandExecutor`], and parses what
//! the tools print back into entries.
//!
//! # Design
//!
//! - [`AclEngine`] is assembled by [`AclEngine::builder`] from injected
//!   collaborators: the executor, an optional [`PrincipalResolver`], a
//!   [`metadata::FilesystemProbe`] and an [`EngineConfig`].
//! - Each operation takes an [`ExecContext`] carrying an optional deadline and
//!   a cancellation flag. [`ProcessExecutor`] kills the tool when either
//!   fires.
//! - Entry lists reach `setfacl` through a scratch file that is deleted on
//!   every exit path.
//!
//! # Invariants
//!
//! - Validation failures return before any tool runs.
//! - [`AclEngine::set_acl`] never drops the owning user, owning group or
//!   catch-all entry of the current ACL.
//! - A recursive [`AclEngine::get_acl`] omits failing children instead of
//!   failing, unless the failure is a deadline or a cancellation.
//! - Nothing is retried.
//!
//! # Errors
//!
//! Every operation returns [`AclError`]; [`AclError::kind`] gives a stable
//! classification and [`AclError::output`] the captured tool output.
//!
//! # Examples
//!
//! ```
//! use std::ffi::OsString;
//! use std::path::Path;
//!
//! use engine::{AclEngine, CommandExecutor, ExecContext, ExecError, ExecOutput};
//! use metadata::{FilesystemKind, FilesystemProbe};
//! use protocol::{AclEntryType, AclListConfig};
//!
//! struct Getfacl;
//!
//! impl CommandExecutor for Getfacl {
//!     fn execute(&self, _: &Path, _: &[OsString], _: &ExecContext) -> Result<ExecOutput, ExecError> {
//!         Ok(ExecOutput::from_stdout("user::rw-\ngroup::r--\nother::---\n"))
//!     }
//! }
//!
//! struct Zfs;
//!
//! impl FilesystemProbe for Zfs {
//!     fn filesystem_kind(&self, _: &Path) -> std::io::Result<FilesystemKind> {
//!         Ok(FilesystemKind::Zfs)
//!     }
//! }
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let file = tempfile::NamedTempFile::new()?;
//! let engine = AclEngine::builder(Getfacl).filesystem_probe(Zfs).build();
//! let listing = engine.get_acl(&AclListConfig::new(file.path(), false), &ExecContext::new())?;
//! assert_eq!(listing.entries.len(), 3);
//! assert_eq!(listing.entries[0].entry_type, AclEntryType::OwnerUser);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod acl_engine;
mod config;
mod error;
mod exec;
mod principal;
mod scratch;

pub use acl_engine::{AclEngine, AclEngineBuilder};
pub use config::{ConfigError, EngineConfig, ToolPaths};
pub use error::{AclError, AclErrorKind, AclOperation};
pub use exec::{
    CancellationHandle, CommandExecutor, ExecContext, ExecError, ExecOutput, ProcessExecutor,
};
pub use principal::{
    DOMAIN_SEPARATOR, DomainPrincipal, PrincipalKind, PrincipalResolver, ResolverError,
};
