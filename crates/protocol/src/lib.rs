#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! ACL vocabulary and text codec shared by the `oc-facl` workspace.
//!
//! The crate holds the typed entry model ([`AclEntry`] and the request and
//! response containers built from it) together with the converter between
//! that model and the line-oriented text understood by the platform ACL
//! tools. Two dialects are supported:
//!
//! - **POSIX**: `[default:]kind[:principal]:perms`, as printed by `getfacl`
//!   and accepted by `setfacl -M`/`--set-file`.
//! - **NFSv4**: `principal:perms:flags:access`, one ACE per line.
//!
//! Higher layers never inspect tool output directly; they call
//! [`parse_acl_text`] and [`format_entry`] so the grammar lives in a single
//! place.
//!
//! # Examples
//!
//! Parse the body of a `getfacl -c -E` listing and write one entry back:
//!
//! ```
//! use protocol::{AclEntryType, AclType, Permission, format_entry, parse_acl_text};
//!
//! let text = "user::rw-\nuser:nobody:r-x\ngroup::r--\nmask::r-x\nother::---\n";
//! let entries = parse_acl_text(text, AclType::Posix).unwrap();
//!
//! assert_eq!(entries.len(), 5);
//! assert_eq!(entries[0].entry_type, AclEntryType::OwnerUser);
//! assert_eq!(entries[1].principal.as_deref(), Some("nobody"));
//! assert!(entries[1].permissions.contains(&Permission::Execute));
//!
//! let line = format_entry(&entries[1], AclType::Posix).unwrap();
//! assert_eq!(line, "user:nobody:r-x");
//! ```

pub mod acl;

pub use acl::{
    Access, AclConfig, AclEntry, AclEntryType, AclListConfig, AclListResult, AclRemoveConfig,
    AclType, FormatError, InheritFlag, ParseError, ParseErrorReason, Permission, format_entry,
    format_removal_entry, parse_acl_text,
};
