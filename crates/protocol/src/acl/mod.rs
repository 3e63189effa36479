//! ACL entry model and text codec.
//!
//! # Text Format Overview
//!
//! Both dialects are line oriented. Blank lines and lines starting with `#`
//! are comments. Every other line is exactly one entry.
//!
//! ```text
//! # POSIX
//! user::rwx
//! user:nobody:r-x
//! group::r--
//! mask::r-x
//! other::---
//! default:user:nobody:r-x
//!
//! # NFSv4
//! owner@:rwxdDaARWCNns:----:allow
//! user:nobody:r-x----------:fd--:allow
//! everyone@:r------------:----:deny
//! ```
//!
//! Permission and flag characters are position independent when parsing;
//! unknown characters (including the `-` placeholder) are ignored. When
//! formatting, characters are emitted in the fixed order documented in
//! [`constants`].

pub mod constants;
mod config;
mod entry;
mod error;
mod nfs4;
mod posix;
mod text;

pub use config::{AclConfig, AclListConfig, AclListResult, AclRemoveConfig};
pub use entry::{Access, AclEntry, AclEntryType, AclType, InheritFlag, Permission};
pub use error::{FormatError, ParseError, ParseErrorReason};
pub use text::{format_entry, format_removal_entry, parse_acl_text};
