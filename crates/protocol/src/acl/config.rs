//! Request and response containers exchanged with ACL engine callers.

use std::path::{Path, PathBuf};

use super::entry::{AclEntry, AclType};

/// Request to replace or modify the ACL of a path.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AclConfig {
    /// Target path.
    pub path: PathBuf,
    /// Dialect of `entries`.
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub acl_type: AclType,
    /// Entries to apply.
    #[cfg_attr(feature = "serde", serde(default))]
    pub entries: Vec<AclEntry>,
    /// Apply to the whole subtree.
    #[cfg_attr(feature = "serde", serde(default))]
    pub recursive: bool,
}

impl AclConfig {
    /// Creates a non-recursive POSIX request for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, entries: Vec<AclEntry>) -> Self {
        Self {
            path: path.into(),
            acl_type: AclType::Posix,
            entries,
            recursive: false,
        }
    }

    /// Sets the dialect.
    #[must_use]
    pub const fn with_acl_type(mut self, acl_type: AclType) -> Self {
        self.acl_type = acl_type;
        self
    }

    /// Sets the recursive flag.
    #[must_use]
    pub const fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Request to remove ACL entries from a path.
///
/// `remove_all_xattr` strips every extended entry and takes precedence over
/// the other fields. `remove_default` drops the default ACL and may be
/// combined with entry-based removal.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AclRemoveConfig {
    /// Target path, dialect, entries and recursion.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub acl: AclConfig,
    /// Remove every extended ACL entry.
    #[cfg_attr(feature = "serde", serde(default))]
    pub remove_all_xattr: bool,
    /// Remove the default ACL.
    #[cfg_attr(feature = "serde", serde(default))]
    pub remove_default: bool,
}

impl AclRemoveConfig {
    /// Creates an entry-based removal request.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, entries: Vec<AclEntry>) -> Self {
        Self {
            acl: AclConfig::new(path, entries),
            remove_all_xattr: false,
            remove_default: false,
        }
    }

    /// Requests removal of all extended entries.
    #[must_use]
    pub const fn remove_all_xattr(mut self, enabled: bool) -> Self {
        self.remove_all_xattr = enabled;
        self
    }

    /// Requests removal of the default ACL.
    #[must_use]
    pub const fn remove_default(mut self, enabled: bool) -> Self {
        self.remove_default = enabled;
        self
    }

    /// Returns `true` when at least one removal mode is requested.
    #[must_use]
    pub fn has_removal(&self) -> bool {
        self.remove_all_xattr || self.remove_default || !self.acl.entries.is_empty()
    }
}

/// Request to list the ACL of a path.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AclListConfig {
    /// Target path.
    pub path: PathBuf,
    /// Descend into directories.
    #[cfg_attr(feature = "serde", serde(default))]
    pub recursive: bool,
}

impl AclListConfig {
    /// Creates a listing request.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            path: path.into(),
            recursive,
        }
    }
}

/// ACL of one path, optionally with the ACLs of its descendants.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AclListResult {
    /// Listed path.
    pub path: PathBuf,
    /// Dialect of `entries`.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub acl_type: AclType,
    /// Entries in tool order.
    pub entries: Vec<AclEntry>,
    /// Results for the immediate children, in name order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<AclListResult>,
}

impl AclListResult {
    /// Creates a leaf result.
    #[must_use]
    pub const fn new(path: PathBuf, acl_type: AclType, entries: Vec<AclEntry>) -> Self {
        Self {
            path,
            acl_type,
            entries,
            children: Vec::new(),
        }
    }

    /// Returns the immediate child listed for `path`.
    #[must_use]
    pub fn child(&self, path: &Path) -> Option<&Self> {
        self.children.iter().find(|child| child.path == path)
    }

    /// Number of results in the tree, including this one.
    #[must_use]
    pub fn tree_len(&self) -> usize {
        1 + self.children.iter().map(Self::tree_len).sum::<usize>()
    }
}
