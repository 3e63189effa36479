//! Typed representation of a single ACL entry.

use std::collections::BTreeSet;
use std::fmt;

use super::constants::{FLAG_CHARS, PERMISSION_CHARS, POSIX_PERMISSION_COUNT};

/// ACL dialect understood by the platform tools.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AclType {
    /// POSIX.1e draft ACLs (`getfacl`/`setfacl`).
    #[default]
    Posix,
    /// NFSv4 ACE lists.
    Nfs4,
}

impl AclType {
    /// Returns the lowercase name used in JSON and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Posix => "posix",
            Self::Nfs4 => "nfs4",
        }
    }
}

impl fmt::Display for AclType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of principal an entry applies to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum AclEntryType {
    /// A named user.
    User,
    /// A named group.
    Group,
    /// The owning user of the file.
    OwnerUser,
    /// The owning group of the file.
    OwnerGroup,
    /// Every principal (NFSv4 `everyone@`).
    Everyone,
    /// The POSIX mask entry.
    Mask,
    /// Everybody not matched by another entry (POSIX).
    Other,
}

impl AclEntryType {
    /// Returns `true` for the categories every POSIX ACL must retain.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Self::OwnerUser | Self::OwnerGroup | Self::Other)
    }

    /// Returns `true` for categories that carry a principal name.
    #[must_use]
    pub const fn is_named(self) -> bool {
        matches!(self, Self::User | Self::Group)
    }

    /// Returns the camel-case name used in JSON and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::OwnerUser => "ownerUser",
            Self::OwnerGroup => "ownerGroup",
            Self::Everyone => "everyone",
            Self::Mask => "mask",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for AclEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Individual permission token.
///
/// Variants are declared in the order their characters are emitted, so a
/// [`BTreeSet<Permission>`] iterates in canonical text order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Permission {
    /// Read file data / list directory (`r`).
    #[cfg_attr(feature = "serde", serde(alias = "read"))]
    ReadData,
    /// Write file data / create files (`w`).
    #[cfg_attr(feature = "serde", serde(alias = "write"))]
    WriteData,
    /// Execute file / search directory (`x`).
    Execute,
    /// Delete the object (`d`).
    Delete,
    /// Delete a child of a directory (`D`).
    DeleteChild,
    /// Read basic attributes (`a`).
    ReadAttrs,
    /// Write basic attributes (`A`).
    WriteAttrs,
    /// Read the ACL (`R`).
    #[cfg_attr(feature = "serde", serde(rename = "readACL"))]
    ReadAcl,
    /// Write the ACL (`W`).
    #[cfg_attr(feature = "serde", serde(rename = "writeACL"))]
    WriteAcl,
    /// Change owner (`C`).
    Chown,
    /// Write named attributes (`N`).
    WriteNamedAttrs,
    /// Read named attributes (`n`).
    ReadNamedAttrs,
    /// Synchronize (`s`).
    Synchronize,
}

impl Permission {
    /// Looks up the permission represented by `c`.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        PERMISSION_CHARS
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, permission)| *permission)
    }

    /// Returns the text character for this permission.
    #[must_use]
    pub fn as_char(self) -> char {
        PERMISSION_CHARS
            .iter()
            .find(|(_, permission)| *permission == self)
            .map_or('?', |(ch, _)| *ch)
    }

    /// Returns `true` for the `rwx` subset used by POSIX ACLs.
    #[must_use]
    pub fn is_posix(self) -> bool {
        PERMISSION_CHARS[..POSIX_PERMISSION_COUNT]
            .iter()
            .any(|(_, permission)| *permission == self)
    }
}

/// NFSv4 inheritance flag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum InheritFlag {
    /// Inherited by files created in the directory (`f`).
    Inherit,
    /// Inherited by subdirectories (`d`).
    DirectoryInherit,
    /// Only inherited, not applied to the directory itself (`i`).
    InheritOnly,
    /// Inheritance stops after one level (`n`).
    NoPropagateInherit,
}

impl InheritFlag {
    /// Looks up the flag represented by `c`.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        FLAG_CHARS
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, flag)| *flag)
    }
}

/// Whether an entry grants or denies its permissions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Access {
    /// Grant the permissions.
    #[default]
    Allow,
    /// Deny the permissions (NFSv4 only).
    Deny,
}

/// One access-control rule.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AclEntry {
    /// Principal category.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub entry_type: AclEntryType,
    /// User or group name for named entries.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub principal: Option<String>,
    /// Granted or denied permissions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub permissions: BTreeSet<Permission>,
    /// Inheritance flags (NFSv4 only).
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: BTreeSet<InheritFlag>,
    /// Allow or deny.
    #[cfg_attr(feature = "serde", serde(default))]
    pub access: Access,
    /// Marks a directory default entry rather than an effective one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_default: bool,
}

impl AclEntry {
    /// Creates an allow entry of the given category with no permissions.
    #[must_use]
    pub const fn new(entry_type: AclEntryType) -> Self {
        Self {
            entry_type,
            principal: None,
            permissions: BTreeSet::new(),
            flags: BTreeSet::new(),
            access: Access::Allow,
            is_default: false,
        }
    }

    /// Creates a named user entry.
    #[must_use]
    pub fn user(name: impl Into<String>) -> Self {
        Self::new(AclEntryType::User).with_principal(name)
    }

    /// Creates a named group entry.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(AclEntryType::Group).with_principal(name)
    }

    /// Sets the principal name.
    #[must_use]
    pub fn with_principal(mut self, name: impl Into<String>) -> Self {
        self.principal = Some(name.into());
        self
    }

    /// Replaces the permission set.
    #[must_use]
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    /// Replaces the inheritance flags.
    #[must_use]
    pub fn with_flags(mut self, flags: impl IntoIterator<Item = InheritFlag>) -> Self {
        self.flags = flags.into_iter().collect();
        self
    }

    /// Sets the access type.
    #[must_use]
    pub const fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Marks the entry as a directory default entry.
    #[must_use]
    pub const fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Returns the principal when it is present and non-empty.
    #[must_use]
    pub fn named_principal(&self) -> Option<&str> {
        self.principal.as_deref().filter(|name| !name.is_empty())
    }

    /// Returns `true` when this is a named user or group entry.
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.entry_type.is_named() && self.named_principal().is_some()
    }

    /// Returns the base category this entry occupies, if any.
    ///
    /// A `user`/`group` entry without a principal is the owner variant, the
    /// same way `user::rwx` denotes the owning user in POSIX text.
    #[must_use]
    pub fn base_category(&self) -> Option<AclEntryType> {
        match self.entry_type {
            AclEntryType::User if !self.is_named() => Some(AclEntryType::OwnerUser),
            AclEntryType::Group if !self.is_named() => Some(AclEntryType::OwnerGroup),
            other if other.is_base() => Some(other),
            _ => None,
        }
    }
}
