//! Filesystem kind detection and the policy deciding which kinds support
//! managed ACLs.

use std::fmt;
use std::io;
use std::path::Path;

const ZFS_SUPER_MAGIC: u64 = 0x2fc1_2fc1;
const EXT_SUPER_MAGIC: u64 = 0xef53;
const XFS_SUPER_MAGIC: u64 = 0x5846_5342;
const BTRFS_SUPER_MAGIC: u64 = 0x9123_683e;
const TMPFS_MAGIC: u64 = 0x0102_1994;
const NFS_SUPER_MAGIC: u64 = 0x6969;

/// Filesystem kind as reported by `statfs`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FilesystemKind {
    /// OpenZFS.
    Zfs,
    /// ext2, ext3 and ext4 (they share a magic number).
    Ext4,
    /// XFS.
    Xfs,
    /// Btrfs.
    Btrfs,
    /// tmpfs.
    Tmpfs,
    /// NFS client mounts.
    Nfs,
    /// Any other filesystem, identified by its magic number.
    Unknown(u64),
}

impl FilesystemKind {
    /// Maps a `statfs` `f_type` magic number to a kind.
    #[must_use]
    pub const fn from_magic(magic: u64) -> Self {
        match magic {
            ZFS_SUPER_MAGIC => Self::Zfs,
            EXT_SUPER_MAGIC => Self::Ext4,
            XFS_SUPER_MAGIC => Self::Xfs,
            BTRFS_SUPER_MAGIC => Self::Btrfs,
            TMPFS_MAGIC => Self::Tmpfs,
            NFS_SUPER_MAGIC => Self::Nfs,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for FilesystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zfs => f.write_str("zfs"),
            Self::Ext4 => f.write_str("ext4"),
            Self::Xfs => f.write_str("xfs"),
            Self::Btrfs => f.write_str("btrfs"),
            Self::Tmpfs => f.write_str("tmpfs"),
            Self::Nfs => f.write_str("nfs"),
            Self::Unknown(magic) => write!(f, "unknown filesystem 0x{magic:x}"),
        }
    }
}

/// Reports the filesystem kind backing a path.
pub trait FilesystemProbe: Send + Sync {
    /// Returns the kind of the filesystem containing `path`.
    fn filesystem_kind(&self, path: &Path) -> io::Result<FilesystemKind>;
}

/// [`FilesystemProbe`] backed by `statfs(2)`.
///
/// On platforms without `statfs` every path reports
/// [`FilesystemKind::Unknown`] with a zero magic.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatfsProbe;

impl FilesystemProbe for StatfsProbe {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn filesystem_kind(&self, path: &Path) -> io::Result<FilesystemKind> {
        let stat = rustix::fs::statfs(path)?;
        Ok(FilesystemKind::from_magic(stat.f_type as u64))
    }

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    fn filesystem_kind(&self, _path: &Path) -> io::Result<FilesystemKind> {
        Ok(FilesystemKind::Unknown(0))
    }
}

/// Set of filesystem kinds on which ACL management is allowed.
///
/// An empty set allows every filesystem.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilesystemPolicy {
    allowed: Vec<FilesystemKind>,
}

impl FilesystemPolicy {
    /// Allows only the listed kinds.
    #[must_use]
    pub const fn only(allowed: Vec<FilesystemKind>) -> Self {
        Self { allowed }
    }

    /// Allows every filesystem.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            allowed: Vec::new(),
        }
    }

    /// Returns `true` when `kind` may be managed.
    #[must_use]
    pub fn allows(&self, kind: FilesystemKind) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&kind)
    }

    /// Returns the allowed kinds; empty means unrestricted.
    #[must_use]
    pub fn allowed(&self) -> &[FilesystemKind] {
        &self.allowed
    }
}

impl Default for FilesystemPolicy {
    fn default() -> Self {
        Self::only(vec![FilesystemKind::Zfs])
    }
}
