//! Character tables and keywords of the ACL text grammars.
//!
//! The order of [`PERMISSION_CHARS`] is the order in which permission
//! characters are emitted. The first three entries form the POSIX `rwx`
//! triplet; the remainder are NFSv4 extensions.

use super::entry::{InheritFlag, Permission};

/// Permission characters in emission order.
pub const PERMISSION_CHARS: [(char, Permission); 13] = [
    ('r', Permission::ReadData),
    ('w', Permission::WriteData),
    ('x', Permission::Execute),
    ('d', Permission::Delete),
    ('D', Permission::DeleteChild),
    ('a', Permission::ReadAttrs),
    ('A', Permission::WriteAttrs),
    ('R', Permission::ReadAcl),
    ('W', Permission::WriteAcl),
    ('C', Permission::Chown),
    ('N', Permission::WriteNamedAttrs),
    ('n', Permission::ReadNamedAttrs),
    ('s', Permission::Synchronize),
];

/// Number of leading [`PERMISSION_CHARS`] that make up the POSIX triplet.
pub const POSIX_PERMISSION_COUNT: usize = 3;

/// NFSv4 inheritance flag characters in emission order.
pub const FLAG_CHARS: [(char, InheritFlag); 4] = [
    ('f', InheritFlag::Inherit),
    ('d', InheritFlag::DirectoryInherit),
    ('i', InheritFlag::InheritOnly),
    ('n', InheritFlag::NoPropagateInherit),
];

/// Placeholder emitted for an absent permission or flag.
pub const ABSENT_CHAR: char = '-';

/// Prefix marking a POSIX default (inherited) entry.
pub const DEFAULT_PREFIX: &str = "default:";

/// Field separator of both grammars.
pub const FIELD_SEPARATOR: char = ':';

/// Leading character of comment lines.
pub const COMMENT_CHAR: char = '#';

/// POSIX entry kinds.
pub const POSIX_USER: &str = "user";
/// POSIX group kind.
pub const POSIX_GROUP: &str = "group";
/// POSIX owner kind, accepted as a synonym for `user::`.
pub const POSIX_OWNER: &str = "owner";
/// POSIX mask kind.
pub const POSIX_MASK: &str = "mask";
/// POSIX other kind.
pub const POSIX_OTHER: &str = "other";

/// NFSv4 special principal for the file owner.
pub const NFS4_OWNER: &str = "owner@";
/// NFSv4 special principal for the owning group.
pub const NFS4_GROUP: &str = "group@";
/// NFSv4 special principal for everyone.
pub const NFS4_EVERYONE: &str = "everyone@";
/// NFSv4 allow keyword.
pub const NFS4_ALLOW: &str = "allow";
/// NFSv4 deny keyword.
pub const NFS4_DENY: &str = "deny";
