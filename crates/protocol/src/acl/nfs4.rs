//! NFSv4 grammar: `principal:perms:flags[:access]`.
//!
//! The principal is one of the special `owner@`, `group@` and `everyone@`
//! tokens, a `user:name`/`group:name` pair, or a bare name that denotes a
//! user.

use super::constants::{
    FIELD_SEPARATOR, NFS4_ALLOW, NFS4_DENY, NFS4_EVERYONE, NFS4_GROUP, NFS4_OWNER,
    PERMISSION_CHARS, POSIX_GROUP, POSIX_USER,
};
use super::entry::{Access, AclEntry, AclEntryType, AclType};
use super::error::{FormatError, ParseErrorReason};
use super::text::{parse_flags, parse_permissions, push_escaped, push_flags, push_permissions, unescape};

const MIN_FIELDS: usize = 4;

pub(super) fn parse_line(line: &str) -> Result<AclEntry, ParseErrorReason> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() < MIN_FIELDS {
        return Err(ParseErrorReason::TooFewFields {
            expected: MIN_FIELDS,
            found: fields.len(),
        });
    }

    let (entry_type, principal, consumed) = match fields[0] {
        NFS4_OWNER => (AclEntryType::OwnerUser, None, 1),
        NFS4_GROUP => (AclEntryType::OwnerGroup, None, 1),
        NFS4_EVERYONE => (AclEntryType::Everyone, None, 1),
        POSIX_USER => named(AclEntryType::User, AclEntryType::OwnerUser, fields[1])?,
        POSIX_GROUP => named(AclEntryType::Group, AclEntryType::OwnerGroup, fields[1])?,
        "" => return Err(ParseErrorReason::UnknownKind(String::new())),
        name => (AclEntryType::User, Some(unescape(name)?), 1),
    };

    let rest = &fields[consumed..];
    if rest.len() > 3 {
        return Err(ParseErrorReason::TooManyFields {
            expected: consumed + 3,
            found: fields.len(),
        });
    }

    let access = match rest.get(2).copied() {
        None | Some("") | Some(NFS4_ALLOW) => Access::Allow,
        Some(NFS4_DENY) => Access::Deny,
        Some(other) => return Err(ParseErrorReason::UnknownAccess(other.to_owned())),
    };

    let mut entry = AclEntry::new(entry_type)
        .with_permissions(parse_permissions(rest[0]))
        .with_flags(parse_flags(rest[1]))
        .with_access(access);
    entry.principal = principal;
    Ok(entry)
}

fn named(
    entry_type: AclEntryType,
    base: AclEntryType,
    field: &str,
) -> Result<(AclEntryType, Option<String>, usize), ParseErrorReason> {
    let name = unescape(field)?;
    if name.is_empty() {
        Ok((base, None, 2))
    } else {
        Ok((entry_type, Some(name), 2))
    }
}

pub(super) fn format_line(entry: &AclEntry) -> Result<String, FormatError> {
    let mut line = String::new();
    match (entry.entry_type, entry.named_principal()) {
        (AclEntryType::User, Some(name)) => {
            line.push_str(POSIX_USER);
            line.push(FIELD_SEPARATOR);
            push_escaped(&mut line, name);
        }
        (AclEntryType::Group, Some(name)) => {
            line.push_str(POSIX_GROUP);
            line.push(FIELD_SEPARATOR);
            push_escaped(&mut line, name);
        }
        (AclEntryType::User | AclEntryType::OwnerUser, _) => line.push_str(NFS4_OWNER),
        (AclEntryType::Group | AclEntryType::OwnerGroup, _) => line.push_str(NFS4_GROUP),
        (AclEntryType::Everyone, _) => line.push_str(NFS4_EVERYONE),
        (AclEntryType::Mask | AclEntryType::Other, _) => {
            return Err(FormatError::UnsupportedEntry {
                entry_type: entry.entry_type,
                acl_type: AclType::Nfs4,
            });
        }
    }

    line.push(FIELD_SEPARATOR);
    push_permissions(&mut line, &entry.permissions, PERMISSION_CHARS.len());
    line.push(FIELD_SEPARATOR);
    push_flags(&mut line, &entry.flags);
    line.push(FIELD_SEPARATOR);
    line.push_str(match entry.access {
        Access::Allow => NFS4_ALLOW,
        Access::Deny => NFS4_DENY,
    });
    Ok(line)
}
