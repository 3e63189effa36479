//! POSIX grammar: `[default:]kind[:principal]:perms`.

use super::constants::{
    DEFAULT_PREFIX, FIELD_SEPARATOR, POSIX_GROUP, POSIX_MASK, POSIX_OTHER, POSIX_OWNER,
    POSIX_PERMISSION_COUNT, POSIX_USER,
};
use super::entry::{AclEntry, AclEntryType, AclType};
use super::error::{FormatError, ParseErrorReason};
use super::text::{parse_permissions, push_escaped, push_permissions, unescape};

pub(super) fn parse_line(line: &str) -> Result<AclEntry, ParseErrorReason> {
    let (is_default, body) = match line.strip_prefix(DEFAULT_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, line),
    };

    let fields: Vec<&str> = body.split(FIELD_SEPARATOR).collect();
    let (kind, principal, perms) = match fields.as_slice() {
        [kind, perms] => (*kind, String::new(), *perms),
        [kind, principal, perms] => (*kind, unescape(principal)?, *perms),
        [_] => {
            return Err(ParseErrorReason::TooFewFields {
                expected: 2,
                found: 1,
            });
        }
        _ => {
            return Err(ParseErrorReason::TooManyFields {
                expected: 3,
                found: fields.len(),
            });
        }
    };

    let entry_type = match kind {
        POSIX_USER if principal.is_empty() => AclEntryType::OwnerUser,
        POSIX_USER => AclEntryType::User,
        POSIX_GROUP if principal.is_empty() => AclEntryType::OwnerGroup,
        POSIX_GROUP => AclEntryType::Group,
        POSIX_OWNER | POSIX_MASK | POSIX_OTHER if !principal.is_empty() => {
            return Err(ParseErrorReason::UnexpectedPrincipal(kind.to_owned()));
        }
        POSIX_OWNER => AclEntryType::OwnerUser,
        POSIX_MASK => AclEntryType::Mask,
        POSIX_OTHER => AclEntryType::Other,
        _ => return Err(ParseErrorReason::UnknownKind(kind.to_owned())),
    };

    let mut entry = AclEntry::new(entry_type).with_permissions(parse_permissions(perms));
    if entry_type.is_named() {
        entry.principal = Some(principal);
    }
    entry.is_default = is_default;
    Ok(entry)
}

pub(super) fn format_line(entry: &AclEntry) -> Result<String, FormatError> {
    let (kind, principal) = match entry.entry_type {
        AclEntryType::User => (POSIX_USER, entry.named_principal()),
        AclEntryType::Group => (POSIX_GROUP, entry.named_principal()),
        AclEntryType::OwnerUser => (POSIX_USER, None),
        AclEntryType::OwnerGroup => (POSIX_GROUP, None),
        AclEntryType::Mask => (POSIX_MASK, None),
        AclEntryType::Other => (POSIX_OTHER, None),
        AclEntryType::Everyone => {
            return Err(FormatError::UnsupportedEntry {
                entry_type: entry.entry_type,
                acl_type: AclType::Posix,
            });
        }
    };

    let mut line = qualifier(entry.is_default, kind, principal.unwrap_or_default());
    line.push(FIELD_SEPARATOR);
    push_permissions(&mut line, &entry.permissions, POSIX_PERMISSION_COUNT);
    Ok(line)
}

pub(super) fn format_removal_line(entry: &AclEntry) -> Option<String> {
    let kind = match entry.entry_type {
        AclEntryType::User => POSIX_USER,
        AclEntryType::Group => POSIX_GROUP,
        _ => return None,
    };
    entry
        .named_principal()
        .map(|principal| qualifier(entry.is_default, kind, principal))
}

fn qualifier(is_default: bool, kind: &str, principal: &str) -> String {
    let mut line = String::new();
    if is_default {
        line.push_str(DEFAULT_PREFIX);
    }
    line.push_str(kind);
    line.push(FIELD_SEPARATOR);
    push_escaped(&mut line, principal);
    line
}
