//! Dialect dispatch and helpers shared by the POSIX and NFSv4 grammars.

use std::collections::BTreeSet;

use super::constants::{ABSENT_CHAR, COMMENT_CHAR, FIELD_SEPARATOR, FLAG_CHARS, PERMISSION_CHARS};
use super::entry::{AclEntry, AclType, InheritFlag, Permission};
use super::error::{FormatError, ParseError, ParseErrorReason};
use super::{nfs4, posix};

/// Parses multi-line ACL text into entries.
///
/// Blank lines and `#` comment lines are skipped, as are trailing comments
/// introduced by whitespace (`user:bob:rwx\t#effective:r-x`). The first
/// malformed line aborts the parse; no partial result is returned.
pub fn parse_acl_text(text: &str, acl_type: AclType) -> Result<Vec<AclEntry>, ParseError> {
    let mut entries = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_CHAR) {
            continue;
        }
        let line = strip_trailing_comment(line);

        let parsed = match acl_type {
            AclType::Posix => posix::parse_line(line),
            AclType::Nfs4 => nfs4::parse_line(line),
        };
        entries.push(parsed.map_err(|reason| ParseError::new(index + 1, line, reason))?);
    }

    Ok(entries)
}

/// Formats one entry as a line the `setfacl` family accepts.
///
/// For POSIX text this is the exact inverse of [`parse_acl_text`]: parsing
/// the returned line yields an entry equal to any entry the parser produced.
pub fn format_entry(entry: &AclEntry, acl_type: AclType) -> Result<String, FormatError> {
    match acl_type {
        AclType::Posix => posix::format_line(entry),
        AclType::Nfs4 => nfs4::format_line(entry),
    }
}

/// Formats the line that removes `entry`, as consumed by `setfacl -X`.
///
/// Base entries cannot be removed individually and yield `Ok(None)`.
pub fn format_removal_entry(
    entry: &AclEntry,
    acl_type: AclType,
) -> Result<Option<String>, FormatError> {
    if !entry.is_named() {
        return Ok(None);
    }
    match acl_type {
        AclType::Posix => Ok(posix::format_removal_line(entry)),
        AclType::Nfs4 => nfs4::format_line(entry).map(Some),
    }
}

fn strip_trailing_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    line.match_indices(COMMENT_CHAR)
        .find(|(index, _)| *index > 0 && bytes[index - 1].is_ascii_whitespace())
        .map_or(line, |(index, _)| line[..index].trim_end())
}

pub(super) fn parse_permissions(field: &str) -> BTreeSet<Permission> {
    field.chars().filter_map(Permission::from_char).collect()
}

pub(super) fn parse_flags(field: &str) -> BTreeSet<InheritFlag> {
    field.chars().filter_map(InheritFlag::from_char).collect()
}

/// Appends the characters of `table` present in `set`, using `-` for absent
/// positions among the first `fixed` characters.
pub(super) fn push_chars<T: Ord + Copy>(
    out: &mut String,
    table: &[(char, T)],
    set: &BTreeSet<T>,
    fixed: usize,
) {
    for (position, (ch, token)) in table.iter().enumerate() {
        if set.contains(token) {
            out.push(*ch);
        } else if position < fixed {
            out.push(ABSENT_CHAR);
        }
    }
}

pub(super) fn push_permissions(out: &mut String, permissions: &BTreeSet<Permission>, fixed: usize) {
    push_chars(out, &PERMISSION_CHARS, permissions, fixed);
}

pub(super) fn push_flags(out: &mut String, flags: &BTreeSet<InheritFlag>) {
    push_chars(out, &FLAG_CHARS, flags, FLAG_CHARS.len());
}

/// Appends `name`, escaping characters the grammar reserves as `\ooo`.
pub(super) fn push_escaped(out: &mut String, name: &str) {
    for ch in name.chars() {
        if needs_escape(ch) {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("\\{byte:03o}"));
            }
        } else {
            out.push(ch);
        }
    }
}

fn needs_escape(ch: char) -> bool {
    ch.is_whitespace() || ch.is_control() || matches!(ch, FIELD_SEPARATOR | '\\' | ',')
}

/// Decodes `\ooo` octal escapes. A backslash not followed by three octal
/// digits is kept literally.
pub(super) fn unescape(field: &str) -> Result<String, ParseErrorReason> {
    if !field.contains('\\') {
        return Ok(field.to_owned());
    }

    let bytes = field.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'\\' {
            if let Some(value) = octal_escape(&bytes[index + 1..]) {
                decoded.push(value);
                index += 4;
                continue;
            }
        }
        decoded.push(bytes[index]);
        index += 1;
    }

    String::from_utf8(decoded).map_err(|_| ParseErrorReason::InvalidEscape)
}

fn octal_escape(rest: &[u8]) -> Option<u8> {
    let digits = rest.get(..3)?;
    if !digits.iter().all(|digit| (b'0'..=b'7').contains(digit)) {
        return None;
    }
    let value = digits
        .iter()
        .fold(0u32, |acc, digit| acc * 8 + u32::from(digit - b'0'));
    u8::try_from(value).ok()
}
