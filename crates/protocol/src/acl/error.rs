use thiserror::Error;

use super::entry::{AclEntryType, AclType};

/// Structural problem found in a single line of ACL text.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseErrorReason {
    /// The line has fewer fields than the grammar requires.
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields {
        /// Minimum number of fields.
        expected: usize,
        /// Number of fields present.
        found: usize,
    },
    /// The line has more fields than the grammar allows.
    #[error("expected at most {expected} fields, found {found}")]
    TooManyFields {
        /// Maximum number of fields.
        expected: usize,
        /// Number of fields present.
        found: usize,
    },
    /// The entry kind is not part of the grammar.
    #[error("unknown entry kind '{0}'")]
    UnknownKind(String),
    /// A kind that never carries a principal was given one.
    #[error("'{0}' entries do not take a principal")]
    UnexpectedPrincipal(String),
    /// The NFSv4 access field is neither `allow` nor `deny`.
    #[error("unknown access type '{0}'")]
    UnknownAccess(String),
    /// An octal escape decoded to bytes that are not UTF-8.
    #[error("principal is not valid UTF-8 after unescaping")]
    InvalidEscape,
}

/// Error returned when ACL text cannot be parsed.
///
/// Parsing stops at the first malformed line; the line and its 1-based
/// number are kept so callers can report exactly what the tool printed.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("malformed ACL entry on line {line_number} ('{line}'): {reason}")]
pub struct ParseError {
    line_number: usize,
    line: String,
    reason: ParseErrorReason,
}

impl ParseError {
    pub(crate) fn new(line_number: usize, line: &str, reason: ParseErrorReason) -> Self {
        Self {
            line_number,
            line: line.to_owned(),
            reason,
        }
    }

    /// Returns the 1-based line number of the offending line.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the offending line.
    #[must_use]
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Returns what was wrong with the line.
    #[must_use]
    pub const fn reason(&self) -> &ParseErrorReason {
        &self.reason
    }
}

/// Error returned when an entry cannot be written in the requested dialect.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum FormatError {
    /// The dialect has no representation for the entry category.
    #[error("{entry_type} entries cannot be expressed as {acl_type} ACL text")]
    UnsupportedEntry {
        /// Category of the rejected entry.
        entry_type: AclEntryType,
        /// Requested dialect.
        acl_type: AclType,
    },
}
