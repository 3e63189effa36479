//! Directory-service principal verification.

use std::fmt;
use std::sync::Arc;

/// Separator between the domain and the account name, as in `CORP\alice`.
pub const DOMAIN_SEPARATOR: char = '\\';

/// A `DOMAIN\name` principal.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DomainPrincipal {
    domain: String,
    name: String,
}

impl DomainPrincipal {
    /// Splits `principal` at the first [`DOMAIN_SEPARATOR`].
    ///
    /// Returns `None` for principals without a separator.
    #[must_use]
    pub fn parse(principal: &str) -> Option<Self> {
        let (domain, name) = principal.split_once(DOMAIN_SEPARATOR)?;
        Some(Self {
            domain: domain.to_owned(),
            name: name.to_owned(),
        })
    }

    /// Domain part.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Account part.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DomainPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{DOMAIN_SEPARATOR}{}", self.domain, self.name)
    }
}

/// Whether a principal names a user or a group account.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrincipalKind {
    /// User account.
    User,
    /// Group account.
    Group,
}

/// Lookup failure reported by a [`PrincipalResolver`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ResolverError {
    message: String,
}

impl ResolverError {
    /// Creates an error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Confirms that domain principals exist before they are written into an ACL.
pub trait PrincipalResolver: Send + Sync {
    /// Returns `Ok(false)` when the directory service has no such account.
    fn principal_exists(
        &self,
        principal: &DomainPrincipal,
        kind: PrincipalKind,
    ) -> Result<bool, ResolverError>;
}

impl<T: PrincipalResolver + ?Sized> PrincipalResolver for Arc<T> {
    fn principal_exists(
        &self,
        principal: &DomainPrincipal,
        kind: PrincipalKind,
    ) -> Result<bool, ResolverError> {
        (**self).principal_exists(principal, kind)
    }
}
