use protocol::{Access, AclConfig, AclEntry, AclEntryType, AclType, format_entry};

use super::{AclEngine, invocation};
use crate::error::{AclError, AclOperation};
use crate::exec::ExecContext;

impl AclEngine {
    /// Replaces the ACL of `config.path` with `config.entries`.
    ///
    /// Base entries the request leaves out are carried over from the current
    /// ACL and written ahead of the requested entries, so a replace can never
    /// strip the owning user, owning group or the catch-all entry.
    pub fn set_acl(&self, config: &AclConfig, ctx: &ExecContext) -> Result<(), AclError> {
        let _guard = self.span.enter();
        let ctx = self.context(ctx);
        let path = config.path.as_path();

        self.validate(path)?;
        check_entries(config)?;
        self.verify_principals(&config.entries)?;
        let requested = format_lines(&config.entries, config.acl_type)?;

        let current = self.read_entries(path, config.acl_type, &ctx)?;
        let carried = missing_base_entries(&current, &config.entries, config.acl_type);
        if !carried.is_empty() {
            tracing::debug!(
                path = %path.display(),
                carried = carried.len(),
                "keeping existing base entries"
            );
        }
        let mut lines = format_lines(&carried, config.acl_type)?;
        lines.extend(requested);

        let scratch = self.write_scratch(path, &lines)?;
        let args = invocation::set_args(config.recursive, scratch.path(), path);
        self.mutate(AclOperation::Set, path, config.acl_type, &args, &ctx)
    }

    /// Adds or overwrites `config.entries`, leaving every other entry alone.
    ///
    /// Base entries are not injected: a merge cannot remove them.
    pub fn modify_acl(&self, config: &AclConfig, ctx: &ExecContext) -> Result<(), AclError> {
        let _guard = self.span.enter();
        let ctx = self.context(ctx);
        let path = config.path.as_path();

        self.validate(path)?;
        check_entries(config)?;
        self.verify_principals(&config.entries)?;
        let lines = format_lines(&config.entries, config.acl_type)?;

        let scratch = self.write_scratch(path, &lines)?;
        let args = invocation::modify_args(config.recursive, scratch.path(), path);
        self.mutate(AclOperation::Modify, path, config.acl_type, &args, &ctx)
    }
}

fn check_entries(config: &AclConfig) -> Result<(), AclError> {
    if config.entries.is_empty() {
        return Err(AclError::invalid_input("at least one ACL entry is required"));
    }
    if config.acl_type == AclType::Posix {
        if let Some(entry) = config
            .entries
            .iter()
            .find(|entry| entry.access == Access::Deny)
        {
            return Err(AclError::invalid_input(format!(
                "POSIX ACLs cannot deny access ({} entry)",
                entry.entry_type
            )));
        }
        if let Some(entry) = config.entries.iter().find(|entry| !entry.flags.is_empty()) {
            return Err(AclError::invalid_input(format!(
                "inheritance flags require an NFSv4 ACL ({} entry)",
                entry.entry_type
            )));
        }
    }
    Ok(())
}

fn format_lines(entries: &[AclEntry], acl_type: AclType) -> Result<Vec<String>, AclError> {
    entries
        .iter()
        .map(|entry| format_entry(entry, acl_type).map_err(AclError::from))
        .collect()
}

const fn base_categories(acl_type: AclType) -> [AclEntryType; 3] {
    match acl_type {
        AclType::Posix => [
            AclEntryType::OwnerUser,
            AclEntryType::OwnerGroup,
            AclEntryType::Other,
        ],
        AclType::Nfs4 => [
            AclEntryType::OwnerUser,
            AclEntryType::OwnerGroup,
            AclEntryType::Everyone,
        ],
    }
}

fn occupies(entry: &AclEntry, category: AclEntryType) -> bool {
    !entry.is_default
        && (entry.base_category() == Some(category) || entry.entry_type == category)
}

/// Existing base entries for each category `requested` does not supply,
/// in owner, group, catch-all order.
pub(super) fn missing_base_entries(
    current: &[AclEntry],
    requested: &[AclEntry],
    acl_type: AclType,
) -> Vec<AclEntry> {
    base_categories(acl_type)
        .into_iter()
        .filter(|&category| !requested.iter().any(|entry| occupies(entry, category)))
        .filter_map(|category| {
            current
                .iter()
                .find(|entry| occupies(entry, category))
                .cloned()
        })
        .collect()
}
