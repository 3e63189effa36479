use protocol::{AclEntry, AclRemoveConfig, AclType, format_removal_entry};

use super::{AclEngine, invocation};
use crate::error::{AclError, AclOperation};
use crate::exec::ExecContext;

impl AclEngine {
    /// Removes entries, default entries, or the whole extended ACL.
    ///
    /// With `remove_all_xattr` every extended entry is stripped and the rest
    /// of the request is ignored. Otherwise `remove_default` drops default
    /// entries and each named user or group entry in the request is removed.
    /// Base entries in the request are skipped. A request whose entries are
    /// all base entries succeeds without running the tool.
    pub fn remove_acl(&self, config: &AclRemoveConfig, ctx: &ExecContext) -> Result<(), AclError> {
        let _guard = self.span.enter();
        if !config.has_removal() {
            return Err(AclError::invalid_input(
                "remove request must list entries or set remove_default or remove_all_xattr",
            ));
        }

        let ctx = self.context(ctx);
        let acl = &config.acl;
        let path = acl.path.as_path();
        self.validate(path)?;

        if config.remove_all_xattr {
            let args = invocation::remove_all_args(acl.recursive, path);
            return self.mutate(AclOperation::Remove, path, acl.acl_type, &args, &ctx);
        }

        let lines = removal_lines(&acl.entries, acl.acl_type)?;
        if lines.is_empty() {
            if !config.remove_default {
                tracing::debug!(path = %path.display(), "no removable entries requested");
                return Ok(());
            }
            let args = invocation::remove_args(acl.recursive, true, None, path);
            return self.mutate(AclOperation::Remove, path, acl.acl_type, &args, &ctx);
        }

        let scratch = self.write_scratch(path, &lines)?;
        let args = invocation::remove_args(
            acl.recursive,
            config.remove_default,
            Some(scratch.path()),
            path,
        );
        self.mutate(AclOperation::Remove, path, acl.acl_type, &args, &ctx)
    }
}

fn removal_lines(entries: &[AclEntry], acl_type: AclType) -> Result<Vec<String>, AclError> {
    let mut lines = Vec::with_capacity(entries.len());
    for entry in entries {
        match format_removal_entry(entry, acl_type)? {
            Some(line) => lines.push(line),
            None => {
                tracing::debug!(entry_type = %entry.entry_type, "skipping base entry in removal");
            }
        }
    }
    Ok(lines)
}
