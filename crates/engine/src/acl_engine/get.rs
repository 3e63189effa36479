use std::path::Path;

use protocol::{AclEntry, AclListConfig, AclListResult, AclType, parse_acl_text};

use super::{AclEngine, detect_acl_type, invocation};
use crate::error::AclError;
use crate::exec::ExecContext;

impl AclEngine {
    /// Reads the ACL of `config.path`, and of its whole subtree when
    /// `config.recursive` is set and the path is a directory.
    ///
    /// The subtree is visited depth-first in name order. A child that fails
    /// is logged and left out of the result; the listing itself still
    /// succeeds. Deadline expiry and cancellation abort the whole listing.
    ///
    /// Each child is validated like a top-level path, so a child whose name
    /// contains a forbidden character is omitted without running the reader.
    pub fn get_acl(
        &self,
        config: &AclListConfig,
        ctx: &ExecContext,
    ) -> Result<AclListResult, AclError> {
        let _guard = self.span.enter();
        let ctx = self.context(ctx);
        self.get_tree(&config.path, config.recursive, &ctx)
    }

    fn get_tree(
        &self,
        path: &Path,
        recursive: bool,
        ctx: &ExecContext,
    ) -> Result<AclListResult, AclError> {
        let validated = self.validate(path)?;
        let acl_type = detect_acl_type(&validated);
        let entries = self.read_entries(path, acl_type, ctx)?;
        let mut result = AclListResult::new(path.to_path_buf(), acl_type, entries);

        if recursive && validated.is_directory() {
            for child in walk::read_children(path)? {
                // Symlinked directories are listed but never descended into.
                match self.get_tree(child.path(), child.is_directory(), ctx) {
                    Ok(subtree) => result.children.push(subtree),
                    Err(error) if error.is_interrupted() => return Err(error),
                    Err(error) => {
                        tracing::warn!(
                            path = %child.path().display(),
                            %error,
                            "omitting child from recursive ACL listing"
                        );
                    }
                }
            }
        }
        Ok(result)
    }

    /// Runs the reader for `path` and parses its output.
    pub(super) fn read_entries(
        &self,
        path: &Path,
        acl_type: AclType,
        ctx: &ExecContext,
    ) -> Result<Vec<AclEntry>, AclError> {
        let program = self.config.tools.getter(acl_type);
        let args = invocation::get_args(acl_type, path);
        let output = self
            .run_tool(program, &args, ctx)
            .map_err(|source| AclError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let entries =
            parse_acl_text(&output.stdout, acl_type).map_err(|source| AclError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), count = entries.len(), "read ACL");
        Ok(entries)
    }
}
