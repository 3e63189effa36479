//! The ACL engine: Get, Set, Modify and Remove on top of the external tools.

mod get;
mod invocation;
mod remove;
mod set;

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Once};

use metadata::{FilesystemPolicy, FilesystemProbe, StatfsProbe, ValidatedPath, validate_path};
use protocol::{AclEntry, AclEntryType, AclType};
use tracing::Span;

use crate::config::EngineConfig;
use crate::error::{AclError, AclOperation};
use crate::exec::{CommandExecutor, ExecContext, ExecError, ExecOutput};
use crate::principal::{DomainPrincipal, PrincipalKind, PrincipalResolver};
use crate::scratch::ScratchFile;

/// Stateless ACL manager.
///
/// Every call re-reads live state through the injected [`CommandExecutor`];
/// nothing is cached between calls. The engine is `Send + Sync` and may be
/// shared across threads. Calls against the same path are not serialised.
pub struct AclEngine {
    executor: Arc<dyn CommandExecutor>,
    resolver: Option<Arc<dyn PrincipalResolver>>,
    probe: Arc<dyn FilesystemProbe>,
    policy: FilesystemPolicy,
    config: EngineConfig,
    span: Span,
}

impl fmt::Debug for AclEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AclEngine")
            .field("has_resolver", &self.resolver.is_some())
            .field("policy", &self.policy)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AclEngine {
    /// Starts building an engine around `executor`.
    pub fn builder(executor: impl CommandExecutor + 'static) -> AclEngineBuilder {
        AclEngineBuilder::new(Arc::new(executor))
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Verifies every domain principal in `entries` with the resolver.
    ///
    /// Entries whose principal contains `\` are looked up; the first one the
    /// resolver does not know fails the whole call with
    /// [`AclError::InvalidPrincipal`]. On success the entries are returned
    /// unchanged. Without a resolver this is a no-op.
    pub fn resolve_ad_users(&self, entries: &[AclEntry]) -> Result<Vec<AclEntry>, AclError> {
        let _guard = self.span.enter();
        self.verify_principals(entries)?;
        Ok(entries.to_vec())
    }

    fn verify_principals(&self, entries: &[AclEntry]) -> Result<(), AclError> {
        let Some(resolver) = &self.resolver else {
            return Ok(());
        };
        for entry in entries {
            let Some(name) = entry.named_principal() else {
                continue;
            };
            let Some(principal) = DomainPrincipal::parse(name) else {
                continue;
            };
            let kind = match entry.entry_type {
                AclEntryType::Group | AclEntryType::OwnerGroup => PrincipalKind::Group,
                _ => PrincipalKind::User,
            };
            let exists = resolver
                .principal_exists(&principal, kind)
                .map_err(|source| AclError::PrincipalLookup {
                    principal: name.to_owned(),
                    source,
                })?;
            if !exists {
                tracing::warn!(principal = name, "unknown domain principal");
                return Err(AclError::InvalidPrincipal {
                    principal: name.to_owned(),
                });
            }
            tracing::debug!(principal = name, ?kind, "verified domain principal");
        }
        Ok(())
    }

    fn validate(&self, path: &Path) -> Result<ValidatedPath, AclError> {
        Ok(validate_path(path, self.probe.as_ref(), &self.policy)?)
    }

    fn context(&self, ctx: &ExecContext) -> ExecContext {
        ctx.or_timeout(self.config.tool_timeout())
    }

    fn run_tool(
        &self,
        program: &Path,
        args: &[OsString],
        ctx: &ExecContext,
    ) -> Result<ExecOutput, ExecError> {
        tracing::debug!(program = %program.display(), ?args, "running ACL tool");
        let result = self.executor.execute(program, args, ctx);
        if let Err(error) = &result {
            tracing::debug!(program = %program.display(), %error, "ACL tool failed");
        }
        result
    }

    fn write_scratch(&self, path: &Path, lines: &[String]) -> Result<ScratchFile, AclError> {
        ScratchFile::with_lines(self.config.scratch_dir.as_deref(), lines).map_err(|source| {
            AclError::Io {
                path: self
                    .config
                    .scratch_dir
                    .clone()
                    .unwrap_or_else(|| path.to_path_buf()),
                source,
            }
        })
    }

    fn mutate(
        &self,
        operation: AclOperation,
        path: &Path,
        acl_type: AclType,
        args: &[OsString],
        ctx: &ExecContext,
    ) -> Result<(), AclError> {
        self.run_tool(self.config.tools.setter(acl_type), args, ctx)
            .map_err(|source| AclError::Write {
                path: path.to_path_buf(),
                operation,
                source,
            })?;
        tracing::info!(path = %path.display(), %operation, %acl_type, "ACL updated");
        Ok(())
    }
}

/// Detects the dialect of the ACL on `validated`.
///
/// Always POSIX; NFSv4 detection is not implemented.
fn detect_acl_type(validated: &ValidatedPath) -> AclType {
    static WARN_ONCE: Once = Once::new();
    WARN_ONCE.call_once(|| {
        tracing::warn!(
            filesystem = %validated.filesystem(),
            "NFSv4 ACL detection is not available; treating ACLs as POSIX"
        );
    });
    AclType::Posix
}

/// Builder for [`AclEngine`].
pub struct AclEngineBuilder {
    executor: Arc<dyn CommandExecutor>,
    resolver: Option<Arc<dyn PrincipalResolver>>,
    probe: Option<Arc<dyn FilesystemProbe>>,
    config: EngineConfig,
    span: Option<Span>,
}

impl fmt::Debug for AclEngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AclEngineBuilder")
            .field("has_resolver", &self.resolver.is_some())
            .field("has_probe", &self.probe.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AclEngineBuilder {
    fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            resolver: None,
            probe: None,
            config: EngineConfig::default(),
            span: None,
        }
    }

    /// Verifies domain principals with `resolver` before mutations.
    pub fn resolver(mut self, resolver: impl PrincipalResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Replaces the `statfs`-based filesystem probe.
    pub fn filesystem_probe(mut self, probe: impl FilesystemProbe + 'static) -> Self {
        self.probe = Some(Arc::new(probe));
        self
    }

    /// Sets tool paths, filesystem policy, timeout and scratch directory.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Parent span for every event the engine emits.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Finishes the engine.
    pub fn build(self) -> AclEngine {
        let policy = self.config.filesystem_policy();
        tracing::debug!(allowed = ?policy.allowed(), "filesystem policy");
        AclEngine {
            executor: self.executor,
            resolver: self.resolver,
            probe: self.probe.unwrap_or_else(|| Arc::new(StatfsProbe)),
            policy,
            config: self.config,
            span: self
                .span
                .unwrap_or_else(|| tracing::info_span!("acl_engine")),
        }
    }
}
