//! Engine configuration loaded from JSON.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use metadata::{FilesystemKind, FilesystemPolicy};
use protocol::AclType;
use serde::{Deserialize, Serialize};

/// Binaries used for each ACL dialect.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// POSIX reader.
    pub posix_get: PathBuf,
    /// POSIX writer.
    pub posix_set: PathBuf,
    /// NFSv4 reader.
    pub nfs4_get: PathBuf,
    /// NFSv4 writer.
    pub nfs4_set: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            posix_get: PathBuf::from("getfacl"),
            posix_set: PathBuf::from("setfacl"),
            nfs4_get: PathBuf::from("nfs4_getfacl"),
            nfs4_set: PathBuf::from("nfs4_setfacl"),
        }
    }
}

impl ToolPaths {
    /// Reader binary for `acl_type`.
    #[must_use]
    pub fn getter(&self, acl_type: AclType) -> &Path {
        match acl_type {
            AclType::Posix => &self.posix_get,
            AclType::Nfs4 => &self.nfs4_get,
        }
    }

    /// Writer binary for `acl_type`.
    #[must_use]
    pub fn setter(&self, acl_type: AclType) -> &Path {
        match acl_type {
            AclType::Posix => &self.posix_set,
            AclType::Nfs4 => &self.nfs4_set,
        }
    }
}

/// Settings shared by every engine operation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// ACL tool binaries.
    pub tools: ToolPaths,
    /// Filesystems on which ACLs may be managed; empty allows all.
    pub allowed_filesystems: Vec<FilesystemKind>,
    /// Deadline applied to each operation whose context has none.
    pub tool_timeout_ms: Option<u64>,
    /// Directory for scratch files; the system temporary directory when unset.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tools: ToolPaths::default(),
            allowed_filesystems: vec![FilesystemKind::Zfs],
            tool_timeout_ms: None,
            scratch_dir: None,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON document; absent fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse { path: None, source })
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })
    }

    /// Default per-operation timeout.
    #[must_use]
    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_ms.map(Duration::from_millis)
    }

    /// Filesystem policy derived from [`Self::allowed_filesystems`].
    #[must_use]
    pub fn filesystem_policy(&self) -> FilesystemPolicy {
        FilesystemPolicy::only(self.allowed_filesystems.clone())
    }
}

/// Failure to load an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        /// Config file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The document is not a valid configuration.
    #[error("invalid config{}: {source}", path.as_ref().map(|path| format!(" '{}'", path.display())).unwrap_or_default())]
    Parse {
        /// Config file, when parsed from one.
        path: Option<PathBuf>,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_posix_tools_on_zfs() {
        let config = EngineConfig::default();
        assert_eq!(config.tools.getter(AclType::Posix), Path::new("getfacl"));
        assert_eq!(config.tools.setter(AclType::Nfs4), Path::new("nfs4_setfacl"));
        assert!(config.filesystem_policy().allows(FilesystemKind::Zfs));
        assert!(!config.filesystem_policy().allows(FilesystemKind::Ext4));
        assert_eq!(config.filesystem_policy().allowed(), [FilesystemKind::Zfs]);
        assert!(config.tool_timeout().is_none());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{"tools":{"posix_set":"/usr/local/bin/setfacl"},"tool_timeout_ms":1500}"#,
        )
        .expect("config");
        assert_eq!(config.tools.posix_set, PathBuf::from("/usr/local/bin/setfacl"));
        assert_eq!(config.tools.posix_get, PathBuf::from("getfacl"));
        assert_eq!(config.tool_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.allowed_filesystems, [FilesystemKind::Zfs]);
    }

    #[test]
    fn empty_allow_list_is_permissive() {
        let config =
            EngineConfig::from_json_str(r#"{"allowed_filesystems":[]}"#).expect("config");
        assert!(config.filesystem_policy().allows(FilesystemKind::Tmpfs));
        assert!(config.filesystem_policy().allowed().is_empty());
    }

    #[test]
    fn allowed_filesystems_use_lowercase_names() {
        let config = EngineConfig::from_json_str(r#"{"allowed_filesystems":["zfs","ext4"]}"#)
            .expect("config");
        assert_eq!(
            config.allowed_filesystems,
            [FilesystemKind::Zfs, FilesystemKind::Ext4]
        );
    }

    #[test]
    fn load_reports_missing_file_and_bad_json() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("missing.json");
        assert!(matches!(
            EngineConfig::load(&missing),
            Err(ConfigError::Read { .. })
        ));

        let bad = temp.path().join("bad.json");
        fs::write(&bad, "{ not json").expect("write");
        let error = EngineConfig::load(&bad).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { path: Some(_), .. }));
        assert!(error.to_string().starts_with("invalid config '"));
    }

    #[test]
    fn load_round_trips_saved_config() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("engine.json");
        let config = EngineConfig {
            scratch_dir: Some(temp.path().to_path_buf()),
            ..EngineConfig::default()
        };
        fs::write(&path, serde_json::to_string(&config).expect("serialize")).expect("write");
        assert_eq!(EngineConfig::load(&path).expect("load"), config);
    }
}
