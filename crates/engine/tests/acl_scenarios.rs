//! End-to-end engine scenarios against an in-memory model of getfacl/setfacl.

use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use engine::{
    AclEngine, AclErrorKind, CommandExecutor, DomainPrincipal, ExecContext, ExecError,
    ExecOutput, PrincipalKind, PrincipalResolver, ResolverError,
};
use metadata::{FilesystemKind, FilesystemProbe};
use protocol::{
    AclConfig, AclEntry, AclEntryType, AclListConfig, AclRemoveConfig, AclType, Permission,
    format_entry, parse_acl_text,
};

const FRESH_ACL: &str = "user::rw-\ngroup::r--\nother::r--\n";

type EntryKey = (bool, AclEntryType, Option<String>);

fn key(entry: &AclEntry) -> EntryKey {
    (
        entry.is_default,
        entry.base_category().unwrap_or(entry.entry_type),
        entry.named_principal().map(str::to_owned),
    )
}

fn removal_key(line: &str) -> EntryKey {
    let (is_default, body) = match line.strip_prefix("default:") {
        Some(body) => (true, body),
        None => (false, line),
    };
    let (kind, name) = body.split_once(':').expect("kind:name removal line");
    let entry_type = match kind {
        "user" => AclEntryType::User,
        "group" => AclEntryType::Group,
        other => panic!("unexpected removal kind {other}"),
    };
    (is_default, entry_type, Some(name.to_owned()))
}

fn failure(program: &Path, message: &str) -> ExecError {
    ExecError::Failed {
        program: program.to_path_buf(),
        status: Some(1),
        output: ExecOutput {
            stdout: String::new(),
            stderr: format!("{message}\n"),
        },
    }
}

/// Keeps one POSIX ACL per path and interprets the tool arguments the engine
/// produces.
#[derive(Default)]
struct PosixTools {
    acls: Mutex<HashMap<PathBuf, Vec<AclEntry>>>,
    unreadable: Mutex<HashSet<PathBuf>>,
}

impl PosixTools {
    fn seed(&self, path: &Path, text: &str) {
        let entries = parse_acl_text(text, AclType::Posix).expect("seed ACL parses");
        self.acls
            .lock()
            .expect("acls lock")
            .insert(path.to_path_buf(), entries);
    }

    fn deny_reads(&self, path: &Path) {
        self.unreadable
            .lock()
            .expect("unreadable lock")
            .insert(path.to_path_buf());
    }

    fn current(&self, path: &Path) -> Vec<AclEntry> {
        self.acls
            .lock()
            .expect("acls lock")
            .get(path)
            .cloned()
            .unwrap_or_else(|| parse_acl_text(FRESH_ACL, AclType::Posix).expect("fresh ACL"))
    }

    fn store(&self, path: &Path, entries: Vec<AclEntry>) {
        self.acls
            .lock()
            .expect("acls lock")
            .insert(path.to_path_buf(), entries);
    }

    fn getfacl(&self, program: &Path, path: &Path) -> Result<ExecOutput, ExecError> {
        if self.unreadable.lock().expect("unreadable lock").contains(path) {
            return Err(failure(program, "getfacl: Permission denied"));
        }
        let text: String = self
            .current(path)
            .iter()
            .map(|entry| format_entry(entry, AclType::Posix).expect("format") + "\n")
            .collect();
        Ok(ExecOutput::from_stdout(text))
    }

    fn setfacl(&self, program: &Path, args: &[String]) -> Result<ExecOutput, ExecError> {
        let path = PathBuf::from(args.last().expect("path argument"));
        let mut entries = self.current(&path);
        let mut index = 0;
        while index + 1 < args.len() {
            let arg = &args[index];
            if let Some(file) = arg.strip_prefix("--set-file=") {
                let replacement = read_entries(file);
                for category in [
                    AclEntryType::OwnerUser,
                    AclEntryType::OwnerGroup,
                    AclEntryType::Other,
                ] {
                    if !replacement
                        .iter()
                        .any(|entry| !entry.is_default && entry.base_category() == Some(category))
                    {
                        return Err(failure(program, "setfacl: Malformed access ACL"));
                    }
                }
                entries = replacement;
            } else if arg == "-M" {
                index += 1;
                for update in read_entries(&args[index]) {
                    match entries.iter_mut().find(|entry| key(entry) == key(&update)) {
                        Some(existing) => *existing = update,
                        None => entries.push(update),
                    }
                }
            } else if arg == "-X" {
                index += 1;
                let text = fs::read_to_string(&args[index]).expect("removal file");
                let removed: Vec<EntryKey> = text.lines().map(removal_key).collect();
                entries.retain(|entry| !removed.contains(&key(entry)));
            } else if arg == "-k" {
                entries.retain(|entry| !entry.is_default);
            } else if arg == "-b" {
                entries.retain(|entry| !entry.is_default && entry.entry_type.is_base());
            }
            index += 1;
        }
        self.store(&path, entries);
        Ok(ExecOutput::default())
    }
}

fn read_entries(file: &str) -> Vec<AclEntry> {
    let text = fs::read_to_string(file).expect("scratch file");
    parse_acl_text(&text, AclType::Posix).expect("scratch file parses")
}

impl CommandExecutor for PosixTools {
    fn execute(
        &self,
        program: &Path,
        args: &[OsString],
        _ctx: &ExecContext,
    ) -> Result<ExecOutput, ExecError> {
        let args: Vec<String> = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        match program.to_str() {
            Some("getfacl") => {
                assert_eq!(&args[..2], ["-c", "-E"]);
                self.getfacl(program, Path::new(args.last().expect("path argument")))
            }
            Some("setfacl") => self.setfacl(program, &args),
            other => panic!("unexpected tool {other:?}"),
        }
    }
}

struct Zfs;

impl FilesystemProbe for Zfs {
    fn filesystem_kind(&self, _path: &Path) -> io::Result<FilesystemKind> {
        Ok(FilesystemKind::Zfs)
    }
}

struct EmptyDirectory;

impl PrincipalResolver for EmptyDirectory {
    fn principal_exists(
        &self,
        _principal: &DomainPrincipal,
        _kind: PrincipalKind,
    ) -> Result<bool, ResolverError> {
        Ok(false)
    }
}

fn engine(tools: &Arc<PosixTools>) -> AclEngine {
    AclEngine::builder(Arc::clone(tools))
        .filesystem_probe(Zfs)
        .build()
}

fn get(engine: &AclEngine, path: &Path) -> Vec<AclEntry> {
    engine
        .get_acl(&AclListConfig::new(path, false), &ExecContext::new())
        .expect("get")
        .entries
}

fn base_entries(entries: &[AclEntry]) -> Vec<AclEntry> {
    entries
        .iter()
        .filter(|entry| !entry.is_default && entry.base_category().is_some())
        .cloned()
        .collect()
}

fn named<'a>(entries: &'a [AclEntry], name: &str) -> Vec<&'a AclEntry> {
    entries
        .iter()
        .filter(|entry| entry.named_principal() == Some(name))
        .collect()
}

#[test]
fn set_then_get_returns_requested_entry() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("f");
    fs::write(&file, b"data").expect("write");
    let tools = Arc::new(PosixTools::default());
    let engine = engine(&tools);

    let request = serde_json::json!({
        "path": file,
        "type": "posix",
        "entries": [
            {"type": "user", "principal": "nobody", "permissions": ["read", "execute"]}
        ]
    });
    let config: AclConfig = serde_json::from_value(request).expect("request");
    engine
        .set_acl(&config, &ExecContext::new())
        .expect("set");

    let entries = get(&engine, &file);
    let nobody = named(&entries, "nobody");
    assert_eq!(nobody.len(), 1);
    assert_eq!(nobody[0].entry_type, AclEntryType::User);
    assert_eq!(
        nobody[0].permissions,
        [Permission::ReadData, Permission::Execute].into_iter().collect()
    );
}

#[test]
fn set_preserves_base_entries() {
    let temp = tempfile::tempdir().expect("tempdir");
    let tools = Arc::new(PosixTools::default());
    tools.seed(
        temp.path(),
        "user::rwx\ngroup::r-x\nmask::r-x\nother::--x\ndefault:user::rwx\n",
    );
    let engine = engine(&tools);
    let before = base_entries(&get(&engine, temp.path()));
    assert_eq!(before.len(), 3);

    engine
        .set_acl(
            &AclConfig::new(
                temp.path(),
                vec![AclEntry::user("nobody").with_permissions([Permission::ReadData])],
            ),
            &ExecContext::new(),
        )
        .expect("set");

    let after = get(&engine, temp.path());
    assert_eq!(base_entries(&after), before);
    assert_eq!(named(&after, "nobody").len(), 1);
}

#[test]
fn modify_changes_only_the_named_entry() {
    let temp = tempfile::tempdir().expect("tempdir");
    let tools = Arc::new(PosixTools::default());
    tools.seed(temp.path(), "user::rw-\ngroup::r--\nuser:nobody:r-x\nother::---\n");
    let engine = engine(&tools);
    let before = get(&engine, temp.path());

    engine
        .modify_acl(
            &AclConfig::new(
                temp.path(),
                vec![
                    AclEntry::user("nobody")
                        .with_permissions([Permission::ReadData, Permission::WriteData]),
                ],
            ),
            &ExecContext::new(),
        )
        .expect("modify");

    let after = get(&engine, temp.path());
    assert_eq!(base_entries(&after), base_entries(&before));
    let nobody = named(&after, "nobody");
    assert_eq!(nobody.len(), 1);
    assert_eq!(
        nobody[0].permissions,
        [Permission::ReadData, Permission::WriteData]
            .into_iter()
            .collect()
    );
    assert_eq!(after.len(), before.len());
}

#[test]
fn removal_is_idempotent() {
    let temp = tempfile::tempdir().expect("tempdir");
    let tools = Arc::new(PosixTools::default());
    tools.seed(temp.path(), "user::rw-\nuser:nobody:r--\ngroup::r--\nother::---\n");
    let engine = engine(&tools);
    let config = AclRemoveConfig::new(temp.path(), vec![AclEntry::user("nobody")]);

    engine
        .remove_acl(&config, &ExecContext::new())
        .expect("first removal");
    let once = get(&engine, temp.path());
    engine
        .remove_acl(&config, &ExecContext::new())
        .expect("second removal");

    assert!(named(&once, "nobody").is_empty());
    assert_eq!(get(&engine, temp.path()), once);
}

#[test]
fn empty_removal_request_is_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    let tools = Arc::new(PosixTools::default());
    let error = engine(&tools)
        .remove_acl(
            &AclRemoveConfig::new(temp.path(), Vec::new()),
            &ExecContext::new(),
        )
        .unwrap_err();
    assert_eq!(error.kind(), AclErrorKind::InvalidInput);
}

#[test]
fn remove_default_drops_inherited_entries_only() {
    let temp = tempfile::tempdir().expect("tempdir");
    let tools = Arc::new(PosixTools::default());
    tools.seed(
        temp.path(),
        "user::rwx\nuser:nobody:r-x\ngroup::r-x\nother::---\ndefault:user::rwx\ndefault:group::r-x\ndefault:other::---\n",
    );
    let engine = engine(&tools);

    engine
        .remove_acl(
            &AclRemoveConfig::new(temp.path(), Vec::new()).remove_default(true),
            &ExecContext::new(),
        )
        .expect("remove defaults");

    let entries = get(&engine, temp.path());
    assert!(entries.iter().all(|entry| !entry.is_default));
    assert_eq!(named(&entries, "nobody").len(), 1);
}

#[test]
fn remove_all_leaves_only_base_entries() {
    let temp = tempfile::tempdir().expect("tempdir");
    let tools = Arc::new(PosixTools::default());
    tools.seed(
        temp.path(),
        "user::rwx\nuser:nobody:r-x\ngroup::r-x\ngroup:staff:r--\nmask::r-x\nother::---\ndefault:user::rwx\n",
    );
    let engine = engine(&tools);

    engine
        .remove_acl(
            &AclRemoveConfig::new(temp.path(), Vec::new()).remove_all_xattr(true),
            &ExecContext::new(),
        )
        .expect("remove all");

    let entries = get(&engine, temp.path());
    assert_eq!(entries, base_entries(&entries));
    assert_eq!(entries.len(), 3);
}

#[test]
fn recursive_listing_skips_unreadable_child() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    for name in ["alpha", "beta", "gamma"] {
        fs::write(root.join(name), b"data").expect("child");
    }
    let tools = Arc::new(PosixTools::default());
    tools.deny_reads(&root.join("beta"));

    let listing = engine(&tools)
        .get_acl(&AclListConfig::new(root, true), &ExecContext::new())
        .expect("recursive get");

    assert_eq!(listing.children.len(), 2);
    assert!(listing.child(&root.join("beta")).is_none());
    assert!(listing.child(&root.join("gamma")).is_some());
}

#[test]
fn principals_with_spaces_survive_set_and_get() {
    let temp = tempfile::tempdir().expect("tempdir");
    let tools = Arc::new(PosixTools::default());
    let engine = engine(&tools);
    let requested = AclEntry::group("domain users")
        .with_permissions([Permission::ReadData, Permission::Execute]);

    engine
        .set_acl(
            &AclConfig::new(temp.path(), vec![requested.clone()]),
            &ExecContext::new(),
        )
        .expect("set");

    assert!(get(&engine, temp.path()).contains(&requested));
}

#[test]
fn unknown_domain_principal_is_rejected_without_changes() {
    let temp = tempfile::tempdir().expect("tempdir");
    let tools = Arc::new(PosixTools::default());
    tools.seed(temp.path(), FRESH_ACL);
    let engine = AclEngine::builder(Arc::clone(&tools))
        .filesystem_probe(Zfs)
        .resolver(EmptyDirectory)
        .build();
    let ghost = vec![AclEntry::user("CORP\\ghost").with_permissions([Permission::ReadData])];

    let error = engine.resolve_ad_users(&ghost).unwrap_err();
    assert_eq!(error.kind(), AclErrorKind::InvalidPrincipal);

    let error = engine
        .set_acl(
            &AclConfig::new(temp.path(), ghost),
            &ExecContext::new(),
        )
        .unwrap_err();
    assert_eq!(error.kind(), AclErrorKind::InvalidPrincipal);
    assert_eq!(
        get(&engine, temp.path()),
        parse_acl_text(FRESH_ACL, AclType::Posix).expect("fresh")
    );
}
