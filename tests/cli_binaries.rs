use assert_cmd::Command;
use predicates::prelude::*;

fn oc_facl() -> Command {
    Command::new(env!("CARGO_BIN_EXE_oc-facl"))
}

#[test]
fn help_lists_subcommands() {
    oc_facl()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("modify"));
}

#[test]
fn version_reports_package_version() {
    oc_facl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "oc-facl {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn without_arguments_shows_usage_and_fails() {
    oc_facl()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn root_path_is_rejected() {
    oc_facl()
        .args(["get", "/"])
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("oc-facl: error:"));
}

#[test]
fn malformed_request_on_stdin_is_a_usage_error() {
    oc_facl()
        .arg("set")
        .write_stdin("[1, 2")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid request from standard input"));
}

#[cfg(target_os = "linux")]
mod with_fake_tools {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use super::*;

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
        path
    }

    #[test]
    fn get_and_set_drive_the_configured_tools() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("target");
        fs::write(&target, b"data").expect("target");
        let captured = dir.path().join("captured.acl");

        let getfacl = script(
            dir.path(),
            "getfacl",
            "printf 'user::rw-\\ngroup::r--\\nother::---\\n'",
        );
        let setfacl = script(
            dir.path(),
            "setfacl",
            &format!(
                "for arg in \"$@\"; do\n  case \"$arg\" in\n    --set-file=*) cp \"${{arg#--set-file=}}\" '{}' ;;\n  esac\ndone",
                captured.display()
            ),
        );
        let config = dir.path().join("config.json");
        fs::write(
            &config,
            serde_json::json!({
                "tools": { "posix_get": getfacl, "posix_set": setfacl },
                "allowed_filesystems": [],
                "tool_timeout_ms": 10_000
            })
            .to_string(),
        )
        .expect("config");
        let config = config.to_str().expect("utf-8 path");
        let target_arg = target.to_str().expect("utf-8 path");

        let output = oc_facl()
            .args(["--config", config, "get", target_arg])
            .output()
            .expect("run get");
        assert!(output.status.success(), "{output:?}");
        let listing: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("listing is JSON");
        assert_eq!(listing["type"], "posix");
        assert_eq!(listing["entries"].as_array().map(Vec::len), Some(3));
        assert_eq!(listing["entries"][0]["type"], "ownerUser");

        let request = serde_json::json!({
            "path": target,
            "entries": [
                {"type": "user", "principal": "nobody", "permissions": ["read"]}
            ]
        });
        oc_facl()
            .args(["--config", config, "set"])
            .write_stdin(request.to_string())
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let written = fs::read_to_string(&captured).expect("setfacl received a scratch file");
        assert_eq!(
            written,
            "user::rw-\ngroup::r--\nother::---\nuser:nobody:r--\n"
        );
    }
}
