//! Argument vectors for the ACL tools.

use std::ffi::OsString;
use std::path::Path;

use protocol::AclType;

/// Reader arguments: omit the header comment and effective-rights comments.
pub(crate) fn get_args(acl_type: AclType, path: &Path) -> Vec<OsString> {
    let mut args = Vec::with_capacity(3);
    if acl_type == AclType::Posix {
        args.extend(["-c", "-E"].map(OsString::from));
    }
    args.push(path.into());
    args
}

/// Full replace from a file.
pub(crate) fn set_args(recursive: bool, scratch: &Path, path: &Path) -> Vec<OsString> {
    let mut args = recursion(recursive);
    let mut set_file = OsString::from("--set-file=");
    set_file.push(scratch);
    args.push(set_file);
    args.push(path.into());
    args
}

/// Incremental merge from a file.
pub(crate) fn modify_args(recursive: bool, scratch: &Path, path: &Path) -> Vec<OsString> {
    let mut args = recursion(recursive);
    args.push("-M".into());
    args.push(scratch.into());
    args.push(path.into());
    args
}

/// Entry and/or default removal.
pub(crate) fn remove_args(
    recursive: bool,
    remove_default: bool,
    scratch: Option<&Path>,
    path: &Path,
) -> Vec<OsString> {
    let mut args = recursion(recursive);
    if remove_default {
        args.push("-k".into());
    }
    if let Some(scratch) = scratch {
        args.push("-X".into());
        args.push(scratch.into());
    }
    args.push(path.into());
    args
}

/// Strip every extended entry.
pub(crate) fn remove_all_args(recursive: bool, path: &Path) -> Vec<OsString> {
    let mut args = recursion(recursive);
    args.push("-b".into());
    args.push(path.into());
    args
}

fn recursion(recursive: bool) -> Vec<OsString> {
    if recursive {
        vec![OsString::from("-R")]
    } else {
        Vec::new()
    }
}
