#![no_main]

//! Fuzz target for the ACL text parser.
//!
//! Tool output is untrusted input: both dialects must reject arbitrary text
//! with an error instead of panicking.

use libfuzzer_sys::fuzz_target;
use protocol::{AclType, parse_acl_text};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let _ = parse_acl_text(&text, AclType::Posix);
    let _ = parse_acl_text(&text, AclType::Nfs4);
});
