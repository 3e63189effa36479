#![no_main]

//! Every POSIX entry the parser accepts must format back to a line that
//! parses to the same entry.

use libfuzzer_sys::fuzz_target;
use protocol::{AclType, format_entry, parse_acl_text};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(entries) = parse_acl_text(text, AclType::Posix) else {
        return;
    };
    for entry in entries {
        let Ok(line) = format_entry(&entry, AclType::Posix) else {
            continue;
        };
        let reparsed = parse_acl_text(&line, AclType::Posix).expect("formatted line parses");
        assert_eq!(reparsed, vec![entry], "line: {line}");
    }
});
