use super::*;
use std::fs;

fn names(children: &[ChildEntry]) -> Vec<String> {
    children
        .iter()
        .map(|child| child.file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn read_children_errors_when_directory_missing() {
    let error = read_children(Path::new("/nonexistent/path/for/walker")).unwrap_err();
    assert!(matches!(error.kind(), WalkErrorKind::ReadDir { .. }));
    assert_eq!(error.path(), Path::new("/nonexistent/path/for/walker"));
}

#[test]
fn read_children_of_file_fails() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("file.txt");
    fs::write(&file, b"contents").expect("write");

    let error = read_children(&file).unwrap_err();
    assert!(matches!(error.kind(), WalkErrorKind::ReadDir { .. }));
}

#[test]
fn read_children_of_empty_directory_is_empty() {
    let temp = tempfile::tempdir().expect("tempdir");
    assert!(read_children(temp.path()).expect("list").is_empty());
}

#[test]
fn read_children_is_sorted_and_not_recursive() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::create_dir(root.join("b")).expect("dir b");
    fs::create_dir(root.join("a")).expect("dir a");
    fs::write(root.join("a").join("inner.txt"), b"data").expect("inner");
    fs::write(root.join("c.txt"), b"data").expect("file c");

    let children = read_children(root).expect("list");
    assert_eq!(names(&children), ["a", "b", "c.txt"]);
    assert_eq!(children[0].path(), root.join("a"));
    assert!(children[0].is_directory());
    assert!(children[1].is_directory());
    assert!(!children[2].is_directory());
}

#[cfg(unix)]
#[test]
fn read_children_does_not_follow_directory_symlinks() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::create_dir(root.join("real")).expect("dir");
    std::os::unix::fs::symlink(root.join("real"), root.join("link")).expect("symlink");

    let children = read_children(root).expect("list");
    let link = children
        .iter()
        .find(|child| child.file_name() == "link")
        .expect("link entry");
    assert!(link.is_symlink());
    assert!(!link.is_directory());
    assert_eq!(link.path(), root.join("link"));
}
