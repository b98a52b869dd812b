use std::fs;

use capsule_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("books").join("2024");
    ensure_output_dir(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn file_in_place_of_dir_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let err = ensure_output_dir(&file_path).unwrap_err();
    assert!(matches!(err, PersistError::OutputDir { .. }));

    let result = AtomicFileWriter::new(file_path.clone()).write("book.html", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("book.html").exists());
}

#[test]
fn atomic_write_leaves_only_the_target() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path());

    let path = writer.write("book.html", "<html/>").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "<html/>");
    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("book.html")]);
}
