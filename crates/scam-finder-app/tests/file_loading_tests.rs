//! Integration tests for loading uploads from disk.

use std::fs::{self, File};
use std::path::PathBuf;

use scam_finder_app::{ErrorKind, load_file};
use scam_finder_core::MAX_FILE_BYTES;

fn scratch_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scam-finder-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    dir.join(name)
}

#[tokio::test]
async fn file_loading_tests_rejects_oversize_file_from_metadata() {
    let path = scratch_path("huge.png");
    File::create(&path)
        .and_then(|file| file.set_len(11 * 1024 * 1024))
        .expect("sparse file should be creatable");

    let error = load_file(&path, Some("image/png".to_string()))
        .await
        .expect_err("11 MiB file should be rejected");

    assert_eq!(error.kind(), ErrorKind::Validation);
    assert!(error.to_string().contains(&MAX_FILE_BYTES.to_string()));
    fs::remove_file(&path).ok();
}

#[tokio::test]
async fn file_loading_tests_reads_name_mime_and_bytes() {
    let path = scratch_path("notice.eml");
    fs::write(&path, b"From: bank@example.test").expect("fixture should be writable");

    let file = load_file(&path, None).await.expect("file should load");

    assert_eq!(file.file_name(), "notice.eml");
    assert_eq!(file.declared_mime_type(), None);
    assert_eq!(file.bytes(), b"From: bank@example.test");
    fs::remove_file(&path).ok();
}

#[tokio::test]
async fn file_loading_tests_missing_file_is_io_error() {
    let error = load_file(&scratch_path("absent.pdf"), None)
        .await
        .expect_err("missing file should fail");

    assert!(error.to_string().contains("absent.pdf"));
}
