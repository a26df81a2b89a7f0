//! Tests local validation gates applied before any dispatch.

use scam_finder_core::{
    AnalysisRequest, CoreError, FilePayload, InputPayload, MAX_FILE_BYTES, check_file_size,
};

#[test]
fn request_validation_tests_reject_oversize_image() {
    let bytes = vec![0_u8; 11 * 1024 * 1024];
    let error = FilePayload::new("photo.png", Some("image/png".to_string()), bytes)
        .expect_err("11 MiB file should be rejected");

    assert_eq!(
        error,
        CoreError::FileTooLarge {
            size: 11 * 1024 * 1024,
            limit: MAX_FILE_BYTES,
        }
    );
}

#[test]
fn request_validation_tests_accept_file_exactly_at_limit() {
    check_file_size(MAX_FILE_BYTES).expect("limit itself is allowed");
    assert!(check_file_size(MAX_FILE_BYTES + 1).is_err());
}

#[test]
fn request_validation_tests_reject_empty_request() {
    assert_eq!(AnalysisRequest::new("", None), Err(CoreError::EmptyRequest));
}

#[test]
fn request_validation_tests_text_rides_along_as_file_context() {
    let file = FilePayload::new("invoice.pdf", None, b"%PDF-1.7".to_vec())
        .expect("file should build");
    let request =
        AnalysisRequest::new("received this by mail", Some(file)).expect("request should build");

    assert!(matches!(request.payload(), InputPayload::File(_)));
    assert_eq!(request.file().map(|f| f.file_name()), Some("invoice.pdf"));
    assert_eq!(request.context_text(), Some("received this by mail"));
}

#[test]
fn request_validation_tests_file_without_text_has_no_context() {
    let file = FilePayload::new("scan.jpg", None, vec![0xFF, 0xD8]).expect("file should build");
    let request = AnalysisRequest::new("   ", Some(file)).expect("request should build");

    assert_eq!(request.context_text(), None);
}

#[test]
fn request_validation_tests_text_limit_applies_alongside_file() {
    let file = FilePayload::new("scan.jpg", None, vec![0xFF]).expect("file should build");
    let error = AnalysisRequest::new("x".repeat(10_001), Some(file))
        .expect_err("oversize context should be rejected");

    assert!(matches!(error, CoreError::TextTooLong { chars: 10_001, .. }));
}

#[test]
fn request_validation_tests_reject_blank_file_name() {
    assert_eq!(
        FilePayload::new(" ", None, vec![1]),
        Err(CoreError::EmptyFileName)
    );
}
