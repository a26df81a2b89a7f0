//! Benchmark smoke test for the local classify/assemble/decode path.

use std::time::Instant;

use scam_finder_analysis_contract::decode_scan_result;
use scam_finder_core::{AnalysisRequest, FilePayload, MAX_FILE_BYTES};
use scam_finder_prompt::assemble_request;

const RESULT_JSON: &str = r#"{"verdict":"SUSPICIOUS","scam_score":64,"red_flags":["urgency","spoofed sender"],"urls":[{"url":"http://xn--pypal-4ve.com","risk":"High","issues":["punycode"]}],"summary":"Likely phishing."}"#;

#[test]
fn benchmark_local_pipeline_smoke_prints_latency() {
    let html = "<a href=\"http://example.test\">pay now</a>".repeat(1_000);
    let requests = [
        AnalysisRequest::new("Your account is locked, verify at http://bit.ly/x", None)
            .expect("text request should build"),
        AnalysisRequest::new(
            "",
            Some(FilePayload::new("invoice.html", None, html.into_bytes()).expect("html file")),
        )
        .expect("html request should build"),
        AnalysisRequest::new(
            "is this photo real?",
            Some(
                FilePayload::new("photo.jpg", None, vec![0xAB; MAX_FILE_BYTES as usize / 4])
                    .expect("image file"),
            ),
        )
        .expect("image request should build"),
    ];

    let start = Instant::now();
    let mut part_total = 0usize;

    for _ in 0..100 {
        for request in &requests {
            part_total += assemble_request(request).parts().len();
        }
        let result = decode_scan_result(RESULT_JSON).expect("result should decode");
        part_total += result.urls.len();
    }

    let elapsed_ms = start.elapsed().as_millis();
    println!("benchmark_local_pipeline_elapsed_ms={elapsed_ms}");
    println!("benchmark_local_pipeline_part_total={part_total}");

    // Lightweight guardrail; strict latency targets are environment-specific.
    assert!(
        elapsed_ms < 10_000,
        "local pipeline smoke benchmark should stay bounded"
    );
}
