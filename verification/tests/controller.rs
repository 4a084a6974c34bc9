//! Integration tests for `RequestLifecycleController`
//!
//! The controller runs on a real store with the scripted mock service, so
//! lookups, timeouts and feedback actions all go through the runtime.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use isi_verify::{
    ControllerError, ExtractedFields, Headline, LicenseRecord, LookupCall, LookupEnvironment, LookupState,
    MockLookupService, Pipeline, RequestId, RequestLifecycleController, Severity, SubmitOutcome,
    ValidationError, VerdictStatus, VerificationEngine, VerificationQuery, VerificationVerdict,
};
use isi_verify_client::{ExtractedPayload, LookupError, VerdictPayload};
use isi_verify_runtime::StoreError;
use isi_verify_testing::test_clock;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Helpers
// ============================================================================

fn controller(
    pipeline: Pipeline,
    lookup_timeout: Duration,
) -> (RequestLifecycleController<MockLookupService>, Arc<MockLookupService>) {
    let service = Arc::new(MockLookupService::new());
    let env = LookupEnvironment::new(Arc::clone(&service), Arc::new(test_clock()), lookup_timeout);
    (RequestLifecycleController::new(pipeline, env), service)
}

/// Poll the controller until `condition` holds
async fn wait_until<F>(
    controller: &RequestLifecycleController<MockLookupService>,
    condition: F,
) -> LookupState
where
    F: Fn(&LookupState) -> bool,
{
    tokio::time::timeout(Duration::from_secs(120), async {
        loop {
            let state = controller.state().await;
            if condition(&state) {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition never reached")
}

fn acme() -> LicenseRecord {
    LicenseRecord {
        company_name: Some("Acme".to_string()),
        product_name: Some("Widget".to_string()),
        standard_code: Some("IS 123".to_string()),
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_manual_lookup_of_valid_license() {
    let (controller, service) = controller(Pipeline::Manual, Duration::from_secs(30));
    service.push_verdict(
        VerificationVerdict::with_status(VerdictStatus::Valid, "License is active")
            .with_record(acme()),
    );

    let view = controller
        .submit_and_wait(VerificationQuery::manual(" CM/L-1234567 "))
        .await
        .unwrap();

    assert!(!view.is_loading);
    let result = view.result.unwrap();
    assert_eq!(result.severity, Severity::Positive);
    assert_eq!(result.headline, Some(Headline::ValidLicense));
    assert_eq!(
        result.evidence.record.unwrap().company_name.as_deref(),
        Some("Acme")
    );
    assert_eq!(
        service.calls(),
        vec![LookupCall::Identifier("CM/L-1234567".to_string())]
    );
}

#[tokio::test]
async fn test_scan_with_no_label_detected() {
    let (controller, service) = controller(Pipeline::Scan, Duration::from_secs(30));
    service.push_verdict(VerificationVerdict::with_status(
        VerdictStatus::NotDetected,
        "No label found",
    ));

    let view = controller
        .submit_and_wait(VerificationQuery::scan(vec![0xFF, 0xD8], "image/jpeg", "shelf.jpg"))
        .await
        .unwrap();

    let result = view.result.unwrap();
    assert_eq!(result.severity, Severity::Warning);
    assert_eq!(result.headline, Some(Headline::NotDetected));
    assert_eq!(result.body.as_deref(), Some("No label found"));
    assert!(result.evidence.is_empty());
}

#[tokio::test]
async fn test_transport_failure_settles_as_error() {
    let (controller, service) = controller(Pipeline::Manual, Duration::from_secs(30));
    service.push_failure(LookupError::RequestFailed("connection refused".to_string()));

    let view = controller
        .submit_and_wait(VerificationQuery::manual("CM/L-1234567"))
        .await
        .unwrap();

    let result = view.result.unwrap();
    assert_eq!(result.severity, Severity::Negative);
    assert_eq!(result.headline, Some(Headline::Error));
    assert_eq!(result.body.as_deref(), Some("Backend not reachable"));
}

#[tokio::test]
async fn test_manual_failure_ignores_backend_error_text() {
    let (controller, service) = controller(Pipeline::Manual, Duration::from_secs(30));
    service.push_failure(LookupError::Status {
        status: 500,
        message: Some("Internal Server Error".to_string()),
        body: Some(Box::new(VerdictPayload {
            error: Some("Internal Server Error".to_string()),
            ..VerdictPayload::default()
        })),
    });

    let view = controller
        .submit_and_wait(VerificationQuery::manual("CM/L-1234567"))
        .await
        .unwrap();

    let result = view.result.unwrap();
    assert_eq!(result.headline, Some(Headline::Error));
    assert_eq!(result.body.as_deref(), Some("Backend not reachable"));
    assert!(result.evidence.is_empty());
}

#[tokio::test]
async fn test_scan_failure_prefers_backend_error_text() {
    let (controller, service) = controller(Pipeline::Scan, Duration::from_secs(30));
    service.push_failure(LookupError::Status {
        status: 500,
        message: Some("OCR engine crashed".to_string()),
        body: None,
    });
    service.push_failure(LookupError::ResponseParseFailed("expected value".to_string()));

    let query = || VerificationQuery::scan(vec![1, 2, 3], "image/png", "label.png");

    let first = controller.submit_and_wait(query()).await.unwrap();
    assert_eq!(
        first.result.unwrap().body.as_deref(),
        Some("OCR engine crashed")
    );

    let second = controller.submit_and_wait(query()).await.unwrap();
    assert_eq!(
        second.result.unwrap().body.as_deref(),
        Some("Failed to reach backend")
    );
}

#[tokio::test]
async fn test_scan_failure_keeps_partial_ocr_output() {
    let (controller, service) = controller(Pipeline::Scan, Duration::from_secs(30));
    service.push_failure(LookupError::Status {
        status: 422,
        message: Some("No license number found".to_string()),
        body: Some(Box::new(VerdictPayload {
            error: Some("No license number found".to_string()),
            extracted: Some(ExtractedPayload {
                license_number: None,
                standard_code: Some("IS 1293".to_string()),
            }),
            raw_text: Some("BIS IS 1293".to_string()),
            ..VerdictPayload::default()
        })),
    });

    let view = controller
        .submit_and_wait(VerificationQuery::scan(vec![1, 2, 3], "image/png", "label.png"))
        .await
        .unwrap();

    let result = view.result.unwrap();
    assert_eq!(result.severity, Severity::Negative);
    assert_eq!(result.headline, Some(Headline::Error));
    assert_eq!(result.body.as_deref(), Some("No license number found"));
    assert_eq!(
        result.evidence.extracted,
        Some(ExtractedFields {
            license_number: None,
            standard_code: Some("IS 1293".to_string()),
        })
    );
    assert_eq!(result.evidence.raw_text.as_deref(), Some("BIS IS 1293"));
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_validation_errors_never_reach_the_service() {
    let (manual, manual_service) = controller(Pipeline::Manual, Duration::from_secs(30));
    let (scan, scan_service) = controller(Pipeline::Scan, Duration::from_secs(30));

    let blank = manual.submit(VerificationQuery::manual("  \t")).await;
    let no_image = scan
        .submit(VerificationQuery::scan(Vec::new(), "image/png", "empty.png"))
        .await;

    assert_eq!(
        blank.unwrap_err(),
        ControllerError::Validation(ValidationError::EmptyLicenseNumber)
    );
    assert_eq!(
        no_image.unwrap_err(),
        ControllerError::Validation(ValidationError::MissingImage)
    );
    assert_eq!(manual.state().await, LookupState::new(Pipeline::Manual));
    assert_eq!(scan.state().await, LookupState::new(Pipeline::Scan));
    assert_eq!(manual_service.call_count(), 0);
    assert_eq!(scan_service.call_count(), 0);
}

#[tokio::test]
async fn test_query_for_wrong_pipeline_is_rejected() {
    let (manual, _service) = controller(Pipeline::Manual, Duration::from_secs(30));

    let err = manual
        .submit(VerificationQuery::scan(vec![1], "image/png", "a.png"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ControllerError::PipelineMismatch {
            expected: Pipeline::Manual,
            actual: Pipeline::Scan,
        }
    );
}

// ============================================================================
// Single-flight
// ============================================================================

#[tokio::test]
async fn test_second_submit_is_ignored_while_in_flight() {
    let (controller, service) = controller(Pipeline::Manual, Duration::from_secs(30));
    let gate = service.push_gated();

    let first = controller
        .submit(VerificationQuery::manual("CM/L-1"))
        .await
        .unwrap();
    let second = controller
        .submit(VerificationQuery::manual("CM/L-2"))
        .await
        .unwrap();

    assert_eq!(first, SubmitOutcome::Dispatched(RequestId::new(1)));
    assert_eq!(second, SubmitOutcome::AlreadyInFlight);
    assert!(controller.current_view().await.is_loading);

    gate.send(Ok(VerificationVerdict::with_status(VerdictStatus::NotFound, "No record")))
        .unwrap();
    let state = wait_until(&controller, |s| !s.is_loading()).await;

    assert_eq!(state.result().unwrap().headline, Some(Headline::NotFound));
    assert_eq!(state.ignored_submissions(), 1);
    assert_eq!(
        service.calls(),
        vec![LookupCall::Identifier("CM/L-1".to_string())]
    );
}

#[tokio::test]
async fn test_submit_and_wait_while_in_flight_fails_fast() {
    let (controller, service) = controller(Pipeline::Manual, Duration::from_secs(30));
    let _gate = service.push_gated();

    controller
        .submit(VerificationQuery::manual("CM/L-1"))
        .await
        .unwrap();
    let err = controller
        .submit_and_wait(VerificationQuery::manual("CM/L-2"))
        .await
        .unwrap_err();

    assert_eq!(err, ControllerError::AlreadyInFlight(Pipeline::Manual));
}

// ============================================================================
// Timeout and stale responses
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_timeout_settles_and_abandons_the_lookup() {
    let (controller, service) = controller(Pipeline::Manual, Duration::from_secs(2));
    let gate = service.push_gated();

    let view = controller
        .submit_and_wait(VerificationQuery::manual("CM/L-1"))
        .await
        .unwrap();

    let result = view.result.unwrap();
    assert_eq!(result.headline, Some(Headline::Error));
    assert_eq!(
        result.body.as_deref(),
        Some("Request timed out after 2 seconds")
    );

    // The lookup was dropped with its timeout, so nothing is left to answer
    assert!(
        gate.send(Ok(VerificationVerdict::with_status(VerdictStatus::Valid, "late")))
            .is_err()
    );
    assert_eq!(controller.state().await.stale_completions(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_request_cannot_overwrite_newer_result() {
    let (controller, service) = controller(Pipeline::Manual, Duration::from_secs(2));
    let gate_a = service.push_gated();
    let gate_b = service.push_gated();

    // A is dispatched and times out, freeing the slot
    let a = controller
        .submit(VerificationQuery::manual("CM/L-A"))
        .await
        .unwrap();
    assert_eq!(a, SubmitOutcome::Dispatched(RequestId::new(1)));
    wait_until(&controller, |s| s.settled() == Some(RequestId::new(1))).await;

    // B is dispatched; A can no longer answer
    let b = controller
        .submit(VerificationQuery::manual("CM/L-B"))
        .await
        .unwrap();
    assert_eq!(b, SubmitOutcome::Dispatched(RequestId::new(2)));
    assert!(
        gate_a
            .send(Ok(VerificationVerdict::with_status(VerdictStatus::Valid, "A")))
            .is_err()
    );

    gate_b
        .send(Ok(VerificationVerdict::with_status(VerdictStatus::Suspicious, "B")))
        .unwrap();
    let state = wait_until(&controller, |s| s.settled() == Some(RequestId::new(2))).await;

    let result = state.result().unwrap();
    assert_eq!(result.headline, Some(Headline::Suspicious));
    assert_eq!(result.body.as_deref(), Some("B"));
}

#[tokio::test]
async fn test_unbounded_timeout_does_not_overflow() {
    let (controller, service) = controller(Pipeline::Manual, Duration::from_secs(u64::MAX));
    service.push_verdict(VerificationVerdict::with_status(VerdictStatus::Valid, "ok"));

    let view = controller
        .submit_and_wait(VerificationQuery::manual("CM/L-1"))
        .await
        .unwrap();

    assert_eq!(view.result.unwrap().severity, Severity::Positive);
}

// ============================================================================
// Independence and shutdown
// ============================================================================

#[tokio::test]
async fn test_pipelines_are_independent() {
    let service = Arc::new(MockLookupService::new());
    let engine = VerificationEngine::new(
        Arc::clone(&service),
        Arc::new(test_clock()),
        Duration::from_secs(30),
    );
    let manual_gate = service.push_gated();
    service.push_verdict(VerificationVerdict::with_status(VerdictStatus::Valid, "scan ok"));

    engine
        .manual
        .submit(VerificationQuery::manual("CM/L-1"))
        .await
        .unwrap();
    wait_until(&engine.manual, |_| service.call_count() == 1).await;

    // Manual is still in flight; the scan pipeline does not care
    let scan_view = engine
        .verify(VerificationQuery::scan(vec![9], "image/png", "a.png"))
        .await
        .unwrap();
    assert_eq!(scan_view.result.unwrap().severity, Severity::Positive);
    assert!(engine.manual.current_view().await.is_loading);

    manual_gate
        .send(Ok(VerificationVerdict::with_status(VerdictStatus::NotFound, "none")))
        .unwrap();
    let manual = wait_until(&engine.manual, |s| !s.is_loading()).await;
    assert_eq!(manual.result().unwrap().severity, Severity::Negative);
    assert_eq!(
        engine.scan.current_view().await.result.unwrap().severity,
        Severity::Positive
    );
}

#[tokio::test]
async fn test_submit_after_shutdown_is_refused() {
    let (controller, service) = controller(Pipeline::Manual, Duration::from_secs(30));

    controller.shutdown(Duration::from_secs(1)).await.unwrap();
    let err = controller
        .submit(VerificationQuery::manual("CM/L-1"))
        .await
        .unwrap_err();

    assert_eq!(err, ControllerError::Store(StoreError::ShutdownInProgress));
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_shutdown_after_settled_lookup_drains_immediately() {
    let (controller, service) = controller(Pipeline::Manual, Duration::from_secs(30));
    service.push_verdict(VerificationVerdict::with_status(VerdictStatus::Valid, "ok"));

    let view = controller
        .submit_and_wait(VerificationQuery::manual("CM/L-1"))
        .await
        .unwrap();
    assert!(!view.is_loading);

    tokio_test::assert_ok!(controller.shutdown(Duration::from_secs(1)).await);
}
