// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end tests of the InkBridge worker facade against the mock engine.

use std::time::Duration;

use inkbridge_core::config::SessionPolicy;
use inkbridge_core::{BridgeConfig, EngineState, InkBridgeError, StrokeInput};
use inkbridge_credentials::CertificateBlob;
use inkbridge_engine::{EngineCall, MockEngineFactory, StubEngineFactory};
use inkbridge_facade::InkBridge;

fn cert() -> CertificateBlob {
    CertificateBlob::from_bytes(b"bridge-integration-certificate".to_vec())
}

/// Handwritten "2": five points.
fn two() -> StrokeInput {
    StrokeInput::Points(vec![[0.0, 0.0], [10.0, -5.0], [20.0, 0.0], [0.0, 20.0], [20.0, 20.0]])
}

/// "+3" in one stroke, in the surface's parallel-array shape.
fn plus_three() -> StrokeInput {
    StrokeInput::Capture {
        x: vec![30.0, 40.0, 50.0, 60.0, 50.0],
        y: vec![10.0, 10.0, 0.0, 10.0, 20.0],
        t: Some(vec![0.0, 16.0, 33.0, 50.0, 66.0]),
    }
}

fn spawn(factory: MockEngineFactory) -> InkBridge {
    InkBridge::spawn(Box::new(factory), &BridgeConfig::default()).unwrap()
}

#[tokio::test]
async fn write_recognize_export_close() {
    let bridge = spawn(MockEngineFactory::new());
    bridge.initialize(cert()).await.unwrap();
    assert!(bridge.is_ready());

    let id = bridge.create_session("Math").await.unwrap();
    bridge.ingest_input(id, two()).await.unwrap();
    bridge.ingest_input(id, plus_three()).await.unwrap();

    let result = bridge.recognize(id).await.unwrap();
    assert_eq!(result.text, "2+3");
    assert_eq!(result.stroke_count, 2);

    let latex = bridge.export_latex(id).await.unwrap();
    assert!(!latex.is_empty());

    bridge.close(id).await.unwrap();
    assert!(matches!(
        bridge.ingest_input(id, two()).await,
        Err(InkBridgeError::SessionClosed(closed)) if closed == id
    ));
}

#[tokio::test]
async fn recognize_before_initialize_is_not_ready() {
    let factory = MockEngineFactory::new();
    let journal = factory.journal();
    let bridge = spawn(factory);

    assert!(!bridge.is_ready());
    assert!(matches!(bridge.recognize_active().await, Err(InkBridgeError::EngineNotReady)));
    assert!(matches!(bridge.create_session("Text").await, Err(InkBridgeError::EngineNotReady)));
    assert!(journal.calls().is_empty());
}

#[tokio::test]
async fn concurrent_initialize_is_rejected() {
    let factory = MockEngineFactory::new().with_start_latency(Duration::from_millis(150));
    let journal = factory.journal();
    let bridge = spawn(factory);

    let first = bridge.initialize(cert());
    let second = bridge.clone().initialize(cert());
    assert!(matches!(second.await, Err(InkBridgeError::InitializationInProgress)));

    first.await.unwrap();
    assert!(bridge.is_ready());

    // Once the first attempt has finished, initialize is allowed again and is a no-op.
    bridge.initialize(cert()).await.unwrap();
    assert_eq!(journal.count(|c| matches!(c, EngineCall::Start { .. })), 1);
}

#[tokio::test]
async fn failed_initialize_can_be_retried() {
    let bridge = spawn(MockEngineFactory::new().failing_starts(1));
    assert!(matches!(
        bridge.initialize(cert()).await,
        Err(InkBridgeError::EngineStartFailed(_))
    ));
    assert_eq!(bridge.engine_state(), EngineState::Failed);

    bridge.initialize(cert()).await.unwrap();
    assert!(bridge.is_ready());
}

#[tokio::test]
async fn operations_apply_in_submission_order() {
    let factory = MockEngineFactory::new();
    let journal = factory.journal();
    let bridge = spawn(factory);
    bridge.initialize(cert()).await.unwrap();
    let id = bridge.create_session("Text").await.unwrap();

    // Queue everything before awaiting anything.
    let ingests: Vec<_> = (0..3).map(|_| bridge.ingest_input(id, two())).collect();
    let recognized = bridge.recognize(id);
    let exported = bridge.export_latex(id);

    for ingest in ingests {
        ingest.await.unwrap();
    }
    let result = recognized.await.unwrap();
    assert_eq!(result.stroke_count, 3);
    assert_eq!(result.text, "the");
    assert_eq!(exported.await.unwrap(), "\\text{the}");
    assert_eq!(journal.recognized_batches().len(), 1);
}

#[tokio::test]
async fn dropped_pending_still_runs_to_completion() {
    let factory = MockEngineFactory::new().with_recognize_latency(Duration::from_millis(50));
    let journal = factory.journal();
    let bridge = spawn(factory);
    bridge.initialize(cert()).await.unwrap();
    let id = bridge.create_session("Math").await.unwrap();
    bridge.ingest_input(id, two()).await.unwrap();

    drop(bridge.recognize(id));

    // The abandoned recognition finished before this export ran.
    assert_eq!(bridge.export_latex(id).await.unwrap(), "1");
    assert_eq!(journal.recognized_batches().len(), 1);
}

#[tokio::test]
async fn session_policy_is_taken_from_config() {
    let config = BridgeConfig {
        session_policy: SessionPolicy::ReplaceOpen,
        ..BridgeConfig::default()
    };
    let bridge = InkBridge::spawn(Box::new(MockEngineFactory::new()), &config).unwrap();
    bridge.initialize(cert()).await.unwrap();

    let first = bridge.create_session("Math").await.unwrap();
    let second = bridge.create_session("Text").await.unwrap();
    assert_eq!(bridge.active_session().await.unwrap(), Some(second));
    assert!(matches!(bridge.recognize(first).await, Err(InkBridgeError::SessionClosed(_))));
}

#[tokio::test]
async fn malformed_capture_is_rejected_before_the_session() {
    let bridge = spawn(MockEngineFactory::new());
    bridge.initialize(cert()).await.unwrap();
    let id = bridge.create_session("Math").await.unwrap();

    let lopsided = StrokeInput::Capture {
        x: vec![0.0, 10.0, 20.0],
        y: vec![0.0, 10.0],
        t: None,
    };
    assert!(matches!(
        bridge.ingest_input(id, lopsided).await,
        Err(InkBridgeError::MalformedStroke(_))
    ));
    assert!(matches!(
        bridge.ingest_input(id, StrokeInput::Points(vec![[1.0, 1.0]])).await,
        Err(InkBridgeError::EmptyStroke { points: 1 })
    ));
    assert!(matches!(bridge.recognize(id).await, Err(InkBridgeError::NoInputStrokes)));
}

#[tokio::test]
async fn dispose_is_terminal() {
    let factory = MockEngineFactory::new();
    let journal = factory.journal();
    let bridge = spawn(factory);
    bridge.initialize(cert()).await.unwrap();
    let id = bridge.create_session("Math").await.unwrap();

    bridge.dispose().await.unwrap();
    bridge.dispose().await.unwrap();
    assert_eq!(bridge.engine_state(), EngineState::Disposed);
    assert!(!bridge.is_ready());
    assert!(matches!(bridge.initialize(cert()).await, Err(InkBridgeError::EngineDisposed)));
    assert!(matches!(bridge.export_latex(id).await, Err(InkBridgeError::EngineDisposed)));
    assert_eq!(journal.count(|c| *c == EngineCall::Shutdown), 1);
}

#[tokio::test]
async fn dropping_last_handle_shuts_the_engine_down() {
    let factory = MockEngineFactory::new();
    let journal = factory.journal();
    let bridge = spawn(factory);
    bridge.initialize(cert()).await.unwrap();
    bridge.create_session("Text").await.unwrap();

    drop(bridge);

    let calls = journal.calls();
    assert_eq!(calls.last(), Some(&EngineCall::Shutdown));
    assert_eq!(calls[calls.len() - 2], EngineCall::ClosePackage);
}

#[tokio::test]
async fn dispose_then_drop_leaves_nothing_to_join() {
    let factory = MockEngineFactory::new().with_recognize_latency(Duration::from_millis(100));
    let journal = factory.journal();
    let bridge = spawn(factory);
    bridge.initialize(cert()).await.unwrap();
    let id = bridge.create_session("Math").await.unwrap();
    bridge.ingest_input(id, two()).await.unwrap();

    drop(bridge.recognize(id));
    bridge.dispose().await.unwrap();

    // The abandoned recognition ran before dispose; the drop has no work to wait on.
    let started = std::time::Instant::now();
    drop(bridge);
    assert!(started.elapsed() < Duration::from_millis(100));
    assert_eq!(journal.recognized_batches().len(), 1);
    assert_eq!(journal.count(|c| *c == EngineCall::Shutdown), 1);
}

#[tokio::test]
async fn running_engine_reports_its_certificate() {
    let bridge = spawn(MockEngineFactory::new());
    assert_eq!(bridge.certificate_fingerprint().await.unwrap(), None);

    bridge.initialize(cert()).await.unwrap();
    assert_eq!(
        bridge.certificate_fingerprint().await.unwrap(),
        Some(cert().fingerprint())
    );

    bridge.dispose().await.unwrap();
    assert_eq!(bridge.certificate_fingerprint().await.unwrap(), None);
}

#[tokio::test]
async fn stub_platform_is_unavailable() {
    let bridge = InkBridge::spawn(Box::new(StubEngineFactory), &BridgeConfig::default()).unwrap();
    assert!(matches!(
        bridge.initialize(cert()).await,
        Err(InkBridgeError::PlatformUnavailable)
    ));
    assert!(!bridge.is_ready());
}

#[test]
fn blocking_callers_outside_a_runtime() {
    let bridge = spawn(MockEngineFactory::new());
    bridge.initialize(cert()).wait_blocking().unwrap();
    let id = bridge.create_session("Math").wait_blocking().unwrap();
    bridge.ingest_input(id, two()).wait_blocking().unwrap();
    let result = bridge.recognize(id).wait_blocking().unwrap();
    assert_eq!(result.text, "1");
}
