// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Deterministic mock engine for tests and demos.
//
// Output is a pure function of the content type and the number of strokes,
// picked from a fixed table of plausible transcriptions. Every call the bridge
// makes is recorded in a shared journal so tests can assert on exactly what
// reached the engine and in which order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use inkbridge_core::{ContentType, Stroke};
use inkbridge_credentials::CertificateBlob;
use tracing::debug;

use crate::traits::{EngineFactory, EngineFault, EngineOutput, RecognitionEngine};

/// Transcriptions returned for math packages, indexed by stroke count.
const MATH_SAMPLES: &[&str] = &[
    "x^2+2x+1",
    "1",
    "2+3",
    "2x+3=7",
    "a/b+c",
    "√x=y",
    "y=mx+b",
    "a^2+b^2=c^2",
];

/// Transcriptions returned for text packages, indexed by stroke count.
const TEXT_SAMPLES: &[&str] = &["ink", "a", "hi", "the", "hello", "hello world"];

/// One call that reached the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Start { fingerprint: String },
    OpenPackage(ContentType),
    Recognize {
        content_type: ContentType,
        strokes: Vec<Stroke>,
    },
    ClosePackage,
    Shutdown,
}

/// Shared, append-only record of engine calls.
#[derive(Debug, Clone, Default)]
pub struct MockJournal {
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl MockJournal {
    fn guard(&self) -> MutexGuard<'_, Vec<EngineCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: EngineCall) {
        self.guard().push(call);
    }

    /// Snapshot of every call so far.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.guard().clone()
    }

    /// Stroke batches passed to `recognize`, in call order.
    pub fn recognized_batches(&self) -> Vec<Vec<Stroke>> {
        self.guard()
            .iter()
            .filter_map(|call| match call {
                EngineCall::Recognize { strokes, .. } => Some(strokes.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.guard().iter().filter(|call| predicate(call)).count()
    }
}

/// Builder-style factory for [`MockEngine`].
#[derive(Debug, Clone)]
pub struct MockEngineFactory {
    journal: MockJournal,
    supported: Vec<ContentType>,
    start_latency: Duration,
    recognize_latency: Duration,
    start_failures: Arc<AtomicUsize>,
    reject_certificate: bool,
    recognition_failure: Option<String>,
}

impl Default for MockEngineFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngineFactory {
    pub fn new() -> Self {
        Self {
            journal: MockJournal::default(),
            supported: ContentType::ALL.to_vec(),
            start_latency: Duration::ZERO,
            recognize_latency: Duration::ZERO,
            start_failures: Arc::new(AtomicUsize::new(0)),
            reject_certificate: false,
            recognition_failure: None,
        }
    }

    /// Journal shared with every engine this factory starts.
    pub fn journal(&self) -> MockJournal {
        self.journal.clone()
    }

    /// Restrict the content types engines accept.
    pub fn supporting(mut self, content_types: &[ContentType]) -> Self {
        self.supported = content_types.to_vec();
        self
    }

    /// Block inside `start` for `latency`.
    pub fn with_start_latency(mut self, latency: Duration) -> Self {
        self.start_latency = latency;
        self
    }

    /// Block inside every `recognize` for `latency`.
    pub fn with_recognize_latency(mut self, latency: Duration) -> Self {
        self.recognize_latency = latency;
        self
    }

    /// Fail the next `count` starts with an engine-side failure.
    pub fn failing_starts(self, count: usize) -> Self {
        self.start_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Refuse every certificate.
    pub fn rejecting_certificate(mut self) -> Self {
        self.reject_certificate = true;
        self
    }

    /// Make every `recognize` fail with `detail`.
    pub fn failing_recognition(mut self, detail: impl Into<String>) -> Self {
        self.recognition_failure = Some(detail.into());
        self
    }
}

impl EngineFactory for MockEngineFactory {
    fn name(&self) -> &str {
        "mock"
    }

    fn start(&self, certificate: &CertificateBlob) -> Result<Box<dyn RecognitionEngine>, EngineFault> {
        if !self.start_latency.is_zero() {
            std::thread::sleep(self.start_latency);
        }
        self.journal.record(EngineCall::Start {
            fingerprint: certificate.fingerprint(),
        });

        if self.reject_certificate {
            return Err(EngineFault::CertificateRejected(
                "certificate not valid for this application".into(),
            ));
        }
        let pending_failure = self
            .start_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if pending_failure {
            return Err(EngineFault::Failure("engine bootstrap failed".into()));
        }

        Ok(Box::new(MockEngine {
            journal: self.journal.clone(),
            supported: self.supported.clone(),
            recognize_latency: self.recognize_latency,
            recognition_failure: self.recognition_failure.clone(),
            open_package: None,
        }))
    }
}

/// Engine produced by [`MockEngineFactory`].
pub struct MockEngine {
    journal: MockJournal,
    supported: Vec<ContentType>,
    recognize_latency: Duration,
    recognition_failure: Option<String>,
    open_package: Option<ContentType>,
}

impl MockEngine {
    fn transcribe(content_type: ContentType, stroke_count: usize) -> &'static str {
        let samples = match content_type {
            ContentType::Math => MATH_SAMPLES,
            ContentType::Text => TEXT_SAMPLES,
        };
        samples[stroke_count % samples.len()]
    }
}

impl RecognitionEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    fn supports(&self, content_type: ContentType) -> bool {
        self.supported.contains(&content_type)
    }

    fn open_package(&mut self, content_type: ContentType) -> Result<(), EngineFault> {
        self.journal.record(EngineCall::OpenPackage(content_type));
        if !self.supports(content_type) {
            return Err(EngineFault::Failure(format!("no {content_type} package")));
        }
        self.open_package = Some(content_type);
        Ok(())
    }

    fn recognize(
        &mut self,
        content_type: ContentType,
        strokes: &[Stroke],
    ) -> Result<EngineOutput, EngineFault> {
        self.journal.record(EngineCall::Recognize {
            content_type,
            strokes: strokes.to_vec(),
        });
        if !self.recognize_latency.is_zero() {
            std::thread::sleep(self.recognize_latency);
        }

        if self.open_package != Some(content_type) {
            return Err(EngineFault::Failure("no matching content package is open".into()));
        }
        if let Some(detail) = &self.recognition_failure {
            return Err(EngineFault::Failure(detail.clone()));
        }

        let text = Self::transcribe(content_type, strokes.len());
        debug!(strokes = strokes.len(), text, "mock recognition");
        Ok(EngineOutput {
            text: text.to_owned(),
            latex: None,
        })
    }

    fn close_package(&mut self) {
        self.journal.record(EngineCall::ClosePackage);
        self.open_package = None;
    }

    fn shutdown(&mut self) {
        self.journal.record(EngineCall::Shutdown);
        self.open_package = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkbridge_core::InkPoint;

    fn cert() -> CertificateBlob {
        CertificateBlob::from_bytes(vec![1u8; 32])
    }

    fn stroke(n: usize) -> Stroke {
        Stroke::new(
            (0..n)
                .map(|i| InkPoint::new(i as f64, i as f64, i as f64 * 16.0))
                .collect(),
        )
    }

    #[test]
    fn recognition_is_deterministic() {
        let factory = MockEngineFactory::new();
        let mut engine = factory.start(&cert()).unwrap();
        engine.open_package(ContentType::Math).unwrap();

        let strokes = vec![stroke(5), stroke(4)];
        let first = engine.recognize(ContentType::Math, &strokes).unwrap();
        let second = engine.recognize(ContentType::Math, &strokes).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.text, "2+3");
    }

    #[test]
    fn recognize_without_package_fails() {
        let factory = MockEngineFactory::new();
        let mut engine = factory.start(&cert()).unwrap();
        assert!(engine.recognize(ContentType::Text, &[stroke(2)]).is_err());
    }

    #[test]
    fn start_failures_are_consumed() {
        let factory = MockEngineFactory::new().failing_starts(1);
        assert!(matches!(factory.start(&cert()), Err(EngineFault::Failure(_))));
        assert!(factory.start(&cert()).is_ok());
    }

    #[test]
    fn certificate_rejection() {
        let factory = MockEngineFactory::new().rejecting_certificate();
        assert!(matches!(
            factory.start(&cert()),
            Err(EngineFault::CertificateRejected(_))
        ));
    }

    #[test]
    fn journal_records_calls_in_order() {
        let factory = MockEngineFactory::new();
        let journal = factory.journal();
        let mut engine = factory.start(&cert()).unwrap();
        engine.open_package(ContentType::Text).unwrap();
        engine.recognize(ContentType::Text, &[stroke(3)]).unwrap();
        engine.close_package();
        engine.shutdown();

        let calls = journal.calls();
        assert!(matches!(calls[0], EngineCall::Start { .. }));
        assert_eq!(calls[1], EngineCall::OpenPackage(ContentType::Text));
        assert!(matches!(calls[2], EngineCall::Recognize { .. }));
        assert_eq!(calls[3], EngineCall::ClosePackage);
        assert_eq!(calls[4], EngineCall::Shutdown);
        assert_eq!(journal.recognized_batches(), vec![vec![stroke(3)]]);
    }

    #[test]
    fn unsupported_package_is_refused() {
        let factory = MockEngineFactory::new().supporting(&[ContentType::Math]);
        let mut engine = factory.start(&cert()).unwrap();
        assert!(!engine.supports(ContentType::Text));
        assert!(engine.open_package(ContentType::Text).is_err());
    }
}
