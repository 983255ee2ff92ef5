// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine handle — owns the opaque engine and its lifecycle.
//
//   Uninitialized --start ok--> Ready --dispose--> Disposed
//   Uninitialized --start err-> Failed --retry--> Ready | Failed
//
// Disposed is terminal: initialize after dispose is refused, never a silent
// restart. One handle owns one engine; the process is expected to hold a
// single handle, which `InkBridge` guarantees by moving it onto its worker.

use inkbridge_core::error::{InkBridgeError, Result};
use inkbridge_core::EngineState;
use inkbridge_credentials::CertificateBlob;
use inkbridge_engine::{EngineFactory, EngineFault, RecognitionEngine};
use tracing::{debug, error, info, instrument, warn};

pub struct EngineHandle {
    factory: Box<dyn EngineFactory>,
    engine: Option<Box<dyn RecognitionEngine>>,
    state: EngineState,
    certificate_fingerprint: Option<String>,
}

impl EngineHandle {
    pub fn new(factory: Box<dyn EngineFactory>) -> Self {
        Self {
            factory,
            engine: None,
            state: EngineState::Uninitialized,
            certificate_fingerprint: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == EngineState::Ready
    }

    /// Fingerprint of the certificate the running engine was started with.
    pub fn certificate_fingerprint(&self) -> Option<&str> {
        self.certificate_fingerprint.as_deref()
    }

    /// Construct the engine. A no-op once ready; a retry after failure.
    #[instrument(skip_all, fields(factory = self.factory.name()))]
    pub fn initialize(&mut self, certificate: &CertificateBlob) -> Result<()> {
        match self.state {
            EngineState::Ready => {
                debug!("engine already initialized");
                return Ok(());
            }
            EngineState::Disposed => return Err(InkBridgeError::EngineDisposed),
            EngineState::Uninitialized | EngineState::Failed => {}
        }

        if let Err(e) = certificate.validate() {
            warn!("certificate refused before engine start: {e}");
            self.state = EngineState::Failed;
            return Err(e);
        }

        match self.factory.start(certificate) {
            Ok(engine) => {
                let fingerprint = certificate.fingerprint();
                info!(engine = engine.name(), sha256 = %fingerprint, "recognition engine ready");
                self.engine = Some(engine);
                self.certificate_fingerprint = Some(fingerprint);
                self.state = EngineState::Ready;
                Ok(())
            }
            Err(fault) => {
                error!("recognition engine failed to start: {fault}");
                self.state = EngineState::Failed;
                Err(start_error(fault))
            }
        }
    }

    /// Fail unless the engine is ready.
    pub fn ensure_ready(&self) -> Result<()> {
        match self.state {
            EngineState::Ready => Ok(()),
            EngineState::Disposed => Err(InkBridgeError::EngineDisposed),
            EngineState::Uninitialized | EngineState::Failed => Err(InkBridgeError::EngineNotReady),
        }
    }

    /// The running engine, if ready.
    pub fn engine(&mut self) -> Result<&mut Box<dyn RecognitionEngine>> {
        self.ensure_ready()?;
        self.engine.as_mut().ok_or(InkBridgeError::EngineNotReady)
    }

    /// Release the engine. Idempotent; valid from any state.
    pub fn dispose(&mut self) {
        if self.state == EngineState::Disposed {
            return;
        }
        if let Some(mut engine) = self.engine.take() {
            engine.shutdown();
        }
        self.certificate_fingerprint = None;
        self.state = EngineState::Disposed;
        info!("recognition engine disposed");
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.shutdown();
        }
    }
}

/// Translate a start-up fault.
fn start_error(fault: EngineFault) -> InkBridgeError {
    match fault {
        EngineFault::CertificateRejected(detail) => InkBridgeError::InvalidCertificate(detail),
        EngineFault::Failure(detail) => InkBridgeError::EngineStartFailed(detail),
        EngineFault::Unavailable => InkBridgeError::PlatformUnavailable,
    }
}

/// Translate a fault raised by a running engine. Once started, every engine
/// fault is a recognition failure; `PlatformUnavailable` is start-up only.
pub(crate) fn engine_error(fault: EngineFault) -> InkBridgeError {
    match fault {
        EngineFault::CertificateRejected(detail) | EngineFault::Failure(detail) => {
            InkBridgeError::RecognitionFailed(detail)
        }
        EngineFault::Unavailable => InkBridgeError::RecognitionFailed(fault.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkbridge_engine::{EngineCall, MockEngineFactory, StubEngineFactory};

    fn cert() -> CertificateBlob {
        CertificateBlob::from_bytes(vec![0x5Au8; 48])
    }

    #[test]
    fn initialize_then_ready() {
        let mut handle = EngineHandle::new(Box::new(MockEngineFactory::new()));
        assert_eq!(handle.state(), EngineState::Uninitialized);
        handle.initialize(&cert()).unwrap();
        assert!(handle.is_ready());
        assert_eq!(handle.certificate_fingerprint(), Some(cert().fingerprint().as_str()));
    }

    #[test]
    fn second_initialize_is_a_no_op() {
        let factory = MockEngineFactory::new();
        let journal = factory.journal();
        let mut handle = EngineHandle::new(Box::new(factory));
        handle.initialize(&cert()).unwrap();
        handle.initialize(&cert()).unwrap();
        assert_eq!(journal.count(|c| matches!(c, EngineCall::Start { .. })), 1);
    }

    #[test]
    fn empty_certificate_fails_without_touching_engine() {
        let factory = MockEngineFactory::new();
        let journal = factory.journal();
        let mut handle = EngineHandle::new(Box::new(factory));
        let err = handle.initialize(&CertificateBlob::from_bytes(Vec::new())).unwrap_err();
        assert!(matches!(err, InkBridgeError::InvalidCertificate(_)));
        assert_eq!(handle.state(), EngineState::Failed);
        assert!(journal.calls().is_empty());
    }

    #[test]
    fn failed_start_can_be_retried() {
        let mut handle = EngineHandle::new(Box::new(MockEngineFactory::new().failing_starts(1)));
        assert!(matches!(
            handle.initialize(&cert()),
            Err(InkBridgeError::EngineStartFailed(_))
        ));
        assert_eq!(handle.state(), EngineState::Failed);
        handle.initialize(&cert()).unwrap();
        assert!(handle.is_ready());
    }

    #[test]
    fn engine_rejecting_certificate_is_invalid_certificate() {
        let mut handle = EngineHandle::new(Box::new(MockEngineFactory::new().rejecting_certificate()));
        assert!(matches!(
            handle.initialize(&cert()),
            Err(InkBridgeError::InvalidCertificate(_))
        ));
    }

    #[test]
    fn stub_reports_platform_unavailable() {
        let mut handle = EngineHandle::new(Box::new(StubEngineFactory));
        assert!(matches!(
            handle.initialize(&cert()),
            Err(InkBridgeError::PlatformUnavailable)
        ));
        assert_eq!(handle.state(), EngineState::Failed);
    }

    #[test]
    fn dispose_is_terminal_and_idempotent() {
        let factory = MockEngineFactory::new();
        let journal = factory.journal();
        let mut handle = EngineHandle::new(Box::new(factory));
        handle.initialize(&cert()).unwrap();
        handle.dispose();
        handle.dispose();

        assert_eq!(handle.state(), EngineState::Disposed);
        assert_eq!(journal.count(|c| *c == EngineCall::Shutdown), 1);
        assert!(matches!(handle.initialize(&cert()), Err(InkBridgeError::EngineDisposed)));
        assert!(matches!(handle.ensure_ready(), Err(InkBridgeError::EngineDisposed)));
    }

    #[test]
    fn runtime_faults_are_recognition_failures() {
        assert!(matches!(
            engine_error(EngineFault::Unavailable),
            InkBridgeError::RecognitionFailed(detail) if detail == "engine unavailable on this platform"
        ));
        assert!(matches!(
            engine_error(EngineFault::Failure("ink model not loaded".into())),
            InkBridgeError::RecognitionFailed(detail) if detail == "ink model not loaded"
        ));
    }

    #[test]
    fn not_ready_before_initialize() {
        let mut handle = EngineHandle::new(Box::new(MockEngineFactory::new()));
        assert!(matches!(handle.engine(), Err(InkBridgeError::EngineNotReady)));
    }
}
