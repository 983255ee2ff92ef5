// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// InkBridge — the asynchronous facade over the recognition engine.
//
// The engine is not reentrant, so every operation is shipped as a job to one
// dedicated worker thread that owns the `BridgeCore`. Jobs run strictly in
// submission order and each replies on its own oneshot channel. Callers on
// any thread (or any async task) can hold a clone of the bridge.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};

use inkbridge_core::error::{InkBridgeError, Result};
use inkbridge_core::{
    BridgeConfig, EngineState, RecognitionResult, SessionId, Stroke, StrokeInput, StrokeNormalizer,
};
use inkbridge_credentials::CertificateBlob;
use inkbridge_engine::EngineFactory;
use tracing::{debug, error, info, warn};

use crate::bridge_core::BridgeCore;
use crate::pending::Pending;

type Job = Box<dyn FnOnce(&mut BridgeCore) + Send + 'static>;

enum Command {
    Run(Job),
    Shutdown,
}

struct Inner {
    sender: mpsc::Sender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
    state: Arc<AtomicU8>,
    initializing: Arc<AtomicBool>,
    normalizer: StrokeNormalizer,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(Command::Shutdown) {
                error!("failed to send shutdown to the engine thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("failed to join the engine thread: {join_err:?}");
            }
        }
    }
}

/// Resets the in-progress flag when an initialize job finishes or is dropped
/// unrun.
struct InitGuard(Arc<AtomicBool>);

impl Drop for InitGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle to the recognition bridge. Cheap to clone; the worker stops when
/// the last clone is dropped.
///
/// Dropping the last clone sends shutdown and then joins the worker, so the
/// drop blocks the calling thread until any queued or in-flight engine call
/// has finished. Inside an async runtime that stalls an executor thread;
/// await [`InkBridge::dispose`] first, after which the join returns at once.
#[derive(Clone)]
pub struct InkBridge {
    inner: Arc<Inner>,
}

impl InkBridge {
    /// Start the worker thread. The engine itself is not started until
    /// [`InkBridge::initialize`].
    pub fn spawn(factory: Box<dyn EngineFactory>, config: &BridgeConfig) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<Command>();
        let state = Arc::new(AtomicU8::new(EngineState::Uninitialized.as_u8()));
        let factory_name = factory.name().to_owned();
        let mut core = BridgeCore::new(factory, config.session_policy);

        let worker = thread::Builder::new()
            .name("inkbridge-engine".into())
            .spawn(move || {
                while let Ok(command) = command_rx.recv() {
                    match command {
                        Command::Run(job) => job(&mut core),
                        Command::Shutdown => break,
                    }
                }
                core.dispose();
                info!("engine thread shutting down");
            })?;

        info!(
            factory = %factory_name,
            policy = ?config.session_policy,
            "inkbridge worker started"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
                state,
                initializing: Arc::new(AtomicBool::new(false)),
                normalizer: StrokeNormalizer::new(&config.capture),
            }),
        })
    }

    /// Queue `task` on the worker. The engine state mirror is refreshed
    /// before the reply is sent.
    fn submit<T, F>(&self, task: F) -> Pending<T>
    where
        F: FnOnce(&mut BridgeCore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        let state = Arc::clone(&self.inner.state);

        let job: Job = Box::new(move |core| {
            let result = task(core);
            state.store(core.engine_state().as_u8(), Ordering::SeqCst);
            if reply_tx.send(result).is_err() {
                debug!("caller dropped before receiving the bridge result");
            }
        });

        // A refused send drops the job and with it the reply sender, so the
        // Pending resolves to WorkerStopped.
        if self.inner.sender.send(Command::Run(job)).is_err() {
            warn!("engine thread is gone; operation not queued");
        }
        Pending::new(reply_rx)
    }

    /// Current engine lifecycle state, as of the last completed operation.
    pub fn engine_state(&self) -> EngineState {
        EngineState::from_u8(self.inner.state.load(Ordering::SeqCst))
    }

    /// Whether the engine is initialized and not disposed. Never blocks.
    pub fn is_ready(&self) -> bool {
        self.engine_state() == EngineState::Ready
    }

    /// Start the engine with `certificate`.
    ///
    /// Resolves immediately with `InitializationInProgress` while another
    /// initialize is queued or running. Initializing a ready engine is a
    /// no-op; retrying after a failure starts the engine again.
    pub fn initialize(&self, certificate: CertificateBlob) -> Pending<()> {
        if self.inner.initializing.swap(true, Ordering::SeqCst) {
            warn!("initialize refused: another initialization is in progress");
            return Pending::ready(Err(InkBridgeError::InitializationInProgress));
        }
        let guard = InitGuard(Arc::clone(&self.inner.initializing));
        self.submit(move |core| {
            let _guard = guard;
            core.initialize(&certificate)
        })
    }

    /// Close any live session and release the engine. Terminal and
    /// idempotent.
    pub fn dispose(&self) -> Pending<()> {
        self.submit(|core| {
            core.dispose();
            Ok(())
        })
    }

    /// Open a session for a content-type tag (`"Math"` or `"Text"`).
    pub fn create_session(&self, tag: impl Into<String>) -> Pending<SessionId> {
        let tag = tag.into();
        self.submit(move |core| core.create_session(&tag))
    }

    /// Append an already normalized stroke.
    pub fn ingest_stroke(&self, session: SessionId, stroke: Stroke) -> Pending<()> {
        self.submit(move |core| core.ingest_stroke(session, stroke))
    }

    /// Normalize a raw surface capture and append it.
    pub fn ingest_input(&self, session: SessionId, input: StrokeInput) -> Pending<()> {
        let normalizer = self.inner.normalizer.clone();
        self.submit(move |core| {
            core.ensure_ready()?;
            let stroke = normalizer.normalize(&input)?;
            core.ingest_stroke(session, stroke)
        })
    }

    pub fn recognize(&self, session: SessionId) -> Pending<RecognitionResult> {
        self.submit(move |core| core.recognize(session))
    }

    /// Recognize the live session, whichever it is.
    pub fn recognize_active(&self) -> Pending<RecognitionResult> {
        self.submit(BridgeCore::recognize_active)
    }

    pub fn export_latex(&self, session: SessionId) -> Pending<String> {
        self.submit(move |core| core.export_latex(session))
    }

    pub fn clear(&self, session: SessionId) -> Pending<()> {
        self.submit(move |core| core.clear(session))
    }

    pub fn close(&self, session: SessionId) -> Pending<()> {
        self.submit(move |core| core.close(session))
    }

    /// SHA-256 of the certificate the running engine was started with.
    pub fn certificate_fingerprint(&self) -> Pending<Option<String>> {
        self.submit(|core| Ok(core.certificate_fingerprint().map(str::to_owned)))
    }

    /// Id of the live session, if any.
    pub fn active_session(&self) -> Pending<Option<SessionId>> {
        self.submit(|core| Ok(core.active_session()))
    }
}
