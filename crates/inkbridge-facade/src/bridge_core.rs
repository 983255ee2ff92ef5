// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-owner bridge core.
//
// `BridgeCore` owns the engine handle and the (at most one) content session
// and runs every operation synchronously through `&mut self`. All
// preconditions are checked here, before the engine is called, so the engine
// never sees a request it cannot legally serve. `InkBridge` puts this behind
// a serialized worker; tests and benches can drive it directly.

use chrono::Utc;
use inkbridge_core::config::SessionPolicy;
use inkbridge_core::error::{InkBridgeError, Result};
use inkbridge_core::{ContentType, EngineState, RecognitionResult, SessionId, SessionState, Stroke};
use inkbridge_credentials::CertificateBlob;
use inkbridge_engine::{latex, EngineFactory};
use tracing::{debug, error, info, instrument, warn};

use crate::handle::{engine_error, EngineHandle};
use crate::session::ContentSession;

pub struct BridgeCore {
    handle: EngineHandle,
    session: Option<ContentSession>,
    policy: SessionPolicy,
}

impl BridgeCore {
    pub fn new(factory: Box<dyn EngineFactory>, policy: SessionPolicy) -> Self {
        Self {
            handle: EngineHandle::new(factory),
            session: None,
            policy,
        }
    }

    pub fn engine_state(&self) -> EngineState {
        self.handle.state()
    }

    pub fn is_ready(&self) -> bool {
        self.handle.is_ready()
    }

    /// Fail with `EngineNotReady` or `EngineDisposed` unless ready.
    pub fn ensure_ready(&self) -> Result<()> {
        self.handle.ensure_ready()
    }

    /// Fingerprint of the certificate the running engine was started with.
    pub fn certificate_fingerprint(&self) -> Option<&str> {
        self.handle.certificate_fingerprint()
    }

    /// Current session id, unless there is none or it is closed.
    pub fn active_session(&self) -> Option<SessionId> {
        self.session
            .as_ref()
            .filter(|s| !s.is_closed())
            .map(ContentSession::id)
    }

    /// State of `id`, if it is the session currently held.
    pub fn session_state(&self, id: SessionId) -> Option<SessionState> {
        self.session
            .as_ref()
            .filter(|s| s.id() == id)
            .map(ContentSession::state)
    }

    pub fn initialize(&mut self, certificate: &CertificateBlob) -> Result<()> {
        self.handle.initialize(certificate)
    }

    /// Close any live session, then release the engine.
    #[instrument(skip_all)]
    pub fn dispose(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if session.close() {
                if let Ok(engine) = self.handle.engine() {
                    engine.close_package();
                }
                info!(session = %session.id(), "session closed by dispose");
            }
        }
        self.session = None;
        self.handle.dispose();
    }

    /// Open a content session for `tag`.
    ///
    /// With [`SessionPolicy::RejectWhileOpen`] a live session makes this fail
    /// with `SessionAlreadyOpen`. With [`SessionPolicy::ReplaceOpen`] the live
    /// session is closed and its strokes discarded, with a warning naming it.
    /// An unsupported tag fails before the live session is touched.
    #[instrument(skip(self))]
    pub fn create_session(&mut self, tag: &str) -> Result<SessionId> {
        self.handle.ensure_ready()?;
        let content_type: ContentType = tag.parse()?;
        let engine = self.handle.engine()?;
        if !engine.supports(content_type) {
            return Err(InkBridgeError::UnsupportedContentType(tag.to_owned()));
        }

        if let Some(current) = self.session.as_mut().filter(|s| !s.is_closed()) {
            match self.policy {
                SessionPolicy::RejectWhileOpen => {
                    return Err(InkBridgeError::SessionAlreadyOpen(current.id()));
                }
                SessionPolicy::ReplaceOpen => {
                    warn!(
                        session = %current.id(),
                        strokes = current.strokes().len(),
                        "replacing open session; its strokes are discarded"
                    );
                    current.close();
                    engine.close_package();
                }
            }
        }

        engine.open_package(content_type).map_err(|fault| {
            error!("engine refused to open a {content_type} package: {fault}");
            engine_error(fault)
        })?;

        let session = ContentSession::open(content_type);
        let id = session.id();
        self.session = Some(session);
        info!(session = %id, %content_type, "session created");
        Ok(id)
    }

    /// Append a stroke to session `id`.
    pub fn ingest_stroke(&mut self, id: SessionId, stroke: Stroke) -> Result<()> {
        self.handle.ensure_ready()?;
        current_session(&mut self.session, id)?.ingest(stroke)
    }

    /// Recognize the strokes of session `id` and cache the result.
    #[instrument(skip(self), fields(session = %id))]
    pub fn recognize(&mut self, id: SessionId) -> Result<RecognitionResult> {
        self.handle.ensure_ready()?;
        let session = current_session(&mut self.session, id)?;
        session.ensure_recognizable()?;

        let content_type = session.content_type();
        let engine = self.handle.engine()?;
        let output = engine
            .recognize(content_type, session.strokes())
            .map_err(|fault| {
                error!("engine recognition failed: {fault}");
                engine_error(fault)
            })?;

        let latex = output
            .latex
            .unwrap_or_else(|| latex::export_for(content_type, &output.text));
        let result = RecognitionResult {
            content_type,
            text: output.text,
            latex,
            stroke_count: session.strokes().len(),
            recognized_at: Utc::now(),
        };
        session.mark_recognized(result.clone());
        info!(strokes = result.stroke_count, text = %result.text, "recognized");
        Ok(result)
    }

    /// Recognize whichever session is live; with none there is no input.
    pub fn recognize_active(&mut self) -> Result<RecognitionResult> {
        self.handle.ensure_ready()?;
        match self.active_session() {
            Some(id) => self.recognize(id),
            None => Err(InkBridgeError::NoInputStrokes),
        }
    }

    /// LaTeX from the last recognition of session `id`.
    pub fn export_latex(&mut self, id: SessionId) -> Result<String> {
        self.handle.ensure_ready()?;
        current_session(&mut self.session, id)?.export_latex()
    }

    /// Discard strokes and cached result of session `id`.
    pub fn clear(&mut self, id: SessionId) -> Result<()> {
        self.handle.ensure_ready()?;
        current_session(&mut self.session, id)?.clear()?;
        debug!(session = %id, "session cleared");
        Ok(())
    }

    /// Close session `id`. Closing a session that is already closed,
    /// replaced, or unknown is a no-op.
    pub fn close(&mut self, id: SessionId) -> Result<()> {
        self.handle.ensure_ready()?;
        let Some(session) = self.session.as_mut().filter(|s| s.id() == id) else {
            debug!(session = %id, "close on a session that is not held; nothing to do");
            return Ok(());
        };
        if session.close() {
            self.handle.engine()?.close_package();
            info!(session = %id, "session closed");
        }
        Ok(())
    }
}

/// The held session if it is `id`; any other id is closed to us.
fn current_session(slot: &mut Option<ContentSession>, id: SessionId) -> Result<&mut ContentSession> {
    slot.as_mut()
        .filter(|s| s.id() == id)
        .ok_or(InkBridgeError::SessionClosed(id))
}
