// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content session — one open recognition context and its strokes.
//
//   Open --recognize ok--> Recognized --recognize ok--> Recognized
//   Open | Recognized --clear--> Open (empty)
//   any --close--> Closed
//
// Strokes are only accepted while Open: a Recognized session keeps its
// strokes and cached result in step until it is cleared. The session never
// talks to the engine; `BridgeCore` does that after the session has agreed
// the operation is legal.

use inkbridge_core::error::{InkBridgeError, Result};
use inkbridge_core::{ContentType, RecognitionResult, SessionId, SessionState, Stroke};
use tracing::debug;

#[derive(Debug)]
pub struct ContentSession {
    id: SessionId,
    content_type: ContentType,
    state: SessionState,
    strokes: Vec<Stroke>,
    result: Option<RecognitionResult>,
}

impl ContentSession {
    /// A fresh, empty, open session.
    pub fn open(content_type: ContentType) -> Self {
        Self {
            id: SessionId::new(),
            content_type,
            state: SessionState::Open,
            strokes: Vec::new(),
            result: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Strokes in capture order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Last successful recognition, if any.
    pub fn result(&self) -> Option<&RecognitionResult> {
        self.result.as_ref()
    }

    /// Append a stroke.
    pub fn ingest(&mut self, stroke: Stroke) -> Result<()> {
        if self.state != SessionState::Open {
            return Err(InkBridgeError::SessionClosed(self.id));
        }
        if stroke.len() < 2 {
            return Err(InkBridgeError::EmptyStroke { points: stroke.len() });
        }
        self.strokes.push(stroke);
        debug!(session = %self.id, strokes = self.strokes.len(), "stroke ingested");
        Ok(())
    }

    /// Check that recognition may run now.
    pub fn ensure_recognizable(&self) -> Result<()> {
        if self.is_closed() {
            return Err(InkBridgeError::SessionClosed(self.id));
        }
        if self.strokes.is_empty() {
            return Err(InkBridgeError::NoInputStrokes);
        }
        Ok(())
    }

    /// Cache a successful recognition.
    pub fn mark_recognized(&mut self, result: RecognitionResult) {
        self.result = Some(result);
        self.state = SessionState::Recognized;
    }

    /// LaTeX of the last recognition.
    pub fn export_latex(&self) -> Result<String> {
        if self.is_closed() {
            return Err(InkBridgeError::SessionClosed(self.id));
        }
        self.result
            .as_ref()
            .map(|r| r.latex.clone())
            .ok_or(InkBridgeError::NotYetRecognized)
    }

    /// Drop strokes and cached result; back to Open.
    pub fn clear(&mut self) -> Result<()> {
        if self.is_closed() {
            return Err(InkBridgeError::SessionClosed(self.id));
        }
        self.strokes.clear();
        self.result = None;
        self.state = SessionState::Open;
        Ok(())
    }

    /// Close for good, releasing strokes. Returns whether the session was
    /// still live.
    pub fn close(&mut self) -> bool {
        if self.is_closed() {
            return false;
        }
        self.strokes = Vec::new();
        self.result = None;
        self.state = SessionState::Closed;
        true
    }
}
