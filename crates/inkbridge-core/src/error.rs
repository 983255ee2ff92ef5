// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for InkBridge.

use thiserror::Error;

use crate::types::SessionId;

/// Top-level error type for all InkBridge operations.
///
/// Every precondition violation is reported before the recognition engine is
/// touched. Failures reported by the engine itself arrive as
/// [`InkBridgeError::RecognitionFailed`] or [`InkBridgeError::EngineStartFailed`]
/// with the engine's own detail string.
#[derive(Debug, Error)]
pub enum InkBridgeError {
    // -- Engine lifecycle --
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    #[error("engine initialization already in progress")]
    InitializationInProgress,

    #[error("recognition engine is not initialized")]
    EngineNotReady,

    #[error("recognition engine has been disposed")]
    EngineDisposed,

    #[error("recognition engine failed to start: {0}")]
    EngineStartFailed(String),

    // -- Sessions --
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("session {0} is still open")]
    SessionAlreadyOpen(SessionId),

    #[error("session {0} is closed to this operation")]
    SessionClosed(SessionId),

    // -- Input --
    #[error("stroke has {points} point(s), at least 2 are required")]
    EmptyStroke { points: usize },

    #[error("malformed stroke: {0}")]
    MalformedStroke(String),

    #[error("no strokes to recognize")]
    NoInputStrokes,

    // -- Recognition / export --
    #[error("nothing has been recognized yet")]
    NotYetRecognized,

    #[error("recognition failed: {0}")]
    RecognitionFailed(String),

    // -- Platform / runtime --
    #[error("recognition engine not available on this platform")]
    PlatformUnavailable,

    #[error("bridge worker has stopped")]
    WorkerStopped,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, InkBridgeError>;
