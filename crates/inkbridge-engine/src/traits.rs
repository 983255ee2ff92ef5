// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability traits for the opaque recognition engine.
//
// Implementations are driven from a single thread at a time; none of these
// methods is ever called concurrently on the same engine.

use inkbridge_core::{ContentType, Stroke};
use inkbridge_credentials::CertificateBlob;
use thiserror::Error;

/// Failure reported by the engine itself. The detail text is the engine's
/// own and is passed through to callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineFault {
    /// The engine refused the licence.
    #[error("certificate rejected: {0}")]
    CertificateRejected(String),
    /// Any other engine-side failure.
    #[error("{0}")]
    Failure(String),
    /// The SDK is not present on this platform.
    #[error("engine unavailable on this platform")]
    Unavailable,
}

/// What the engine produced for one recognition call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    /// Plain transcription.
    pub text: String,
    /// Structured LaTeX export, when the engine produces one itself.
    pub latex: Option<String>,
}

/// A started engine.
pub trait RecognitionEngine: Send {
    /// Engine identifier for logs (e.g. "mock", "iink").
    fn name(&self) -> &str;

    /// Whether the engine can open a content package of this type.
    fn supports(&self, content_type: ContentType) -> bool;

    /// Open the (single) content package. The bridge closes any previous
    /// package first.
    fn open_package(&mut self, content_type: ContentType) -> Result<(), EngineFault>;

    /// Recognize the given strokes, in capture order, within the open package.
    fn recognize(
        &mut self,
        content_type: ContentType,
        strokes: &[Stroke],
    ) -> Result<EngineOutput, EngineFault>;

    /// Close the open content package, discarding its content.
    fn close_package(&mut self);

    /// Release engine resources. Called once, right before the engine is
    /// dropped.
    fn shutdown(&mut self) {}
}

/// Constructs engines from a certificate.
pub trait EngineFactory: Send {
    /// Factory identifier for logs.
    fn name(&self) -> &str;

    /// Construct the engine. The certificate has already passed the bridge's
    /// own validation; the engine may still reject it.
    fn start(&self, certificate: &CertificateBlob) -> Result<Box<dyn RecognitionEngine>, EngineFault>;
}
