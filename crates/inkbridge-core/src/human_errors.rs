// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the people writing on the canvas.
//
// Every bridge error is mapped to plain English with a clear suggestion. The
// severity drives how the application layer presents it.

use crate::error::InkBridgeError;

/// Severity of an error from the writer's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Engine hiccup; trying the same thing again may work.
    Transient,
    /// The writer (or the app) must do something first.
    ActionRequired,
    /// Retrying will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What to try next (shown as body text).
    pub suggestion: String,
    /// Whether an automatic retry makes sense.
    pub retriable: bool,
    pub severity: Severity,
}

fn human(message: &str, suggestion: impl Into<String>, retriable: bool, severity: Severity) -> HumanError {
    HumanError {
        message: message.into(),
        suggestion: suggestion.into(),
        retriable,
        severity,
    }
}

/// Convert an `InkBridgeError` into a `HumanError`.
pub fn humanize_error(err: &InkBridgeError) -> HumanError {
    match err {
        // -- Engine lifecycle --
        InkBridgeError::InvalidCertificate(_) => human(
            "The handwriting engine's licence could not be read.",
            "Check that the certificate file is the one issued for this app and has not been truncated.",
            false,
            Severity::Permanent,
        ),

        InkBridgeError::InitializationInProgress => human(
            "The handwriting engine is still starting.",
            "Wait a moment, then try again.",
            true,
            Severity::Transient,
        ),

        InkBridgeError::EngineNotReady => human(
            "Handwriting recognition isn't switched on yet.",
            "Start the recognition engine before writing.",
            false,
            Severity::ActionRequired,
        ),

        InkBridgeError::EngineDisposed => human(
            "Handwriting recognition has been shut down.",
            "Restart the app to use handwriting recognition again.",
            false,
            Severity::Permanent,
        ),

        InkBridgeError::EngineStartFailed(detail) => human(
            "The handwriting engine could not start.",
            format!("Try again. If it keeps failing, reinstall the app. ({detail})"),
            true,
            Severity::Transient,
        ),

        // -- Sessions --
        InkBridgeError::UnsupportedContentType(tag) => human(
            "This kind of writing can't be recognized.",
            format!("Choose maths or text instead. (Requested: {tag})"),
            false,
            Severity::Permanent,
        ),

        InkBridgeError::SessionAlreadyOpen(_) => human(
            "There is already unfinished writing on the page.",
            "Finish or close the current page before starting a new one.",
            false,
            Severity::ActionRequired,
        ),

        InkBridgeError::SessionClosed(_) => human(
            "This page is no longer accepting writing.",
            "Clear the page or start a new one, then write again.",
            false,
            Severity::ActionRequired,
        ),

        // -- Input --
        InkBridgeError::EmptyStroke { .. } => human(
            "That pen stroke was too short to read.",
            "Draw the stroke again with a continuous line.",
            false,
            Severity::ActionRequired,
        ),

        InkBridgeError::MalformedStroke(detail) => human(
            "The drawing surface sent a stroke that could not be read.",
            format!("The stroke data is damaged ({detail}). Check the surface's capture output."),
            false,
            Severity::Permanent,
        ),

        InkBridgeError::NoInputStrokes => human(
            "There's nothing to recognize yet.",
            "Write something first, then ask for recognition.",
            false,
            Severity::ActionRequired,
        ),

        // -- Recognition / export --
        InkBridgeError::NotYetRecognized => human(
            "Your writing hasn't been recognized yet.",
            "Run recognition before exporting.",
            false,
            Severity::ActionRequired,
        ),

        InkBridgeError::RecognitionFailed(detail) => human(
            "We couldn't read your handwriting.",
            format!("Try writing a little larger and more clearly. ({detail})"),
            true,
            Severity::Transient,
        ),

        // -- Platform / runtime --
        InkBridgeError::PlatformUnavailable => human(
            "Handwriting recognition isn't available on this device.",
            "Use a device with the handwriting engine installed.",
            false,
            Severity::Permanent,
        ),

        InkBridgeError::WorkerStopped => human(
            "Handwriting recognition stopped unexpectedly.",
            "Restart the app.",
            false,
            Severity::Permanent,
        ),

        InkBridgeError::Io(io_err) => human(
            "A file could not be read or written.",
            format!("Check the file exists and the app may access it. ({io_err})"),
            false,
            Severity::ActionRequired,
        ),

        InkBridgeError::Serialization(_) => human(
            "A settings or ink file is damaged.",
            "Delete or replace the file and try again.",
            false,
            Severity::Permanent,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionId;

    #[test]
    fn engine_failure_is_transient_and_keeps_detail() {
        let err = InkBridgeError::RecognitionFailed("stroke buffer overflow".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
        assert!(human.suggestion.contains("stroke buffer overflow"));
    }

    #[test]
    fn no_strokes_is_action_required() {
        let human = humanize_error(&InkBridgeError::NoInputStrokes);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn closed_session_is_action_required() {
        let human = humanize_error(&InkBridgeError::SessionClosed(SessionId::new()));
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn malformed_stroke_is_not_reported_as_short() {
        let short = humanize_error(&InkBridgeError::EmptyStroke { points: 1 });
        let malformed =
            humanize_error(&InkBridgeError::MalformedStroke("3 x coordinates but 2 y coordinates".into()));
        assert_ne!(short.message, malformed.message);
        assert!(!malformed.message.contains("too short"));
        assert!(malformed.suggestion.contains("3 x coordinates"));
    }

    #[test]
    fn bad_certificate_is_permanent() {
        let human = humanize_error(&InkBridgeError::InvalidCertificate("empty".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }
}
