// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the InkBridge recognition bridge.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InkBridgeError;

/// Unique identifier for a content session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of content a session recognizes. Maps 1:1 onto the engine's
/// content package types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// Handwritten mathematical expression.
    Math,
    /// Handwritten running text.
    Text,
}

impl ContentType {
    /// Every content type the bridge knows how to request.
    pub const ALL: [ContentType; 2] = [ContentType::Math, ContentType::Text];

    /// Tag the engine expects when opening a content package.
    pub fn engine_tag(&self) -> &'static str {
        match self {
            Self::Math => "Math",
            Self::Text => "Text",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.engine_tag())
    }
}

impl FromStr for ContentType {
    type Err = InkBridgeError;

    /// Parse a caller-supplied tag. Matching ignores ASCII case so both the
    /// package names ("Math") and the batch API names ("MATH") are accepted;
    /// anything else is rejected rather than defaulted.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let trimmed = tag.trim();
        Self::ALL
            .into_iter()
            .find(|ct| ct.engine_tag().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| InkBridgeError::UnsupportedContentType(tag.to_owned()))
    }
}

/// Lifecycle states of the engine handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No initialization attempted yet.
    Uninitialized,
    /// Engine constructed and accepting sessions.
    Ready,
    /// Last initialization attempt failed; a retry is allowed.
    Failed,
    /// Engine released. Terminal.
    Disposed,
}

impl EngineState {
    /// Compact encoding used for lock-free state mirrors.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Uninitialized => 0,
            Self::Ready => 1,
            Self::Failed => 2,
            Self::Disposed => 3,
        }
    }

    /// Inverse of [`EngineState::as_u8`]. Unknown values decode as
    /// `Uninitialized`.
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Ready,
            2 => Self::Failed,
            3 => Self::Disposed,
            _ => Self::Uninitialized,
        }
    }
}

/// Lifecycle states of a content session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Accepting strokes.
    Open,
    /// A recognition result is cached for export.
    Recognized,
    /// Terminal.
    Closed,
}

/// One sampled pen position. `t_ms` is milliseconds since the Unix epoch,
/// either captured by the drawing surface or assigned during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InkPoint {
    pub x: f64,
    pub y: f64,
    pub t_ms: f64,
}

impl InkPoint {
    pub fn new(x: f64, y: f64, t_ms: f64) -> Self {
        Self { x, y, t_ms }
    }

    /// Euclidean distance to `other`, ignoring time.
    pub fn distance_to(&self, other: &InkPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// One continuous pen-down-to-pen-up capture.
///
/// Points are fixed at construction; a stroke never changes once captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<InkPoint>,
}

impl Stroke {
    pub fn new(points: Vec<InkPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[InkPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Outcome of a successful recognition pass over a session's strokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Content type the strokes were recognized as.
    pub content_type: ContentType,
    /// Plain transcription.
    pub text: String,
    /// Structured LaTeX export of the same recognition.
    pub latex: String,
    /// Number of strokes the engine saw.
    pub stroke_count: usize,
    pub recognized_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parses_case_insensitively() {
        assert_eq!("Math".parse::<ContentType>().unwrap(), ContentType::Math);
        assert_eq!("MATH".parse::<ContentType>().unwrap(), ContentType::Math);
        assert_eq!(" text ".parse::<ContentType>().unwrap(), ContentType::Text);
    }

    #[test]
    fn unknown_content_type_is_rejected() {
        for tag in ["", "Diagram", "Maths", "raw-content"] {
            match tag.parse::<ContentType>() {
                Err(InkBridgeError::UnsupportedContentType(t)) => assert_eq!(t, tag),
                other => panic!("expected UnsupportedContentType for {tag:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn engine_state_encoding_round_trips() {
        for state in [
            EngineState::Uninitialized,
            EngineState::Ready,
            EngineState::Failed,
            EngineState::Disposed,
        ] {
            assert_eq!(EngineState::from_u8(state.as_u8()), state);
        }
        assert_eq!(EngineState::from_u8(200), EngineState::Uninitialized);
    }

    #[test]
    fn point_distance() {
        let a = InkPoint::new(0.0, 0.0, 0.0);
        let b = InkPoint::new(3.0, 4.0, 10.0);
        assert!((a.distance_to(&b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
