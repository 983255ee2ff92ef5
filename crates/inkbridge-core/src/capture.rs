// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stroke capture normalization.
//
// Drawing surfaces hand us strokes in two shapes: a bare list of `[x, y]`
// pairs, or the engine's batch shape with parallel `x`, `y` and optional `t`
// arrays. Both are normalized into the same `Stroke` before a session sees
// them. Normalization never reorders points and never drops a whole stroke.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CaptureConfig;
use crate::error::{InkBridgeError, Result};
use crate::types::{InkPoint, Stroke};

/// A stroke as delivered by a drawing surface, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrokeInput {
    /// Raw point-value sequence, timestamps implicit.
    Points(Vec<[f64; 2]>),
    /// Structured surface capture with parallel coordinate arrays.
    Capture {
        x: Vec<f64>,
        y: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        t: Option<Vec<f64>>,
    },
}

impl StrokeInput {
    /// Number of raw points in the capture.
    pub fn len(&self) -> usize {
        match self {
            Self::Points(points) => points.len(),
            Self::Capture { x, .. } => x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into `(x, y, captured_t)` triples, validating shape.
    fn samples(&self) -> Result<Vec<(f64, f64, Option<f64>)>> {
        let samples: Vec<(f64, f64, Option<f64>)> = match self {
            Self::Points(points) => points.iter().map(|[x, y]| (*x, *y, None)).collect(),
            Self::Capture { x, y, t } => {
                if x.len() != y.len() {
                    return Err(InkBridgeError::MalformedStroke(format!(
                        "{} x coordinates but {} y coordinates",
                        x.len(),
                        y.len()
                    )));
                }
                if let Some(t) = t {
                    if t.len() != x.len() {
                        return Err(InkBridgeError::MalformedStroke(format!(
                            "{} timestamps for {} points",
                            t.len(),
                            x.len()
                        )));
                    }
                }
                x.iter()
                    .zip(y)
                    .enumerate()
                    .map(|(i, (x, y))| (*x, *y, t.as_ref().map(|t| t[i])))
                    .collect()
            }
        };

        let non_finite = samples.iter().any(|(x, y, t)| {
            !x.is_finite() || !y.is_finite() || t.is_some_and(|t| !t.is_finite())
        });
        if non_finite {
            return Err(InkBridgeError::MalformedStroke(
                "non-finite coordinate or timestamp".into(),
            ));
        }
        Ok(samples)
    }
}

/// Turns surface captures into immutable [`Stroke`]s.
#[derive(Debug, Clone)]
pub struct StrokeNormalizer {
    min_point_distance: f64,
    sample_interval_ms: f64,
}

impl Default for StrokeNormalizer {
    fn default() -> Self {
        Self::new(&CaptureConfig::default())
    }
}

impl StrokeNormalizer {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            min_point_distance: config.min_point_distance.max(0.0),
            sample_interval_ms: config.sample_interval_ms.max(0.0),
        }
    }

    /// Normalize one stroke, stamping implicit timestamps from now.
    pub fn normalize(&self, input: &StrokeInput) -> Result<Stroke> {
        self.normalize_at(input, Utc::now().timestamp_millis() as f64)
    }

    /// Normalize one stroke with implicit timestamps starting at `start_ms`.
    ///
    /// Points closer than the minimum distance to the previously kept point
    /// are thinned out; the final point is always kept. Captured timestamps
    /// win over implicit ones. A stroke with fewer than two points passes
    /// through unchanged so that ingestion can reject it.
    pub fn normalize_at(&self, input: &StrokeInput, start_ms: f64) -> Result<Stroke> {
        let samples = input.samples()?;

        let mut kept: Vec<(f64, f64, Option<f64>)> = Vec::with_capacity(samples.len());
        for sample in &samples {
            match kept.last() {
                None => kept.push(*sample),
                Some(last) => {
                    let distance = (sample.0 - last.0).hypot(sample.1 - last.1);
                    if distance >= self.min_point_distance {
                        kept.push(*sample);
                    }
                }
            }
        }
        if let (Some(final_sample), Some(last_kept)) = (samples.last(), kept.last()) {
            if (final_sample.0, final_sample.1) != (last_kept.0, last_kept.1) {
                kept.push(*final_sample);
            }
        }

        let points: Vec<InkPoint> = kept
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, t))| {
                let t_ms = t.unwrap_or(start_ms + i as f64 * self.sample_interval_ms);
                InkPoint::new(x, y, t_ms)
            })
            .collect();

        debug!(raw = samples.len(), kept = points.len(), "stroke normalized");
        Ok(Stroke::new(points))
    }

    /// Normalize a whole drawing, preserving stroke order. Implicit
    /// timestamps continue monotonically from one stroke to the next.
    pub fn normalize_drawing(&self, inputs: &[StrokeInput]) -> Result<Vec<Stroke>> {
        let mut cursor = Utc::now().timestamp_millis() as f64;
        let mut strokes = Vec::with_capacity(inputs.len());
        for input in inputs {
            let stroke = self.normalize_at(input, cursor)?;
            if let Some(last) = stroke.points().last() {
                cursor = last.t_ms + self.sample_interval_ms;
            }
            strokes.push(stroke);
        }
        Ok(strokes)
    }
}
