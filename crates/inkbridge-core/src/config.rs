// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::ContentType;

/// What `create` does when a session is already open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPolicy {
    /// Refuse with `SessionAlreadyOpen`; the caller must close first.
    #[default]
    RejectWhileOpen,
    /// Close and discard the open session, then create the new one.
    ReplaceOpen,
}

/// Stroke normalization parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Points closer than this (surface units) to the previous kept point are
    /// dropped. The last point of a stroke is always kept.
    pub min_point_distance: f64,
    /// Spacing of implicit timestamps, in milliseconds (60 Hz by default).
    pub sample_interval_ms: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            min_point_distance: 2.0,
            sample_interval_ms: 16.67,
        }
    }
}

/// Persistent bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Certificate file handed to the engine at start-up.
    pub certificate_path: Option<PathBuf>,
    /// Expected SHA-256 of the certificate, hex. Loading fails on mismatch.
    pub certificate_sha256: Option<String>,
    /// Content type used when the caller does not name one.
    pub default_content_type: ContentType,
    /// Behaviour of session creation while another session is open.
    pub session_policy: SessionPolicy,
    /// Stroke normalization.
    pub capture: CaptureConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            certificate_path: None,
            certificate_sha256: None,
            default_content_type: ContentType::Math,
            session_policy: SessionPolicy::default(),
            capture: CaptureConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&data)?;
        debug!(path = %path.as_ref().display(), "bridge config loaded");
        Ok(config)
    }

    /// Like [`BridgeConfig::load`], falling back to defaults when the file is
    /// absent or unreadable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.as_ref().display(), "using default bridge config: {e}");
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
