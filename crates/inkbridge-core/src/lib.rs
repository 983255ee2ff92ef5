// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// InkBridge — Core types and error definitions shared across all crates.

pub mod capture;
pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use capture::{StrokeInput, StrokeNormalizer};
pub use config::BridgeConfig;
pub use error::InkBridgeError;
pub use types::*;
