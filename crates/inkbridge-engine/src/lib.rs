// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// InkBridge — recognition engine abstractions.
//
// The handwriting engine is a proprietary, non-reentrant SDK. This crate
// defines the capability set the bridge needs from it, so the session state
// machine can run against the real SDK, the platform stub, or the
// deterministic mock used in tests and demos.

pub mod latex;
pub mod mock;
pub mod stub;
pub mod traits;

pub use mock::{EngineCall, MockEngineFactory, MockJournal};
pub use stub::StubEngineFactory;
pub use traits::{EngineFactory, EngineFault, EngineOutput, RecognitionEngine};

/// Engine factory for the current platform.
///
/// No platform in this workspace links the vendor SDK, so this is always the
/// stub; every `start` reports `EngineFault::Unavailable`.
pub fn platform_engine() -> Box<dyn EngineFactory> {
    Box::new(StubEngineFactory)
}
