// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub engine factory for builds without the vendor SDK.

use inkbridge_credentials::CertificateBlob;

use crate::traits::{EngineFactory, EngineFault, RecognitionEngine};

/// Factory returned on platforms where the recognition SDK is not linked.
pub struct StubEngineFactory;

impl EngineFactory for StubEngineFactory {
    fn name(&self) -> &str {
        "stub"
    }

    fn start(&self, _certificate: &CertificateBlob) -> Result<Box<dyn RecognitionEngine>, EngineFault> {
        tracing::warn!("EngineFactory::start called on stub engine");
        Err(EngineFault::Unavailable)
    }
}
