// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// inkbridge-credentials — the credential store for the recognition engine.
//
// Holds the opaque certificate blob that unlocks the engine, validates it
// before the engine ever sees it, and fingerprints it so logs can identify a
// certificate without printing its bytes.

pub mod certificate;
pub mod integrity;

pub use certificate::{decode_certificate, CertificateBlob, CredentialStore, MIN_CERTIFICATE_LEN};
pub use integrity::{fingerprint, verify_fingerprint};
