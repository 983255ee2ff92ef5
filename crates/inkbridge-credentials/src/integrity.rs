// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Certificate fingerprinting — SHA-256 digests for logs and pinning.

use inkbridge_core::error::InkBridgeError;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 of `data` as a lowercase hex string.
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Check `data` against a pinned fingerprint.
///
/// Comparison ignores ASCII case so pins copied from uppercase tooling match.
pub fn verify_fingerprint(data: &[u8], expected_hex: &str) -> Result<(), InkBridgeError> {
    let actual = fingerprint(data);
    if actual.eq_ignore_ascii_case(expected_hex.trim()) {
        Ok(())
    } else {
        Err(InkBridgeError::InvalidCertificate(format!(
            "fingerprint mismatch: expected {expected_hex}, got {actual}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty byte slice (well-known constant).
    const EMPTY_SHA256: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn fingerprint_empty_input() {
        assert_eq!(fingerprint(b""), EMPTY_SHA256);
    }

    #[test]
    fn fingerprint_known_value() {
        // SHA-256("hello"), as printed by coreutils sha256sum.
        let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        assert_eq!(fingerprint(b"hello"), expected);
    }

    #[test]
    fn pinned_fingerprint_matches_any_case() {
        let pin = fingerprint(b"certificate").to_ascii_uppercase();
        assert!(verify_fingerprint(b"certificate", &pin).is_ok());
    }

    #[test]
    fn pinned_fingerprint_mismatch() {
        match verify_fingerprint(b"a", "0000") {
            Err(InkBridgeError::InvalidCertificate(detail)) => {
                assert!(detail.contains("0000"));
                assert!(detail.contains(&fingerprint(b"a")));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
