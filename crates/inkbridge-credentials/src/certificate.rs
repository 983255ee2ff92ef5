// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine certificate handling.
//
// The engine vendor ships its licence either as raw bytes or as a C source
// file (`MyCertificate.c`) holding a brace-enclosed byte array:
//
// ```c
// static const char myCertificate_BYTES[] = {
//     71, -50, 0x1f, ...
// };
// ```
//
// Both forms decode into the same `CertificateBlob`. The blob is never
// interpreted beyond that; only the engine knows what the bytes mean.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use inkbridge_core::error::{InkBridgeError, Result};
use tracing::{debug, info, instrument};

use crate::integrity::{fingerprint, verify_fingerprint};

/// Shortest blob accepted as a plausible certificate.
pub const MIN_CERTIFICATE_LEN: usize = 16;

/// Immutable certificate bytes. Cloning shares the same allocation.
#[derive(Clone, PartialEq, Eq)]
pub struct CertificateBlob {
    bytes: Arc<[u8]>,
}

impl CertificateBlob {
    /// Wrap raw bytes without validating them. Validation happens at engine
    /// initialization so that a bad blob is reported there.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// SHA-256 hex fingerprint, safe to log.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.bytes)
    }

    /// Reject blobs that cannot possibly be a certificate.
    pub fn validate(&self) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(InkBridgeError::InvalidCertificate("certificate is empty".into()));
        }
        if self.bytes.len() < MIN_CERTIFICATE_LEN {
            return Err(InkBridgeError::InvalidCertificate(format!(
                "certificate is {} bytes, expected at least {MIN_CERTIFICATE_LEN}",
                self.bytes.len()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for CertificateBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fp = self.fingerprint();
        f.debug_struct("CertificateBlob")
            .field("len", &self.bytes.len())
            .field("sha256", &&fp[..12])
            .finish()
    }
}

/// Holds the certificate for the lifetime of the bridge.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    certificate: CertificateBlob,
    source: Option<PathBuf>,
}

impl CredentialStore {
    /// Load a certificate file in either raw or C-source form.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read(path)?;
        let certificate = decode_certificate(&raw)?;
        certificate.validate()?;

        info!(
            len = certificate.len(),
            sha256 = %certificate.fingerprint(),
            "certificate loaded"
        );
        Ok(Self {
            certificate,
            source: Some(path.to_path_buf()),
        })
    }

    /// Like [`CredentialStore::load`], then check the certificate against a
    /// pinned SHA-256 when one is given.
    pub fn load_pinned(path: impl AsRef<Path>, pin: Option<&str>) -> Result<Self> {
        let store = Self::load(path)?;
        if let Some(pin) = pin {
            verify_fingerprint(store.certificate.as_bytes(), pin)?;
            debug!("certificate matches pinned fingerprint");
        }
        Ok(store)
    }

    pub fn certificate(&self) -> &CertificateBlob {
        &self.certificate
    }

    /// File the certificate came from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Decode file contents into a blob, unwrapping the C-source form when
/// present.
pub fn decode_certificate(raw: &[u8]) -> Result<CertificateBlob> {
    match std::str::from_utf8(raw) {
        Ok(text) if looks_like_c_source(text) => {
            let bytes = parse_c_byte_array(text)?;
            debug!(len = bytes.len(), "decoded C-source certificate");
            Ok(CertificateBlob::from_bytes(bytes))
        }
        _ => Ok(CertificateBlob::from_bytes(raw.to_vec())),
    }
}

fn looks_like_c_source(text: &str) -> bool {
    text.contains('{') && (text.contains("[]") || text.contains("char"))
}

/// Parse the first `{ ... }` initializer list into bytes.
///
/// Accepts decimal (signed or unsigned) and hex literals; negative values
/// are stored two's-complement as a C `char` would be.
fn parse_c_byte_array(text: &str) -> Result<Vec<u8>> {
    let text = strip_c_comments(text);
    let open = text
        .find('{')
        .ok_or_else(|| InkBridgeError::InvalidCertificate("no byte array found".into()))?;
    let close = text[open..]
        .find('}')
        .map(|i| open + i)
        .ok_or_else(|| InkBridgeError::InvalidCertificate("unterminated byte array".into()))?;

    let mut bytes = Vec::new();
    for token in text[open + 1..close].split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        bytes.push(parse_c_byte(token)?);
    }

    if bytes.is_empty() {
        return Err(InkBridgeError::InvalidCertificate("byte array is empty".into()));
    }
    Ok(bytes)
}

fn parse_c_byte(token: &str) -> Result<u8> {
    let invalid = || InkBridgeError::InvalidCertificate(format!("invalid byte literal `{token}`"));

    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, token),
    };
    // Unsigned parse: a second sign (`--5`, `-+5`) is not a C byte literal.
    if negative && digits.starts_with(['-', '+']) {
        return Err(invalid());
    }
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) if !hex.starts_with(['-', '+']) => {
            u16::from_str_radix(hex, 16).map_err(|_| invalid())?
        }
        Some(_) => return Err(invalid()),
        None => digits.parse::<u16>().map_err(|_| invalid())?,
    };
    let magnitude = i32::from(magnitude);
    let value = if negative { -magnitude } else { magnitude };

    match value {
        0..=255 => Ok(value as u8),
        -128..=-1 => Ok(value as i8 as u8),
        _ => Err(invalid()),
    }
}

fn strip_c_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let line = rest.find("//");
        let block = rest.find("/*");
        let (start, is_block) = match (line, block) {
            (None, None) => {
                out.push_str(rest);
                break;
            }
            (Some(l), Some(b)) if b < l => (b, true),
            (Some(l), _) => (l, false),
            (None, Some(b)) => (b, true),
        };
        out.push_str(&rest[..start]);
        rest = if is_block {
            rest[start + 2..]
                .find("*/")
                .map_or("", |end| &rest[start + 2 + end + 2..])
        } else {
            rest[start..].find('\n').map_or("", |nl| &rest[start + nl..])
        };
    }
    out
}
